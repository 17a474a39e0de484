//! Session configuration

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use probe_platform::DisplayConfig;

use crate::error::ConfigError;

/// Environment variable selecting the async backend (`tokio` or `async-io`)
pub const EVENTLOOP_ENV: &str = "PROBE_EVENTLOOP";

/// Environment variable enabling application release checks (`session` or
/// `end`)
pub const RELEASE_ENV: &str = "PROBE_APP_RELEASE";

/// The cooperative scheduling backend a session runs on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Shared event loop; the application is a spawned task
    #[default]
    Tokio,
    /// Structured concurrency; the application is a nursery child
    AsyncIo,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Tokio => "tokio",
            BackendKind::AsyncIo => "async-io",
        }
    }

    /// Whether a failed application task must be cancelled by hand when its
    /// failure is consumed
    pub fn requires_explicit_cancel(self) -> bool {
        matches!(self, BackendKind::Tokio)
    }

    /// Whether support for this backend was compiled in
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::Tokio => cfg!(feature = "tokio"),
            BackendKind::AsyncIo => cfg!(feature = "async-io"),
        }
    }

    /// Fail unless the backend was compiled in
    pub fn ensure_available(self) -> Result<Self, ConfigError> {
        if self.is_available() {
            Ok(self)
        } else {
            Err(ConfigError::BackendUnavailable {
                backend: self.name(),
                feature: self.name(),
            })
        }
    }

    /// Read [`EVENTLOOP_ENV`], defaulting to tokio when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(EVENTLOOP_ENV) {
            Ok(value) => value.parse(),
            Err(_) => Ok(BackendKind::default()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tokio" => Ok(BackendKind::Tokio),
            "async-io" | "async_io" => Ok(BackendKind::AsyncIo),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// When to verify that launched applications were released
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleaseCheck {
    #[default]
    Off,
    /// Right after each session exits
    PerSession,
    /// Once, by the caller, at the end of the run
    AtEnd,
}

impl ReleaseCheck {
    /// Read [`RELEASE_ENV`]; unset or empty means off
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(RELEASE_ENV) {
            Ok(value) if !value.is_empty() => value.parse(),
            _ => Ok(ReleaseCheck::Off),
        }
    }
}

impl FromStr for ReleaseCheck {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(ReleaseCheck::PerSession),
            "end" => Ok(ReleaseCheck::AtEnd),
            other => Err(ConfigError::InvalidValue {
                name: RELEASE_ENV.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration of one application session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    pub backend: BackendKind,
    /// Bound on waiting for the application's `started` signal
    pub startup_timeout: Duration,
    /// Bound on waiting for the application's `stopped` signal
    pub shutdown_timeout: Duration,
    /// Poll interval of the startup and shutdown rendezvous
    pub poll_interval: Duration,
    /// Poll interval while waiting for frames
    pub frame_poll_interval: Duration,
    /// Frames to wait after startup before handing the application over
    pub settle_frames: u64,
    pub release_check: ReleaseCheck,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl SessionConfig {
    /// Standard configuration
    pub fn standard() -> Self {
        Self {
            width: 320,
            height: 240,
            backend: BackendKind::default(),
            startup_timeout: Duration::from_secs(120),
            shutdown_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(100),
            frame_poll_interval: Duration::from_secs_f64(1.0 / 60.0),
            settle_frames: 5,
            release_check: ReleaseCheck::Off,
        }
    }

    /// Short polling and timeouts for test suites
    pub fn fast() -> Self {
        Self {
            startup_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(1),
            frame_poll_interval: Duration::from_millis(1),
            ..Self::standard()
        }
    }

    /// Standard configuration with the backend and release check taken from
    /// the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend: BackendKind::from_env()?,
            release_check: ReleaseCheck::from_env()?,
            ..Self::standard()
        })
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_frame_poll_interval(mut self, interval: Duration) -> Self {
        self.frame_poll_interval = interval;
        self
    }

    pub fn with_settle_frames(mut self, frames: u64) -> Self {
        self.settle_frames = frames;
        self
    }

    pub fn with_release_check(mut self, check: ReleaseCheck) -> Self {
        self.release_check = check;
        self
    }

    /// The display configuration applied when a session is entered
    pub fn display(&self) -> DisplayConfig {
        DisplayConfig::new(self.width, self.height).suppress_input_autodetect(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.startup_timeout, Duration::from_secs(120));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.settle_frames, 5);
        assert_eq!(config.release_check, ReleaseCheck::Off);
        assert!(config.display().suppress_input_autodetect);
    }

    #[test]
    fn test_backend_names() {
        assert_eq!("tokio".parse::<BackendKind>(), Ok(BackendKind::Tokio));
        assert_eq!("async-io".parse::<BackendKind>(), Ok(BackendKind::AsyncIo));
        assert_eq!(
            "curio".parse::<BackendKind>(),
            Err(ConfigError::UnknownBackend("curio".to_string()))
        );
        assert!(BackendKind::Tokio.requires_explicit_cancel());
        assert!(!BackendKind::AsyncIo.requires_explicit_cancel());
    }

    #[test]
    fn test_release_check_names() {
        assert_eq!("session".parse::<ReleaseCheck>(), Ok(ReleaseCheck::PerSession));
        assert_eq!("end".parse::<ReleaseCheck>(), Ok(ReleaseCheck::AtEnd));
        assert!("always".parse::<ReleaseCheck>().is_err());
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::fast()
            .with_size(640, 480)
            .with_backend(BackendKind::AsyncIo)
            .with_settle_frames(2);
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.backend, BackendKind::AsyncIo);
        assert_eq!(config.settle_frames, 2);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
    }

    #[cfg(all(feature = "tokio", feature = "async-io"))]
    #[test]
    fn test_all_backends_available() {
        assert!(BackendKind::Tokio.ensure_available().is_ok());
        assert!(BackendKind::AsyncIo.ensure_available().is_ok());
    }
}
