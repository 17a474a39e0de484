//! Error types for probe_app

use std::fmt;
use std::time::Duration;

use probe_input::InputError;
use probe_platform::{AppError, PlatformError};
use probe_resolver::ResolveError;
use thiserror::Error;

/// Invalid session configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The event loop name is not one of the supported backends
    #[error("unknown event loop {0:?}")]
    UnknownBackend(String),

    /// The selected backend was not compiled in
    #[error("event loop is {backend} but the `{feature}` feature is not enabled (missing required backend dependency)")]
    BackendUnavailable {
        backend: &'static str,
        feature: &'static str,
    },

    /// A setting has a value outside its domain
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: String, value: String },
}

/// The rendezvous a timeout interrupted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitPhase {
    Startup,
    Shutdown,
}

impl fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WaitPhase::Startup => "application startup",
            WaitPhase::Shutdown => "application shutdown",
        })
    }
}

/// A panic caught in the application's run routine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("application panicked: {0}")]
pub struct AppPanic(pub String);

impl AppPanic {
    /// Recover the message from a panic payload
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast_ref::<&'static str>() {
                Some(message) => (*message).to_string(),
                None => "non-string panic payload".to_string(),
            },
        };
        AppPanic(message)
    }
}

/// Errors raised by an application session
#[derive(Error, Debug)]
pub enum SessionError {
    /// A bounded wait ran out; the session is not usable afterwards
    #[error("{phase} did not complete within {after:?}")]
    Timeout { phase: WaitPhase, after: Duration },

    /// The application's run routine failed before or during startup
    #[error("application failed to start: {0}")]
    Startup(#[source] AppError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// An operation was called in the wrong lifecycle state
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// Applications were still referenced after their session ended
    #[error("applications not released: {}", .0.join(", "))]
    Leaked(Vec<String>),
}

impl SessionError {
    /// The application failure, if this is a startup error
    pub fn startup_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            SessionError::Startup(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Result type for probe_app operations
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_message() {
        let from_str = AppPanic::from_payload(Box::new("app blew up"));
        assert_eq!(from_str, AppPanic("app blew up".to_string()));

        let from_string = AppPanic::from_payload(Box::new(format!("frame {}", 3)));
        assert_eq!(from_string.to_string(), "application panicked: frame 3");

        let opaque = AppPanic::from_payload(Box::new(7u8));
        assert_eq!(opaque.0, "non-string panic payload");
    }
}
