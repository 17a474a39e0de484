//! Cooperative scheduling backends
//!
//! A session runs its application as a background task on one of two
//! backends:
//!
//! - [`TokioBackend`] - a shared event loop; the application is spawned and
//!   its task handle kept so it can be cancelled explicitly
//! - [`NurseryBackend`] - structured concurrency; the application is a child
//!   of a nursery driven whenever the session suspends, and dropped when the
//!   nursery closes
//!
//! [`Backend`] selects one at runtime from a [`BackendKind`].

#[cfg(feature = "async-io")]
mod nursery;
#[cfg(feature = "tokio")]
mod tokio;

use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use probe_platform::SleepFn;

use crate::config::BackendKind;
use crate::error::{ConfigError, Result};

#[cfg(feature = "async-io")]
pub use self::nursery::NurseryBackend;
#[cfg(feature = "tokio")]
pub use self::tokio::TokioBackend;

#[cfg(not(any(feature = "tokio", feature = "async-io")))]
compile_error!("probe_app needs at least one of the `tokio` or `async-io` features");

/// A cooperative scheduler an application session runs on
#[allow(async_fn_in_trait)]
pub trait AsyncBackend: 'static {
    fn kind(&self) -> BackendKind;

    /// Monotonic time
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// Suspend the session; a zero duration still yields once
    async fn sleep(&self, duration: Duration);

    /// Sleep primitive handed to the render clock, usable from the
    /// application task
    fn sleeper(&self) -> SleepFn;

    /// Schedule the application's run routine in the background
    fn spawn_app(&self, task: BoxFuture<'static, ()>) -> Result<()>;

    /// Cancel the background application, returning whether one was pending
    fn cancel_app(&self) -> bool;

    /// Cancel and release every background task
    async fn shutdown(&self);
}

/// Runtime-selected backend
pub enum Backend {
    #[cfg(feature = "tokio")]
    Tokio(TokioBackend),
    #[cfg(feature = "async-io")]
    AsyncIo(NurseryBackend),
}

impl Backend {
    /// Create the backend for `kind`, failing if it was not compiled in
    pub fn new(kind: BackendKind) -> std::result::Result<Self, ConfigError> {
        match kind.ensure_available()? {
            #[cfg(feature = "tokio")]
            BackendKind::Tokio => Ok(Backend::Tokio(TokioBackend::new())),
            #[cfg(feature = "async-io")]
            BackendKind::AsyncIo => Ok(Backend::AsyncIo(NurseryBackend::new())),
            #[allow(unreachable_patterns)]
            other => Err(ConfigError::BackendUnavailable {
                backend: other.name(),
                feature: other.name(),
            }),
        }
    }

    /// Create the backend named by `PROBE_EVENTLOOP`
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::new(BackendKind::from_env()?)
    }
}

impl AsyncBackend for Backend {
    fn kind(&self) -> BackendKind {
        match self {
            #[cfg(feature = "tokio")]
            Backend::Tokio(backend) => backend.kind(),
            #[cfg(feature = "async-io")]
            Backend::AsyncIo(backend) => backend.kind(),
        }
    }

    async fn sleep(&self, duration: Duration) {
        match self {
            #[cfg(feature = "tokio")]
            Backend::Tokio(backend) => backend.sleep(duration).await,
            #[cfg(feature = "async-io")]
            Backend::AsyncIo(backend) => backend.sleep(duration).await,
        }
    }

    fn sleeper(&self) -> SleepFn {
        match self {
            #[cfg(feature = "tokio")]
            Backend::Tokio(backend) => backend.sleeper(),
            #[cfg(feature = "async-io")]
            Backend::AsyncIo(backend) => backend.sleeper(),
        }
    }

    fn spawn_app(&self, task: BoxFuture<'static, ()>) -> Result<()> {
        match self {
            #[cfg(feature = "tokio")]
            Backend::Tokio(backend) => backend.spawn_app(task),
            #[cfg(feature = "async-io")]
            Backend::AsyncIo(backend) => backend.spawn_app(task),
        }
    }

    fn cancel_app(&self) -> bool {
        match self {
            #[cfg(feature = "tokio")]
            Backend::Tokio(backend) => backend.cancel_app(),
            #[cfg(feature = "async-io")]
            Backend::AsyncIo(backend) => backend.cancel_app(),
        }
    }

    async fn shutdown(&self) {
        match self {
            #[cfg(feature = "tokio")]
            Backend::Tokio(backend) => backend.shutdown().await,
            #[cfg(feature = "async-io")]
            Backend::AsyncIo(backend) => backend.shutdown().await,
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Backend").field(&self.kind()).finish()
    }
}
