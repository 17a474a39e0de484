//! Shared event loop backend

use std::sync::Arc;
use std::time::Duration;

use ::tokio::runtime::Handle;
use ::tokio::task::{self, JoinHandle};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use probe_platform::SleepFn;
use tracing::{debug, warn};

use super::AsyncBackend;
use crate::config::BackendKind;
use crate::error::{Result, SessionError};

async fn tokio_sleep(duration: Duration) {
    if duration.is_zero() {
        task::yield_now().await;
    } else {
        ::tokio::time::sleep(duration).await;
    }
}

/// Runs the application as a task on the current tokio runtime
///
/// The task handle is kept so the task can be aborted; nothing cancels it
/// implicitly.
#[derive(Default)]
pub struct TokioBackend {
    app: Mutex<Option<JoinHandle<()>>>,
}

impl TokioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a spawned application task has not finished yet
    pub fn is_app_pending(&self) -> bool {
        self.app
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl AsyncBackend for TokioBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Tokio
    }

    async fn sleep(&self, duration: Duration) {
        tokio_sleep(duration).await;
    }

    fn sleeper(&self) -> SleepFn {
        Arc::new(|duration| tokio_sleep(duration).boxed())
    }

    fn spawn_app(&self, task: BoxFuture<'static, ()>) -> Result<()> {
        let runtime = Handle::try_current()
            .map_err(|e| SessionError::InvalidState(format!("no tokio runtime: {e}")))?;
        let handle = runtime.spawn(task);
        if let Some(previous) = self.app.lock().replace(handle) {
            warn!("replacing a previous application task");
            previous.abort();
        }
        Ok(())
    }

    fn cancel_app(&self) -> bool {
        match self.app.lock().as_ref() {
            Some(handle) if !handle.is_finished() => {
                debug!("aborting application task");
                handle.abort();
                true
            }
            _ => false,
        }
    }

    async fn shutdown(&self) {
        let handle = self.app.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => debug!("application task cancelled"),
                Err(e) => warn!(error = %e, "application task ended abnormally"),
            }
        }
    }
}
