//! Application lifecycle abstraction

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::widget::WidgetRef;

/// Opaque failure raised by an application's run routine
pub type AppError = Box<dyn std::error::Error + Send + Sync>;

/// Observer invoked synchronously when a lifecycle signal fires
pub type LifecycleCallback = Box<dyn Fn() + Send + Sync>;

/// Status of the toolkit's global event loop
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopStatus {
    /// The loop never started running
    #[default]
    Idle,
    /// The loop is processing frames
    Running,
    /// The loop ran and has since stopped
    Stopped,
}

/// An application under test
pub trait Application: Send + Sync + 'static {
    /// Observe the `started` signal
    fn bind_on_start(&self, callback: LifecycleCallback);

    /// Observe the `stopped` signal
    fn bind_on_stop(&self, callback: LifecycleCallback);

    /// The asynchronous run routine
    ///
    /// Resolves when the application stops. An error means the application
    /// failed; the harness captures it rather than letting it escape the
    /// background task.
    fn run(self: Arc<Self>) -> BoxFuture<'static, Result<(), AppError>>;

    /// The root content node, once built
    fn root(&self) -> Option<WidgetRef>;
}
