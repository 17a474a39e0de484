//! Render clock abstraction

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::error::Result;

/// Async sleep primitive provided by the selected backend
///
/// A zero duration must still yield to the scheduler once.
pub type SleepFn = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// Render clock trait
///
/// Each execution context owns its own clock instance.
pub trait Clock: Send + Sync {
    /// Monotonic count of rendered frames
    fn frames(&self) -> u64;

    /// Cap the frame rate; `0` disables the cap so frame advancement is
    /// driven by the test rather than wall-clock pacing
    fn set_max_fps(&self, fps: u32);

    /// Bind the clock to a named async backend and its sleep primitive
    fn init_async_lib(&self, lib: &str, sleep: SleepFn) -> Result<()>;

    /// Name of the backend the clock is bound to
    fn async_lib(&self) -> Option<String>;
}
