//! Frame synchronization
//!
//! Every gesture step dispatches, then waits for the application to render
//! at least one frame before the step is emitted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use probe_platform::Window;

/// Clock, sleep and surface access the gesture generators are driven by
#[allow(async_fn_in_trait)]
pub trait FrameSync {
    /// Monotonic time
    fn now(&self) -> Instant;

    /// Sleep on the active backend; a zero duration still yields once
    async fn sleep(&self, duration: Duration);

    /// Frames rendered so far by the application's clock
    fn frames(&self) -> u64;

    /// The display surface input is dispatched to
    fn window(&self) -> Arc<dyn Window>;

    /// How long to sleep between frame counter checks
    fn frame_poll_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / 60.0)
    }

    /// Wait until `n` more frames have been rendered, returning the frame
    /// counter reached
    async fn wait_frames(&self, n: u64) -> u64 {
        let target = self.frames() + n;
        while self.frames() < target {
            self.sleep(self.frame_poll_interval()).await;
        }
        self.frames()
    }
}

/// Sleep for one of the remaining steps of a timed gesture
///
/// The time left is split evenly over the steps left, so later steps absorb
/// any overrun of earlier ones. Never negative.
pub fn step_budget(duration: Duration, elapsed: Duration, remaining_steps: u32) -> Duration {
    duration.saturating_sub(elapsed) / remaining_steps.max(1)
}
