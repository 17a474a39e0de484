//! Global event loop state

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use probe_platform::LoopStatus;

/// Status and stop flag shared by whichever application runs the loop
#[derive(Default)]
pub struct EventLoopState {
    status: Mutex<LoopStatus>,
    stop_requested: AtomicBool,
}

impl EventLoopState {
    pub fn status(&self) -> LoopStatus {
        *self.status.lock()
    }

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Mark the loop as processing frames
    pub fn begin(&self) {
        *self.status.lock() = LoopStatus::Running;
    }

    pub fn finish(&self) {
        *self.status.lock() = LoopStatus::Stopped;
    }

    /// Return to the never-run state for a fresh session
    pub(crate) fn reset(&self) {
        *self.status.lock() = LoopStatus::Idle;
        self.stop_requested.store(false, Ordering::Release);
    }
}
