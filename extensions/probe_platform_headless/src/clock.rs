//! Per-context render clock

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use probe_platform::{Clock, PlatformError, Result, SleepFn};
use tracing::debug;

const DEFAULT_MAX_FPS: u32 = 60;

/// Frame counter and async backend binding of one execution context
pub struct HeadlessClock {
    frames: AtomicU64,
    max_fps: AtomicU32,
    binding: RwLock<Option<(String, SleepFn)>>,
}

impl Default for HeadlessClock {
    fn default() -> Self {
        Self {
            frames: AtomicU64::new(0),
            max_fps: AtomicU32::new(DEFAULT_MAX_FPS),
            binding: RwLock::new(None),
        }
    }
}

impl HeadlessClock {
    /// Advance one frame, returning the new count
    pub fn tick(&self) -> u64 {
        self.frames.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Minimum time between frames; zero when uncapped
    pub fn frame_budget(&self) -> Duration {
        match self.max_fps.load(Ordering::Relaxed) {
            0 => Duration::ZERO,
            fps => Duration::from_secs_f64(1.0 / fps as f64),
        }
    }

    pub fn max_fps(&self) -> u32 {
        self.max_fps.load(Ordering::Relaxed)
    }

    /// The sleep primitive of the bound backend
    pub fn sleeper(&self) -> Result<SleepFn> {
        self.binding
            .read()
            .as_ref()
            .map(|(_, sleep)| sleep.clone())
            .ok_or(PlatformError::ClockNotBound)
    }
}

impl Clock for HeadlessClock {
    fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    fn set_max_fps(&self, fps: u32) {
        self.max_fps.store(fps, Ordering::Relaxed);
    }

    fn init_async_lib(&self, lib: &str, sleep: SleepFn) -> Result<()> {
        debug!(lib, "clock bound to async backend");
        *self.binding.write() = Some((lib.to_string(), sleep));
        Ok(())
    }

    fn async_lib(&self) -> Option<String> {
        self.binding.read().as_ref().map(|(lib, _)| lib.clone())
    }
}
