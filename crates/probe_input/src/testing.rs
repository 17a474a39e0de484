//! Virtual-time frame source for gesture tests

use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::{Duration, Instant};

use probe_platform::{Toolkit, Window};
use probe_platform_headless::{HeadlessToolkit, HeadlessWindow, InputRecord};

use crate::pacing::FrameSync;

/// Advances virtual time by each sleep and renders one frame per sleep
pub(crate) struct VirtualFrames {
    pub toolkit: Arc<HeadlessToolkit>,
    start: Instant,
    elapsed: Cell<Duration>,
    frames: Cell<u64>,
    sleeps: RefCell<Vec<Duration>>,
    on_frame: RefCell<Option<Box<dyn FnMut(u64)>>>,
}

impl VirtualFrames {
    pub fn new() -> Self {
        Self {
            toolkit: HeadlessToolkit::new(),
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            frames: Cell::new(0),
            sleeps: RefCell::new(Vec::new()),
            on_frame: RefCell::new(None),
        }
    }

    /// Run `hook` with the new frame number after every rendered frame
    pub fn on_frame(&self, hook: impl FnMut(u64) + 'static) {
        *self.on_frame.borrow_mut() = Some(Box::new(hook));
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    pub fn surface(&self) -> Arc<HeadlessWindow> {
        self.toolkit.window()
    }

    pub fn history(&self) -> Vec<InputRecord> {
        self.surface().history()
    }
}

impl FrameSync for VirtualFrames {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.elapsed.set(self.elapsed.get() + duration);
        let frame = self.frames.get() + 1;
        self.frames.set(frame);
        if let Some(hook) = self.on_frame.borrow_mut().as_mut() {
            hook(frame);
        }
    }

    fn frames(&self) -> u64 {
        self.frames.get()
    }

    fn window(&self) -> Arc<dyn Window> {
        self.toolkit.window()
    }
}

/// Approximate equality for durations built from float seconds
pub(crate) fn close(a: Duration, b: Duration) -> bool {
    let diff = a.checked_sub(b).unwrap_or_else(|| b - a);
    diff < Duration::from_micros(5)
}
