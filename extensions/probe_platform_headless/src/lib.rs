//! Probe Headless Platform
//!
//! A deterministic in-memory toolkit for driving applications without a
//! display. It implements the `probe_platform` traits with:
//!
//! - a singleton [`HeadlessWindow`] that records the input dispatched to it
//! - a stack of [`HeadlessContext`]s, each owning its own [`HeadlessClock`]
//! - a global [`EventLoopState`] with a stop flag
//! - a global [`AnimationRegistry`] and [`LogHistory`]
//!
//! # Example
//!
//! ```ignore
//! use probe_platform::prelude::*;
//! use probe_platform_headless::{HeadlessApp, HeadlessToolkit, HeadlessWidget};
//!
//! let toolkit = HeadlessToolkit::new();
//! let app = HeadlessApp::builder(toolkit.clone())
//!     .root(|_| Ok(HeadlessWidget::new("Button").with_prop("name", "ok")))
//!     .build();
//! ```

pub mod animation;
pub mod app;
pub mod clock;
pub mod context;
pub mod event_loop;
pub mod keymap;
pub mod log;
pub mod widget;
pub mod window;

use std::sync::Arc;

use parking_lot::RwLock;
use probe_platform::{DisplayConfig, LoopStatus, Result, Toolkit, Window};
use tracing::debug;

pub use animation::{Animation, AnimationRegistry};
pub use app::{HeadlessApp, HeadlessAppBuilder};
pub use clock::HeadlessClock;
pub use context::HeadlessContext;
pub use event_loop::EventLoopState;
pub use log::LogHistory;
pub use widget::{Geometry, HeadlessWidget};
pub use window::{HeadlessWindow, InputRecord};

use context::ContextStack;

/// Headless toolkit implementation
///
/// Holds every process-wide singleton an application shares with the
/// harness. Outside any pushed context the base clock is active.
pub struct HeadlessToolkit {
    display: RwLock<DisplayConfig>,
    window: Arc<HeadlessWindow>,
    contexts: Arc<ContextStack>,
    base_clock: Arc<HeadlessClock>,
    event_loop: EventLoopState,
    animations: AnimationRegistry,
    log: LogHistory,
}

impl HeadlessToolkit {
    pub fn new() -> Arc<Self> {
        let display = DisplayConfig::default();
        Arc::new(Self {
            window: Arc::new(HeadlessWindow::new(display.width, display.height)),
            display: RwLock::new(display),
            contexts: Arc::new(ContextStack::default()),
            base_clock: Arc::new(HeadlessClock::default()),
            event_loop: EventLoopState::default(),
            animations: AnimationRegistry::default(),
            log: LogHistory::default(),
        })
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.read().clone()
    }

    pub fn event_loop(&self) -> &EventLoopState {
        &self.event_loop
    }

    pub fn animations(&self) -> &AnimationRegistry {
        &self.animations
    }

    pub fn log_history(&self) -> &LogHistory {
        &self.log
    }

    /// Number of contexts currently pushed
    pub fn context_depth(&self) -> usize {
        self.contexts.depth()
    }

    fn active_clock(&self) -> Arc<HeadlessClock> {
        self.contexts
            .top_clock()
            .unwrap_or_else(|| self.base_clock.clone())
    }
}

impl Toolkit for HeadlessToolkit {
    type Window = HeadlessWindow;
    type Clock = HeadlessClock;
    type Context = HeadlessContext;

    fn name(&self) -> &'static str {
        "headless"
    }

    fn configure(&self, config: &DisplayConfig) -> Result<()> {
        debug!(
            width = config.width,
            height = config.height,
            suppress_input_autodetect = config.suppress_input_autodetect,
            "headless display configured"
        );
        *self.display.write() = config.clone();
        self.window.set_size(config.width, config.height);
        Ok(())
    }

    fn create_context(&self) -> Result<HeadlessContext> {
        self.event_loop.reset();
        self.window.reset_input();
        self.log.push("execution context created");
        Ok(HeadlessContext::new(self.contexts.clone()))
    }

    fn window(&self) -> Arc<HeadlessWindow> {
        self.window.clone()
    }

    fn clock(&self) -> Result<Arc<HeadlessClock>> {
        Ok(self.active_clock())
    }

    fn request_stop(&self) {
        self.log.push("stop requested");
        self.event_loop.request_stop();
    }

    fn loop_status(&self) -> LoopStatus {
        self.event_loop.status()
    }

    fn cancel_animations(&self) -> usize {
        self.animations.cancel_all()
    }

    fn clear_log_history(&self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::FutureExt;
    use probe_platform::{Application, Clock, ExecutionContext, SleepFn, Widget};

    use super::*;

    fn yielding_sleep() -> SleepFn {
        Arc::new(|_: Duration| {
            let mut yielded = false;
            futures::future::poll_fn(move |cx| {
                if yielded {
                    std::task::Poll::Ready(())
                } else {
                    yielded = true;
                    cx.waker().wake_by_ref();
                    std::task::Poll::Pending
                }
            })
            .boxed()
        })
    }

    #[test]
    fn test_context_swaps_clock() {
        let toolkit = HeadlessToolkit::new();
        let base = toolkit.clock().unwrap();

        let mut context = toolkit.create_context().unwrap();
        context.push().unwrap();
        let scoped = toolkit.clock().unwrap();
        assert!(!Arc::ptr_eq(&base, &scoped));
        scoped.tick();

        context.pop().unwrap();
        assert!(Arc::ptr_eq(&toolkit.clock().unwrap(), &base));
        assert_eq!(base.frames(), 0);
    }

    #[test]
    fn test_configure_sizes_window() {
        let toolkit = HeadlessToolkit::new();
        toolkit.configure(&DisplayConfig::new(200, 100)).unwrap();
        assert_eq!(toolkit.window().size(), (200, 100));
        assert_eq!(toolkit.window().root().size(), (200.0, 100.0));
    }

    #[test]
    fn test_app_runs_until_stopped() {
        let toolkit = HeadlessToolkit::new();
        let mut context = toolkit.create_context().unwrap();
        context.push().unwrap();
        let clock = toolkit.clock().unwrap();
        clock.set_max_fps(0);
        clock.init_async_lib("test", yielding_sleep()).unwrap();

        let app = Arc::new(
            HeadlessApp::builder(toolkit.clone())
                .root(|_| Ok(HeadlessWidget::new("Label").with_prop("text", "hi")))
                .build(),
        );
        let stopper = toolkit.clone();
        let frames = clock.clone();
        app.bind_on_start(Box::new(move || {
            // nothing has rendered yet when `started` fires
            assert_eq!(frames.frames(), 0);
            stopper.request_stop();
        }));

        pollster::block_on(app.clone().run()).unwrap();

        assert_eq!(toolkit.loop_status(), LoopStatus::Stopped);
        assert_eq!(toolkit.window().children().len(), 1);
        assert_eq!(app.root().unwrap().type_name(), "Label");
        context.pop().unwrap();
    }

    #[test]
    fn test_start_hook_failure_aborts() {
        let toolkit = HeadlessToolkit::new();
        let mut context = toolkit.create_context().unwrap();
        context.push().unwrap();
        toolkit
            .clock()
            .unwrap()
            .init_async_lib("test", yielding_sleep())
            .unwrap();

        let app = Arc::new(
            HeadlessApp::builder(toolkit.clone())
                .on_start(|_| Err("boom".into()))
                .build(),
        );
        let err = pollster::block_on(app.run()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(toolkit.loop_status(), LoopStatus::Idle);
        context.pop().unwrap();
    }

    #[test]
    fn test_unbound_clock_fails_run() {
        let toolkit = HeadlessToolkit::new();
        let app = Arc::new(HeadlessApp::builder(toolkit).build());
        assert!(pollster::block_on(app.run()).is_err());
    }
}
