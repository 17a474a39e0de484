//! Application session
//!
//! An [`AppSession`] owns one application under test from the moment the
//! toolkit is configured until every process-wide resource it touched is
//! handed back:
//!
//! ```text
//! Unentered -> ContextActive -> AppBound -> Started -> StopRequested -> Stopped -> Released
//! ```
//!
//! Only one session may hold the toolkit's singletons (surface, clock) at a
//! time; the test runner is expected to serialize sessions.

use std::any::type_name;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use probe_input::gestures::{self, Drag, DragFollow, DragPath, KeyPress, TouchDownUp};
use probe_input::{FrameSync, GestureStream, KeyStream};
use probe_platform::{
    AppError, Application, Clock, ExecutionContext, LoopStatus, Toolkit, Window, WidgetRef,
};
use probe_resolver::WidgetResolver;
use tracing::{debug, error, info, warn};

use crate::backend::{AsyncBackend, Backend};
use crate::config::{ReleaseCheck, SessionConfig};
use crate::error::{AppPanic, Result, SessionError, WaitPhase};
use crate::release::ReleaseTracker;

/// Lifecycle state of an [`AppSession`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unentered,
    /// Display configured, context pushed, surface and clock initialized
    ContextActive,
    /// Lifecycle observers installed and the run routine scheduled
    AppBound,
    /// The application fired `started`
    Started,
    StopRequested,
    /// The application fired `stopped`
    Stopped,
    /// Every resource handed back; the session cannot be reused
    Released,
}

/// Edge-triggered lifecycle flags set by the application's observers
#[derive(Default)]
struct Signals {
    started: AtomicBool,
    stopped: AtomicBool,
    /// The run routine returned, failed or panicked
    finished: AtomicBool,
}

impl Signals {
    fn reset(&self) {
        self.started.store(false, Ordering::SeqCst);
        self.stopped.store(false, Ordering::SeqCst);
        self.finished.store(false, Ordering::SeqCst);
    }

    fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

/// A scoped application under test on toolkit `T`, scheduled by backend `B`
pub struct AppSession<T: Toolkit, B: AsyncBackend = Backend> {
    toolkit: Arc<T>,
    backend: B,
    config: SessionConfig,
    state: SessionState,
    context: Option<T::Context>,
    clock: Option<Arc<T::Clock>>,
    app: Option<Arc<dyn Application>>,
    signals: Arc<Signals>,
    /// Failure captured from the background run routine, kept until consumed
    failure: Arc<Mutex<Option<AppError>>>,
    cancelled: bool,
    releases: ReleaseTracker,
}

impl<T: Toolkit> AppSession<T, Backend> {
    /// Create a session on the backend named by `config`
    pub fn from_config(toolkit: Arc<T>, config: SessionConfig) -> Result<Self> {
        let backend = Backend::new(config.backend)?;
        Ok(Self::new(toolkit, backend, config))
    }
}

impl<T: Toolkit, B: AsyncBackend> AppSession<T, B> {
    pub fn new(toolkit: Arc<T>, backend: B, config: SessionConfig) -> Self {
        Self {
            toolkit,
            backend,
            config,
            state: SessionState::Unentered,
            context: None,
            clock: None,
            app: None,
            signals: Arc::new(Signals::default()),
            failure: Arc::new(Mutex::new(None)),
            cancelled: false,
            releases: ReleaseTracker::new(),
        }
    }

    /// Record launched applications in a shared tracker
    pub fn with_release_tracker(mut self, tracker: ReleaseTracker) -> Self {
        self.releases = tracker;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn toolkit(&self) -> &Arc<T> {
        &self.toolkit
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn release_tracker(&self) -> &ReleaseTracker {
        &self.releases
    }

    /// The launched application, until the session exits
    pub fn app(&self) -> Option<&Arc<dyn Application>> {
        self.app.as_ref()
    }

    fn expect_state(&self, expected: SessionState, operation: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState(format!(
                "cannot {operation} in state {:?}",
                self.state
            )))
        }
    }

    fn has_failure(&self) -> bool {
        self.failure.lock().is_some()
    }

    /// Configure the display, push an isolated execution context and
    /// initialize the surface and the render clock
    pub fn enter(&mut self) -> Result<()> {
        self.expect_state(SessionState::Unentered, "enter")?;

        let display_config = self.config.display();
        self.toolkit.configure(&display_config)?;

        let mut context = self.toolkit.create_context()?;
        context.push()?;
        self.context = Some(context);
        self.state = SessionState::ContextActive;

        let window = self.toolkit.window();
        window.create()?;
        window.register();
        window.clear_canvas();
        window.set_size(display_config.width, display_config.height);

        let clock = self.toolkit.clock()?;
        clock.set_max_fps(0);
        clock.init_async_lib(self.backend.kind().name(), self.backend.sleeper())?;
        self.clock = Some(clock);

        debug!(
            toolkit = self.toolkit.name(),
            backend = %self.backend.kind(),
            width = display_config.width,
            height = display_config.height,
            "session entered"
        );
        Ok(())
    }

    /// Bind `app`'s lifecycle signals, run it in the background and wait
    /// until it has started and rendered a few frames
    pub async fn launch<A: Application>(&mut self, app: Arc<A>) -> Result<Arc<A>> {
        self.expect_state(SessionState::ContextActive, "launch")?;

        self.signals.reset();
        let started = self.signals.clone();
        app.bind_on_start(Box::new(move || started.started.store(true, Ordering::SeqCst)));
        let stopped = self.signals.clone();
        app.bind_on_stop(Box::new(move || stopped.stopped.store(true, Ordering::SeqCst)));

        if self.config.release_check != ReleaseCheck::Off {
            self.releases.track(type_name::<A>(), &app);
        }
        self.app = Some(app.clone() as Arc<dyn Application>);

        let failure = self.failure.clone();
        let signals = self.signals.clone();
        let run = app.clone().run();
        self.backend.spawn_app(
            async move {
                let outcome = match AssertUnwindSafe(run).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(payload) => Err(AppPanic::from_payload(payload).into()),
                };
                if let Err(e) = outcome {
                    error!(error = %e, "application run failed");
                    *failure.lock() = Some(e);
                }
                signals.finished.store(true, Ordering::SeqCst);
            }
            .boxed(),
        )?;
        self.state = SessionState::AppBound;

        self.wait_started().await?;
        self.settle().await?;
        self.check_startup()?;
        info!(app = type_name::<A>(), frames = self.frames(), "application ready");
        Ok(app)
    }

    async fn wait_started(&mut self) -> Result<()> {
        let after = self.config.startup_timeout;
        let deadline = self.backend.now() + after;
        while !self.signals.started() {
            if self.has_failure() {
                self.check_startup()?;
            }
            if self.backend.now() >= deadline {
                error!(?after, "application did not start");
                return Err(SessionError::Timeout {
                    phase: WaitPhase::Startup,
                    after,
                });
            }
            self.backend.sleep(self.config.poll_interval).await;
        }
        self.state = SessionState::Started;
        debug!("application started");
        Ok(())
    }

    async fn settle(&mut self) -> Result<()> {
        let target = self.frames() + self.config.settle_frames;
        while self.frames() < target {
            if self.has_failure() {
                self.check_startup()?;
            }
            if self.signals.stopped() {
                debug!("application stopped while settling");
                break;
            }
            self.backend.sleep(self.config.frame_poll_interval).await;
        }
        Ok(())
    }

    /// Re-raise a failure captured from the application's run routine
    ///
    /// Consuming the failure is one-shot: a second call returns `Ok`. On a
    /// backend that needs it, the application task is cancelled the first
    /// time a failure is consumed.
    pub fn check_startup(&mut self) -> Result<()> {
        let failure = self.failure.lock().take();
        let Some(err) = failure else {
            return Ok(());
        };
        warn!(error = %err, "consuming application startup failure");
        if self.backend.kind().requires_explicit_cancel() && !self.cancelled {
            self.cancelled = true;
            if self.backend.cancel_app() {
                debug!("application task cancelled");
            }
        }
        Err(SessionError::Startup(err))
    }

    /// Ask the application to stop and wait for its `stopped` signal
    ///
    /// Returns right away when the event loop never ran, and stops waiting
    /// once the run routine has ended or failed.
    pub async fn stop(&mut self) -> Result<()> {
        match self.state {
            SessionState::Unentered | SessionState::Stopped | SessionState::Released => {
                return Ok(())
            }
            SessionState::ContextActive => {}
            _ => self.state = SessionState::StopRequested,
        }

        self.toolkit.request_stop();
        self.backend.sleep(Duration::ZERO).await;
        if self.toolkit.loop_status() == LoopStatus::Idle {
            debug!("event loop never ran, nothing to stop");
            return Ok(());
        }

        let after = self.config.shutdown_timeout;
        let deadline = self.backend.now() + after;
        while !self.signals.stopped() {
            if self.signals.finished() || self.cancelled || self.has_failure() {
                warn!("application ended without stopping");
                break;
            }
            if self.backend.now() >= deadline {
                error!(?after, "application did not stop");
                return Err(SessionError::Timeout {
                    phase: WaitPhase::Shutdown,
                    after,
                });
            }
            self.backend.sleep(self.config.poll_interval).await;
        }
        self.state = SessionState::Stopped;
        debug!("application stopped");
        Ok(())
    }

    /// Stop the application and hand back every resource the session holds
    ///
    /// Cleanup runs to completion even when stopping fails; the first error
    /// is returned afterwards. An unconsumed startup failure is reported
    /// here rather than dropped.
    pub async fn exit(&mut self) -> Result<()> {
        if matches!(self.state, SessionState::Unentered | SessionState::Released) {
            return Ok(());
        }

        let stopped = self.stop().await;

        let animations = self.toolkit.cancel_animations();
        let window = self.toolkit.window();
        let children = window.children();
        for child in &children {
            window.remove_child(child);
        }
        let popped = match self.context.take() {
            Some(mut context) if context.is_active() => context.pop(),
            _ => Ok(()),
        };
        self.toolkit.clear_log_history();

        self.backend.shutdown().await;
        self.app = None;
        self.clock = None;
        self.state = SessionState::Released;
        debug!(
            animations,
            children = children.len(),
            "session exited"
        );

        // a captured failure outranks the stop and pop errors it may cause
        self.check_startup()?;
        stopped?;
        popped?;
        if self.config.release_check == ReleaseCheck::PerSession {
            self.releases.check()?;
        }
        Ok(())
    }

    /// Enter, run `body`, then exit, even when `body` fails
    pub async fn scope<F, R>(mut self, body: F) -> Result<R>
    where
        F: for<'a> FnOnce(&'a mut AppSession<T, B>) -> LocalBoxFuture<'a, Result<R>>,
    {
        let outcome = match self.enter() {
            Ok(()) => body(&mut self).await,
            Err(e) => Err(e),
        };
        let exited = self.exit().await;
        let value = outcome?;
        exited?;
        Ok(value)
    }

    /// Like [`scope`](Self::scope), launching the application built by
    /// `make` before running `body` with it
    pub async fn scope_with_app<A, M, F, R>(self, make: M, body: F) -> Result<R>
    where
        A: Application,
        M: FnOnce(&Arc<T>) -> Arc<A> + 'static,
        F: for<'a> FnOnce(&'a mut AppSession<T, B>, Arc<A>) -> LocalBoxFuture<'a, Result<R>>
            + 'static,
        R: 'static,
    {
        self.scope(move |session| {
            async move {
                let app = make(session.toolkit());
                let app = session.launch(app).await?;
                session.check_startup()?;
                let result = body(session, app).await;
                session.check_startup()?;
                result
            }
            .boxed_local()
        })
        .await
    }

    /// A resolver rooted at `base`, or at the surface's root node
    pub fn resolve_widget(&self, base: Option<WidgetRef>) -> WidgetResolver {
        WidgetResolver::new(base.unwrap_or_else(|| self.toolkit.window().root()))
    }

    /// Wait until `n` more frames have rendered, returning the frame counter
    pub async fn wait_clock_frames(&self, n: u64) -> u64 {
        self.wait_frames(n).await
    }

    pub fn touch_down_up(&self, options: TouchDownUp) -> GestureStream<'_> {
        gestures::touch_down_up(self, options)
    }

    pub fn touch_drag(&self, options: Drag) -> GestureStream<'_> {
        gestures::touch_drag(self, options)
    }

    pub fn touch_drag_follow(&self, options: DragFollow) -> GestureStream<'_> {
        gestures::touch_drag_follow(self, options)
    }

    pub fn touch_drag_path(&self, options: DragPath) -> GestureStream<'_> {
        gestures::touch_drag_path(self, options)
    }

    pub fn keyboard_key(&self, options: KeyPress) -> KeyStream<'_> {
        gestures::keyboard_key(self, options)
    }
}

impl<T: Toolkit, B: AsyncBackend> FrameSync for AppSession<T, B> {
    fn now(&self) -> Instant {
        self.backend.now()
    }

    async fn sleep(&self, duration: Duration) {
        self.backend.sleep(duration).await;
    }

    fn frames(&self) -> u64 {
        self.clock.as_ref().map_or(0, |clock| clock.frames())
    }

    fn window(&self) -> Arc<dyn Window> {
        self.toolkit.window()
    }

    fn frame_poll_interval(&self) -> Duration {
        self.config.frame_poll_interval
    }
}

impl<T: Toolkit, B: AsyncBackend> Drop for AppSession<T, B> {
    fn drop(&mut self) {
        if !matches!(self.state, SessionState::Unentered | SessionState::Released) {
            warn!(state = ?self.state, "session dropped without exit");
        }
    }
}

impl<T: Toolkit, B: AsyncBackend> std::fmt::Debug for AppSession<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSession")
            .field("toolkit", &self.toolkit.name())
            .field("backend", &self.backend.kind())
            .field("state", &self.state)
            .finish()
    }
}
