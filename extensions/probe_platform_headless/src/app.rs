//! Headless application under test
//!
//! The application builds its content tree, attaches it to the surface,
//! fires `started` and then runs a frame loop until the toolkit's stop flag
//! is raised. Each frame drains queued input, advances animations and ticks
//! the active clock.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use probe_platform::{AppError, Application, Clock, LifecycleCallback, Toolkit, WidgetRef};
use tracing::{debug, info};

use crate::widget::HeadlessWidget;
use crate::window::InputRecord;
use crate::HeadlessToolkit;

type BuildFn = Box<dyn Fn(&HeadlessApp) -> Result<Arc<HeadlessWidget>, AppError> + Send + Sync>;
type StartHook = Box<dyn Fn(&HeadlessApp) -> Result<(), AppError> + Send + Sync>;
type InputHandler = Box<dyn Fn(&HeadlessApp, &InputRecord) + Send + Sync>;

/// Builder for [`HeadlessApp`]
pub struct HeadlessAppBuilder {
    toolkit: Arc<HeadlessToolkit>,
    build: Option<BuildFn>,
    on_start: Option<StartHook>,
    on_input: Option<InputHandler>,
}

impl HeadlessAppBuilder {
    /// Build the content tree when the application starts
    pub fn root<F>(mut self, build: F) -> Self
    where
        F: Fn(&HeadlessApp) -> Result<Arc<HeadlessWidget>, AppError> + Send + Sync + 'static,
    {
        self.build = Some(Box::new(build));
        self
    }

    /// Run a hook after the tree is attached, before `started` fires
    ///
    /// An error aborts the application.
    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HeadlessApp) -> Result<(), AppError> + Send + Sync + 'static,
    {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Handle each input notification on the frame it is drained
    pub fn on_input<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HeadlessApp, &InputRecord) + Send + Sync + 'static,
    {
        self.on_input = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> HeadlessApp {
        HeadlessApp {
            toolkit: self.toolkit,
            build: self
                .build
                .unwrap_or_else(|| Box::new(|_| Ok(HeadlessWidget::new("Widget")))),
            on_start_hook: self.on_start,
            on_input: self.on_input,
            root: RwLock::new(None),
            started: Mutex::new(Vec::new()),
            stopped: Mutex::new(Vec::new()),
        }
    }
}

/// An application running on the headless toolkit
pub struct HeadlessApp {
    toolkit: Arc<HeadlessToolkit>,
    build: BuildFn,
    on_start_hook: Option<StartHook>,
    on_input: Option<InputHandler>,
    root: RwLock<Option<Arc<HeadlessWidget>>>,
    started: Mutex<Vec<LifecycleCallback>>,
    stopped: Mutex<Vec<LifecycleCallback>>,
}

impl HeadlessApp {
    pub fn builder(toolkit: Arc<HeadlessToolkit>) -> HeadlessAppBuilder {
        HeadlessAppBuilder {
            toolkit,
            build: None,
            on_start: None,
            on_input: None,
        }
    }

    pub fn toolkit(&self) -> &Arc<HeadlessToolkit> {
        &self.toolkit
    }

    /// The content tree, once built
    pub fn root_node(&self) -> Option<Arc<HeadlessWidget>> {
        self.root.read().clone()
    }

    fn fire(callbacks: &Mutex<Vec<LifecycleCallback>>) {
        for callback in callbacks.lock().iter() {
            callback();
        }
    }

    async fn run_loop(self: Arc<Self>) -> Result<(), AppError> {
        let toolkit = self.toolkit.clone();
        let clock = toolkit.clock()?;
        let sleep = clock.sleeper()?;

        let root = (self.build)(&self)?;
        toolkit.window().attach(root.clone());
        *self.root.write() = Some(root);

        if let Some(hook) = &self.on_start_hook {
            hook(&self)?;
        }

        toolkit.event_loop().begin();
        info!("headless application started");
        Self::fire(&self.started);

        while !toolkit.event_loop().stop_requested() {
            let input = toolkit.window().drain_pending();
            if let Some(handler) = &self.on_input {
                for record in &input {
                    handler(&self, record);
                }
            }
            toolkit.animations().advance();
            let frame = clock.tick();
            debug!(frame, "frame rendered");
            sleep(clock.frame_budget()).await;
        }

        Self::fire(&self.stopped);
        toolkit.event_loop().finish();
        info!(frames = clock.frames(), "headless application stopped");
        Ok(())
    }
}

impl Application for HeadlessApp {
    fn bind_on_start(&self, callback: LifecycleCallback) {
        self.started.lock().push(callback);
    }

    fn bind_on_stop(&self, callback: LifecycleCallback) {
        self.stopped.lock().push(callback);
    }

    fn run(self: Arc<Self>) -> BoxFuture<'static, Result<(), AppError>> {
        self.run_loop().boxed()
    }

    fn root(&self) -> Option<WidgetRef> {
        self.root_node().map(|node| node as WidgetRef)
    }
}
