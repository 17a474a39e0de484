//! Probe Platform Contract
//!
//! This crate defines what the Probe harness needs from a GUI toolkit in
//! order to drive an application under test. It owns no rendering or event
//! dispatch logic of its own; toolkits implement these traits.
//!
//! # Architecture
//!
//! The contract is built around a handful of traits:
//!
//! - [`Toolkit`] - The top-level abstraction: display configuration,
//!   execution contexts, the display surface, the render clock, the global
//!   stop machinery, the animation registry and the diagnostic log buffer
//! - [`ExecutionContext`] - An isolated context pushed for the lifetime of a
//!   session so global toolkit state (the clock) is never shared
//! - [`Window`] - The display surface: children, size, input dispatch
//! - [`Clock`] - The render clock: frame counter, frame-rate cap, backend
//!   binding
//! - [`Application`] - An application under test with `started`/`stopped`
//!   lifecycle signals and an async run entry point
//! - [`Widget`] - A node of the live widget tree
//!
//! # Toolkit Implementations
//!
//! - `probe_platform_headless` - Deterministic in-memory toolkit with no display
//!
//! # Example
//!
//! ```ignore
//! use probe_platform::prelude::*;
//! use probe_platform_headless::HeadlessToolkit;
//!
//! let toolkit = HeadlessToolkit::new();
//! toolkit.configure(&DisplayConfig::new(320, 240))?;
//!
//! let mut context = toolkit.create_context()?;
//! context.push()?;
//! let window = toolkit.window();
//! window.create()?;
//! window.set_size(320, 240);
//! ```

mod app;
mod clock;
mod error;
mod input;
mod platform;
mod widget;
mod window;

// Re-export all public types
pub use app::{AppError, Application, LifecycleCallback, LoopStatus};
pub use clock::{Clock, SleepFn};
pub use error::{PlatformError, Result};
pub use input::{KeyboardEvent, Modifier, TouchPhase, TouchPoint};
pub use platform::{ExecutionContext, Toolkit};
pub use widget::{describe_widget, same_widget, PropValue, Widget, WidgetRef};
pub use window::{DisplayConfig, Window};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::{AppError, Application, LifecycleCallback, LoopStatus};
    pub use crate::clock::{Clock, SleepFn};
    pub use crate::error::{PlatformError, Result};
    pub use crate::input::{KeyboardEvent, Modifier, TouchPhase, TouchPoint};
    pub use crate::platform::{ExecutionContext, Toolkit};
    pub use crate::widget::{describe_widget, same_widget, PropValue, Widget, WidgetRef};
    pub use crate::window::{DisplayConfig, Window};
}
