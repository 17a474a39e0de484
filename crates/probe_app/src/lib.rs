//! Probe Application Sessions
//!
//! Scoped lifecycle control of an application under test. An [`AppSession`]
//! configures the toolkit, pushes an isolated execution context, runs the
//! application in the background on one of two cooperative backends, waits
//! until it has started and settled, and on exit stops it and hands back
//! every process-wide resource it touched.
//!
//! The session is also the [`FrameSync`](probe_input::FrameSync) that paces
//! the input gestures, and the entry point of the widget resolver.
//!
//! # Example
//!
//! ```ignore
//! use futures::FutureExt;
//! use probe_app::{AppSession, SessionConfig};
//! use probe_input::{exhaust, gestures::TouchDownUp, Target};
//! use probe_resolver::Filter;
//!
//! let session = AppSession::from_config(toolkit.clone(), SessionConfig::from_env()?)?;
//! session
//!     .scope_with_app(make_app, |session, _app| {
//!         async move {
//!             let button = session
//!                 .resolve_widget(None)
//!                 .down(Filter::new().attr("name", "ok"))?
//!                 .resolve();
//!             exhaust(session.touch_down_up(TouchDownUp::new(Target::widget(button.unwrap())))).await?;
//!             Ok(())
//!         }
//!         .boxed_local()
//!     })
//!     .await?;
//! ```
//!
//! # Backends
//!
//! - `tokio` (default) - the application is a task spawned on the current
//!   runtime and cancelled through its handle
//! - `async-io` - the application is a nursery child driven while the
//!   session sleeps
//!
//! Both are cargo features; `PROBE_EVENTLOOP` picks one at runtime.

pub mod backend;
pub mod config;
mod error;
mod release;
mod session;


pub use backend::{AsyncBackend, Backend};
#[cfg(feature = "async-io")]
pub use backend::NurseryBackend;
#[cfg(feature = "tokio")]
pub use backend::TokioBackend;
pub use config::{BackendKind, ReleaseCheck, SessionConfig, EVENTLOOP_ENV, RELEASE_ENV};
pub use error::{AppPanic, ConfigError, Result, SessionError, WaitPhase};
pub use release::ReleaseTracker;
pub use session::{AppSession, SessionState};
