//! Probe Input Simulator
//!
//! Frame-synchronized pointer and keyboard input for an application under
//! test. A [`TouchContact`] dispatches one pointer from press to release;
//! the gesture generators in [`gestures`] drive contacts through taps,
//! jittered holds, drags, target-following drags, path drags and key
//! presses, yielding each step as a stream item once the application has
//! rendered a frame with it.
//!
//! Generators are paced by a [`FrameSync`], normally the application
//! session.
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use probe_input::gestures::{touch_drag, Drag};
//! use probe_input::Target;
//!
//! let mut drag = touch_drag(&session, Drag::new(Target::widget(handle)).by(100.0, 0.0));
//! while let Some(event) = drag.next().await {
//!     let event = event?;
//!     // inspect the application between steps
//! }
//! ```

mod error;
mod event;
pub mod gestures;
mod pacing;
mod target;
mod tools;
mod touch;

#[cfg(test)]
mod testing;

pub use error::{InputError, Result};
pub use event::{GestureEvent, KeyPhase, KeyStroke, Phase};
pub use gestures::{GestureStream, KeyStream};
pub use pacing::{step_budget, FrameSync};
pub use target::Target;
pub use tools::exhaust;
pub use touch::{ContactState, TouchContact};
