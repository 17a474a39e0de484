//! Gesture generators
//!
//! Each generator returns a lazy stream: nothing is dispatched until the
//! stream is polled, and every event is yielded only after the application
//! rendered a frame with it. Dropping a stream part way leaves its contact
//! pressed; no compensating release is sent.

mod down_up;
mod drag;
mod follow;
mod keyboard;
mod path;

use std::pin::Pin;

use futures::stream::Stream;

use crate::error::Result;
use crate::event::GestureEvent;

pub use down_up::{touch_down_up, Jitter, TouchDownUp};
pub use drag::{touch_drag, Drag};
pub use follow::{touch_drag_follow, DragFollow};
pub use keyboard::{keyboard_key, KeyPress, KeyStream};
pub use path::{touch_drag_path, DragPath};

/// A lazily-driven pointer gesture
pub type GestureStream<'a> = Pin<Box<dyn Stream<Item = Result<GestureEvent>> + 'a>>;
