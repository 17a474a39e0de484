//! Events emitted by gesture streams

use probe_platform::Modifier;

/// Phase of an emitted pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Down,
    Move,
    Up,
}

/// One step of a pointer gesture, emitted after the frame that processed it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub phase: Phase,
    /// Contact position in surface coordinates
    pub pos: (f32, f32),
}

impl GestureEvent {
    pub fn new(phase: Phase, pos: (f32, f32)) -> Self {
        Self { phase, pos }
    }
}

/// Phase of an emitted key event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Down,
    Up,
}

/// One step of a key press
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyStroke {
    pub phase: KeyPhase,
    /// The normalized key label
    pub key: String,
    pub keycode: u32,
    /// Always 0 for simulated input
    pub scancode: u32,
    pub text: Option<String>,
    pub modifiers: Vec<Modifier>,
}
