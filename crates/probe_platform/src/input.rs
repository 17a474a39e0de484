//! Input notification types for pointer and keyboard dispatch

use std::fmt;
use std::str::FromStr;

// ============================================================================
// Pointer Input
// ============================================================================

/// Pointer phase notifications accepted by the display surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The contact started
    Begin,
    /// The contact moved
    Update,
    /// The contact ended
    End,
}

/// Payload for one pointer notification
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Unique identifier of the contact
    pub id: u64,
    /// X position in surface coordinates
    pub x: f32,
    /// Y position in surface coordinates
    pub y: f32,
    /// X position as a proportion of the surface width (`x / (width - 1)`)
    pub sx: f32,
    /// Y position as a proportion of the surface height (`y / (height - 1)`)
    pub sy: f32,
    /// Whether the contact may be grabbed exclusively by one widget
    pub exclusive: bool,
}

impl TouchPoint {
    /// Build a payload for a surface of the given size
    pub fn new(id: u64, x: f32, y: f32, surface: (u32, u32)) -> Self {
        Self {
            id,
            x,
            y,
            sx: proportion(x, surface.0),
            sy: proportion(y, surface.1),
            exclusive: false,
        }
    }

    /// Position in surface coordinates
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

fn proportion(value: f32, extent: u32) -> f32 {
    let span = extent as f32 - 1.0;
    if span <= 0.0 {
        0.0
    } else {
        value / span
    }
}

// ============================================================================
// Keyboard Input
// ============================================================================

/// Modifier keys understood by keyboard dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// Shift key
    Shift,
    /// Alt key (Option on macOS)
    Alt,
    /// Control key
    Ctrl,
    /// Meta key (Command on macOS, Windows key on Windows)
    Meta,
}

impl Modifier {
    /// All known modifiers
    pub const ALL: [Modifier; 4] = [Modifier::Shift, Modifier::Alt, Modifier::Ctrl, Modifier::Meta];

    /// The label used for this modifier in key names
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Shift => "shift",
            Modifier::Alt => "alt",
            Modifier::Ctrl => "ctrl",
            Modifier::Meta => "meta",
        }
    }

    /// Check whether a key label names a modifier
    pub fn is_modifier_name(label: &str) -> bool {
        label.parse::<Modifier>().is_ok()
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shift" => Ok(Modifier::Shift),
            "alt" => Ok(Modifier::Alt),
            "ctrl" => Ok(Modifier::Ctrl),
            "meta" => Ok(Modifier::Meta),
            other => Err(other.to_string()),
        }
    }
}

/// Keyboard notifications accepted by the display surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// A key was pressed (or auto-repeated)
    KeyDown {
        /// Platform keycode
        keycode: u32,
        /// Hardware scancode (always 0 for simulated input)
        scancode: u32,
        /// Best-effort printable text for the key
        text: Option<String>,
        /// Modifiers held during the press
        modifiers: Vec<Modifier>,
    },
    /// A key was released
    KeyUp {
        /// Platform keycode
        keycode: u32,
        /// Hardware scancode (always 0 for simulated input)
        scancode: u32,
    },
    /// Synthesized text input following a key press
    TextInput {
        /// The text to insert
        text: String,
    },
}

impl KeyboardEvent {
    /// Get the keycode (None for text input)
    pub fn keycode(&self) -> Option<u32> {
        match self {
            KeyboardEvent::KeyDown { keycode, .. } => Some(*keycode),
            KeyboardEvent::KeyUp { keycode, .. } => Some(*keycode),
            KeyboardEvent::TextInput { .. } => None,
        }
    }
}
