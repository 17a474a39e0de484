//! Input simulation error types

use probe_platform::PlatformError;
use thiserror::Error;

/// Input simulation errors
#[derive(Error, Debug)]
pub enum InputError {
    /// A follow drag never reached its moving target
    #[error("Exceeded the maximum number of iterations ({steps}), but {pos:?} != {target:?}")]
    Convergence {
        steps: u32,
        pos: (f32, f32),
        target: (f32, f32),
    },

    /// A requested modifier is not one of shift, alt, ctrl, meta
    #[error("Unknown modifiers {0:?}")]
    UnknownModifier(Vec<String>),

    /// The surface has no keycode for the key label
    #[error("Unknown key {0:?}")]
    UnknownKey(String),

    /// The contact was already released
    #[error("Touch contact {0} is closed")]
    ContactClosed(u64),

    /// The contact was pressed a second time
    #[error("Touch contact {0} is already down")]
    ContactActive(u64),

    /// The contact was moved or released before being pressed
    #[error("Touch contact {0} is not down")]
    ContactNotDown(u64),

    /// A widget has no numeric value for a location property
    #[error("Widget {widget} has no numeric property {name:?}")]
    MissingProperty { widget: String, name: String },

    /// The target cannot be used for this gesture
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// A path drag was given no points
    #[error("Drag path is empty")]
    EmptyPath,

    /// A key press was requested zero times
    #[error("Key must be pressed at least once")]
    InvalidPressCount,

    /// The toolkit failed
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for input simulation
pub type Result<T> = std::result::Result<T, InputError>;
