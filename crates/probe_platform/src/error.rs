//! Platform error types

use thiserror::Error;

/// Toolkit-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to initialize the toolkit or one of its singletons
    #[error("Toolkit initialization failed: {0}")]
    InitFailed(String),

    /// An operation needed an execution context but none is pushed
    #[error("No execution context is active")]
    ContextNotActive,

    /// The execution context was pushed or popped out of order
    #[error("Execution context misuse: {0}")]
    ContextMisuse(String),

    /// The render clock was used before being bound to an async backend
    #[error("Clock is not bound to an async backend")]
    ClockNotBound,

    /// The display surface was used before `create`
    #[error("Display surface has not been created")]
    WindowNotCreated,

    /// Feature not supported by this toolkit
    #[error("Not supported by this toolkit: {0}")]
    Unsupported(String),

    /// Generic toolkit error
    #[error("Toolkit error: {0}")]
    Other(String),
}

/// Result type for toolkit operations
pub type Result<T> = std::result::Result<T, PlatformError>;
