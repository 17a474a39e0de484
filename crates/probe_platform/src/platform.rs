//! Toolkit trait and abstraction

use std::sync::Arc;

use crate::app::LoopStatus;
use crate::clock::Clock;
use crate::error::Result;
use crate::window::{DisplayConfig, Window};

/// Isolated execution context
///
/// While pushed, the toolkit's process-wide globals (the clock) resolve to
/// this context's instances.
pub trait ExecutionContext: Send {
    /// Make this context the active one
    fn push(&mut self) -> Result<()>;

    /// Deactivate this context, restoring the previous one
    fn pop(&mut self) -> Result<()>;

    /// Whether the context is currently pushed
    fn is_active(&self) -> bool;
}

/// Toolkit abstraction trait
///
/// Implemented by each toolkit binding to give the harness a single
/// interface over its singletons and global machinery.
pub trait Toolkit: Send + Sync + 'static {
    /// The display surface type for this toolkit
    type Window: Window + 'static;
    /// The render clock type for this toolkit
    type Clock: Clock + 'static;
    /// The execution context type for this toolkit
    type Context: ExecutionContext;

    /// Get the toolkit name
    fn name(&self) -> &'static str;

    /// Apply display configuration before the surface is created
    fn configure(&self, config: &DisplayConfig) -> Result<()>;

    /// Create a new, not yet pushed, execution context
    fn create_context(&self) -> Result<Self::Context>;

    /// The display surface singleton
    fn window(&self) -> Arc<Self::Window>;

    /// The clock of the active execution context
    fn clock(&self) -> Result<Arc<Self::Clock>>;

    /// Ask the global event loop to stop
    fn request_stop(&self);

    /// Status of the global event loop
    fn loop_status(&self) -> LoopStatus;

    /// Unregister every live animation, returning how many were stopped
    fn cancel_animations(&self) -> usize;

    /// Drop every record from the diagnostic log buffer
    fn clear_log_history(&self);
}
