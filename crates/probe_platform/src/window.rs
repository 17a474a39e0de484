//! Display surface abstraction and configuration

use crate::error::Result;
use crate::input::{KeyboardEvent, TouchPhase, TouchPoint};
use crate::widget::WidgetRef;

/// Display configuration applied before a session creates its surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Drop every auto-detected input device so only simulated input reaches
    /// the application
    pub suppress_input_autodetect: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            suppress_input_autodetect: true,
        }
    }
}

impl DisplayConfig {
    /// Create a display configuration with the given extents
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set the surface size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set whether host input devices are suppressed
    pub fn suppress_input_autodetect(mut self, suppress: bool) -> Self {
        self.suppress_input_autodetect = suppress;
        self
    }
}

/// Display surface trait
///
/// The surface is a process-wide singleton of the toolkit. Its root node is
/// the top of the widget tree and is its own parent.
pub trait Window: Send + Sync {
    /// Create the native surface
    fn create(&self) -> Result<()>;

    /// Register the surface with the toolkit's window management
    fn register(&self);

    /// Clear every instruction from the surface canvas
    fn clear_canvas(&self);

    /// Assign the surface size in pixels
    fn set_size(&self, width: u32, height: u32);

    /// Get the surface size in pixels
    fn size(&self) -> (u32, u32);

    /// The surface itself as a node of the widget tree
    fn root(&self) -> WidgetRef;

    /// Top-level children attached to the surface
    fn children(&self) -> Vec<WidgetRef>;

    /// Attach a top-level child
    fn add_child(&self, child: WidgetRef);

    /// Detach a top-level child (no-op if not attached)
    fn remove_child(&self, child: &WidgetRef);

    /// Deliver a pointer phase notification
    ///
    /// `point` carries the proportional coordinates the toolkit consumes.
    fn dispatch_touch(&self, phase: TouchPhase, point: &TouchPoint);

    /// Deliver a keyboard notification
    fn dispatch_key(&self, event: KeyboardEvent);

    /// Look up the platform keycode for a key label (e.g. `"a"`, `"enter"`)
    fn keycode(&self, label: &str) -> Option<u32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_config_default() {
        let config = DisplayConfig::default();
        assert_eq!((config.width, config.height), (320, 240));
        assert!(config.suppress_input_autodetect);
    }

    #[test]
    fn test_display_config_builder() {
        let config = DisplayConfig::new(200, 100)
            .size(400, 300)
            .suppress_input_autodetect(false);
        assert_eq!((config.width, config.height), (400, 300));
        assert!(!config.suppress_input_autodetect);
    }
}
