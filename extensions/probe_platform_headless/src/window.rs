//! Headless display surface
//!
//! Input dispatched to the surface is queued for the running application to
//! drain on its next frame and also recorded in a history the tests can
//! inspect.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use probe_platform::{
    KeyboardEvent, PlatformError, Result, TouchPhase, TouchPoint, Widget, WidgetRef, Window,
};
use tracing::{debug, warn};

use crate::keymap::KeyMap;
use crate::widget::HeadlessWidget;

/// One notification delivered to the surface
#[derive(Clone, Debug, PartialEq)]
pub enum InputRecord {
    Touch {
        phase: TouchPhase,
        id: u64,
        /// Position reconstructed from the proportional coordinates
        x: f32,
        y: f32,
        exclusive: bool,
    },
    Key(KeyboardEvent),
}

/// The headless display surface singleton
pub struct HeadlessWindow {
    root: Arc<HeadlessWidget>,
    size: RwLock<(u32, u32)>,
    created: AtomicBool,
    registered: AtomicBool,
    canvas_clears: AtomicU64,
    pending: Mutex<VecDeque<InputRecord>>,
    history: Mutex<Vec<InputRecord>>,
    keymap: KeyMap,
}

impl HeadlessWindow {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            root: HeadlessWidget::surface_root(width, height),
            size: RwLock::new((width, height)),
            created: AtomicBool::new(false),
            registered: AtomicBool::new(false),
            canvas_clears: AtomicU64::new(0),
            pending: Mutex::new(VecDeque::new()),
            history: Mutex::new(Vec::new()),
            keymap: KeyMap::default(),
        }
    }

    /// Attach a headless node as a top-level child
    pub fn attach(&self, child: Arc<HeadlessWidget>) {
        self.root.add_child(child);
    }

    /// The root node of the surface
    pub fn root_node(&self) -> &Arc<HeadlessWidget> {
        &self.root
    }

    pub fn is_created(&self) -> bool {
        self.created.load(Ordering::Acquire)
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// How many times the canvas was cleared
    pub fn canvas_clears(&self) -> u64 {
        self.canvas_clears.load(Ordering::Relaxed)
    }

    /// Take every notification queued since the last frame
    pub fn drain_pending(&self) -> Vec<InputRecord> {
        self.pending.lock().drain(..).collect()
    }

    /// Every notification delivered since the last reset
    pub fn history(&self) -> Vec<InputRecord> {
        self.history.lock().clone()
    }

    /// Drop queued and recorded input
    pub fn reset_input(&self) {
        self.pending.lock().clear();
        self.history.lock().clear();
    }

    fn record(&self, record: InputRecord) {
        self.history.lock().push(record.clone());
        self.pending.lock().push_back(record);
    }
}

impl Window for HeadlessWindow {
    fn create(&self) -> Result<()> {
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return Err(PlatformError::InitFailed(format!(
                "invalid surface size {width}x{height}"
            )));
        }
        self.created.store(true, Ordering::Release);
        debug!(width, height, "headless surface created");
        Ok(())
    }

    fn register(&self) {
        self.registered.store(true, Ordering::Release);
    }

    fn clear_canvas(&self) {
        self.canvas_clears.fetch_add(1, Ordering::Relaxed);
    }

    fn set_size(&self, width: u32, height: u32) {
        *self.size.write() = (width, height);
        self.root.set_size(width as f32, height as f32);
    }

    fn size(&self) -> (u32, u32) {
        *self.size.read()
    }

    fn root(&self) -> WidgetRef {
        self.root.as_widget()
    }

    fn children(&self) -> Vec<WidgetRef> {
        self.root.children()
    }

    fn add_child(&self, child: WidgetRef) {
        match HeadlessWidget::from_ref(&child) {
            Some(node) => self.attach(node),
            None => warn!(
                type_name = child.type_name(),
                "ignoring foreign widget attached to headless surface"
            ),
        }
    }

    fn remove_child(&self, child: &WidgetRef) {
        if let Some(node) = HeadlessWidget::from_ref(child) {
            self.root.remove_child(&node);
        }
    }

    fn dispatch_touch(&self, phase: TouchPhase, point: &TouchPoint) {
        let (width, height) = self.size();
        let x = point.sx * (width as f32 - 1.0);
        let y = point.sy * (height as f32 - 1.0);
        self.record(InputRecord::Touch {
            phase,
            id: point.id,
            x,
            y,
            exclusive: point.exclusive,
        });
    }

    fn dispatch_key(&self, event: KeyboardEvent) {
        self.record(InputRecord::Key(event));
    }

    fn keycode(&self, label: &str) -> Option<u32> {
        self.keymap.code(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_size() {
        let window = HeadlessWindow::new(0, 0);
        assert!(window.create().is_err());
        window.set_size(320, 240);
        assert!(window.create().is_ok());
        assert!(window.is_created());
        assert_eq!(window.root().size(), (320.0, 240.0));
    }

    #[test]
    fn test_touch_dispatch_reconstructs_position() {
        let window = HeadlessWindow::new(101, 51);
        let point = TouchPoint::new(7, 50.0, 25.0, window.size());
        window.dispatch_touch(TouchPhase::Begin, &point);

        let pending = window.drain_pending();
        assert_eq!(pending.len(), 1);
        match &pending[0] {
            InputRecord::Touch { phase, id, x, y, .. } => {
                assert_eq!(*phase, TouchPhase::Begin);
                assert_eq!(*id, 7);
                assert!((x - 50.0).abs() < 1e-4);
                assert!((y - 25.0).abs() < 1e-4);
            }
            other => panic!("unexpected record {other:?}"),
        }
        assert!(window.drain_pending().is_empty());
        assert_eq!(window.history().len(), 1);
    }

    #[test]
    fn test_children_round_trip() {
        let window = HeadlessWindow::new(320, 240);
        let label = HeadlessWidget::new("Label");
        window.add_child(label.as_widget());
        assert_eq!(window.children().len(), 1);
        window.remove_child(&label.as_widget());
        assert!(window.children().is_empty());
    }
}
