//! In-memory widget tree
//!
//! Nodes carry a rectangle in their parent's coordinate system plus a bag of
//! named properties. A node created with [`HeadlessWidget::with_local_origin`]
//! places its children relative to its own position, the way a relative
//! layout does.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use probe_platform::{PropValue, Widget, WidgetRef};
use rustc_hash::FxHashMap;

/// Node rectangle in the parent's coordinate system
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

impl Geometry {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// A node of the headless widget tree
pub struct HeadlessWidget {
    type_name: String,
    this: Weak<HeadlessWidget>,
    surface_root: bool,
    local_origin: AtomicBool,
    geometry: RwLock<Geometry>,
    props: RwLock<FxHashMap<String, PropValue>>,
    children: RwLock<Vec<Arc<HeadlessWidget>>>,
    parent: RwLock<Weak<HeadlessWidget>>,
}

impl HeadlessWidget {
    /// Create a detached node of the given type
    pub fn new(type_name: impl Into<String>) -> Arc<Self> {
        Self::build(type_name.into(), false)
    }

    /// Create the root node of a display surface
    pub(crate) fn surface_root(width: u32, height: u32) -> Arc<Self> {
        let root = Self::build("WindowRoot".to_string(), true);
        root.set_size(width as f32, height as f32);
        root
    }

    fn build(type_name: String, surface_root: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            type_name,
            this: this.clone(),
            surface_root,
            local_origin: AtomicBool::new(false),
            geometry: RwLock::new(Geometry::default()),
            props: RwLock::new(FxHashMap::default()),
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
        })
    }

    /// Recover the concrete node behind a shared widget handle
    pub fn from_ref(widget: &WidgetRef) -> Option<Arc<Self>> {
        widget
            .as_any()
            .downcast_ref::<HeadlessWidget>()
            .and_then(|node| node.this.upgrade())
    }

    /// This node as a shared widget handle
    pub fn as_widget(self: &Arc<Self>) -> WidgetRef {
        self.clone()
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Set a property, returning the node
    pub fn with_prop(self: Arc<Self>, name: &str, value: impl Into<PropValue>) -> Arc<Self> {
        self.set_prop(name, value);
        self
    }

    /// Set position and size, returning the node
    pub fn with_geometry(self: Arc<Self>, x: f32, y: f32, width: f32, height: f32) -> Arc<Self> {
        *self.geometry.write() = Geometry {
            x,
            y,
            width,
            height,
        };
        self
    }

    /// Attach a child, returning the node
    pub fn with_child(self: Arc<Self>, child: Arc<HeadlessWidget>) -> Arc<Self> {
        self.add_child(child);
        self
    }

    /// Position children relative to this node, returning the node
    pub fn with_local_origin(self: Arc<Self>) -> Arc<Self> {
        self.local_origin.store(true, Ordering::Relaxed);
        self
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn set_prop(&self, name: &str, value: impl Into<PropValue>) {
        self.props.write().insert(name.to_string(), value.into());
    }

    pub fn set_pos(&self, x: f32, y: f32) {
        let mut geometry = self.geometry.write();
        geometry.x = x;
        geometry.y = y;
    }

    pub fn set_size(&self, width: f32, height: f32) {
        let mut geometry = self.geometry.write();
        geometry.width = width;
        geometry.height = height;
    }

    pub fn geometry(&self) -> Geometry {
        *self.geometry.read()
    }

    /// Attach a child, detaching it from any previous parent
    pub fn add_child(&self, child: Arc<HeadlessWidget>) {
        if let Some(previous) = child.parent_node() {
            previous.remove_child(&child);
        }
        *child.parent.write() = self.this.clone();
        self.children.write().push(child);
    }

    /// Detach a child (no-op if it is not attached here)
    pub fn remove_child(&self, child: &Arc<HeadlessWidget>) {
        let mut children = self.children.write();
        let before = children.len();
        children.retain(|c| !Arc::ptr_eq(c, child));
        if children.len() != before {
            *child.parent.write() = Weak::new();
        }
    }

    /// Detach every child
    pub fn clear_children(&self) -> Vec<Arc<HeadlessWidget>> {
        let removed = std::mem::take(&mut *self.children.write());
        for child in &removed {
            *child.parent.write() = Weak::new();
        }
        removed
    }

    pub fn child_nodes(&self) -> Vec<Arc<HeadlessWidget>> {
        self.children.read().clone()
    }

    pub fn parent_node(&self) -> Option<Arc<HeadlessWidget>> {
        self.parent.read().upgrade()
    }

    /// Whether a point in the parent's coordinate system falls inside the node
    pub fn collide_point(&self, x: f32, y: f32) -> bool {
        self.geometry.read().contains(x, y)
    }

    /// Convert a point from surface coordinates into this node's parent
    /// coordinate system
    pub fn to_widget(&self, x: f32, y: f32) -> (f32, f32) {
        let mut chain = Vec::new();
        let mut current = self.parent_node();
        while let Some(node) = current {
            if node.surface_root {
                break;
            }
            current = node.parent_node();
            chain.push(node);
        }
        chain
            .iter()
            .rev()
            .fold((x, y), |(x, y), node| node.from_parent(x, y))
    }

    fn to_parent(&self, x: f32, y: f32) -> (f32, f32) {
        if self.local_origin.load(Ordering::Relaxed) {
            let geometry = self.geometry.read();
            (x + geometry.x, y + geometry.y)
        } else {
            (x, y)
        }
    }

    fn from_parent(&self, x: f32, y: f32) -> (f32, f32) {
        if self.local_origin.load(Ordering::Relaxed) {
            let geometry = self.geometry.read();
            (x - geometry.x, y - geometry.y)
        } else {
            (x, y)
        }
    }
}

impl Widget for HeadlessWidget {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn children(&self) -> Vec<WidgetRef> {
        self.children
            .read()
            .iter()
            .map(|c| c.clone() as WidgetRef)
            .collect()
    }

    fn parent(&self) -> Option<WidgetRef> {
        if self.surface_root {
            return self.this.upgrade().map(|me| me as WidgetRef);
        }
        self.parent_node().map(|p| p as WidgetRef)
    }

    fn property(&self, name: &str) -> Option<PropValue> {
        let geometry = *self.geometry.read();
        let derived = match name {
            "x" => Some(geometry.x),
            "y" => Some(geometry.y),
            "width" => Some(geometry.width),
            "height" => Some(geometry.height),
            "center_x" => Some(geometry.center().0),
            "center_y" => Some(geometry.center().1),
            "right" => Some(geometry.x + geometry.width),
            "top" => Some(geometry.y + geometry.height),
            _ => None,
        };
        match derived {
            Some(value) => Some(PropValue::from(value)),
            None => self.props.read().get(name).cloned(),
        }
    }

    fn size(&self) -> (f32, f32) {
        let geometry = self.geometry.read();
        (geometry.width, geometry.height)
    }

    fn to_window(&self, x: f32, y: f32, initial: bool) -> (f32, f32) {
        let (x, y) = if initial { (x, y) } else { self.to_parent(x, y) };
        if self.surface_root {
            return (x, y);
        }
        match self.parent_node() {
            Some(parent) => parent.to_window(x, y, false),
            None => (x, y),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for HeadlessWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessWidget")
            .field("type_name", &self.type_name)
            .field("geometry", &*self.geometry.read())
            .field("children", &self.children.read().len())
            .finish()
    }
}
