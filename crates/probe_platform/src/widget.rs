//! Widget tree nodes
//!
//! The harness never mutates the tree; it only walks `children`/`parent` and
//! reads properties. A node that is its own parent (the display surface root)
//! terminates upward traversal.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a node of the live widget tree
pub type WidgetRef = Arc<dyn Widget>;

/// A node of the widget tree under test
pub trait Widget: Send + Sync {
    /// Type name of the node (e.g. `"Button"`, `"BoxLayout"`)
    fn type_name(&self) -> &str;

    /// Children in the toolkit's order
    fn children(&self) -> Vec<WidgetRef>;

    /// The parent node; the surface root returns itself
    fn parent(&self) -> Option<WidgetRef>;

    /// Read a named property; `None` when the node has no such property
    fn property(&self, name: &str) -> Option<PropValue>;

    /// Width and height in the node's own coordinate system
    fn size(&self) -> (f32, f32);

    /// Convert a point to surface coordinates
    ///
    /// With `initial == true` the point is already in the parent's
    /// coordinate system; with `initial == false` the node's own local
    /// transform is applied first.
    fn to_window(&self, x: f32, y: f32, initial: bool) -> (f32, f32);

    /// Concrete node access for the owning toolkit
    fn as_any(&self) -> &dyn Any;
}

/// Identity comparison of two nodes
pub fn same_widget(a: &WidgetRef, b: &WidgetRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Short human-readable description used in diagnostics
pub fn describe_widget(widget: &WidgetRef) -> String {
    match widget.property("name") {
        Some(PropValue::Str(name)) => format!("<{} name={:?}>", widget.type_name(), name),
        _ => format!("<{}>", widget.type_name()),
    }
}

/// A property value read from a node
#[derive(Clone, Debug)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PropValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Int(v) => Some(*v as f64),
            PropValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of the value, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

// Ints and floats compare numerically so `width == 100` matches `100.0`.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(v) => write!(f, "{v}"),
            PropValue::Int(v) => write!(f, "{v}"),
            PropValue::Float(v) => write!(f, "{v}"),
            PropValue::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        PropValue::Int(v.into())
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Float(v.into())
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}
