//! Gesture locations
//!
//! A [`Target`] names a point either in surface coordinates or relative to a
//! widget, and converts it to surface coordinates through the widget's
//! `to_window` transform at the moment it is resolved.

use std::fmt;

use probe_platform::{describe_widget, WidgetRef};

use crate::error::{InputError, Result};

const CENTER: (&str, &str) = ("center_x", "center_y");

/// Where a gesture presses, moves to or releases
#[derive(Clone)]
pub enum Target {
    /// A point in surface coordinates
    Window { x: f32, y: f32 },
    /// A pair of the widget's location properties (in its parent's
    /// coordinate system), displaced by `offset`
    Widget {
        widget: WidgetRef,
        loc: (String, String),
        offset: (f32, f32),
    },
    /// A point in the widget's own local coordinate system
    Local { widget: WidgetRef, pos: (f32, f32) },
}

impl Target {
    pub fn window(x: f32, y: f32) -> Self {
        Target::Window { x, y }
    }

    /// The widget's center
    pub fn widget(widget: WidgetRef) -> Self {
        Self::widget_loc(widget, CENTER.0, CENTER.1)
    }

    /// A pair of the widget's location properties, e.g. `("x", "top")`
    pub fn widget_loc(widget: WidgetRef, loc_x: &str, loc_y: &str) -> Self {
        Target::Widget {
            widget,
            loc: (loc_x.to_string(), loc_y.to_string()),
            offset: (0.0, 0.0),
        }
    }

    /// A point in the widget's local coordinates
    pub fn local(widget: WidgetRef, x: f32, y: f32) -> Self {
        Target::Local {
            widget,
            pos: (x, y),
        }
    }

    /// Displace the target in its own coordinate system
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        match self {
            Target::Window { x, y } => Target::Window {
                x: x + dx,
                y: y + dy,
            },
            Target::Widget {
                widget,
                loc,
                offset,
            } => Target::Widget {
                widget,
                loc,
                offset: (offset.0 + dx, offset.1 + dy),
            },
            Target::Local { widget, pos } => Target::Local {
                widget,
                pos: (pos.0 + dx, pos.1 + dy),
            },
        }
    }

    /// The widget the target is relative to, if any
    pub fn widget_ref(&self) -> Option<&WidgetRef> {
        match self {
            Target::Window { .. } => None,
            Target::Widget { widget, .. } | Target::Local { widget, .. } => Some(widget),
        }
    }

    /// Current position in surface coordinates
    pub fn resolve(&self) -> Result<(f32, f32)> {
        match self {
            Target::Window { x, y } => Ok((*x, *y)),
            Target::Widget {
                widget,
                loc,
                offset,
            } => {
                let x = read_coord(widget, &loc.0)? + offset.0;
                let y = read_coord(widget, &loc.1)? + offset.1;
                Ok(widget.to_window(x, y, true))
            }
            Target::Local { widget, pos } => Ok(widget.to_window(pos.0, pos.1, false)),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Window { x, y } => write!(f, "Window({x}, {y})"),
            Target::Widget {
                widget,
                loc,
                offset,
            } => write!(
                f,
                "Widget({}, {}/{}, {:?})",
                describe_widget(widget),
                loc.0,
                loc.1,
                offset
            ),
            Target::Local { widget, pos } => {
                write!(f, "Local({}, {:?})", describe_widget(widget), pos)
            }
        }
    }
}

/// Numeric value of a widget location property
pub(crate) fn read_coord(widget: &WidgetRef, name: &str) -> Result<f32> {
    widget
        .property(name)
        .and_then(|value| value.as_f64())
        .map(|value| value as f32)
        .ok_or_else(|| InputError::MissingProperty {
            widget: describe_widget(widget),
            name: name.to_string(),
        })
}
