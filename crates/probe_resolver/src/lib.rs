//! Probe Widget Resolver
//!
//! Locates exactly one node of a live widget tree from accumulated attribute
//! and predicate filters, or fails with a diagnostic describing the query.
//!
//! # Example
//!
//! ```ignore
//! use probe_resolver::{Filter, WidgetResolver};
//!
//! let mut resolver = WidgetResolver::new(window.root());
//! let button = resolver
//!     .down(Filter::new().attr("name", "ok"))?
//!     .resolve();
//! ```

mod error;
mod resolver;

pub use error::{Direction, ResolveError, Result};
pub use resolver::{Filter, Predicate, WidgetResolver};
