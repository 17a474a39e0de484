//! Resolver error types

use std::fmt;

use thiserror::Error;

/// Traversal strategy a query was resolved with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Breadth-first search of the base node's subtree
    Down,
    /// Linear ascent through parents
    Up,
    /// Breadth-first search of each ancestor's subtree, nearest first
    FamilyUp,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::FamilyUp => "family_up",
        })
    }
}

/// Resolver errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The traversal was exhausted without a match
    #[error(
        "Cannot find widget matching <{attrs}, {predicates} predicate(s)> starting from base widget {base} doing {direction} traversal"
    )]
    NotFound {
        /// Attribute filters, rendered as `name=value` pairs
        attrs: String,
        /// Number of predicate functions in the query
        predicates: usize,
        /// Description of the base node
        base: String,
        /// The traversal that failed
        direction: Direction,
    },
}

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolveError>;
