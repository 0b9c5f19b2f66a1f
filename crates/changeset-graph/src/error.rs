//! Error types for changeset-graph operations.
//!
//! Cycles, dangling references and duplicate ids are expected conditions and
//! are reported through result values ([`crate::SortResult`],
//! [`crate::ValidationReport`], ...). [`GraphError`] only appears where a
//! caller asks for a fallible view of those results, or looks up a node that
//! is not part of the collection.

use crate::node::NodeId;
use crate::validate::ValidationError;
use thiserror::Error;

/// The error type for changeset-graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No valid apply order exists because of a dependency cycle.
    #[error("Circular dependency detected: {}", format_cycle(.cycle))]
    CircularDependency {
        /// The offending cycle, in dependency direction.
        cycle: Vec<NodeId>,
    },

    /// A node id was not found in the collection.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Validation found structural defects.
    #[error("Invalid dependency graph: {} error(s), first: {}", .errors.len(), first_error(.errors))]
    InvalidGraph {
        /// Every validation error, in report order.
        errors: Vec<ValidationError>,
    },
}

/// A specialized Result type for changeset-graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Render a cycle as `a -> b -> ... -> a`.
///
/// The first member is repeated at the end so the closing edge is visible.
/// An empty cycle renders as an empty string.
#[must_use]
pub fn format_cycle(cycle: &[NodeId]) -> String {
    let Some(first) = cycle.first() else {
        return String::new();
    };
    let mut parts: Vec<&str> = cycle.iter().map(NodeId::as_str).collect();
    parts.push(first.as_str());
    parts.join(" -> ")
}

fn first_error(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_cycle_repeats_first_member() {
        let cycle = vec![NodeId::from("a"), NodeId::from("b"), NodeId::from("c")];
        assert_eq!(format_cycle(&cycle), "a -> b -> c -> a");
    }

    #[test]
    fn format_cycle_single_member_is_self_loop() {
        assert_eq!(format_cycle(&[NodeId::from("a")]), "a -> a");
    }

    #[test]
    fn format_cycle_empty_is_empty() {
        assert_eq!(format_cycle(&[]), "");
    }

    #[test]
    fn circular_dependency_message() {
        let err = GraphError::CircularDependency {
            cycle: vec![NodeId::from("a"), NodeId::from("b")],
        };
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
    }

    #[test]
    fn invalid_graph_message_names_first_error() {
        let err = GraphError::InvalidGraph {
            errors: vec![ValidationError::SelfReference {
                id: NodeId::from("a"),
            }],
        };
        assert_eq!(
            err.to_string(),
            "Invalid dependency graph: 1 error(s), first: Node 'a' depends on itself"
        );
    }
}
