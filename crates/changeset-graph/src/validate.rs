//! Pre-flight validation of a node collection.
//!
//! Structural defects (duplicate ids, self-references) and cycles are errors.
//! Dangling references are warnings: a change set may legitimately reference
//! resources applied by an earlier, already completed change set.

use crate::analysis::{MissingDependency, analyze};
use crate::cycles::detect_cycles;
use crate::error::format_cycle;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A defect that makes the collection unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// The same id appears more than once.
    DuplicateId {
        /// The repeated id
        id: NodeId,
    },

    /// A node lists itself as a dependency.
    SelfReference {
        /// The offending node
        id: NodeId,
    },

    /// A dependency cycle exists.
    CircularDependency {
        /// The cycle, in dependency direction
        cycle: Vec<NodeId>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "Duplicate node id: '{id}'"),
            Self::SelfReference { id } => write!(f, "Node '{id}' depends on itself"),
            Self::CircularDependency { cycle } => {
                write!(f, "Circular dependency: {}", format_cycle(cycle))
            }
        }
    }
}

/// A finding that does not block ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// A dependency id is not part of the collection and is ignored.
    MissingDependency(MissingDependency),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDependency(missing) => write!(f, "{missing}"),
        }
    }
}

/// Aggregated validation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` when there are no errors; warnings never affect it
    pub valid: bool,

    /// Errors in scan order: duplicates, self-references, then cycles
    pub errors: Vec<ValidationError>,

    /// Warnings in input order
    pub warnings: Vec<ValidationWarning>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Whether the report carries any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run every structural check and collect the findings.
///
/// Cycle errors come from [`detect_cycles`] (one error per reported cycle);
/// the sorter is not run. An empty collection is always valid.
#[must_use]
pub fn validate(nodes: &[Node]) -> ValidationReport {
    let mut errors = Vec::new();

    let mut seen = HashSet::with_capacity(nodes.len());
    let mut reported = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateId {
                id: node.id.clone(),
            });
        }
    }

    errors.extend(
        nodes
            .iter()
            .filter(|node| node.is_self_referencing())
            .map(|node| ValidationError::SelfReference {
                id: node.id.clone(),
            }),
    );

    errors.extend(
        detect_cycles(nodes)
            .cycles
            .into_iter()
            .map(|cycle| ValidationError::CircularDependency { cycle }),
    );

    let warnings: Vec<ValidationWarning> = analyze(nodes)
        .missing_dependencies
        .into_iter()
        .map(ValidationWarning::MissingDependency)
        .collect();

    tracing::debug!(
        nodes = nodes.len(),
        errors = errors.len(),
        warnings = warnings.len(),
        "Validation complete"
    );

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
