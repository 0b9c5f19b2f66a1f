//! Combined pre-flight: validate, order, batch and derive rollback.

use crate::analysis::analyze;
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId};
use crate::order::reverse_order;
use crate::sort::sort;
use crate::validate::{ValidationWarning, validate};
use serde::{Deserialize, Serialize};

/// Everything an executor needs to apply a change set and undo it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyPlan {
    /// Apply order
    pub order: Vec<NodeId>,
    /// Parallel batches
    pub levels: Vec<Vec<NodeId>>,
    /// Rollback order, the exact reverse of `order`
    pub rollback: Vec<NodeId>,
    /// Non-blocking findings from validation
    pub warnings: Vec<ValidationWarning>,
}

/// Validate the collection and compute its apply plan.
///
/// # Errors
///
/// Returns `InvalidGraph` when validation reports any error. Whether the
/// warnings should block an apply is left to the caller.
pub fn plan(nodes: &[Node]) -> Result<ApplyPlan> {
    let report = validate(nodes);
    if !report.valid {
        tracing::debug!(errors = report.errors.len(), "Refusing to plan invalid graph");
        return Err(GraphError::InvalidGraph {
            errors: report.errors,
        });
    }

    let order = sort(nodes).into_result()?;
    let levels = analyze(nodes).levels;
    let rollback = reverse_order(&order);

    tracing::debug!(
        nodes = order.len(),
        levels = levels.len(),
        warnings = report.warnings.len(),
        "Apply plan ready"
    );

    Ok(ApplyPlan {
        order,
        levels,
        rollback,
        warnings: report.warnings,
    })
}
