//! Apply ordering using Kahn's algorithm.

use crate::cycles::walk_cycles;
use crate::error::{GraphError, Result, format_cycle};
use crate::index::IndexedGraph;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::ControlFlow;

/// Outcome of ordering a node collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortResult {
    /// Whether a complete order exists
    pub success: bool,

    /// Every id, each after its in-set dependencies; empty on failure
    pub order: Vec<NodeId>,

    /// One offending cycle when sorting failed, empty otherwise
    pub cycle: Vec<NodeId>,

    /// Failure message, `None` on success
    pub error: Option<String>,
}

impl SortResult {
    fn ordered(order: Vec<NodeId>) -> Self {
        Self {
            success: true,
            order,
            cycle: Vec::new(),
            error: None,
        }
    }

    fn cyclic(cycle: Vec<NodeId>) -> Self {
        let error = if cycle.is_empty() {
            "Circular dependency detected".to_string()
        } else {
            format!("Circular dependency detected: {}", format_cycle(&cycle))
        };
        Self {
            success: false,
            order: Vec::new(),
            cycle,
            error: Some(error),
        }
    }

    /// Convert into the order, or a [`GraphError::CircularDependency`].
    ///
    /// # Errors
    ///
    /// Returns `CircularDependency` carrying the diagnostic cycle when
    /// sorting failed.
    pub fn into_result(self) -> Result<Vec<NodeId>> {
        if self.success {
            Ok(self.order)
        } else {
            Err(GraphError::CircularDependency { cycle: self.cycle })
        }
    }
}

/// Compute an apply order in which every node follows its dependencies.
///
/// Dependencies missing from the collection are ignored. Nodes without
/// in-set dependencies are seeded in input order, so a fixed input always
/// yields the same order. Only some valid interleaving of independent nodes
/// is promised.
///
/// When the collection is cyclic no partial order is returned: `success` is
/// false and `cycle` holds one cycle found among the unresolved nodes.
#[must_use]
pub fn sort(nodes: &[Node]) -> SortResult {
    let graph = IndexedGraph::new(nodes);

    let mut in_degree: Vec<usize> = (0..graph.len())
        .map(|pos| graph.dependencies(pos).len())
        .collect();

    let mut queue: VecDeque<usize> = (0..graph.len())
        .filter(|&pos| in_degree[pos] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(pos) = queue.pop_front() {
        order.push(pos);
        for &dependent in graph.dependents(pos) {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() < graph.len() {
        let unresolved = (0..graph.len()).filter(|&pos| in_degree[pos] > 0);
        let cycle = match walk_cycles(&graph, unresolved, |cycle| {
            ControlFlow::Break(cycle.to_vec())
        }) {
            ControlFlow::Break(cycle) => graph.ids(&cycle),
            ControlFlow::Continue(()) => Vec::new(),
        };

        tracing::debug!(
            nodes = graph.len(),
            resolved = order.len(),
            cycle = %format_cycle(&cycle),
            "Sort failed on circular dependency"
        );
        return SortResult::cyclic(cycle);
    }

    tracing::trace!(nodes = graph.len(), "Sort complete");
    SortResult::ordered(graph.ids(&order))
}
