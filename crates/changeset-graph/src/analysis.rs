//! Structural analysis: roots, leaves, parallel levels and dangling references.
//!
//! # Levels
//!
//! Levels are assigned breadth-first from the roots. A node receives a level
//! the first time all of its in-set dependencies have one, as
//! `1 + max(dependency levels)`, and is never revisited. Nodes within one
//! level carry no ordering constraint between each other, so an executor may
//! apply a whole level concurrently.
//!
//! # Precondition
//!
//! Nodes on a cycle (and nodes depending on one) never become resolvable and
//! are left out of [`Analysis::levels`]. Run [`crate::validate`] or
//! [`crate::detect_cycles`] first before scheduling work from the levels.

use crate::index::IndexedGraph;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A dependency id that is not part of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissingDependency {
    /// The node declaring the dependency
    pub node_id: NodeId,
    /// The id that could not be found
    pub missing_dep_id: NodeId,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node '{}' depends on missing node '{}'",
            self.node_id, self.missing_dep_id
        )
    }
}

/// Structural summary of a node collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Nodes without in-set dependencies, in input order
    pub roots: Vec<NodeId>,

    /// Nodes nothing depends on, in input order
    pub leaves: Vec<NodeId>,

    /// Parallel batches; `levels[0]` is the roots
    pub levels: Vec<Vec<NodeId>>,

    /// `levels.len() - 1`, or 0 when there are no levels
    pub max_depth: usize,

    /// One entry per dangling reference, repeats included
    pub missing_dependencies: Vec<MissingDependency>,
}

impl Analysis {
    /// The level a node was assigned, if any.
    #[must_use]
    pub fn level_of(&self, id: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.iter().any(|member| member == id))
    }

    /// Number of nodes placed in some level.
    #[must_use]
    pub fn leveled_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

/// Analyze roots, leaves, levels and missing dependencies.
#[must_use]
pub fn analyze(nodes: &[Node]) -> Analysis {
    let graph = IndexedGraph::new(nodes);

    let root_positions: Vec<usize> = (0..graph.len())
        .filter(|&pos| graph.dependencies(pos).is_empty())
        .collect();

    let leaves = (0..graph.len())
        .filter(|&pos| graph.dependents(pos).is_empty())
        .map(|pos| graph.id(pos).clone())
        .collect();

    let levels = compute_levels(&graph, &root_positions);
    let max_depth = levels.len().saturating_sub(1);

    let missing_dependencies = find_missing(nodes);

    tracing::debug!(
        nodes = nodes.len(),
        levels = levels.len(),
        missing = missing_dependencies.len(),
        "Graph analysis complete"
    );

    Analysis {
        roots: graph.ids(&root_positions),
        leaves,
        levels,
        max_depth,
        missing_dependencies,
    }
}

fn compute_levels(graph: &IndexedGraph<'_>, roots: &[usize]) -> Vec<Vec<NodeId>> {
    let mut level: Vec<Option<usize>> = vec![None; graph.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for &root in roots {
        level[root] = Some(0);
        queue.push_back(root);
    }

    while let Some(pos) = queue.pop_front() {
        for &dependent in graph.dependents(pos) {
            if level[dependent].is_some() {
                continue;
            }
            let resolved: Option<Vec<usize>> = graph
                .dependencies(dependent)
                .iter()
                .map(|&dep| level[dep])
                .collect();
            if let Some(dep_levels) = resolved {
                let assigned = dep_levels.into_iter().max().map_or(0, |max| max + 1);
                level[dependent] = Some(assigned);
                queue.push_back(dependent);
            }
        }
    }

    let mut levels: Vec<Vec<NodeId>> = Vec::new();
    for (pos, assigned) in level.iter().enumerate() {
        if let Some(depth) = *assigned {
            if levels.len() <= depth {
                levels.resize_with(depth + 1, Vec::new);
            }
            levels[depth].push(graph.id(pos).clone());
        }
    }
    levels
}

fn find_missing(nodes: &[Node]) -> Vec<MissingDependency> {
    let known = crate::index::first_positions(nodes);
    nodes
        .iter()
        .flat_map(|node| {
            node.dependencies
                .iter()
                .filter(|dep| !known.contains_key(dep.as_str()))
                .map(|dep| MissingDependency {
                    node_id: node.id.clone(),
                    missing_dep_id: dep.clone(),
                })
        })
        .collect()
}
