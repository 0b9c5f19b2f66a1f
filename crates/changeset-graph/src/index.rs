//! Per-call positional view of a node collection.
//!
//! Every pass works on node positions rather than ids. A dependency id
//! resolves to the first node carrying that id; ids that resolve nowhere are
//! dangling and produce no edge.

use crate::node::{Node, NodeId};
use std::collections::HashMap;

pub(crate) struct IndexedGraph<'a> {
    nodes: &'a [Node],
    /// For each node, the positions of its in-set dependencies (declaration order).
    dependencies: Vec<Vec<usize>>,
    /// For each node, the positions of nodes depending on it (input order).
    dependents: Vec<Vec<usize>>,
}

impl<'a> IndexedGraph<'a> {
    pub(crate) fn new(nodes: &'a [Node]) -> Self {
        let positions = first_positions(nodes);

        let mut dependencies = Vec::with_capacity(nodes.len());
        let mut dependents = vec![Vec::new(); nodes.len()];

        for (pos, node) in nodes.iter().enumerate() {
            let resolved: Vec<usize> = node
                .dependencies
                .iter()
                .filter_map(|dep| positions.get(dep.as_str()).copied())
                .collect();
            for &dep in &resolved {
                dependents[dep].push(pos);
            }
            dependencies.push(resolved);
        }

        Self {
            nodes,
            dependencies,
            dependents,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn id(&self, pos: usize) -> &'a NodeId {
        &self.nodes[pos].id
    }

    pub(crate) fn ids(&self, positions: &[usize]) -> Vec<NodeId> {
        positions.iter().map(|&pos| self.id(pos).clone()).collect()
    }

    pub(crate) fn dependencies(&self, pos: usize) -> &[usize] {
        &self.dependencies[pos]
    }

    pub(crate) fn dependents(&self, pos: usize) -> &[usize] {
        &self.dependents[pos]
    }
}

/// Map each id to the position of its first occurrence.
pub(crate) fn first_positions(nodes: &[Node]) -> HashMap<&str, usize> {
    let mut positions = HashMap::with_capacity(nodes.len());
    for (pos, node) in nodes.iter().enumerate() {
        positions.entry(node.id.as_str()).or_insert(pos);
    }
    positions
}
