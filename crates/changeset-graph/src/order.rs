//! Views derived from the apply order: position lookup, rollback order and
//! incremental batch selection.

use crate::index::IndexedGraph;
use crate::node::{Node, NodeId};
use crate::sort::sort;
use std::collections::{HashMap, HashSet};

/// Map every id to its 0-based position in the apply order.
///
/// The map is empty when the collection cannot be sorted. Treat an empty map
/// as "ordering unavailable", never as an identity ordering. For duplicate
/// ids the first position wins.
#[must_use]
pub fn apply_order_index(nodes: &[Node]) -> HashMap<NodeId, usize> {
    let result = sort(nodes);
    if !result.success {
        return HashMap::new();
    }

    let mut index = HashMap::with_capacity(result.order.len());
    for (position, id) in result.order.into_iter().enumerate() {
        index.entry(id).or_insert(position);
    }
    index
}

/// The exact reverse of an order, used to sequence rollback.
#[must_use]
pub fn reverse_order(ordered_ids: &[NodeId]) -> Vec<NodeId> {
    ordered_ids.iter().rev().cloned().collect()
}

/// Ids that can be applied now, given what has already been applied.
///
/// Returns, in input order, every node not in `applied` whose in-set
/// dependencies are all in `applied`. Dangling dependencies are ignored.
/// Each id is returned at most once.
#[must_use]
pub fn parallel_applicable(nodes: &[Node], applied: &[NodeId]) -> Vec<NodeId> {
    let graph = IndexedGraph::new(nodes);
    let applied: HashSet<&str> = applied.iter().map(NodeId::as_str).collect();
    let mut emitted: HashSet<&str> = HashSet::new();

    let ready: Vec<NodeId> = (0..graph.len())
        .filter(|&pos| {
            !applied.contains(graph.id(pos).as_str())
                && graph
                    .dependencies(pos)
                    .iter()
                    .all(|&dep| applied.contains(graph.id(dep).as_str()))
        })
        .filter(|&pos| emitted.insert(graph.id(pos).as_str()))
        .map(|pos| graph.id(pos).clone())
        .collect();

    tracing::trace!(
        nodes = nodes.len(),
        applied = applied.len(),
        ready = ready.len(),
        "Selected applicable nodes"
    );
    ready
}
