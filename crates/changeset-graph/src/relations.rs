//! Relationship queries using petgraph.
//!
//! - Cycle pre-check before adding an edge (`has_path_connecting`)
//! - Transitive dependents for rollback blast radius (BFS)
//! - Cyclic groups (Tarjan's SCC algorithm)
//!
//! # Edge Direction
//!
//! Edges point from **dependent -> dependency**, so `Direction::Incoming`
//! finds the nodes that depend on a given node.

use crate::error::{GraphError, Result};
use crate::index::first_positions;
use crate::node::{Node, NodeId};
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// A node reached while walking dependents, with its distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    /// The dependent node
    pub id: NodeId,
    /// 1 for direct dependents, 2 for their dependents, ...
    pub depth: usize,
}

/// Petgraph copy of a collection: one graph node per input node, dangling
/// edges dropped, dependency ids resolved to their first occurrence.
struct DependencyGraph<'a> {
    graph: DiGraph<&'a NodeId, ()>,
    node_map: HashMap<&'a str, NodeIndex>,
}

impl<'a> DependencyGraph<'a> {
    fn new(nodes: &'a [Node]) -> Self {
        let positions = first_positions(nodes);
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let indices: Vec<NodeIndex> = nodes.iter().map(|node| graph.add_node(&node.id)).collect();

        for (pos, node) in nodes.iter().enumerate() {
            for dep in &node.dependencies {
                if let Some(&target) = positions.get(dep.as_str()) {
                    graph.add_edge(indices[pos], indices[target], ());
                }
            }
        }

        let node_map = positions
            .into_iter()
            .map(|(id, pos)| (id, indices[pos]))
            .collect();

        Self { graph, node_map }
    }

    fn lookup(&self, id: &str) -> Result<NodeIndex> {
        self.node_map
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(NodeId::from(id)))
    }
}

/// Whether making `from` depend on `to` would close a cycle.
///
/// True when `to` already depends on `from`, directly or transitively, or
/// when `from` and `to` are the same node.
///
/// # Errors
///
/// Returns `NodeNotFound` if either id is not in the collection.
pub fn would_create_cycle(nodes: &[Node], from: &str, to: &str) -> Result<bool> {
    let deps = DependencyGraph::new(nodes);
    let from_node = deps.lookup(from)?;
    let to_node = deps.lookup(to)?;

    // An existing path to -> ... -> from plus the new edge from -> to is a cycle
    Ok(algo::has_path_connecting(&deps.graph, to_node, from_node, None))
}

/// Every node that depends on `id`, directly or transitively.
///
/// Breadth-first over reverse edges, so nearer dependents come first. Each
/// node is reported once, at the depth it was first reached. With
/// `max_depth`, nodes further away are not explored.
///
/// # Errors
///
/// Returns `NodeNotFound` if `id` is not in the collection.
pub fn transitive_dependents(
    nodes: &[Node],
    id: &str,
    max_depth: Option<usize>,
) -> Result<Vec<Dependent>> {
    let deps = DependencyGraph::new(nodes);
    let start = deps.lookup(id)?;

    let mut result = Vec::new();
    let mut visited = HashSet::from([start]);
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(start, 0)]);

    while let Some((current, depth)) = queue.pop_front() {
        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }

        // petgraph yields neighbors newest-edge first; restore input order
        let mut dependents: Vec<NodeIndex> = deps
            .graph
            .neighbors_directed(current, Direction::Incoming)
            .collect();
        dependents.sort_unstable();
        dependents.dedup();

        for dependent in dependents {
            if visited.insert(dependent) {
                queue.push_back((dependent, depth + 1));
                result.push(Dependent {
                    id: deps.graph[dependent].clone(),
                    depth: depth + 1,
                });
            }
        }
    }

    tracing::trace!(id, dependents = result.len(), "Collected transitive dependents");
    Ok(result)
}

/// Groups of nodes entangled in cycles.
///
/// Each group is a strongly connected component with more than one member,
/// or a single self-referencing node. Members are in input order and groups
/// are ordered by their first member.
#[must_use]
pub fn cycle_groups(nodes: &[Node]) -> Vec<Vec<NodeId>> {
    let deps = DependencyGraph::new(nodes);

    let mut groups: Vec<Vec<NodeIndex>> = algo::tarjan_scc(&deps.graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => deps.graph.contains_edge(*single, *single),
            members => members.len() > 1,
        })
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();
    groups.sort_unstable_by_key(|component| component[0]);

    groups
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|index| deps.graph[index].clone())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<NodeId> {
        raw.iter().map(|s| NodeId::from(*s)).collect()
    }

    fn network() -> Vec<Node> {
        vec![
            Node::root("bridge"),
            Node::new("dhcp", ["bridge"]),
            Node::new("firewall", ["bridge"]),
            Node::new("dns", ["dhcp"]),
        ]
    }

    #[test]
    fn adding_reverse_edge_would_create_cycle() {
        // dns already depends on bridge, so bridge -> dns closes a loop
        assert!(would_create_cycle(&network(), "bridge", "dns").unwrap());
    }

    #[test]
    fn adding_forward_edge_is_safe() {
        assert!(!would_create_cycle(&network(), "dns", "firewall").unwrap());
        assert!(!would_create_cycle(&network(), "firewall", "dhcp").unwrap());
    }

    #[test]
    fn self_edge_would_create_cycle() {
        assert!(would_create_cycle(&network(), "dhcp", "dhcp").unwrap());
    }

    #[test]
    fn unknown_node_is_an_error() {
        let err = would_create_cycle(&network(), "dhcp", "vpn").unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound(NodeId::from("vpn")));
    }

    #[test]
    fn dependents_are_breadth_first() {
        let dependents = transitive_dependents(&network(), "bridge", None).unwrap();
        assert_eq!(
            dependents,
            vec![
                Dependent {
                    id: NodeId::from("dhcp"),
                    depth: 1
                },
                Dependent {
                    id: NodeId::from("firewall"),
                    depth: 1
                },
                Dependent {
                    id: NodeId::from("dns"),
                    depth: 2
                },
            ]
        );
    }

    #[test]
    fn dependents_respect_max_depth() {
        let dependents = transitive_dependents(&network(), "bridge", Some(1)).unwrap();
        assert_eq!(dependents.len(), 2);
        assert!(dependents.iter().all(|d| d.depth == 1));
    }

    #[test]
    fn leaf_has_no_dependents() {
        assert!(transitive_dependents(&network(), "dns", None).unwrap().is_empty());
    }

    #[test]
    fn dependents_terminate_on_cycles() {
        let nodes = vec![Node::new("a", ["b"]), Node::new("b", ["a"])];
        let dependents = transitive_dependents(&nodes, "a", None).unwrap();
        assert_eq!(
            dependents,
            vec![Dependent {
                id: NodeId::from("b"),
                depth: 1
            }]
        );
    }

    #[test]
    fn dependents_of_unknown_node_is_an_error() {
        assert!(matches!(
            transitive_dependents(&network(), "vpn", None),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn acyclic_graph_has_no_cycle_groups() {
        assert!(cycle_groups(&network()).is_empty());
    }

    #[test]
    fn cycle_groups_collect_components() {
        let nodes = vec![
            Node::root("free"),
            Node::new("c", ["a"]),
            Node::new("a", ["b"]),
            Node::new("b", ["c", "a"]),
            Node::new("loop", ["loop"]),
            Node::new("tail", ["a"]),
        ];
        assert_eq!(
            cycle_groups(&nodes),
            vec![ids(&["c", "a", "b"]), ids(&["loop"])]
        );
    }
}
