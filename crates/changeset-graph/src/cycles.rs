//! Exhaustive cycle enumeration.
//!
//! Uses a white/gray/black depth-first search with an explicit path stack.
//! A dependency that is gray (on the current path) closes a cycle, which is
//! the slice of the path from that dependency's position to the top. The
//! search never stops early, so cycles that share nodes are each reported.
//!
//! The same walk, stopped after the first cycle, produces the diagnostic
//! cycle of [`crate::sort`].

use crate::index::IndexedGraph;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

/// Every cycle found in a node collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Whether at least one cycle exists
    pub has_cycle: bool,

    /// Cycles in discovery order, each in dependency direction
    ///
    /// `[a, b]` means `a` depends on `b` and `b` depends on `a`. A
    /// self-referencing node is a one-element cycle.
    pub cycles: Vec<Vec<NodeId>>,
}

impl CycleReport {
    fn from_cycles(cycles: Vec<Vec<NodeId>>) -> Self {
        Self {
            has_cycle: !cycles.is_empty(),
            cycles,
        }
    }

    /// Collapse cycles that are rotations of one another.
    ///
    /// Each cycle is rotated so its smallest id comes first, then repeats are
    /// dropped keeping first-seen order. `has_cycle` is unchanged.
    #[must_use]
    pub fn deduplicated(&self) -> Self {
        let mut seen = HashSet::new();
        let mut cycles = Vec::new();
        for cycle in &self.cycles {
            let normalized = normalize_rotation(cycle);
            if seen.insert(normalized.clone()) {
                cycles.push(normalized);
            }
        }
        Self {
            has_cycle: self.has_cycle,
            cycles,
        }
    }
}

fn normalize_rotation(cycle: &[NodeId]) -> Vec<NodeId> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(pos, _)| pos);
    let mut rotated = cycle.to_vec();
    rotated.rotate_left(start);
    rotated
}

/// Enumerate every cycle in the collection.
///
/// Dangling dependencies are ignored. Densely connected graphs may yield
/// overlapping or repeated cycles from different DFS entry points; use
/// [`CycleReport::deduplicated`] to collapse rotations.
#[must_use]
pub fn detect_cycles(nodes: &[Node]) -> CycleReport {
    let graph = IndexedGraph::new(nodes);
    let mut cycles = Vec::new();

    let _ = walk_cycles(&graph, 0..graph.len(), |cycle| {
        cycles.push(graph.ids(cycle));
        ControlFlow::<()>::Continue(())
    });

    tracing::debug!(
        nodes = nodes.len(),
        cycles = cycles.len(),
        "Cycle detection complete"
    );
    CycleReport::from_cycles(cycles)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

struct Frame {
    node: usize,
    next_dep: usize,
}

/// Depth-first walk reporting each cycle to `on_cycle` as a slice of positions.
///
/// Walks are started from `starts` in order, skipping nodes already visited.
/// `on_cycle` returning `Break` ends the walk immediately.
pub(crate) fn walk_cycles<B>(
    graph: &IndexedGraph<'_>,
    starts: impl IntoIterator<Item = usize>,
    mut on_cycle: impl FnMut(&[usize]) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let mut marks = vec![Mark::White; graph.len()];
    let mut path: Vec<usize> = Vec::new();
    // Gray nodes and their index in `path`.
    let mut on_path: HashMap<usize, usize> = HashMap::new();
    let mut stack: Vec<Frame> = Vec::new();

    for start in starts {
        if marks[start] != Mark::White {
            continue;
        }

        marks[start] = Mark::Gray;
        on_path.insert(start, path.len());
        path.push(start);
        stack.push(Frame {
            node: start,
            next_dep: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let deps = graph.dependencies(frame.node);
            if frame.next_dep < deps.len() {
                let dep = deps[frame.next_dep];
                frame.next_dep += 1;

                match marks[dep] {
                    Mark::White => {
                        marks[dep] = Mark::Gray;
                        on_path.insert(dep, path.len());
                        path.push(dep);
                        stack.push(Frame {
                            node: dep,
                            next_dep: 0,
                        });
                    }
                    Mark::Gray => {
                        let from = on_path[&dep];
                        on_cycle(&path[from..])?;
                    }
                    Mark::Black => {}
                }
            } else {
                marks[frame.node] = Mark::Black;
                on_path.remove(&frame.node);
                path.pop();
                stack.pop();
            }
        }
    }

    ControlFlow::Continue(())
}
