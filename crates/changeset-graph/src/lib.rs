//! Dependency-graph resolution for atomic multi-resource change sets.
//!
//! When several configuration objects (interfaces, firewall rules, DHCP
//! servers, ...) are created, updated or deleted together, this crate decides
//! the order the changes must be applied in, the reverse order used to roll
//! them back, and which changes may run side by side.
//!
//! Every operation is a pure function of the node collection it is given.
//! Nothing is cached between calls.
//!
//! # Operations
//!
//! | Operation | Algorithm |
//! |-----------|-----------|
//! | [`sort`] | Kahn's algorithm |
//! | [`detect_cycles`] | White/gray/black DFS with an explicit path stack |
//! | [`analyze`] | BFS leveling from the roots |
//! | [`validate`] | Duplicate, self-reference, cycle and missing-dependency scans |
//! | [`apply_order_index`] / [`reverse_order`] | Derived from [`sort`] |
//! | [`parallel_applicable`] | Incremental "what can run now?" |
//! | [`would_create_cycle`] / [`transitive_dependents`] / [`cycle_groups`] | petgraph |
//!
//! # Example
//!
//! ```
//! use changeset_graph::{Node, analyze, reverse_order, sort};
//!
//! let nodes = vec![
//!     Node::root("bridge"),
//!     Node::new("dhcp", ["bridge"]),
//!     Node::new("dns", ["dhcp"]),
//! ];
//!
//! let sorted = sort(&nodes);
//! assert!(sorted.success);
//! assert_eq!(sorted.order, ["bridge", "dhcp", "dns"]);
//! assert_eq!(reverse_order(&sorted.order), ["dns", "dhcp", "bridge"]);
//! assert_eq!(analyze(&nodes).max_depth, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod cycles;
pub mod error;
mod index;
pub mod node;
pub mod order;
pub mod plan;
pub mod relations;
pub mod sort;
pub mod validate;

pub use analysis::{Analysis, MissingDependency, analyze};
pub use cycles::{CycleReport, detect_cycles};
pub use error::{GraphError, Result};
pub use node::{DependencyItem, Node, NodeId, build};
pub use order::{apply_order_index, parallel_applicable, reverse_order};
pub use plan::{ApplyPlan, plan};
pub use relations::{Dependent, cycle_groups, transitive_dependents, would_create_cycle};
pub use sort::{SortResult, sort};
pub use validate::{ValidationError, ValidationReport, ValidationWarning, validate};
