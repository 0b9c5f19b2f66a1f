//! Canonical graph nodes and the builder that produces them.
//!
//! Callers describe their own domain items (resource mutations, service
//! instances, ...) through the minimal [`DependencyItem`] capability and
//! [`build`] turns them into [`Node`]s owned by the analysis.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&String> for NodeId {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A vertex of the dependency graph.
///
/// An edge `dependency -> node` means the node requires the dependency to be
/// applied first. Dependencies keep the order they were declared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique key of the node
    pub id: NodeId,

    /// Ids this node depends on, in declaration order
    #[serde(default)]
    pub dependencies: Vec<NodeId>,
}

impl Node {
    /// Create a node with the given dependencies
    pub fn new<I, D>(id: impl Into<NodeId>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<NodeId>,
    {
        Self {
            id: id.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a node without dependencies
    pub fn root(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
        }
    }

    /// Whether the node lists its own id as a dependency
    #[must_use]
    pub fn is_self_referencing(&self) -> bool {
        self.dependencies.iter().any(|dep| dep == &self.id)
    }
}

/// The minimal shape a domain item needs to take part in dependency analysis.
pub trait DependencyItem {
    /// The item's unique id.
    fn id(&self) -> &str;

    /// Ids of the items this one depends on, in declaration order.
    fn dependency_ids(&self) -> impl Iterator<Item = &str>;
}

impl DependencyItem for Node {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(NodeId::as_str)
    }
}

/// Convert domain items into canonical nodes.
///
/// Dependency lists are copied, so later changes to the caller's items never
/// reach an analysis already working on the returned nodes. No validation is
/// performed here; see [`crate::validate`].
pub fn build<T: DependencyItem>(items: &[T]) -> Vec<Node> {
    items
        .iter()
        .map(|item| Node {
            id: NodeId::from(item.id()),
            dependencies: item.dependency_ids().map(NodeId::from).collect(),
        })
        .collect()
}
