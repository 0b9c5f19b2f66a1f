//! Application context for CLI command execution.
//!
//! # Example
//!
//! ```no_run
//! use changeset::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::load(Path::new("network.yaml"), None).await?;
//!     println!("{} change(s)", app.nodes().len());
//!     Ok(())
//! }
//! ```

use crate::config::ChangesetConfig;
use crate::error::Result;
use crate::input::ChangeSet;
use changeset_graph::{Dependent, Node, transitive_dependents, would_create_cycle};
use std::path::{Path, PathBuf};

/// A loaded change set together with the effective configuration.
#[derive(Debug)]
pub struct App {
    config: ChangesetConfig,
    change_set: ChangeSet,
    nodes: Vec<Node>,
    source: PathBuf,
}

impl App {
    /// Load configuration and the change set at `file`.
    ///
    /// # Arguments
    ///
    /// * `file` - The change-set file (`.json`, `.yaml`, `.yml`, `.jsonl`)
    /// * `config_path` - Explicit config file; when `None`, `.changeset.yaml`
    ///   in the current directory is used if present
    ///
    /// # Errors
    ///
    /// Returns an error if the config file or the change set cannot be read
    /// or parsed, or the current directory is unavailable.
    pub async fn load(file: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ChangesetConfig::load(path).await?,
            None => ChangesetConfig::discover(&std::env::current_dir()?).await?,
        };
        Ok(Self::new(ChangeSet::load(file).await?, config, file))
    }

    /// Build an App from an already parsed change set.
    #[must_use]
    pub fn new(change_set: ChangeSet, config: ChangesetConfig, source: &Path) -> Self {
        for warning in &change_set.warnings {
            tracing::warn!(file = %source.display(), "{warning}");
        }
        let nodes = change_set.nodes();
        Self {
            config,
            change_set,
            nodes,
            source: source.to_path_buf(),
        }
    }

    /// The effective configuration
    #[must_use]
    pub fn config(&self) -> &ChangesetConfig {
        &self.config
    }

    /// The change set as loaded
    #[must_use]
    pub fn change_set(&self) -> &ChangeSet {
        &self.change_set
    }

    /// The change set projected into dependency nodes
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Path the change set was loaded from
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Changes that would have to roll back if `id` fails.
    ///
    /// # Errors
    ///
    /// Returns `Graph(NodeNotFound)` when `id` is not in the change set.
    pub fn dependents(&self, id: &str, max_depth: Option<usize>) -> Result<Vec<Dependent>> {
        Ok(transitive_dependents(&self.nodes, id, max_depth)?)
    }

    /// Whether making `from` depend on `to` would close a cycle.
    ///
    /// # Errors
    ///
    /// Returns `Graph(NodeNotFound)` when either id is not in the change set.
    pub fn would_create_cycle(&self, from: &str, to: &str) -> Result<bool> {
        Ok(would_create_cycle(&self.nodes, from, to)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::input::InputFormat;

    fn app(content: &str) -> App {
        let change_set = ChangeSet::parse(content, InputFormat::Json).unwrap();
        App::new(change_set, ChangesetConfig::default(), Path::new("test.json"))
    }

    #[test]
    fn nodes_are_projected_from_changes() {
        let app = app(r#"[{"id": "bridge"}, {"id": "dhcp", "dependencies": ["bridge"]}]"#);
        assert_eq!(app.nodes().len(), 2);
        assert_eq!(app.change_set().changes.len(), 2);
        assert_eq!(app.source(), Path::new("test.json"));
    }

    #[test]
    fn unknown_node_surfaces_as_graph_error() {
        let app = app(r#"[{"id": "bridge"}]"#);
        let err = app.dependents("vpn", None).unwrap_err();
        assert!(matches!(err, Error::Graph(_)));
        assert_eq!(err.to_string(), "Node not found: vpn");
    }

    #[test]
    fn cycle_precheck() {
        let app = app(r#"[{"id": "bridge"}, {"id": "dhcp", "dependencies": ["bridge"]}]"#);
        assert!(app.would_create_cycle("bridge", "dhcp").unwrap());
        assert!(!app.would_create_cycle("dhcp", "bridge").unwrap());
    }
}
