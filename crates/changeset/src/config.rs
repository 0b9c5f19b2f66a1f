//! Configuration management for changeset.
//!
//! Settings live in an optional YAML file, `.changeset.yaml` in the working
//! directory unless a path is given with `--config`. Every key is optional.
//!
//! ```yaml
//! warnings-as-errors: true
//! dedupe-cycles: true
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".changeset.yaml";

/// Configuration file structure for changeset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ChangesetConfig {
    /// Fail `validate` and `plan` when any warning is reported
    pub warnings_as_errors: bool,

    /// Collapse cycles that are rotations of one another in cycle listings
    pub dedupe_cycles: bool,
}

impl ChangesetConfig {
    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Config` when the YAML is malformed or names an unknown key.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file deserializes to `null`
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns `Config` when the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load `.changeset.yaml` from `dir`, falling back to defaults when absent
    ///
    /// # Errors
    ///
    /// Returns `Io` when the file's existence cannot be checked, and `Config`
    /// when it exists but cannot be read or parsed.
    pub async fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Self::load(&path).await
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_all_keys() {
        let config =
            ChangesetConfig::parse("warnings-as-errors: true\ndedupe-cycles: true\n").unwrap();
        assert!(config.warnings_as_errors);
        assert!(config.dedupe_cycles);
    }

    #[test]
    fn parse_partial_keys_uses_defaults() {
        let config = ChangesetConfig::parse("dedupe-cycles: true\n").unwrap();
        assert!(!config.warnings_as_errors);
        assert!(config.dedupe_cycles);
    }

    #[test]
    fn parse_empty_file() {
        assert_eq!(
            ChangesetConfig::parse("\n").unwrap(),
            ChangesetConfig::default()
        );
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let err = ChangesetConfig::parse("warnings_as_errors: true\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn discover_without_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ChangesetConfig::discover(dir.path()).await.unwrap();
        assert_eq!(config, ChangesetConfig::default());
    }

    #[tokio::test]
    async fn discover_reads_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "warnings-as-errors: true\n").unwrap();

        let config = ChangesetConfig::discover(dir.path()).await.unwrap();
        assert!(config.warnings_as_errors);
    }

    #[tokio::test]
    async fn load_missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = ChangesetConfig::load(&dir.path().join("nope.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
