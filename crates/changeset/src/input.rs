//! Change-set loading.
//!
//! A change set is a list of resource changes. The file format is chosen by
//! extension:
//!
//! - `.json`: an array of changes, or an object with a `changes` array
//! - `.yaml` / `.yml`: the same shapes in YAML
//! - `.jsonl`: one change per line
//!
//! JSONL loading is resilient: blank lines are skipped and malformed lines
//! are skipped with an [`InputWarning`] so one bad line does not hide the
//! rest of the change set.

use crate::error::{Error, Result};
use changeset_graph::{DependencyItem, Node, build};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;

/// Supported change-set file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// JSON document
    Json,
    /// YAML document
    Yaml,
    /// JSON Lines, one change per line
    JsonLines,
}

impl InputFormat {
    /// Pick the format from a file extension
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` when the extension is not one of `json`,
    /// `yaml`, `yml` or `jsonl`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("jsonl") => Ok(Self::JsonLines),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// What a change does to its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// The resource is created
    Create,
    /// The resource is modified in place
    Update,
    /// The resource is removed
    Delete,
}

/// One resource mutation of a change set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Unique id of the change
    pub id: String,

    /// Resource kind (e.g. "bridge", "firewall-rule"), informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Mutation performed, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    /// Ids of the changes that must be applied first
    #[serde(default, alias = "depends_on")]
    pub dependencies: Vec<String>,
}

impl DependencyItem for ResourceChange {
    fn id(&self) -> &str {
        &self.id
    }

    fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }
}

/// A non-fatal problem found while loading a change set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputWarning {
    /// A JSONL line could not be parsed and was skipped
    MalformedLine {
        /// The 1-based line number
        line_number: usize,
        /// The parse error
        error: String,
    },
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine { line_number, error } => {
                write!(f, "Skipped malformed line {line_number}: {error}")
            }
        }
    }
}

/// The `{"changes": [...]}` document shape
#[derive(Deserialize)]
struct Wrapped {
    changes: Vec<ResourceChange>,
}

fn invalid(e: impl fmt::Display) -> Error {
    Error::InvalidInput(e.to_string())
}

// The shape is picked from a generic parse first so the typed parse that
// follows reports the failing field and its line and column.
fn parse_json(content: &str) -> Result<Vec<ResourceChange>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value = serde_json::from_str(content).map_err(invalid)?;
    if value.is_object() {
        let document: Wrapped = serde_json::from_str(content).map_err(invalid)?;
        Ok(document.changes)
    } else {
        serde_json::from_str(content).map_err(invalid)
    }
}

fn parse_yaml(content: &str) -> Result<Vec<ResourceChange>> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(invalid)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    if value.is_mapping() {
        let document: Wrapped = serde_yaml::from_str(content).map_err(invalid)?;
        Ok(document.changes)
    } else {
        serde_yaml::from_str(content).map_err(invalid)
    }
}

/// A loaded change set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// The changes, in file order
    pub changes: Vec<ResourceChange>,
    /// Problems skipped while loading
    pub warnings: Vec<InputWarning>,
}

impl ChangeSet {
    /// Parse change-set text in the given format
    ///
    /// Empty JSON and YAML documents parse to an empty change set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a JSON or YAML document is malformed or a
    /// change does not match the expected fields. The message carries the
    /// parser's line and column. JSONL never fails; bad lines become warnings.
    pub fn parse(content: &str, format: InputFormat) -> Result<Self> {
        match format {
            InputFormat::Json => Ok(Self::from_changes(parse_json(content)?)),
            InputFormat::Yaml => Ok(Self::from_changes(parse_yaml(content)?)),
            InputFormat::JsonLines => Ok(Self::parse_lines(content)),
        }
    }

    /// Load a change set from disk, picking the format from the extension
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for an unknown extension, `Io` when the
    /// file cannot be read, and `InvalidInput` (prefixed with the path) when
    /// it cannot be parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let format = InputFormat::from_path(path)?;
        let content = fs::read_to_string(path).await?;
        let change_set = Self::parse(&content, format).map_err(|e| match e {
            Error::InvalidInput(message) => {
                Error::InvalidInput(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            changes = change_set.changes.len(),
            warnings = change_set.warnings.len(),
            "Loaded change set"
        );
        Ok(change_set)
    }

    /// Project the changes into dependency nodes
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        build(&self.changes)
    }

    fn from_changes(changes: Vec<ResourceChange>) -> Self {
        Self {
            changes,
            warnings: Vec::new(),
        }
    }

    fn parse_lines(content: &str) -> Self {
        let mut change_set = Self::default();

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<ResourceChange>(trimmed) {
                Ok(change) => change_set.changes.push(change),
                Err(e) => change_set.warnings.push(InputWarning::MalformedLine {
                    line_number: index + 1,
                    error: e.to_string(),
                }),
            }
        }

        change_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("plan.json", Some(InputFormat::Json))]
    #[case("plan.yaml", Some(InputFormat::Yaml))]
    #[case("plan.YML", Some(InputFormat::Yaml))]
    #[case("plan.jsonl", Some(InputFormat::JsonLines))]
    #[case("plan.toml", None)]
    #[case("plan", None)]
    fn format_from_extension(#[case] file: &str, #[case] expected: Option<InputFormat>) {
        let result = InputFormat::from_path(&PathBuf::from(file));
        match expected {
            Some(format) => assert_eq!(result.unwrap(), format),
            None => assert!(matches!(result, Err(Error::UnsupportedFormat(_)))),
        }
    }

    #[test]
    fn parse_json_array() {
        let content = r#"[
            {"id": "bridge", "kind": "bridge", "operation": "create"},
            {"id": "dhcp", "dependencies": ["bridge"]}
        ]"#;
        let change_set = ChangeSet::parse(content, InputFormat::Json).unwrap();

        assert_eq!(change_set.changes.len(), 2);
        assert_eq!(change_set.changes[0].operation, Some(Operation::Create));
        assert!(change_set.changes[0].dependencies.is_empty());
        assert_eq!(change_set.changes[1].dependencies, vec!["bridge"]);
    }

    #[test]
    fn parse_json_wrapped_object() {
        let content = r#"{"changes": [{"id": "bridge"}]}"#;
        let change_set = ChangeSet::parse(content, InputFormat::Json).unwrap();
        assert_eq!(change_set.changes.len(), 1);
    }

    #[test]
    fn parse_yaml_with_depends_on_alias() {
        let content = "\
- id: bridge
  operation: update
- id: firewall
  kind: firewall-rule
  depends_on: [bridge]
";
        let change_set = ChangeSet::parse(content, InputFormat::Yaml).unwrap();

        assert_eq!(change_set.changes[1].kind.as_deref(), Some("firewall-rule"));
        assert_eq!(change_set.changes[1].dependencies, vec!["bridge"]);
    }

    #[rstest]
    #[case("", InputFormat::Yaml)]
    #[case("  \n", InputFormat::Yaml)]
    #[case("", InputFormat::Json)]
    #[case(" \n\t", InputFormat::Json)]
    fn parse_empty_document(#[case] content: &str, #[case] format: InputFormat) {
        let change_set = ChangeSet::parse(content, format).unwrap();
        assert!(change_set.changes.is_empty());
        assert!(change_set.warnings.is_empty());
    }

    #[test]
    fn json_errors_name_the_bad_value_and_position() {
        let content = "[\n  {\"id\": \"a\"},\n  {\"id\": \"b\", \"operation\": \"rename\"}\n]";
        let message = ChangeSet::parse(content, InputFormat::Json)
            .unwrap_err()
            .to_string();

        assert!(message.contains("unknown variant `rename`"), "{message}");
        assert!(message.contains("line 3"), "{message}");
        assert!(!message.contains("untagged"), "{message}");
    }

    #[test]
    fn wrapped_json_errors_name_the_bad_value_and_position() {
        let content = r#"{"changes": [{"id": "a", "dependencies": "bridge"}]}"#;
        let message = ChangeSet::parse(content, InputFormat::Json)
            .unwrap_err()
            .to_string();

        assert!(message.contains("expected a sequence"), "{message}");
        assert!(message.contains("line 1 column"), "{message}");
    }

    #[test]
    fn yaml_errors_name_the_bad_field_and_position() {
        let content = "\
- id: bridge
- id: dhcp
  dependencies: bridge
";
        let message = ChangeSet::parse(content, InputFormat::Yaml)
            .unwrap_err()
            .to_string();

        assert!(message.contains("dependencies"), "{message}");
        assert!(message.contains("line 3"), "{message}");
        assert!(!message.contains("untagged"), "{message}");
    }

    #[test]
    fn parse_yaml_wrapped_object() {
        let content = "changes:\n  - id: bridge\n  - id: dhcp\n    depends_on: [bridge]\n";
        let change_set = ChangeSet::parse(content, InputFormat::Yaml).unwrap();
        assert_eq!(change_set.changes.len(), 2);
        assert_eq!(change_set.changes[1].dependencies, vec!["bridge"]);
    }

    #[test]
    fn parse_invalid_json_is_an_error() {
        let result = ChangeSet::parse("{not json", InputFormat::Json);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn parse_unknown_operation_is_an_error() {
        let result = ChangeSet::parse(r#"[{"id": "a", "operation": "rename"}]"#, InputFormat::Json);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn parse_jsonl_skips_blank_and_malformed_lines() {
        let content = "{\"id\": \"bridge\"}\n\n{broken\n{\"id\": \"dhcp\", \"dependencies\": [\"bridge\"]}\n";
        let change_set = ChangeSet::parse(content, InputFormat::JsonLines).unwrap();

        assert_eq!(change_set.changes.len(), 2);
        assert_eq!(change_set.warnings.len(), 1);
        assert!(matches!(
            change_set.warnings[0],
            InputWarning::MalformedLine { line_number: 3, .. }
        ));
    }

    #[test]
    fn nodes_follow_change_order() {
        let content = r#"[{"id": "dns", "dependencies": ["dhcp"]}, {"id": "dhcp"}]"#;
        let nodes = ChangeSet::parse(content, InputFormat::Json).unwrap().nodes();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, "dns");
        assert_eq!(nodes[0].dependencies, ["dhcp"]);
    }

    #[tokio::test]
    async fn load_reports_path_in_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[{]").unwrap();

        let err = ChangeSet::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
