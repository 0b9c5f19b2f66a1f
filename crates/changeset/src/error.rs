//! Error types for changeset CLI operations.

use changeset_graph::GraphError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for changeset CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The change-set file extension is not recognized.
    #[error("Unsupported change-set format: {} (expected .json, .yaml, .yml or .jsonl)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The change-set content could not be parsed.
    #[error("Invalid change set: {0}")]
    InvalidInput(String),

    /// Dependency graph error.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A specialized Result type for changeset operations.
pub type Result<T> = std::result::Result<T, Error>;
