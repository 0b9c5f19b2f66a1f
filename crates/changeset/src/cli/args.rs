//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Args, Parser};
use std::path::PathBuf;

use super::validators::validate_node_id;

/// The change-set file every command reads
#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Change-set file (.json, .yaml, .yml or .jsonl)
    pub file: PathBuf,
}

/// Arguments for the `order` command
#[derive(Parser, Debug, Clone)]
pub struct OrderArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,
}

/// Arguments for the `levels` command
#[derive(Parser, Debug, Clone)]
pub struct LevelsArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,
}

/// Arguments for the `cycles` command
#[derive(Parser, Debug, Clone)]
pub struct CyclesArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,

    /// Collapse cycles that are rotations of one another
    ///
    /// Overrides `dedupe-cycles` from the config file when set.
    #[arg(long)]
    pub dedupe: bool,

    /// Show strongly connected groups instead of individual cycles
    #[arg(long, conflicts_with = "dedupe")]
    pub groups: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `rollback` command
#[derive(Parser, Debug, Clone)]
pub struct RollbackArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,
}

/// Arguments for the `next` command
#[derive(Parser, Debug, Clone)]
pub struct NextArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,

    /// Changes already applied (comma-separated ids)
    #[arg(short, long, value_delimiter = ',')]
    pub applied: Vec<String>,
}

/// Arguments for the `impact` command
#[derive(Parser, Debug, Clone)]
pub struct ImpactArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,

    /// Change whose failure is being assessed
    #[arg(value_parser = validate_node_id)]
    pub id: String,

    /// Only follow dependents up to this distance
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_depth: Option<u16>,
}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,

    /// Change that would gain the dependency
    #[arg(value_parser = validate_node_id)]
    pub from: String,

    /// Change it would depend on
    #[arg(value_parser = validate_node_id)]
    pub to: String,
}

/// Arguments for the `plan` command
#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    /// Input change set
    #[command(flatten)]
    pub input: FileArgs,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}
