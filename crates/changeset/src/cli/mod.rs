//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for changeset using clap's
//! derive API. Every command reads one change-set file.
//!
//! # Commands
//!
//! - `order`: Print the apply order
//! - `levels`: Print the parallel batches
//! - `cycles`: List circular dependencies
//! - `validate`: Report defects and warnings
//! - `rollback`: Print the rollback order
//! - `next`: Show changes ready once a set has been applied
//! - `impact`: Show what must roll back if a change fails
//! - `check`: Test whether a new dependency would create a cycle
//! - `plan`: Validate, order, batch and reverse in one report
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config <PATH>`: Use this config file instead of `.changeset.yaml`
//!
//! # Example
//!
//! ```bash
//! changeset order network.yaml
//! changeset next network.yaml --applied bridge,dhcp
//! changeset impact network.yaml bridge --max-depth 2
//! changeset --json plan network.yaml
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub use args::{
    CheckArgs, CyclesArgs, FileArgs, ImpactArgs, LevelsArgs, NextArgs, OrderArgs, PlanArgs,
    RollbackArgs, ValidateArgs,
};

pub use validators::validate_node_id;

/// Changeset - plan how a set of dependent changes is applied and rolled back
///
/// Reads a change set (JSON, YAML or JSON Lines) where every change lists the
/// changes it depends on, and reports a safe apply order, parallel batches,
/// rollback order and any circular or dangling dependencies.
#[derive(Parser, Debug)]
#[command(name = "changeset")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .changeset.yaml in the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the order in which changes can be applied
    ///
    /// Every change appears after all of its dependencies. Fails when the
    /// change set contains a circular dependency.
    Order(OrderArgs),

    /// Print changes grouped into batches that can be applied in parallel
    ///
    /// Level 0 holds changes without dependencies; each later level depends
    /// only on earlier ones.
    Levels(LevelsArgs),

    /// List circular dependencies
    Cycles(CyclesArgs),

    /// Check the change set for defects
    ///
    /// Duplicate ids, self-references and cycles are errors. Dependencies on
    /// changes outside the set are warnings.
    Validate(ValidateArgs),

    /// Print the order in which applied changes are rolled back
    Rollback(RollbackArgs),

    /// Show changes whose dependencies have all been applied
    Next(NextArgs),

    /// Show every change that depends on a given change
    ///
    /// These are the changes that must also roll back if it fails.
    Impact(ImpactArgs),

    /// Check whether adding a dependency would create a cycle
    Check(CheckArgs),

    /// Validate and print apply order, batches and rollback order
    Plan(PlanArgs),
}

impl Commands {
    /// The change-set file the command reads
    #[must_use]
    pub fn file(&self) -> &Path {
        let input = match self {
            Self::Order(args) => &args.input,
            Self::Levels(args) => &args.input,
            Self::Cycles(args) => &args.input,
            Self::Validate(args) => &args.input,
            Self::Rollback(args) => &args.input,
            Self::Next(args) => &args.input,
            Self::Impact(args) => &args.input,
            Self::Check(args) => &args.input,
            Self::Plan(args) => &args.input,
        };
        &input.file
    }
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns clap's error for unknown or invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the command reports a failing
    /// outcome (cycle, invalid change set, blocked dependency).
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let app = App::load(self.command.file(), self.config.as_deref()).await?;
        tracing::debug!(
            file = %app.source().display(),
            changes = app.nodes().len(),
            "Change set loaded"
        );

        match &self.command {
            Commands::Order(args) => execute::execute_order(&app, args, output_mode),
            Commands::Levels(args) => execute::execute_levels(&app, args, output_mode),
            Commands::Cycles(args) => execute::execute_cycles(&app, args, output_mode),
            Commands::Validate(args) => execute::execute_validate(&app, args, output_mode),
            Commands::Rollback(args) => execute::execute_rollback(&app, args, output_mode),
            Commands::Next(args) => execute::execute_next(&app, args, output_mode),
            Commands::Impact(args) => execute::execute_impact(&app, args, output_mode),
            Commands::Check(args) => execute::execute_check(&app, args, output_mode),
            Commands::Plan(args) => execute::execute_plan(&app, args, output_mode),
        }
    }
}
