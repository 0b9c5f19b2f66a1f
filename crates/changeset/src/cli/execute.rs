//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Commands
//! that find a defect print their findings first and then return an error,
//! so the process exits non-zero in both text and JSON mode.

use anyhow::{Result, bail};
use changeset_graph::{
    GraphError, NodeId, analyze, cycle_groups, detect_cycles, parallel_applicable, plan,
    reverse_order, sort, validate,
};
use std::io::{self, Write};

use super::args::{
    CheckArgs, CyclesArgs, ImpactArgs, LevelsArgs, NextArgs, OrderArgs, PlanArgs, RollbackArgs,
    ValidateArgs,
};
use crate::app::App;
use crate::output::{self, OutputConfig, OutputMode};

/// Execute the order command
pub fn execute_order(app: &App, _args: &OrderArgs, output_mode: OutputMode) -> Result<()> {
    let result = sort(app.nodes());

    match output_mode {
        OutputMode::Json => output::print_json(&result)?,
        OutputMode::Text if result.success => {
            let config = OutputConfig::from_env();
            output::write_sequence(&mut io::stdout().lock(), "Apply order:", &result.order, &config)?;
        }
        OutputMode::Text => {}
    }

    if let Some(message) = result.error {
        bail!(message);
    }
    Ok(())
}

/// Execute the levels command
pub fn execute_levels(app: &App, _args: &LevelsArgs, output_mode: OutputMode) -> Result<()> {
    let analysis = analyze(app.nodes());

    match output_mode {
        OutputMode::Json => output::print_json(&analysis)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let mut out = io::stdout().lock();
            output::write_levels(&mut out, &analysis, app.nodes().len(), &config)?;
            for missing in &analysis.missing_dependencies {
                writeln!(out, "{} {missing}", output::warning("warning:", &config))?;
            }
        }
    }
    Ok(())
}

/// Execute the cycles command
///
/// Listing cycles is informational: the command succeeds whether or not
/// any are found.
pub fn execute_cycles(app: &App, args: &CyclesArgs, output_mode: OutputMode) -> Result<()> {
    if args.groups {
        let groups = cycle_groups(app.nodes());
        match output_mode {
            OutputMode::Json => output::print_json(&groups)?,
            OutputMode::Text => {
                let config = OutputConfig::from_env();
                let mut out = io::stdout().lock();
                if groups.is_empty() {
                    writeln!(out, "{}", output::success("No circular dependencies detected.", &config))?;
                }
                for (i, group) in groups.iter().enumerate() {
                    let members: Vec<&str> = group.iter().map(NodeId::as_str).collect();
                    writeln!(out, "  Group {}: {}", i + 1, members.join(", "))?;
                }
            }
        }
        return Ok(());
    }

    let mut report = detect_cycles(app.nodes());
    if args.dedupe || app.config().dedupe_cycles {
        report = report.deduplicated();
    }

    match output_mode {
        OutputMode::Json => output::print_json(&report)?,
        OutputMode::Text => {
            output::write_cycles(&mut io::stdout().lock(), &report, &OutputConfig::from_env())?;
        }
    }
    Ok(())
}

/// Execute the validate command
pub fn execute_validate(app: &App, args: &ValidateArgs, output_mode: OutputMode) -> Result<()> {
    let report = validate(app.nodes());

    match output_mode {
        OutputMode::Json => output::print_json(&report)?,
        OutputMode::Text => {
            output::write_validation(&mut io::stdout().lock(), &report, &OutputConfig::from_env())?;
        }
    }

    if !report.valid {
        bail!("Change set is invalid: {} error(s)", report.errors.len());
    }
    if report.has_warnings() && (args.strict || app.config().warnings_as_errors) {
        bail!(
            "Change set has {} warning(s) and warnings are treated as errors",
            report.warnings.len()
        );
    }
    Ok(())
}

/// Execute the rollback command
pub fn execute_rollback(app: &App, _args: &RollbackArgs, output_mode: OutputMode) -> Result<()> {
    let result = sort(app.nodes());
    if let Some(message) = result.error {
        bail!(message);
    }

    let rollback = reverse_order(&result.order);
    match output_mode {
        OutputMode::Json => output::print_json(&rollback)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::write_sequence(&mut io::stdout().lock(), "Rollback order:", &rollback, &config)?;
        }
    }
    Ok(())
}

/// Execute the next command
pub fn execute_next(app: &App, args: &NextArgs, output_mode: OutputMode) -> Result<()> {
    let applied: Vec<NodeId> = args
        .applied
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(NodeId::from)
        .collect();

    for id in &applied {
        if !app.nodes().iter().any(|node| node.id == *id) {
            tracing::warn!(id = %id, "Applied change is not part of the change set");
        }
    }

    let ready = parallel_applicable(app.nodes(), &applied);
    match output_mode {
        OutputMode::Json => output::print_json(&ready)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::write_sequence(&mut io::stdout().lock(), "Ready to apply:", &ready, &config)?;
        }
    }
    Ok(())
}

/// Execute the impact command
pub fn execute_impact(app: &App, args: &ImpactArgs, output_mode: OutputMode) -> Result<()> {
    let dependents = app.dependents(&args.id, args.max_depth.map(usize::from))?;

    match output_mode {
        OutputMode::Json => output::print_json(&dependents)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::write_dependents(&mut io::stdout().lock(), &args.id, &dependents, &config)?;
        }
    }
    Ok(())
}

/// Execute the check command
///
/// Fails when adding the dependency would close a cycle.
pub fn execute_check(app: &App, args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    let creates_cycle = app.would_create_cycle(&args.from, &args.to)?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "from": args.from,
            "to": args.to,
            "would_create_cycle": creates_cycle,
        }))?,
        OutputMode::Text if !creates_cycle => {
            let config = OutputConfig::from_env();
            println!(
                "{} '{}' can depend on '{}'",
                output::success("OK:", &config),
                args.from,
                args.to
            );
        }
        OutputMode::Text => {}
    }

    if creates_cycle {
        bail!(
            "'{}' depending on '{}' would create a circular dependency",
            args.from,
            args.to
        );
    }
    Ok(())
}

/// Execute the plan command
pub fn execute_plan(app: &App, args: &PlanArgs, output_mode: OutputMode) -> Result<()> {
    let apply_plan = match plan(app.nodes()) {
        Ok(apply_plan) => apply_plan,
        Err(GraphError::InvalidGraph { errors }) => {
            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "valid": false,
                    "errors": errors,
                }))?,
                OutputMode::Text => {
                    let config = OutputConfig::from_env();
                    let mut out = io::stdout().lock();
                    for err in &errors {
                        writeln!(out, "{} {err}", output::error("error:", &config))?;
                    }
                    writeln!(
                        out,
                        "{} ({} error(s))",
                        output::error("Change set is invalid", &config),
                        errors.len()
                    )?;
                }
            }
            bail!("Change set is invalid: {} error(s)", errors.len());
        }
        Err(other) => return Err(other.into()),
    };

    match output_mode {
        OutputMode::Json => output::print_json(&apply_plan)?,
        OutputMode::Text => {
            output::write_plan(&mut io::stdout().lock(), &apply_plan, &OutputConfig::from_env())?;
        }
    }

    if !apply_plan.warnings.is_empty() && (args.strict || app.config().warnings_as_errors) {
        bail!(
            "Plan has {} warning(s) and warnings are treated as errors",
            apply_plan.warnings.len()
        );
    }
    Ok(())
}
