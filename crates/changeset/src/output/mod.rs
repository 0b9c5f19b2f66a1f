//! Output formatting for CLI commands.
//!
//! Every command prints either human-readable text or, with `--json`, the
//! serialized result value. Text writers take any [`Write`] so they can be
//! tested against a buffer.

pub mod color;

use changeset_graph::{
    Analysis, ApplyPlan, CycleReport, Dependent, NodeId, ValidationReport, error::format_cycle,
};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{bold, dimmed};

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `CHANGESET_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("CHANGESET_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self { use_colors }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Print a value as pretty JSON to stdout
///
/// # Errors
///
/// Returns an error if serialization or the write to stdout fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

fn join_ids(ids: &[NodeId], config: &OutputConfig) -> String {
    ids.iter()
        .map(|id| info(id.as_str(), config))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write a numbered list of ids under a header.
///
/// # Errors
///
/// Returns any error from the underlying writer. The same holds for every
/// `write_*` function in this module.
pub fn write_sequence<W: Write>(
    w: &mut W,
    header: &str,
    ids: &[NodeId],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold(header, config))?;
    if ids.is_empty() {
        writeln!(w, "  {}", dimmed("(none)", config))?;
    }
    for (position, id) in ids.iter().enumerate() {
        writeln!(w, "  {:>3}. {}", position + 1, info(id.as_str(), config))?;
    }
    Ok(())
}

/// Write the parallel batches of an analysis.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_levels<W: Write>(
    w: &mut W,
    analysis: &Analysis,
    node_count: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{}",
        bold(
            &format!(
                "Parallel batches ({} level(s), max depth {})",
                analysis.levels.len(),
                analysis.max_depth
            ),
            config
        )
    )?;
    for (depth, level) in analysis.levels.iter().enumerate() {
        writeln!(w, "  Level {depth}: {}", join_ids(level, config))?;
    }

    let left_out = node_count.saturating_sub(analysis.leveled_count());
    if left_out > 0 {
        writeln!(
            w,
            "{}",
            warning(
                &format!(
                    "{left_out} node(s) on or behind a cycle were left out; run `changeset cycles`"
                ),
                config
            )
        )?;
    }
    Ok(())
}

/// Write a cycle listing.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_cycles<W: Write>(
    w: &mut W,
    report: &CycleReport,
    config: &OutputConfig,
) -> io::Result<()> {
    if !report.has_cycle {
        writeln!(w, "{}", success("No circular dependencies detected.", config))?;
        return Ok(());
    }

    writeln!(
        w,
        "Found {} circular dependencies:",
        error(&report.cycles.len().to_string(), config)
    )?;
    writeln!(w)?;
    for (i, cycle) in report.cycles.iter().enumerate() {
        writeln!(w, "  {} {}:", warning("Cycle", config), i + 1)?;
        writeln!(w, "    {}", dimmed(&format_cycle(cycle), config))?;
    }
    Ok(())
}

/// Write a validation report.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_validation<W: Write>(
    w: &mut W,
    report: &ValidationReport,
    config: &OutputConfig,
) -> io::Result<()> {
    for err in &report.errors {
        writeln!(w, "{} {err}", error("error:", config))?;
    }
    for warn in &report.warnings {
        writeln!(w, "{} {warn}", warning("warning:", config))?;
    }

    let summary = format!(
        "{} error(s), {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    );
    if report.valid {
        writeln!(w, "{} ({summary})", success("Change set is valid", config))
    } else {
        writeln!(w, "{} ({summary})", error("Change set is invalid", config))
    }
}

/// Write the transitive dependents of a node, indented by depth.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_dependents<W: Write>(
    w: &mut W,
    id: &str,
    dependents: &[Dependent],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        bold("Changes depending on", config),
        info(id, config)
    )?;
    if dependents.is_empty() {
        writeln!(w, "  {}", dimmed("(none)", config))?;
    }
    for dependent in dependents {
        let indent = "  ".repeat(dependent.depth);
        writeln!(
            w,
            "{indent}{} {}",
            info(dependent.id.as_str(), config),
            dimmed(&format!("(depth {})", dependent.depth), config)
        )?;
    }
    Ok(())
}

/// Write a full apply plan.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_plan<W: Write>(w: &mut W, plan: &ApplyPlan, config: &OutputConfig) -> io::Result<()> {
    write_sequence(w, "Apply order:", &plan.order, config)?;
    writeln!(w)?;
    writeln!(w, "{}", bold("Parallel batches:", config))?;
    for (depth, level) in plan.levels.iter().enumerate() {
        writeln!(w, "  Level {depth}: {}", join_ids(level, config))?;
    }
    writeln!(w)?;
    write_sequence(w, "Rollback order:", &plan.rollback, config)?;
    for warn in &plan.warnings {
        writeln!(w, "{} {warn}", warning("warning:", config))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use changeset_graph::{Node, analyze, detect_cycles, plan, validate};

    fn plain() -> OutputConfig {
        OutputConfig::new(false)
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn network() -> Vec<Node> {
        vec![
            Node::root("bridge"),
            Node::new("dhcp", ["bridge"]),
            Node::new("firewall", ["bridge"]),
            Node::new("dns", ["dhcp"]),
        ]
    }

    #[test]
    fn sequence_is_numbered() {
        let ids = vec![NodeId::from("bridge"), NodeId::from("dhcp")];
        let text = render(|w| write_sequence(w, "Apply order:", &ids, &plain()));
        assert_eq!(text, "Apply order:\n    1. bridge\n    2. dhcp\n");
    }

    #[test]
    fn empty_sequence_says_none() {
        let text = render(|w| write_sequence(w, "Rollback order:", &[], &plain()));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn levels_list_each_batch() {
        let analysis = analyze(&network());
        let text = render(|w| write_levels(w, &analysis, 4, &plain()));
        assert!(text.contains("Level 0: bridge\n"));
        assert!(text.contains("Level 1: dhcp, firewall\n"));
        assert!(text.contains("Level 2: dns\n"));
        assert!(!text.contains("left out"));
    }

    #[test]
    fn levels_mention_nodes_left_out() {
        let nodes = vec![Node::new("a", ["b"]), Node::new("b", ["a"])];
        let analysis = analyze(&nodes);
        let text = render(|w| write_levels(w, &analysis, nodes.len(), &plain()));
        assert!(text.contains("2 node(s) on or behind a cycle were left out"));
    }

    #[test]
    fn cycles_render_closing_edge() {
        let report = detect_cycles(&[Node::new("a", ["b"]), Node::new("b", ["a"])]);
        let text = render(|w| write_cycles(w, &report, &plain()));
        assert!(text.contains("Found 1 circular dependencies:"));
        assert!(text.contains("a -> b -> a"));
    }

    #[test]
    fn no_cycles_message() {
        let text = render(|w| write_cycles(w, &detect_cycles(&network()), &plain()));
        assert_eq!(text, "No circular dependencies detected.\n");
    }

    #[test]
    fn validation_lists_findings() {
        let report = validate(&[Node::new("a", ["a"]), Node::new("b", ["gone"])]);
        let text = render(|w| write_validation(w, &report, &plain()));
        assert!(text.contains("error: Node 'a' depends on itself"));
        assert!(text.contains("warning: Node 'b' depends on missing node 'gone'"));
        assert!(text.contains("Change set is invalid (2 error(s), 1 warning(s))"));
    }

    #[test]
    fn dependents_are_indented_by_depth() {
        let dependents = changeset_graph::transitive_dependents(&network(), "bridge", None).unwrap();
        let text = render(|w| write_dependents(w, "bridge", &dependents, &plain()));
        assert!(text.contains("\n  dhcp (depth 1)\n"));
        assert!(text.contains("\n    dns (depth 2)\n"));
    }

    #[test]
    fn plan_has_all_sections() {
        let applied = plan(&network()).unwrap();
        let text = render(|w| write_plan(w, &applied, &plain()));
        assert!(text.contains("Apply order:"));
        assert!(text.contains("Parallel batches:"));
        assert!(text.contains("Rollback order:\n    1. dns\n"));
    }
}
