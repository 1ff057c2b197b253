//! Subcommand bodies, written against `impl Write` so they can be driven from tests.

use std::fs;
use std::io::{self, Read, Write};

use flowchart::{LayoutConfig, parse_report, render_to_objects, to_mermaid};
use serde::Serialize;
use tracing::{debug, info};

use crate::CliError;

/// Where the laid-out diagram lands and how large it is drawn.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale: f64,
}

/// Read a whole input file, or stdin when `path` is `-`.
pub(crate) fn read_input(path: &str) -> Result<String, CliError> {
    let read_err = |source| CliError::Read { path: path.to_owned(), source };
    if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(read_err)?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(read_err)
}

pub(crate) fn run_parse(text: &str, compact: bool, out: &mut impl Write) -> Result<(), CliError> {
    let report = parse_report(text);
    debug!(
        nodes = report.flowchart.nodes.len(),
        edges = report.flowchart.edges.len(),
        "parse: done"
    );
    write_json(&report.flowchart, compact, out)
}

pub(crate) fn run_layout(
    text: &str,
    config: &LayoutConfig,
    placement: Placement,
    compact: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let report = parse_report(text);
    let objects = render_to_objects(
        &report.flowchart,
        config,
        placement.origin_x,
        placement.origin_y,
        placement.scale,
    );
    debug!(objects = objects.len(), "layout: done");
    write_json(&objects, compact, out)
}

/// Print one line per skipped statement; fail when there was any.
pub(crate) fn run_check(text: &str, out: &mut impl Write) -> Result<(), CliError> {
    let report = parse_report(text);
    for skipped in &report.skipped {
        writeln!(out, "line {}: {}: {}", skipped.line, skipped.error, skipped.text)?;
    }
    if !report.skipped.is_empty() {
        return Err(CliError::Malformed { count: report.skipped.len() });
    }

    let chart = &report.flowchart;
    if chart.is_placeholder() {
        writeln!(out, "ok: no nodes")?;
    } else {
        writeln!(out, "ok: {} nodes, {} edges", chart.nodes.len(), chart.edges.len())?;
    }
    info!(nodes = chart.nodes.len(), edges = chart.edges.len(), "check: passed");
    Ok(())
}

pub(crate) fn run_fmt(text: &str, out: &mut impl Write) -> Result<(), CliError> {
    let report = parse_report(text);
    out.write_all(to_mermaid(&report.flowchart).as_bytes())?;
    Ok(())
}

fn write_json(value: &impl Serialize, compact: bool, out: &mut impl Write) -> Result<(), CliError> {
    let rendered = if compact { serde_json::to_string(value)? } else { serde_json::to_string_pretty(value)? };
    writeln!(out, "{rendered}")?;
    Ok(())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
