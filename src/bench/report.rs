//! Human-readable output: the per-position table, the summary block and the
//! append-only run log.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use chrono::{DateTime, Local};

use super::{QueryResult, RunSummary};
use crate::error::Result;

const TABLE_WIDTH: usize = 89;
const NODES_WIDTH: usize = 7;
const POSITION_WIDTH: usize = 75;
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

fn rule() -> String {
    "-".repeat(TABLE_WIDTH)
}

/// Table title between two horizontal rules.
#[must_use]
pub fn format_header() -> String {
    format!(
        "{rule}\n| {:^NODES_WIDTH$} | {:^POSITION_WIDTH$} |\n{rule}",
        "Nodes",
        "FEN",
        rule = rule()
    )
}

/// One table row; long positions overflow the column rather than being cut.
#[must_use]
pub fn format_row(result: &QueryResult) -> String {
    format!(
        "| {:>NODES_WIDTH$} | {:<POSITION_WIDTH$} |",
        result.nodes, result.position
    )
}

/// Closing rule of the table.
#[must_use]
pub fn format_footer() -> String {
    rule()
}

#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Summary block printed after the table.
#[must_use]
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_timestamp(&summary.timestamp));
    let _ = writeln!(out, "depth: {}", summary.depth);
    let _ = writeln!(out, "nodes: {}", summary.total_nodes);
    let _ = writeln!(out, "time:  {:.2} seconds", summary.elapsed_seconds);
    let _ = writeln!(out, "nps:   {:.2}", summary.nodes_per_second);
    let _ = write!(out, "message: {}", summary.message);
    out
}

fn format_log_entry(summary: &RunSummary, engine: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_timestamp(&summary.timestamp));
    let _ = writeln!(out, "cmd:   {engine}");
    let _ = writeln!(out, "depth: {}", summary.depth);
    let _ = writeln!(out, "nodes: {}", summary.total_nodes);
    let _ = writeln!(out, "time : {:.2} seconds", summary.elapsed_seconds);
    let _ = writeln!(out, "nps  : {:.2}", summary.nodes_per_second);
    let _ = writeln!(out, "message: {}", summary.message);
    out.push('\n');
    out
}

/// Append the run to `path`, creating the file if needed.
pub fn append_log(path: &Path, summary: &RunSummary, engine: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format_log_entry(summary, engine).as_bytes())?;
    Ok(())
}
