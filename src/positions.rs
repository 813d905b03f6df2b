//! Position list loading.
//!
//! Positions are opaque to the harness: each non-blank line is passed to the
//! engine verbatim after trimming.

use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};

/// Read the whole position file into memory, one position per line.
pub fn load_positions(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| BenchError::PositionFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_positions(&text))
}

/// Split position text into lines, dropping blank ones.
#[must_use]
pub fn parse_positions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
