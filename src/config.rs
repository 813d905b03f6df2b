//! Benchmark run configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BenchError, Result};

/// Engine launched when none is given
pub const DEFAULT_ENGINE: &str = "bin/Pali";

/// Position list read when none is given
pub const DEFAULT_POSITIONS: &str = "bench.txt";

/// Search depth used when none is given
pub const DEFAULT_DEPTH: u32 = 10;

/// Run message used when none is given
pub const DEFAULT_MESSAGE: &str = "none";

/// Settings for one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Engine command line (program followed by arguments)
    pub engine: String,
    /// File holding one position per line
    pub positions: PathBuf,
    /// Depth passed to every `go depth` command
    pub depth: u32,
    /// Free-form note recorded with the summary
    pub message: String,
    /// File the summary block is appended to
    pub log: Option<PathBuf>,
    /// Give up when the engine stays silent this long
    pub timeout: Option<Duration>,
    /// Exchange `uci`/`isready` before timing starts
    pub handshake: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            positions: PathBuf::from(DEFAULT_POSITIONS),
            depth: DEFAULT_DEPTH,
            message: DEFAULT_MESSAGE.to_string(),
            log: None,
            timeout: None,
            handshake: false,
        }
    }
}

impl BenchConfig {
    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(BenchError::InvalidConfig(
                "depth must be greater than 0".to_string(),
            ));
        }
        if self.engine.trim().is_empty() {
            return Err(BenchError::EmptyCommand);
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(BenchError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
