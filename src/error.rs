//! Error types for benchmark runs.

use std::io;
use std::path::PathBuf;

/// A protocol field name was followed by something that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected integer after '{field}', found {}", describe_value(.value))]
pub struct ProtocolParseError {
    /// Field name that preceded the bad value (`depth` or `nodes`)
    pub field: &'static str,
    /// Offending token, `None` when the line ended after the field name
    pub value: Option<String>,
}

fn describe_value(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "end of line".to_string(),
    }
}

/// Errors that abort a benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("failed to launch engine '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("engine command is empty")]
    EmptyCommand,

    #[error("engine closed its input (process exited?)")]
    BrokenPipe(#[source] io::Error),

    #[error("engine output ended before a depth {depth} report")]
    EndOfStream { depth: u32 },

    #[error("engine output ended while waiting for '{expected}'")]
    Handshake { expected: &'static str },

    #[error("no engine output for {seconds:.1}s")]
    Timeout { seconds: f64 },

    #[error("malformed engine output: {0}")]
    Protocol(#[from] ProtocolParseError),

    #[error("cannot read positions from {}: {source}", .path.display())]
    PositionFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("query {index} failed for position '{position}'")]
    Query {
        index: usize,
        position: String,
        #[source]
        source: Box<BenchError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl BenchError {
    /// Attach the failing query's position to an error.
    #[must_use]
    pub fn for_query(self, index: usize, position: &str) -> Self {
        BenchError::Query {
            index,
            position: position.to_string(),
            source: Box::new(self),
        }
    }

    /// The underlying error, looking through any query context.
    #[must_use]
    pub fn root(&self) -> &BenchError {
        match self {
            BenchError::Query { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
