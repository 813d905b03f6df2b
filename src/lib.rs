//! Node-throughput benchmarking for engines that speak a UCI-style line
//! protocol over stdin/stdout.

pub mod bench;
pub mod config;
pub mod engine;
pub mod error;
pub mod positions;
pub mod timer;

pub use bench::{run, run_with, BenchRun, QueryResult, RunContext, RunObserver, RunSummary};
pub use config::BenchConfig;
pub use error::{BenchError, ProtocolParseError};
