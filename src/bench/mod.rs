//! Benchmark driver.
//!
//! One run sends every position to a single engine, in order, and waits for
//! the node count of each `go depth` search before starting the next. The
//! engine is terminated exactly once, whether the run completes or aborts.

mod report;

use chrono::{DateTime, Local};
use log::info;

use crate::config::BenchConfig;
use crate::engine::{
    extract_node_count, handshake, EngineChannel, EngineCommand, EngineProcess, EngineSession,
    LineReader,
};
use crate::error::{BenchError, Result};
use crate::timer::{nodes_per_second, Stopwatch};

pub use report::{append_log, format_footer, format_header, format_row, format_summary, format_timestamp};

/// Node count reported for one position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QueryResult {
    pub position: String,
    pub nodes: u64,
}

/// Aggregate statistics of a finished run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunSummary {
    pub total_nodes: u64,
    pub elapsed_seconds: f64,
    /// 0.0 when the elapsed time is too small to measure
    pub nodes_per_second: f64,
    pub depth: u32,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BenchRun {
    /// One entry per position, in input order
    pub results: Vec<QueryResult>,
    pub summary: RunSummary,
}

/// Notified as each query completes.
pub trait RunObserver {
    /// `rank` is the 1-based position index.
    fn on_query_complete(&mut self, rank: usize, result: &QueryResult);
}

/// Observer that ignores progress.
pub struct Quiet;

impl RunObserver for Quiet {
    fn on_query_complete(&mut self, _rank: usize, _result: &QueryResult) {}
}

/// Inputs and accumulated state of one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    positions: Vec<String>,
    depth: u32,
    message: String,
    handshake: bool,
    results: Vec<QueryResult>,
}

impl RunContext {
    #[must_use]
    pub fn new(positions: Vec<String>, depth: u32, message: impl Into<String>) -> Self {
        RunContext {
            positions,
            depth,
            message: message.into(),
            handshake: false,
            results: Vec::new(),
        }
    }

    /// Exchange `uci`/`isready` with the engine before timing starts.
    #[must_use]
    pub fn with_handshake(mut self, handshake: bool) -> Self {
        self.handshake = handshake;
        self
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    fn total_nodes(&self) -> u64 {
        self.results.iter().map(|r| r.nodes).sum()
    }
}

/// Launch the configured engine and benchmark `positions` with it.
pub fn run(
    config: &BenchConfig,
    positions: Vec<String>,
    observer: &mut dyn RunObserver,
) -> Result<BenchRun> {
    config.validate()?;
    let command = EngineCommand::parse(&config.engine)?;
    let engine = EngineProcess::start(&command)?.with_read_timeout(config.timeout);
    info!("benchmarking '{}' (pid {})", command.display(), engine.id());

    let ctx = RunContext::new(positions, config.depth, config.message.clone())
        .with_handshake(config.handshake);
    run_with(engine, ctx, observer)
}

/// Benchmark over an already running engine.
///
/// Takes ownership of `engine` and terminates it before returning.
pub fn run_with<C: EngineChannel>(
    engine: C,
    mut ctx: RunContext,
    observer: &mut dyn RunObserver,
) -> Result<BenchRun> {
    let mut session = EngineSession::new(engine);

    if ctx.depth == 0 {
        return Err(BenchError::InvalidConfig(
            "depth must be greater than 0".to_string(),
        ));
    }
    if ctx.handshake {
        handshake(session.channel())?;
    }

    info!(
        "running {} positions at depth {}",
        ctx.positions.len(),
        ctx.depth
    );
    let watch = Stopwatch::start();

    for (index, position) in ctx.positions.iter().enumerate() {
        let rank = index + 1;
        let nodes = run_query(session.channel(), position, ctx.depth)
            .map_err(|err| err.for_query(rank, position))?;

        let result = QueryResult {
            position: position.clone(),
            nodes,
        };
        observer.on_query_complete(rank, &result);
        ctx.results.push(result);
    }

    let elapsed_seconds = watch.elapsed().as_secs_f64();
    session.finish();

    let total_nodes = ctx.total_nodes();
    let summary = RunSummary {
        total_nodes,
        elapsed_seconds,
        nodes_per_second: nodes_per_second(total_nodes, elapsed_seconds),
        depth: ctx.depth,
        message: ctx.message,
        timestamp: Local::now(),
    };
    info!(
        "searched {} nodes in {:.2}s ({:.0} nps)",
        summary.total_nodes, summary.elapsed_seconds, summary.nodes_per_second
    );

    Ok(BenchRun {
        results: ctx.results,
        summary,
    })
}

/// Issue one search and wait for its node count.
fn run_query<C: EngineChannel>(engine: &mut C, position: &str, depth: u32) -> Result<u64> {
    engine.send(&format!("position fen {position}"))?;
    engine.send(&format!("go depth {depth}"))?;
    extract_node_count(&mut LineReader::new(engine), depth)
}
