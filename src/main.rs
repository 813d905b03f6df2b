use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use engine_bench::bench::{self, format_footer, format_header, format_row, format_summary};
use engine_bench::config::{DEFAULT_DEPTH, DEFAULT_ENGINE, DEFAULT_MESSAGE, DEFAULT_POSITIONS};
use engine_bench::positions::load_positions;
use engine_bench::{BenchConfig, QueryResult, RunObserver};

#[derive(Parser)]
#[command(name = "engine_bench")]
#[command(about = "Measure search throughput of a UCI engine over a fixed position list")]
#[command(version)]
struct Cli {
    /// Engine command (program and optional arguments)
    #[arg(short, long, default_value = DEFAULT_ENGINE)]
    engine: String,

    /// File with one FEN per line
    #[arg(short, long, default_value = DEFAULT_POSITIONS)]
    fen: PathBuf,

    /// Search depth for every position
    #[arg(short, long, default_value_t = DEFAULT_DEPTH,
          value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,

    /// Note recorded with the results
    #[arg(short, long, default_value = DEFAULT_MESSAGE)]
    message: String,

    /// Append the summary to this file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Abort when the engine prints nothing for this many seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Wait for uciok/readyok before starting the clock
    #[arg(long)]
    handshake: bool,

    /// Enable debug logging of the engine conversation
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<BenchConfig> {
        let timeout = self
            .timeout
            .map(Duration::try_from_secs_f64)
            .transpose()
            .context("invalid --timeout")?;
        Ok(BenchConfig {
            engine: self.engine,
            positions: self.fen,
            depth: self.depth,
            message: self.message,
            log: self.log,
            timeout,
            handshake: self.handshake,
        })
    }
}

/// Prints table rows as soon as each search finishes.
struct TablePrinter;

impl RunObserver for TablePrinter {
    fn on_query_complete(&mut self, _rank: usize, result: &QueryResult) {
        println!("{}", format_row(result));
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    // Bridge log crate -> tracing so library log::debug! records show up
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;
    config.validate()?;

    let positions = load_positions(&config.positions)?;

    println!("{}", format_header());
    let run = bench::run(&config, positions, &mut TablePrinter)?;
    println!("{}\n", format_footer());
    println!("{}", format_summary(&run.summary));

    if let Some(path) = &config.log {
        bench::append_log(path, &run.summary, &config.engine)
            .with_context(|| format!("cannot write log file {}", path.display()))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("failed to initialise logging: {err:#}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
