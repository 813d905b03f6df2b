//! Wall-clock timing for benchmark runs.

use std::time::{Duration, Instant};

/// Measures the wall time of a whole run.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Start measuring now.
    #[must_use]
    pub fn start() -> Self {
        Stopwatch {
            start: Instant::now(),
        }
    }

    /// Time elapsed since [`Stopwatch::start`].
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Nodes per second, or 0.0 when no measurable time has passed.
#[inline]
#[must_use]
pub fn nodes_per_second(nodes: u64, elapsed_seconds: f64) -> f64 {
    if elapsed_seconds > 0.0 {
        nodes as f64 / elapsed_seconds
    } else {
        0.0
    }
}
