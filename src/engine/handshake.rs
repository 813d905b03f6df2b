//! Optional UCI start-up exchange.
//!
//! Engines often load networks or tables when they start; waiting for
//! `readyok` keeps that work out of the measured time.

use log::debug;

use crate::engine::process::EngineChannel;
use crate::engine::reader::LineReader;
use crate::error::{BenchError, Result};

/// Send `uci` and `isready`, waiting for `uciok` and `readyok` in turn.
pub fn handshake<C: EngineChannel>(engine: &mut C) -> Result<()> {
    for (command, reply) in [("uci", "uciok"), ("isready", "readyok")] {
        engine.send(command)?;
        wait_for(&mut LineReader::new(engine), reply)?;
    }
    debug!("engine ready");
    Ok(())
}

/// Discard output lines until one starts with `token`.
fn wait_for<C: EngineChannel>(reader: &mut LineReader<'_, C>, token: &'static str) -> Result<()> {
    loop {
        let tokens = reader
            .next_tokens()?
            .ok_or(BenchError::Handshake { expected: token })?;
        if tokens.first().map(String::as_str) == Some(token) {
            return Ok(());
        }
    }
}
