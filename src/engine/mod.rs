//! Engine-side plumbing: the subprocess, its line protocol and result parsing.
//!
//! All I/O with the engine goes through an [`EngineChannel`]; the real
//! implementation is [`EngineProcess`], tests substitute scripted doubles.

mod extract;
mod handshake;
mod process;
mod reader;

pub use extract::{extract_node_count, SearchExtractor};
pub use handshake::handshake;
pub use process::{EngineChannel, EngineCommand, EngineProcess, EngineSession};
pub use reader::{tokenize, LineReader};
