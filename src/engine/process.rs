//! Engine subprocess ownership.
//!
//! [`EngineProcess`] is the only thing that touches the child's pipes. Output
//! lines are pumped by a background thread into a channel so that a read can
//! optionally give up after a timeout; everything else happens on the caller's
//! thread.

use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::error::{BenchError, Result};

/// Line-level access to a running engine.
///
/// Implemented by [`EngineProcess`] for real subprocesses and by test doubles.
pub trait EngineChannel {
    /// Write one line (a newline is appended) and flush it.
    fn send(&mut self, line: &str) -> Result<()>;

    /// Block until the next output line is available.
    ///
    /// Returns `Ok(None)` once the engine's output is closed. The returned
    /// line has its line terminator removed.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Forcibly stop the engine and release its streams.
    fn terminate(&mut self);
}

impl<C: EngineChannel + ?Sized> EngineChannel for &mut C {
    fn send(&mut self, line: &str) -> Result<()> {
        (**self).send(line)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        (**self).read_line()
    }

    fn terminate(&mut self) {
        (**self).terminate();
    }
}

/// How to start the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EngineCommand {
    /// Split a command line on whitespace into program and arguments.
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(BenchError::EmptyCommand)?;
        Ok(EngineCommand {
            program,
            args: parts.collect(),
        })
    }

    /// The command as a single display string.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A running engine subprocess.
pub struct EngineProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<io::Result<String>>,
    read_timeout: Option<Duration>,
    terminated: bool,
}

impl EngineProcess {
    /// Launch the engine with piped stdin/stdout.
    ///
    /// Stderr is inherited so engine diagnostics stay visible.
    pub fn start(command: &EngineCommand) -> Result<Self> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| BenchError::Launch {
                command: command.display(),
                source,
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().ok_or_else(|| {
            BenchError::Io(io::Error::new(
                io::ErrorKind::Other,
                "engine stdout was not captured",
            ))
        })?;

        let (tx, rx) = mpsc::channel();
        // Detached: the thread ends by itself once the child's stdout closes.
        thread::Builder::new()
            .name("engine-stdout".to_string())
            .spawn(move || {
                let reader = BufReader::new(stdout);
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.send(line).is_err() || failed {
                        break;
                    }
                }
            })?;

        debug!("started engine '{}' (pid {})", command.display(), child.id());

        Ok(EngineProcess {
            child,
            stdin,
            lines: rx,
            read_timeout: None,
            terminated: false,
        })
    }

    /// Bound every subsequent [`EngineChannel::read_line`] by `timeout`.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// OS process id of the engine.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl EngineChannel for EngineProcess {
    fn send(&mut self, line: &str) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            BenchError::BrokenPipe(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "engine input already closed",
            ))
        })?;

        debug!(">> {line}");
        let written = stdin
            .write_all(line.as_bytes())
            .and_then(|()| stdin.write_all(b"\n"))
            .and_then(|()| stdin.flush());

        written.map_err(|err| match err.kind() {
            io::ErrorKind::BrokenPipe => BenchError::BrokenPipe(err),
            _ => BenchError::Io(err),
        })
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let received = match self.read_timeout {
            Some(timeout) => match self.lines.recv_timeout(timeout) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Disconnected) => None,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(BenchError::Timeout {
                        seconds: timeout.as_secs_f64(),
                    })
                }
            },
            None => self.lines.recv().ok(),
        };

        match received {
            Some(Ok(line)) => {
                debug!("<< {line}");
                Ok(Some(line))
            }
            Some(Err(err)) => Err(BenchError::Io(err)),
            None => Ok(None),
        }
    }

    fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        self.stdin.take();

        // kill fails with InvalidInput if the child has already been reaped
        if let Err(err) = self.child.kill() {
            if err.kind() != io::ErrorKind::InvalidInput {
                warn!("failed to kill engine (pid {}): {err}", self.child.id());
            }
        }
        match self.child.wait() {
            Ok(status) => debug!("engine exited: {status}"),
            Err(err) => warn!("failed to reap engine: {err}"),
        }
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Scoped ownership of an engine for the length of one run.
///
/// The engine is terminated exactly once: either by [`EngineSession::finish`]
/// or, on any early return or panic, when the session is dropped.
pub struct EngineSession<C: EngineChannel> {
    channel: C,
    finished: bool,
}

impl<C: EngineChannel> EngineSession<C> {
    pub fn new(channel: C) -> Self {
        EngineSession {
            channel,
            finished: false,
        }
    }

    pub fn channel(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Terminate the engine at the end of a successful run.
    pub fn finish(mut self) {
        self.finished = true;
        self.channel.terminate();
    }
}

impl<C: EngineChannel> Drop for EngineSession<C> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("run aborted, killing engine");
            self.channel.terminate();
        }
    }
}
