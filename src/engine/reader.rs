//! Tokenizing reader over engine output.

use crate::engine::process::EngineChannel;
use crate::error::Result;

/// Split a protocol line into whitespace-separated tokens.
///
/// Runs of whitespace never produce empty tokens.
#[inline]
#[must_use]
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Reads engine output one tokenized line at a time.
pub struct LineReader<'a, C: EngineChannel> {
    channel: &'a mut C,
    lines_read: u64,
}

impl<'a, C: EngineChannel> LineReader<'a, C> {
    pub fn new(channel: &'a mut C) -> Self {
        LineReader {
            channel,
            lines_read: 0,
        }
    }

    /// Consume exactly one line and return its tokens.
    ///
    /// Blocks until a line is available. `Ok(None)` means the engine closed
    /// its output.
    pub fn next_tokens(&mut self) -> Result<Option<Vec<String>>> {
        let Some(line) = self.channel.read_line()? else {
            return Ok(None);
        };
        self.lines_read += 1;
        Ok(Some(
            line.split_whitespace().map(str::to_string).collect(),
        ))
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Script(VecDeque<&'static str>);

    impl EngineChannel for Script {
        fn send(&mut self, _line: &str) -> Result<()> {
            Ok(())
        }

        fn read_line(&mut self) -> Result<Option<String>> {
            Ok(self.0.pop_front().map(str::to_string))
        }

        fn terminate(&mut self) {}
    }

    #[test]
    fn test_tokenize_discards_empty_tokens() {
        assert_eq!(
            tokenize("  info   depth 3\tnodes  42 "),
            vec!["info", "depth", "3", "nodes", "42"]
        );
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_one_line_per_call() {
        let mut script = Script(VecDeque::from(vec!["info depth 1", "", "bestmove e2e4"]));
        let mut reader = LineReader::new(&mut script);

        assert_eq!(reader.next_tokens().unwrap().unwrap(), vec!["info", "depth", "1"]);
        assert_eq!(reader.next_tokens().unwrap().unwrap(), Vec::<String>::new());
        assert_eq!(reader.next_tokens().unwrap().unwrap(), vec!["bestmove", "e2e4"]);
        assert_eq!(reader.next_tokens().unwrap(), None);
        assert_eq!(reader.lines_read(), 3);
    }
}
