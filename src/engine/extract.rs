//! Node-count extraction from streamed search reports.
//!
//! An engine prints many `info` lines per search. The query for a given depth
//! is complete on the first line whose *last* `depth` field equals the target
//! depth; the node count is taken from `nodes` fields that appear after a
//! matching `depth` on such lines.
//!
//! A matching line that carries no `nodes` field completes the query with a
//! count of 0. Engines are expected to report both fields together, so this
//! is kept as-is rather than waiting for a later line.

use crate::engine::process::EngineChannel;
use crate::engine::reader::LineReader;
use crate::error::{BenchError, ProtocolParseError, Result};

const DEPTH_FIELD: &str = "depth";
const NODES_FIELD: &str = "nodes";

/// Per-query state machine scanning tokenized lines for a target depth.
#[derive(Debug, Clone)]
pub struct SearchExtractor {
    target_depth: u32,
    nodes: u64,
}

impl SearchExtractor {
    #[must_use]
    pub fn new(target_depth: u32) -> Self {
        SearchExtractor {
            target_depth,
            nodes: 0,
        }
    }

    #[must_use]
    pub fn target_depth(&self) -> u32 {
        self.target_depth
    }

    /// Scan one line. Returns the node count once a line matches the depth.
    pub fn consume<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
    ) -> std::result::Result<Option<u64>, ProtocolParseError> {
        let mut depth_matched = false;

        for (i, token) in tokens.iter().enumerate() {
            match token.as_ref() {
                DEPTH_FIELD => {
                    let depth: i64 = parse_field(DEPTH_FIELD, tokens.get(i + 1))?;
                    depth_matched = depth == i64::from(self.target_depth);
                }
                NODES_FIELD if depth_matched => {
                    self.nodes = parse_field(NODES_FIELD, tokens.get(i + 1))?;
                }
                _ => {}
            }
        }

        Ok(depth_matched.then_some(self.nodes))
    }
}

fn parse_field<T: std::str::FromStr, S: AsRef<str>>(
    field: &'static str,
    value: Option<&S>,
) -> std::result::Result<T, ProtocolParseError> {
    let value: Option<&str> = value.map(AsRef::as_ref);
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ProtocolParseError {
            field,
            value: value.map(str::to_string),
        })
}

/// Read engine output until a line reports `depth`, then return its node count.
///
/// Blocks until a matching line arrives, the engine closes its output
/// ([`BenchError::EndOfStream`]), or the channel's read timeout fires.
pub fn extract_node_count<C: EngineChannel>(
    reader: &mut LineReader<'_, C>,
    depth: u32,
) -> Result<u64> {
    let mut extractor = SearchExtractor::new(depth);
    loop {
        let tokens = reader
            .next_tokens()?
            .ok_or(BenchError::EndOfStream { depth })?;
        if let Some(nodes) = extractor.consume(&tokens)? {
            return Ok(nodes);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    fn run(depth: u32, lines: &[&[&str]]) -> std::result::Result<Option<u64>, ProtocolParseError> {
        let mut extractor = SearchExtractor::new(depth);
        for line in lines {
            if let Some(nodes) = extractor.consume(*line)? {
                return Ok(Some(nodes));
            }
        }
        Ok(None)
    }

    #[test]
    fn test_matching_line() {
        assert_eq!(run(10, &[&["info", "depth", "10", "nodes", "12345"]]), Ok(Some(12345)));
    }

    #[test]
    fn test_depth_match_does_not_carry_over() {
        let lines: &[&[&str]] = &[
            &["info", "depth", "9", "nodes", "999"],
            &["info", "depth", "10", "nodes", "500"],
        ];
        assert_eq!(run(10, lines), Ok(Some(500)));
    }

    #[test]
    fn test_matching_line_without_nodes_is_zero() {
        assert_eq!(run(10, &[&["info", "depth", "10"]]), Ok(Some(0)));
    }

    #[test]
    fn test_nodes_before_depth_ignored() {
        assert_eq!(run(10, &[&["nodes", "42", "depth", "10"]]), Ok(Some(0)));
    }

    #[test]
    fn test_later_depth_on_same_line_decides() {
        // seldepth is a different token, only the last `depth` counts
        assert_eq!(
            run(10, &[&["info", "depth", "10", "seldepth", "14", "nodes", "7", "depth", "11"]]),
            Ok(None)
        );
    }

    #[test]
    fn test_candidate_kept_across_lines() {
        let lines: &[&[&str]] = &[
            &["info", "depth", "10", "nodes", "77", "depth", "9"],
            &["info", "depth", "10"],
        ];
        assert_eq!(run(10, lines), Ok(Some(77)));
    }

    #[test]
    fn test_noise_lines_ignored() {
        let lines: &[&[&str]] = &[
            &[],
            &["readyok"],
            &["info", "string", "nnue", "loaded"],
            &["info", "depth", "10", "score", "cp", "31", "nodes", "88", "nps", "1000"],
        ];
        assert_eq!(run(10, lines), Ok(Some(88)));
    }

    #[test]
    fn test_non_integer_value() {
        let err = run(10, &[&["info", "depth", "ten"]]).unwrap_err();
        assert_eq!(err.field, "depth");
        assert_eq!(err.value.as_deref(), Some("ten"));

        let err = run(10, &[&["info", "depth", "10", "nodes", "-5"]]).unwrap_err();
        assert_eq!(err.field, "nodes");
    }

    #[test]
    fn test_field_at_end_of_line() {
        let err = run(10, &[&["info", "depth"]]).unwrap_err();
        assert_eq!(err.value, None);
    }

    #[test]
    fn test_unmatched_nodes_value_not_parsed() {
        assert_eq!(run(10, &[&["info", "depth", "3", "nodes", "garbage"]]), Ok(None));
    }

    struct Script(VecDeque<String>);

    impl EngineChannel for Script {
        fn send(&mut self, _line: &str) -> Result<()> {
            Ok(())
        }

        fn read_line(&mut self) -> Result<Option<String>> {
            Ok(self.0.pop_front())
        }

        fn terminate(&mut self) {}
    }

    fn script(lines: &[&str]) -> Script {
        Script(lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_extract_stops_at_match() {
        let mut engine = script(&[
            "info depth 1 nodes 20",
            "info depth 2 nodes 400",
            "bestmove e2e4",
        ]);
        let mut reader = LineReader::new(&mut engine);
        assert_eq!(extract_node_count(&mut reader, 2).unwrap(), 400);
        assert_eq!(reader.lines_read(), 2);
    }

    #[test]
    fn test_extract_end_of_stream() {
        let mut engine = script(&["info depth 1 nodes 20", "bestmove e2e4"]);
        let mut reader = LineReader::new(&mut engine);
        assert!(matches!(
            extract_node_count(&mut reader, 5),
            Err(BenchError::EndOfStream { depth: 5 })
        ));
    }

    #[test]
    fn test_extract_parse_error() {
        let mut engine = script(&["info depth 5 nodes lots"]);
        let mut reader = LineReader::new(&mut engine);
        assert!(matches!(
            extract_node_count(&mut reader, 5),
            Err(BenchError::Protocol(_))
        ));
    }

    #[test]
    fn test_extract_has_no_cross_query_state() {
        let lines = ["info depth 3 nodes 9", "info depth 4 nodes 31", "info depth 4"];
        let mut first = script(&lines);
        let mut second = script(&lines);
        let a = extract_node_count(&mut LineReader::new(&mut first), 4).unwrap();
        let b = extract_node_count(&mut LineReader::new(&mut second), 4).unwrap();
        assert_eq!(a, 31);
        assert_eq!(a, b);
    }
}
