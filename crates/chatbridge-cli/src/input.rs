//! Chunk input: one `chat.completion.chunk` JSON object per line.
//!
//! Raw SSE captures are accepted too. `data: ` prefixes are stripped, and
//! blank lines, `event:` lines, `:` comments and the `[DONE]` marker are
//! skipped.

use chatbridge_core::chunk::ChatCompletionChunk;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::wrappers::LinesStream;

const DONE_MARKER: &str = "[DONE]";

/// Failure reading the chunk input.
#[derive(Debug, thiserror::Error)]
pub enum ChunkReadError {
    /// The underlying reader failed.
    #[error("failed to read chunk input: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid chunk.
    #[error("line {line}: invalid chunk: {source}")]
    Decode {
        /// 1-based line number.
        line: usize,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Parse one input line. `None` means the line carries no chunk.
pub fn parse_line(line: &str, number: usize) -> Option<Result<ChatCompletionChunk, ChunkReadError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') || trimmed.starts_with("event:") {
        return None;
    }
    let payload = trimmed.strip_prefix("data:").map_or(trimmed, str::trim_start);
    if payload.is_empty() || payload == DONE_MARKER {
        return None;
    }
    Some(
        serde_json::from_str(payload).map_err(|source| ChunkReadError::Decode {
            line: number,
            source,
        }),
    )
}

/// Lazily read chunks from `reader`, one line at a time.
pub fn chunk_stream<R>(reader: R) -> impl Stream<Item = Result<ChatCompletionChunk, ChunkReadError>> + Send + 'static
where
    R: AsyncRead + Unpin + Send + 'static,
{
    LinesStream::new(BufReader::new(reader).lines())
        .enumerate()
        .filter_map(|(index, line)| async move {
            match line {
                Ok(line) => parse_line(&line, index + 1),
                Err(err) => Some(Err(ChunkReadError::Io(err))),
            }
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn plain_json_line() {
        let chunk = parse_line(r#"{"choices":[{"delta":{"content":"hi"}}]}"#, 1)
            .unwrap()
            .unwrap();
        assert_eq!(chunk.first_delta().and_then(|d| d.text()), Some("hi"));
    }

    #[test]
    fn sse_data_prefix_is_stripped() {
        let chunk = parse_line(r#"data: {"choices":[{"delta":{"refusal":"no"}}]}"#, 1)
            .unwrap()
            .unwrap();
        assert_eq!(chunk.first_delta().and_then(|d| d.refusal_text()), Some("no"));
    }

    #[test]
    fn framing_lines_are_skipped() {
        for line in ["", "   ", "data: [DONE]", "[DONE]", ": keep-alive", "event: message", "data:"] {
            assert!(parse_line(line, 1).is_none(), "{line:?} should be skipped");
        }
    }

    #[test]
    fn malformed_line_reports_its_number() {
        assert_matches!(
            parse_line("{not json", 7),
            Some(Err(ChunkReadError::Decode { line: 7, .. }))
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let chunk = parse_line(
            r#"{"id":"c1","system_fingerprint":"fp","choices":[{"index":0,"delta":{"content":"x"},"logprobs":null}]}"#,
            1,
        )
        .unwrap()
        .unwrap();
        assert_eq!(chunk.id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn stream_numbers_lines_from_one() {
        let input = b"\n{\"choices\":[]}\n\nnope\n".as_slice();
        let items: Vec<_> = chunk_stream(input).collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_matches!(items[1], Err(ChunkReadError::Decode { line: 4, .. }));
    }
}
