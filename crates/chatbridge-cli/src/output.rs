//! Event output: writes translated events as they arrive.

use anyhow::{Context, Result};
use chatbridge_core::events::ResponseStreamEvent;
use chatbridge_settings::OutputFormat;
use chatbridge_stream::{ResponseEventStream, encode_ndjson, encode_sse};
use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::input::ChunkReadError;

fn encode(event: &ResponseStreamEvent, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Ndjson => encode_ndjson(event),
        OutputFormat::Sse => encode_sse(event),
    }
}

/// Drain `events` into `out`, flushing after each event.
///
/// Returns the number of events written. An input failure ends the stream
/// and is returned after everything before it has been written.
pub async fn write_events<W>(
    mut events: ResponseEventStream<ChunkReadError>,
    format: OutputFormat,
    out: &mut W,
) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(item) = events.next().await {
        let event = item.context("chunk input failed")?;
        let frame = encode(&event, format).context("failed to encode event")?;
        out.write_all(frame.as_bytes())
            .await
            .context("failed to write event")?;
        out.flush().await.context("failed to flush output")?;
        written += 1;
    }
    Ok(written)
}
