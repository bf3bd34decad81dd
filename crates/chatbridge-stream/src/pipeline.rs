//! Chunk stream → response event stream.
//!
//! [`translate_stream`] wraps an upstream stream of Chat Completions chunks
//! and yields Responses lifecycle events. It is pull-based: nothing happens
//! until the returned stream is polled, and the next chunk is only pulled
//! once every event owed for the current one has been yielded.
//!
//! **Termination**:
//! - upstream ends → finalizer runs, last event is `response.completed`
//! - upstream yields `Err` → the error is passed through and the stream ends
//!   without finalizing
//! - consumer drops the stream → nothing further runs

use std::pin::Pin;

use chatbridge_core::chunk::ChatCompletionChunk;
use chatbridge_core::events::ResponseStreamEvent;
use chatbridge_core::response::Response;
use futures::Stream;
use tracing::{debug, warn};

use crate::state::Channel;
use crate::translator::{ChunkTranslator, TranslatorOptions};

/// Boxed stream of translated events, generic over the upstream error.
pub type ResponseEventStream<E> =
    Pin<Box<dyn Stream<Item = Result<ResponseStreamEvent, E>> + Send>>;

/// Translate `chunks` into Responses stream events for `response`.
///
/// `response` is the shell echoed in `response.created` and, with output and
/// usage filled in, in `response.completed`.
pub fn translate_stream<S, E>(
    response: Response,
    chunks: S,
    options: TranslatorOptions,
) -> ResponseEventStream<E>
where
    S: Stream<Item = Result<ChatCompletionChunk, E>> + Send + 'static,
    E: Send + 'static,
{
    use futures::StreamExt;

    type Item<U> = Result<ResponseStreamEvent, U>;

    Box::pin(async_stream::stream! {
        let mut translator = ChunkTranslator::new(response, options);
        let mut chunks = std::pin::pin!(chunks);
        let mut chunk_count = 0u64;

        while let Some(item) = StreamExt::next(&mut chunks).await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(err) => {
                    warn!(
                        chunks = chunk_count,
                        events = translator.events_emitted(),
                        "upstream chunk stream failed, ending without completion"
                    );
                    let v: Item<E> = Err(err);
                    yield v;
                    return;
                }
            };
            chunk_count += 1;

            if let Some(event) = translator.start() {
                debug!(upstream_id = ?chunk.id, "chunk stream started");
                let v: Item<E> = Ok(event);
                yield v;
            }

            translator.capture_usage(&chunk);

            let Some(delta) = chunk.first_delta() else {
                continue;
            };

            if let Some(reasoning) = delta.reasoning_text() {
                let v: Item<E> = Ok(translator.reasoning_delta(reasoning));
                yield v;
            }

            for channel in Channel::ALL {
                let Some(fragment) = channel.fragment(delta) else {
                    continue;
                };
                if translator.open(channel) {
                    let v: Item<E> = Ok(translator.message_added());
                    yield v;
                    let v: Item<E> = Ok(translator.part_added(channel));
                    yield v;
                }
                let v: Item<E> = Ok(translator.content_delta(channel, fragment));
                yield v;
            }

            translator.accumulate_tool_calls(delta.tool_call_deltas());
        }

        // Finalize.
        for channel in Channel::ALL {
            if let Some(event) = translator.part_done(channel) {
                let v: Item<E> = Ok(event);
                yield v;
            }
        }

        let output_index = translator.tool_call_output_index();
        for position in 0..translator.tool_call_count() {
            if let Some(event) = translator.tool_call_added(position, output_index) {
                let v: Item<E> = Ok(event);
                yield v;
            }
            if let Some(event) = translator.tool_call_arguments(position, output_index) {
                let v: Item<E> = Ok(event);
                yield v;
            }
            if let Some(event) = translator.tool_call_done(position, output_index) {
                let v: Item<E> = Ok(event);
                yield v;
            }
        }

        if let Some(event) = translator.message_done() {
            let v: Item<E> = Ok(event);
            yield v;
        }

        debug!(
            chunks = chunk_count,
            channels = translator.state().opened_channels(),
            tool_calls = translator.tool_call_count(),
            events = translator.events_emitted() + 1,
            "chunk stream finished"
        );
        let v: Item<E> = Ok(translator.completed());
        yield v;
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
