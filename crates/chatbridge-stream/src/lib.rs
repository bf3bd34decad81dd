//! # chatbridge-stream
//!
//! Translates a stream of Chat Completions chunks into the Responses API
//! streaming event protocol.
//!
//! - [`translate_stream`]: the translator loop and finalizer, as a lazy
//!   `Stream` of [`ResponseStreamEvent`](chatbridge_core::ResponseStreamEvent)s
//! - [`StreamState`]: per-stream accumulation (content slots, tool calls, usage)
//! - [`SequenceNumber`]: gap-free event numbering
//! - [`sse`]: SSE and NDJSON framing of emitted events

#![deny(unsafe_code)]

pub mod pipeline;
pub mod sequence;
pub mod sse;
pub mod state;
mod translator;

pub use pipeline::{ResponseEventStream, translate_stream};
pub use sequence::SequenceNumber;
pub use sse::{encode_ndjson, encode_sse};
pub use state::{Channel, ContentSlot, StreamState, ToolCallAccumulator};
pub use translator::TranslatorOptions;
