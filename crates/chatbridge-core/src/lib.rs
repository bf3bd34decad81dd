//! # chatbridge-core
//!
//! Shared vocabulary for the chatbridge translator:
//!
//! - **Fragments**: [`ChatCompletionChunk`] and its delta types, the input side
//! - **Responses**: [`Response`], [`OutputItem`], [`ContentPart`], [`ResponseUsage`]
//! - **Stream events**: [`ResponseStreamEvent`], the ordered output protocol
//! - **Logging**: `tracing` subscriber setup shared by binaries

#![deny(unsafe_code)]

pub mod chunk;
pub mod constants;
pub mod events;
pub mod logging;
pub mod response;

pub use chunk::{
    ChatCompletionChunk, ChunkChoice, ChunkDelta, CompletionTokensDetails, CompletionUsage,
    FunctionDelta, PromptTokensDetails, ThinkingBlock, ToolCallDelta,
};
pub use constants::FAKE_RESPONSES_ID;
pub use events::ResponseStreamEvent;
pub use response::{
    ContentPart, FunctionToolCall, InputTokensDetails, ItemStatus, OutputItem, OutputMessage,
    OutputTokensDetails, Response, ResponseStatus, ResponseUsage,
};
