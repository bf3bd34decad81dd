//! # Chunk translator
//!
//! Event builders shared by the translator loop and the finalizer.
//!
//! Each method produces at most one [`ResponseStreamEvent`] and stamps it with
//! the next sequence number, so the caller decides exactly when an event
//! exists. [`crate::pipeline::translate_stream`] calls them one at a time
//! between `yield`s; nothing is queued.
//!
//! Event order per stream:
//! - first chunk → `response.created`
//! - reasoning fragment → `thinking.delta`
//! - first text/refusal byte → `response.output_item.added` (message) +
//!   `response.content_part.added`
//! - text/refusal fragment → `response.output_text.delta` / `response.refusal.delta`
//! - end of input → `response.content_part.done` per opened channel, then per
//!   tool call `response.output_item.added` + `response.function_call_arguments.delta`
//!   + `response.output_item.done`, then `response.output_item.done` (message),
//!   then `response.completed`

use chatbridge_core::FAKE_RESPONSES_ID;
use chatbridge_core::chunk::{ChatCompletionChunk, ToolCallDelta};
use chatbridge_core::events::ResponseStreamEvent;
use chatbridge_core::response::{
    ContentPart, ItemStatus, OutputItem, OutputMessage, Response, ResponseUsage,
};
use tracing::trace;

use crate::sequence::SequenceNumber;
use crate::state::{Channel, StreamState};

/// Output index of the assistant message item.
const MESSAGE_OUTPUT_INDEX: usize = 0;

/// Translator configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Id stamped on every item and part created mid-stream.
    pub item_id: String,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            item_id: FAKE_RESPONSES_ID.to_string(),
        }
    }
}

impl TranslatorOptions {
    /// Options with a custom placeholder item id.
    #[must_use]
    pub fn with_item_id(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
        }
    }
}

/// State and counter for one stream, plus the response shell it fills in.
#[derive(Debug)]
pub(crate) struct ChunkTranslator {
    response: Response,
    options: TranslatorOptions,
    state: StreamState,
    sequence: SequenceNumber,
}

impl ChunkTranslator {
    pub(crate) fn new(response: Response, options: TranslatorOptions) -> Self {
        Self {
            response,
            options,
            state: StreamState::new(),
            sequence: SequenceNumber::new(),
        }
    }

    pub(crate) fn state(&self) -> &StreamState {
        &self.state
    }

    pub(crate) fn events_emitted(&self) -> u64 {
        self.sequence.issued()
    }

    // ── Translator loop ─────────────────────────────────────────────

    /// `response.created` on the first call, `None` afterwards.
    pub(crate) fn start(&mut self) -> Option<ResponseStreamEvent> {
        if self.state.started {
            return None;
        }
        self.state.started = true;
        Some(ResponseStreamEvent::Created {
            response: self.response.clone(),
            sequence_number: self.sequence.next(),
        })
    }

    pub(crate) fn capture_usage(&mut self, chunk: &ChatCompletionChunk) {
        self.state.capture_usage(chunk.usage.as_ref());
    }

    pub(crate) fn reasoning_delta(&mut self, delta: &str) -> ResponseStreamEvent {
        ResponseStreamEvent::ReasoningDelta {
            delta: delta.to_string(),
            sequence_number: self.sequence.next(),
        }
    }

    /// Claim a slot for `channel`. `true` means the caller must now emit the
    /// open framing ([`Self::message_added`], [`Self::part_added`]).
    pub(crate) fn open(&mut self, channel: Channel) -> bool {
        let opened = self.state.open(channel);
        if opened {
            trace!(?channel, slot = ?self.state.slot(channel).map(|s| s.index), "channel opened");
        }
        opened
    }

    /// Placeholder message item, in progress and empty.
    pub(crate) fn message_added(&mut self) -> ResponseStreamEvent {
        ResponseStreamEvent::OutputItemAdded {
            item: OutputItem::Message(OutputMessage::assistant(
                self.options.item_id.clone(),
                ItemStatus::InProgress,
                Vec::new(),
            )),
            output_index: MESSAGE_OUTPUT_INDEX,
            sequence_number: self.sequence.next(),
        }
    }

    /// Empty `output_text` part at `channel`'s slot.
    ///
    /// Refusals open with a text placeholder too; the part only takes the
    /// refusal kind in `response.content_part.done`.
    pub(crate) fn part_added(&mut self, channel: Channel) -> ResponseStreamEvent {
        ResponseStreamEvent::ContentPartAdded {
            content_index: self.slot_index(channel),
            item_id: self.options.item_id.clone(),
            output_index: MESSAGE_OUTPUT_INDEX,
            part: ContentPart::text(""),
            sequence_number: self.sequence.next(),
        }
    }

    /// Delta event for an opened `channel`; the fragment is accumulated.
    pub(crate) fn content_delta(&mut self, channel: Channel, fragment: &str) -> ResponseStreamEvent {
        let content_index = self.state.append(channel, fragment).unwrap_or_default();
        let delta = fragment.to_string();
        let item_id = self.options.item_id.clone();
        let sequence_number = self.sequence.next();
        match channel {
            Channel::Text => ResponseStreamEvent::OutputTextDelta {
                content_index,
                delta,
                item_id,
                output_index: MESSAGE_OUTPUT_INDEX,
                sequence_number,
            },
            Channel::Refusal => ResponseStreamEvent::RefusalDelta {
                content_index,
                delta,
                item_id,
                output_index: MESSAGE_OUTPUT_INDEX,
                sequence_number,
            },
        }
    }

    /// Fold tool call fragments in. Emits nothing.
    pub(crate) fn accumulate_tool_calls(&mut self, deltas: &[ToolCallDelta]) {
        for delta in deltas {
            if self.state.accumulate_tool_call(delta, &self.options.item_id) {
                trace!(index = delta.index, "tool call accumulator created");
            }
        }
    }

    // ── Finalizer ───────────────────────────────────────────────────

    /// `response.content_part.done` if `channel` was opened.
    pub(crate) fn part_done(&mut self, channel: Channel) -> Option<ResponseStreamEvent> {
        let slot = self.state.slot(channel)?;
        let content_index = slot.index;
        let part = channel.part(slot.text.clone());
        Some(ResponseStreamEvent::ContentPartDone {
            content_index,
            item_id: self.options.item_id.clone(),
            output_index: MESSAGE_OUTPUT_INDEX,
            part,
            sequence_number: self.sequence.next(),
        })
    }

    /// Output index shared by every tool call item: the number of closed
    /// channels, so tool calls land after the message.
    pub(crate) fn tool_call_output_index(&self) -> usize {
        self.state.opened_channels()
    }

    pub(crate) fn tool_call_count(&self) -> usize {
        self.state.tool_calls.len()
    }

    /// `response.output_item.added` for the tool call at `position`
    /// (first-seen order).
    pub(crate) fn tool_call_added(
        &mut self,
        position: usize,
        output_index: usize,
    ) -> Option<ResponseStreamEvent> {
        let item = self.tool_call_item(position)?;
        Some(ResponseStreamEvent::OutputItemAdded {
            item,
            output_index,
            sequence_number: self.sequence.next(),
        })
    }

    /// Whole accumulated arguments in one `response.function_call_arguments.delta`.
    pub(crate) fn tool_call_arguments(
        &mut self,
        position: usize,
        output_index: usize,
    ) -> Option<ResponseStreamEvent> {
        let (_, acc) = self.state.tool_calls.get_index(position)?;
        let delta = acc.arguments.clone();
        let item_id = acc.item_id.clone();
        Some(ResponseStreamEvent::FunctionCallArgumentsDelta {
            delta,
            item_id,
            output_index,
            sequence_number: self.sequence.next(),
        })
    }

    /// `response.output_item.done` for the tool call at `position`.
    pub(crate) fn tool_call_done(
        &mut self,
        position: usize,
        output_index: usize,
    ) -> Option<ResponseStreamEvent> {
        let item = self.tool_call_item(position)?;
        Some(ResponseStreamEvent::OutputItemDone {
            item,
            output_index,
            sequence_number: self.sequence.next(),
        })
    }

    /// `response.output_item.done` for the message, if one was opened.
    pub(crate) fn message_done(&mut self) -> Option<ResponseStreamEvent> {
        let message = self.final_message()?;
        Some(ResponseStreamEvent::OutputItemDone {
            item: message,
            output_index: MESSAGE_OUTPUT_INDEX,
            sequence_number: self.sequence.next(),
        })
    }

    /// Terminal `response.completed` carrying the aggregated response.
    pub(crate) fn completed(&mut self) -> ResponseStreamEvent {
        let response = self.final_response();
        ResponseStreamEvent::Completed {
            response,
            sequence_number: self.sequence.next(),
        }
    }

    /// Response shell with aggregated output and translated usage.
    ///
    /// Output is the message (if any) followed by the tool calls in first-seen
    /// order. Every other shell field is left as supplied.
    pub(crate) fn final_response(&self) -> Response {
        let mut output: Vec<OutputItem> = Vec::with_capacity(1 + self.state.tool_calls.len());
        output.extend(self.final_message());
        output.extend(
            self.state
                .tool_calls
                .values()
                .map(|acc| OutputItem::FunctionCall(acc.to_item())),
        );

        let mut response = self.response.clone();
        response.output = output;
        response.usage = self.state.usage.as_ref().map(ResponseUsage::from);
        response
    }

    fn final_message(&self) -> Option<OutputItem> {
        if !self.state.has_message() {
            return None;
        }
        Some(OutputItem::Message(OutputMessage::assistant(
            self.options.item_id.clone(),
            ItemStatus::Completed,
            self.state.message_parts(),
        )))
    }

    fn tool_call_item(&self, position: usize) -> Option<OutputItem> {
        let (_, acc) = self.state.tool_calls.get_index(position)?;
        Some(OutputItem::FunctionCall(acc.to_item()))
    }

    fn slot_index(&self, channel: Channel) -> usize {
        self.state.slot(channel).map_or(0, |slot| slot.index)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
