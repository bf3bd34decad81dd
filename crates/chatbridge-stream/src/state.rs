//! Accumulation state for one translated stream.
//!
//! Owned exclusively by the translator for the lifetime of a stream and
//! dropped with it. Nothing here emits events; it only records what has been
//! opened and what has been accumulated so far.

use chatbridge_core::chunk::{ChunkDelta, CompletionUsage, ToolCallDelta};
use chatbridge_core::response::{ContentPart, FunctionToolCall};
use indexmap::IndexMap;

/// A message content channel that owns a content slot.
///
/// Reasoning is not a `Channel`; it has no slot, framing, or accumulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Visible text.
    Text,
    /// Declined answer.
    Refusal,
}

impl Channel {
    /// Both channels, in the order the finalizer closes them.
    pub const ALL: [Self; 2] = [Self::Text, Self::Refusal];

    /// Non-empty fragment of this channel in `delta`.
    pub fn fragment(self, delta: &ChunkDelta) -> Option<&str> {
        match self {
            Self::Text => delta.text(),
            Self::Refusal => delta.refusal_text(),
        }
    }

    /// Content part of this channel's kind holding `value`.
    pub fn part(self, value: impl Into<String>) -> ContentPart {
        match self {
            Self::Text => ContentPart::text(value),
            Self::Refusal => ContentPart::refusal(value),
        }
    }
}

/// Slot claimed by an opened channel and the text accumulated in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentSlot {
    /// `content_index` within the message item.
    pub index: usize,
    /// Everything received on the channel so far.
    pub text: String,
}

/// A tool call being assembled from fragments sharing one index.
///
/// Name, arguments and call id all grow by plain concatenation. For the call
/// id this means an id repeated across fragments is repeated in the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolCallAccumulator {
    /// Placeholder item id.
    pub item_id: String,
    /// Function name so far.
    pub name: String,
    /// Arguments JSON text so far.
    pub arguments: String,
    /// Call id so far.
    pub call_id: String,
}

impl ToolCallAccumulator {
    /// Append one fragment.
    pub fn push(&mut self, delta: &ToolCallDelta) {
        self.name.push_str(delta.name_fragment());
        self.arguments.push_str(delta.arguments_fragment());
        self.call_id.push_str(delta.id_fragment());
    }

    /// Snapshot as a function call item.
    pub fn to_item(&self) -> FunctionToolCall {
        FunctionToolCall {
            id: self.item_id.clone(),
            call_id: self.call_id.clone(),
            name: self.name.clone(),
            arguments: self.arguments.clone(),
            status: None,
        }
    }
}

/// Everything the translator has learned about the stream so far.
#[derive(Clone, Debug, Default)]
pub struct StreamState {
    /// Whether the first chunk has been seen.
    pub started: bool,
    /// Text channel, once opened.
    pub text: Option<ContentSlot>,
    /// Refusal channel, once opened.
    pub refusal: Option<ContentSlot>,
    /// Tool calls keyed by chunk-provided index, in first-seen order.
    pub tool_calls: IndexMap<u32, ToolCallAccumulator>,
    /// Usage of the most recent chunk.
    pub usage: Option<CompletionUsage>,
}

impl StreamState {
    /// Fresh state for a stream that has not started.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot of `channel`, if opened.
    pub fn slot(&self, channel: Channel) -> Option<&ContentSlot> {
        match channel {
            Channel::Text => self.text.as_ref(),
            Channel::Refusal => self.refusal.as_ref(),
        }
    }

    fn slot_entry(&mut self, channel: Channel) -> &mut Option<ContentSlot> {
        match channel {
            Channel::Text => &mut self.text,
            Channel::Refusal => &mut self.refusal,
        }
    }

    /// Number of opened channels (0, 1 or 2).
    pub fn opened_channels(&self) -> usize {
        usize::from(self.text.is_some()) + usize::from(self.refusal.is_some())
    }

    /// Whether any channel has been opened, i.e. a message item exists.
    pub fn has_message(&self) -> bool {
        self.opened_channels() > 0
    }

    /// Open `channel` if it is not open yet.
    ///
    /// The first channel to open claims slot 0, the second slot 1. Returns
    /// `true` only on the call that opened it.
    pub fn open(&mut self, channel: Channel) -> bool {
        if self.slot(channel).is_some() {
            return false;
        }
        let index = self.opened_channels();
        *self.slot_entry(channel) = Some(ContentSlot {
            index,
            text: String::new(),
        });
        true
    }

    /// Append `fragment` to an opened channel and return its slot index.
    ///
    /// Returns `None` if the channel was never opened.
    pub fn append(&mut self, channel: Channel, fragment: &str) -> Option<usize> {
        let slot = self.slot_entry(channel).as_mut()?;
        slot.text.push_str(fragment);
        Some(slot.index)
    }

    /// Record a chunk's usage. Every chunk overwrites, so a chunk without
    /// usage clears an earlier report.
    pub fn capture_usage(&mut self, usage: Option<&CompletionUsage>) {
        self.usage = usage.cloned();
    }

    /// Fold one tool call fragment into its accumulator.
    ///
    /// Returns `true` when the fragment created a new accumulator.
    pub fn accumulate_tool_call(&mut self, delta: &ToolCallDelta, item_id: &str) -> bool {
        let created = !self.tool_calls.contains_key(&delta.index);
        self.tool_calls
            .entry(delta.index)
            .or_insert_with(|| ToolCallAccumulator {
                item_id: item_id.to_string(),
                ..ToolCallAccumulator::default()
            })
            .push(delta);
        created
    }

    /// Final parts of the opened channels, slot 0 first.
    pub fn message_parts(&self) -> Vec<ContentPart> {
        let mut slots: Vec<(usize, ContentPart)> = Channel::ALL
            .into_iter()
            .filter_map(|channel| {
                self.slot(channel)
                    .map(|slot| (slot.index, channel.part(slot.text.clone())))
            })
            .collect();
        slots.sort_by_key(|(index, _)| *index);
        slots.into_iter().map(|(_, part)| part).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use chatbridge_core::chunk::FunctionDelta;

    fn tool_delta(index: u32, id: Option<&str>, name: Option<&str>, args: Option<&str>) -> ToolCallDelta {
        ToolCallDelta {
            index,
            id: id.map(Into::into),
            call_type: None,
            function: Some(FunctionDelta {
                name: name.map(Into::into),
                arguments: args.map(Into::into),
            }),
        }
    }

    // ── slots ──────────────────────────────────────────────────────

    #[test]
    fn initial_state_is_empty() {
        let state = StreamState::new();
        assert!(!state.started);
        assert!(state.text.is_none());
        assert!(state.refusal.is_none());
        assert!(state.tool_calls.is_empty());
        assert!(state.usage.is_none());
        assert!(!state.has_message());
    }

    #[test]
    fn first_opened_channel_claims_slot_zero() {
        let mut state = StreamState::new();
        assert!(state.open(Channel::Refusal));
        assert!(state.open(Channel::Text));
        assert_eq!(state.slot(Channel::Refusal).unwrap().index, 0);
        assert_eq!(state.slot(Channel::Text).unwrap().index, 1);
        assert_eq!(state.opened_channels(), 2);
    }

    #[test]
    fn open_is_idempotent() {
        let mut state = StreamState::new();
        assert!(state.open(Channel::Text));
        assert!(!state.open(Channel::Text));
        assert_eq!(state.slot(Channel::Text).unwrap().index, 0);
        assert_eq!(state.opened_channels(), 1);
    }

    #[test]
    fn append_requires_open_channel() {
        let mut state = StreamState::new();
        assert_eq!(state.append(Channel::Text, "x"), None);
        state.open(Channel::Text);
        assert_eq!(state.append(Channel::Text, "Hel"), Some(0));
        assert_eq!(state.append(Channel::Text, "lo"), Some(0));
        assert_eq!(state.slot(Channel::Text).unwrap().text, "Hello");
    }

    #[test]
    fn message_parts_follow_slot_order() {
        let mut state = StreamState::new();
        state.open(Channel::Refusal);
        state.append(Channel::Refusal, "no");
        state.open(Channel::Text);
        state.append(Channel::Text, "well");
        assert_eq!(
            state.message_parts(),
            vec![ContentPart::refusal("no"), ContentPart::text("well")]
        );
    }

    // ── usage ──────────────────────────────────────────────────────

    #[test]
    fn usage_follows_latest_chunk() {
        let mut state = StreamState::new();
        let usage = CompletionUsage {
            prompt_tokens: 3,
            completion_tokens: 2,
            total_tokens: 5,
            ..Default::default()
        };
        state.capture_usage(Some(&usage));
        assert_eq!(state.usage.as_ref(), Some(&usage));
        state.capture_usage(None);
        assert!(state.usage.is_none());
    }

    // ── tool calls ─────────────────────────────────────────────────

    #[test]
    fn tool_call_fragments_concatenate() {
        let mut state = StreamState::new();
        assert!(state.accumulate_tool_call(
            &tool_delta(0, Some("call_1"), Some("get_weather"), Some("{\"c")),
            "__fake_id__"
        ));
        assert!(!state.accumulate_tool_call(
            &tool_delta(0, None, None, Some("ity\":\"SF\"}")),
            "__fake_id__"
        ));
        let acc = &state.tool_calls[&0];
        assert_eq!(acc.name, "get_weather");
        assert_eq!(acc.arguments, "{\"city\":\"SF\"}");
        assert_eq!(acc.call_id, "call_1");
        assert_eq!(acc.item_id, "__fake_id__");
    }

    #[test]
    fn call_id_fragments_concatenate_too() {
        let mut state = StreamState::new();
        state.accumulate_tool_call(&tool_delta(0, Some("call_"), None, None), "id");
        state.accumulate_tool_call(&tool_delta(0, Some("abc"), None, None), "id");
        assert_eq!(state.tool_calls[&0].call_id, "call_abc");
    }

    #[test]
    fn tool_calls_keep_first_seen_order() {
        let mut state = StreamState::new();
        for index in [5, 1, 5, 3] {
            state.accumulate_tool_call(&tool_delta(index, None, Some("f"), None), "id");
        }
        let order: Vec<u32> = state.tool_calls.keys().copied().collect();
        assert_eq!(order, vec![5, 1, 3]);
        assert_eq!(state.tool_calls[&5].name, "ff");
    }

    #[test]
    fn tool_call_without_function_contributes_nothing() {
        let mut state = StreamState::new();
        let delta = ToolCallDelta {
            index: 0,
            ..Default::default()
        };
        assert!(state.accumulate_tool_call(&delta, "id"));
        assert_eq!(state.tool_calls[&0], ToolCallAccumulator {
            item_id: "id".into(),
            ..Default::default()
        });
    }

    #[test]
    fn accumulator_snapshot() {
        let acc = ToolCallAccumulator {
            item_id: "id".into(),
            name: "f".into(),
            arguments: "{}".into(),
            call_id: "call_1".into(),
        };
        let item = acc.to_item();
        assert_eq!(item.id, "id");
        assert_eq!(item.call_id, "call_1");
        assert_eq!(item.name, "f");
        assert_eq!(item.arguments, "{}");
        assert!(item.status.is_none());
    }
}
