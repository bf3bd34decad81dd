//! Input fragments: `chat.completion.chunk` payloads.
//!
//! Every field is optional on the wire. Missing fields deserialize to their
//! empty form and unknown fields are ignored, so any chunk a compatible
//! backend sends can be fed to the translator as-is.

use serde::{Deserialize, Serialize};

/// One streamed `chat.completion.chunk`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Upstream completion id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Upstream object tag (`chat.completion.chunk`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Unix timestamp of the upstream completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Model that produced the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Choices. Only the first one is ever looked at.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Token usage, usually only on the final chunk. A missing key and
    /// `null` both mean no usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,
}

impl ChatCompletionChunk {
    /// Chunk whose first choice carries `delta`.
    #[must_use]
    pub fn from_delta(delta: ChunkDelta) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: Some(delta),
                ..ChunkChoice::default()
            }],
            ..Self::default()
        }
    }

    /// Choice-less chunk that only reports usage.
    #[must_use]
    pub fn from_usage(usage: CompletionUsage) -> Self {
        Self {
            usage: Some(usage),
            ..Self::default()
        }
    }

    /// Delta of the first choice, if both exist.
    pub fn first_delta(&self) -> Option<&ChunkDelta> {
        self.choices.first()?.delta.as_ref()
    }
}

/// One entry of [`ChatCompletionChunk::choices`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    /// Choice index.
    #[serde(default)]
    pub index: u32,
    /// Incremental content for this choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<ChunkDelta>,
    /// Why generation stopped, on the last content chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Incremental content carried by one choice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    /// Author role, typically only on the first chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Refusal fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
    /// Reasoning fragment sent as a flat string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    /// Reasoning fragments sent as blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_blocks: Option<Vec<ThinkingBlock>>,
    /// Tool call fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

impl ChunkDelta {
    /// Non-empty text fragment.
    pub fn text(&self) -> Option<&str> {
        non_empty(self.content.as_deref())
    }

    /// Non-empty refusal fragment.
    pub fn refusal_text(&self) -> Option<&str> {
        non_empty(self.refusal.as_deref())
    }

    /// Reasoning fragment for this delta.
    ///
    /// `reasoning_content` wins when non-empty. Otherwise the first block with
    /// non-empty thinking text is used and the rest are ignored, so a backend
    /// that sends both forms never produces duplicates.
    pub fn reasoning_text(&self) -> Option<&str> {
        if let Some(text) = non_empty(self.reasoning_content.as_deref()) {
            return Some(text);
        }
        self.thinking_blocks
            .as_deref()?
            .iter()
            .find_map(ThinkingBlock::content)
    }

    /// Tool call fragments, empty when absent.
    pub fn tool_call_deltas(&self) -> &[ToolCallDelta] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

/// One reasoning block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThinkingBlock {
    /// Reasoning text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    /// Reasoning text under the alternate key some backends use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Provider signature for the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl ThinkingBlock {
    /// Non-empty reasoning text, `thinking` first.
    pub fn content(&self) -> Option<&str> {
        non_empty(self.thinking.as_deref()).or_else(|| non_empty(self.text.as_deref()))
    }
}

/// Fragment of one tool call, addressed by position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Position of the call within the reply. Not guaranteed contiguous.
    pub index: u32,
    /// Call id fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Call type (`function`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    /// Function name and arguments fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionDelta>,
}

impl ToolCallDelta {
    /// Name fragment, `""` when absent.
    pub fn name_fragment(&self) -> &str {
        self.function
            .as_ref()
            .and_then(|f| f.name.as_deref())
            .unwrap_or_default()
    }

    /// Arguments fragment, `""` when absent.
    pub fn arguments_fragment(&self) -> &str {
        self.function
            .as_ref()
            .and_then(|f| f.arguments.as_deref())
            .unwrap_or_default()
    }

    /// Call id fragment, `""` when absent.
    pub fn id_fragment(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Function part of a [`ToolCallDelta`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDelta {
    /// Name fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Arguments JSON fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// Token usage in Chat Completions shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionUsage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Total tokens.
    #[serde(default)]
    pub total_tokens: u64,
    /// Prompt breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    /// Completion breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

/// Prompt-side usage breakdown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTokensDetails {
    /// Tokens served from the prompt cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,
}

/// Completion-side usage breakdown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTokensDetails {
    /// Tokens spent on reasoning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(value: serde_json::Value) -> ChatCompletionChunk {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn deserializes_openai_chunk() {
        let c = chunk(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "created": 1_700_000_000,
            "model": "gpt-4o",
            "choices": [{"index": 0, "delta": {"role": "assistant", "content": "Hi"}, "finish_reason": null}]
        }));
        assert_eq!(c.first_delta().and_then(ChunkDelta::text), Some("Hi"));
        assert!(c.usage.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let c = chunk(json!({
            "system_fingerprint": "fp_1",
            "choices": [{"delta": {"content": "x", "audio": {"id": "a"}}, "logprobs": null}]
        }));
        assert_eq!(c.first_delta().and_then(ChunkDelta::text), Some("x"));
    }

    #[test]
    fn missing_choices_and_delta_are_absent() {
        assert!(chunk(json!({})).first_delta().is_none());
        assert!(chunk(json!({"choices": [{"index": 0}]})).first_delta().is_none());
    }

    #[test]
    fn missing_and_null_usage_are_both_none() {
        assert!(chunk(json!({})).usage.is_none());
        assert!(chunk(json!({"usage": null})).usage.is_none());
        let c = chunk(json!({"usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}}));
        let usage = c.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 3);
        assert!(usage.prompt_tokens_details.is_none());
    }

    #[test]
    fn usage_key_omitted_when_none() {
        let value = serde_json::to_value(ChatCompletionChunk::default()).unwrap();
        assert!(value.get("usage").is_none());
    }

    #[test]
    fn empty_text_and_refusal_count_as_absent() {
        let delta = ChunkDelta {
            content: Some(String::new()),
            refusal: Some(String::new()),
            ..Default::default()
        };
        assert!(delta.text().is_none());
        assert!(delta.refusal_text().is_none());
    }

    #[test]
    fn reasoning_prefers_direct_field() {
        let delta: ChunkDelta = serde_json::from_value(json!({
            "reasoning_content": "direct",
            "thinking_blocks": [{"thinking": "block"}]
        }))
        .unwrap();
        assert_eq!(delta.reasoning_text(), Some("direct"));
    }

    #[test]
    fn reasoning_falls_back_to_first_non_empty_block() {
        let delta: ChunkDelta = serde_json::from_value(json!({
            "reasoning_content": "",
            "thinking_blocks": [{"signature": "sig"}, {"thinking": ""}, {"thinking": "second"}, {"text": "third"}]
        }))
        .unwrap();
        assert_eq!(delta.reasoning_text(), Some("second"));
    }

    #[test]
    fn thinking_block_accepts_text_key() {
        let delta: ChunkDelta =
            serde_json::from_value(json!({"thinking_blocks": [{"text": "alternate"}]})).unwrap();
        assert_eq!(delta.reasoning_text(), Some("alternate"));
    }

    #[test]
    fn thinking_block_with_both_keys_prefers_thinking() {
        let delta: ChunkDelta = serde_json::from_value(json!({
            "thinking_blocks": [{"type": "thinking", "thinking": "primary", "text": "secondary"}]
        }))
        .unwrap();
        assert_eq!(delta.reasoning_text(), Some("primary"));

        let block = ThinkingBlock {
            thinking: Some(String::new()),
            text: Some("secondary".into()),
            signature: None,
        };
        assert_eq!(block.content(), Some("secondary"));
    }

    #[test]
    fn tool_call_fragments_default_to_empty() {
        let tc: ToolCallDelta = serde_json::from_value(json!({"index": 2})).unwrap();
        assert_eq!(tc.name_fragment(), "");
        assert_eq!(tc.arguments_fragment(), "");
        assert_eq!(tc.id_fragment(), "");

        let tc: ToolCallDelta = serde_json::from_value(json!({
            "index": 0, "id": "call_1", "type": "function",
            "function": {"name": "get_weather", "arguments": "{\"c"}
        }))
        .unwrap();
        assert_eq!(tc.name_fragment(), "get_weather");
        assert_eq!(tc.arguments_fragment(), "{\"c");
        assert_eq!(tc.id_fragment(), "call_1");
    }

    #[test]
    fn tool_call_deltas_empty_when_absent() {
        assert!(ChunkDelta::default().tool_call_deltas().is_empty());
    }
}
