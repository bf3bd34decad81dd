//! Response snapshot types (Responses API shape).
//!
//! [`Response`] is both the shell announced in `response.created` and the
//! aggregated snapshot carried by `response.completed`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chunk::CompletionUsage;
use crate::constants::{ASSISTANT_ROLE, RESPONSE_OBJECT};

// ─────────────────────────────────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────────────────────────────────

/// A response object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response id.
    pub id: String,
    /// Always `"response"`.
    pub object: String,
    /// Unix timestamp (seconds).
    pub created_at: i64,
    /// Model name.
    pub model: String,
    /// Lifecycle status.
    pub status: ResponseStatus,
    /// Output items in output-index order.
    #[serde(default)]
    pub output: Vec<OutputItem>,
    /// Token usage, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResponseUsage>,
}

impl Response {
    /// Empty in-progress shell for a stream that is about to start.
    #[must_use]
    pub fn in_progress(id: impl Into<String>, model: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            object: RESPONSE_OBJECT.to_string(),
            created_at,
            model: model.into(),
            status: ResponseStatus::InProgress,
            output: Vec::new(),
            usage: None,
        }
    }
}

/// Response lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Still streaming.
    InProgress,
    /// Finished normally.
    Completed,
    /// Stopped early.
    Incomplete,
    /// Failed.
    Failed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Output items
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of [`Response::output`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputItem {
    /// Assistant message with text and/or refusal parts.
    #[serde(rename = "message")]
    Message(OutputMessage),
    /// Function tool call.
    #[serde(rename = "function_call")]
    FunctionCall(FunctionToolCall),
}

/// Item lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Still streaming.
    InProgress,
    /// Finished.
    Completed,
    /// Cut short.
    Incomplete,
}

/// Assistant message item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputMessage {
    /// Item id.
    pub id: String,
    /// Always `"assistant"` for items built here.
    pub role: String,
    /// Item status.
    pub status: ItemStatus,
    /// Content parts in slot order.
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

impl OutputMessage {
    /// Assistant message with the given parts.
    #[must_use]
    pub fn assistant(id: impl Into<String>, status: ItemStatus, content: Vec<ContentPart>) -> Self {
        Self {
            id: id.into(),
            role: ASSISTANT_ROLE.to_string(),
            status,
            content,
        }
    }
}

/// Function tool call item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionToolCall {
    /// Item id.
    pub id: String,
    /// Call id the tool result must reference.
    pub call_id: String,
    /// Function name.
    pub name: String,
    /// Arguments JSON text, unvalidated.
    pub arguments: String,
    /// Item status, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

/// One part of an [`OutputMessage`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// Visible text.
    #[serde(rename = "output_text")]
    OutputText {
        /// Text.
        text: String,
        /// Annotations (citations etc.).
        #[serde(default)]
        annotations: Vec<Value>,
    },
    /// Declined answer.
    #[serde(rename = "refusal")]
    Refusal {
        /// Refusal text.
        refusal: String,
    },
}

impl ContentPart {
    /// Text part without annotations.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::OutputText {
            text: text.into(),
            annotations: Vec::new(),
        }
    }

    /// Refusal part.
    #[must_use]
    pub fn refusal(refusal: impl Into<String>) -> Self {
        Self::Refusal {
            refusal: refusal.into(),
        }
    }

    /// Text or refusal string of the part.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OutputText { text, .. } => text,
            Self::Refusal { refusal } => refusal,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────────────────────────────────────

/// Token usage in Responses shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseUsage {
    /// Prompt tokens.
    pub input_tokens: u64,
    /// Completion tokens.
    pub output_tokens: u64,
    /// Total tokens.
    pub total_tokens: u64,
    /// Prompt breakdown.
    pub input_tokens_details: InputTokensDetails,
    /// Completion breakdown.
    pub output_tokens_details: OutputTokensDetails,
}

/// Prompt-side breakdown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokensDetails {
    /// Cached prompt tokens.
    pub cached_tokens: u64,
}

/// Completion-side breakdown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTokensDetails {
    /// Reasoning tokens.
    pub reasoning_tokens: u64,
}

impl From<&CompletionUsage> for ResponseUsage {
    /// Field-for-field mapping; missing sub-counts become zero.
    fn from(usage: &CompletionUsage) -> Self {
        let cached_tokens = usage
            .prompt_tokens_details
            .as_ref()
            .and_then(|d| d.cached_tokens)
            .unwrap_or(0);
        let reasoning_tokens = usage
            .completion_tokens_details
            .as_ref()
            .and_then(|d| d.reasoning_tokens)
            .unwrap_or(0);
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            input_tokens_details: InputTokensDetails { cached_tokens },
            output_tokens_details: OutputTokensDetails { reasoning_tokens },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
