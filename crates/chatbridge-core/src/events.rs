//! Stream events emitted while a response is being built.
//!
//! [`ResponseStreamEvent`] is the only observable output of the translator.
//! Every variant carries a `sequence_number`; numbers start at 0 and increase
//! by one per event for the life of a stream. Events are never retracted.

use serde::{Deserialize, Serialize};

use crate::response::{ContentPart, OutputItem, Response};

/// Events emitted during response streaming, tagged by their wire `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseStreamEvent {
    /// Stream started. Always the first event.
    #[serde(rename = "response.created")]
    Created {
        /// Response shell.
        response: Response,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Reasoning fragment. No open/close framing.
    #[serde(rename = "thinking.delta")]
    ReasoningDelta {
        /// Reasoning text fragment.
        delta: String,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Output item added (message placeholder, or a complete function call).
    #[serde(rename = "response.output_item.added")]
    OutputItemAdded {
        /// The item.
        item: OutputItem,
        /// Index in `response.output`.
        output_index: usize,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Content part opened at a slot.
    #[serde(rename = "response.content_part.added")]
    ContentPartAdded {
        /// Slot within the message.
        content_index: usize,
        /// Owning item id.
        item_id: String,
        /// Index in `response.output`.
        output_index: usize,
        /// Empty part.
        part: ContentPart,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Text fragment.
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta {
        /// Slot within the message.
        content_index: usize,
        /// Text fragment.
        delta: String,
        /// Owning item id.
        item_id: String,
        /// Index in `response.output`.
        output_index: usize,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Refusal fragment.
    #[serde(rename = "response.refusal.delta")]
    RefusalDelta {
        /// Slot within the message.
        content_index: usize,
        /// Refusal fragment.
        delta: String,
        /// Owning item id.
        item_id: String,
        /// Index in `response.output`.
        output_index: usize,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Content part closed with its final value.
    #[serde(rename = "response.content_part.done")]
    ContentPartDone {
        /// Slot within the message.
        content_index: usize,
        /// Owning item id.
        item_id: String,
        /// Index in `response.output`.
        output_index: usize,
        /// Final part.
        part: ContentPart,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Function call arguments. Carries the whole arguments string.
    #[serde(rename = "response.function_call_arguments.delta")]
    FunctionCallArgumentsDelta {
        /// Arguments text.
        delta: String,
        /// Owning item id.
        item_id: String,
        /// Index in `response.output`.
        output_index: usize,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Output item finished.
    #[serde(rename = "response.output_item.done")]
    OutputItemDone {
        /// Final item.
        item: OutputItem,
        /// Index in `response.output`.
        output_index: usize,
        /// Position in the stream.
        sequence_number: u64,
    },

    /// Stream finished. Always the last event.
    #[serde(rename = "response.completed")]
    Completed {
        /// Aggregated response.
        response: Response,
        /// Position in the stream.
        sequence_number: u64,
    },
}

impl ResponseStreamEvent {
    /// Position of this event in the stream.
    pub fn sequence_number(&self) -> u64 {
        match self {
            Self::Created {
                sequence_number, ..
            }
            | Self::ReasoningDelta {
                sequence_number, ..
            }
            | Self::OutputItemAdded {
                sequence_number, ..
            }
            | Self::ContentPartAdded {
                sequence_number, ..
            }
            | Self::OutputTextDelta {
                sequence_number, ..
            }
            | Self::RefusalDelta {
                sequence_number, ..
            }
            | Self::ContentPartDone {
                sequence_number, ..
            }
            | Self::FunctionCallArgumentsDelta {
                sequence_number, ..
            }
            | Self::OutputItemDone {
                sequence_number, ..
            }
            | Self::Completed {
                sequence_number, ..
            } => *sequence_number,
        }
    }

    /// Wire `type` of this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "response.created",
            Self::ReasoningDelta { .. } => "thinking.delta",
            Self::OutputItemAdded { .. } => "response.output_item.added",
            Self::ContentPartAdded { .. } => "response.content_part.added",
            Self::OutputTextDelta { .. } => "response.output_text.delta",
            Self::RefusalDelta { .. } => "response.refusal.delta",
            Self::ContentPartDone { .. } => "response.content_part.done",
            Self::FunctionCallArgumentsDelta { .. } => "response.function_call_arguments.delta",
            Self::OutputItemDone { .. } => "response.output_item.done",
            Self::Completed { .. } => "response.completed",
        }
    }

    /// Whether this is the terminal `response.completed` event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{FunctionToolCall, ItemStatus, OutputMessage};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn text_delta(seq: u64) -> ResponseStreamEvent {
        ResponseStreamEvent::OutputTextDelta {
            content_index: 0,
            delta: "Hel".into(),
            item_id: "__fake_id__".into(),
            output_index: 0,
            sequence_number: seq,
        }
    }

    #[test]
    fn serializes_with_wire_type() {
        let v = serde_json::to_value(text_delta(3)).unwrap();
        assert_eq!(
            v,
            json!({
                "type": "response.output_text.delta",
                "content_index": 0,
                "delta": "Hel",
                "item_id": "__fake_id__",
                "output_index": 0,
                "sequence_number": 3
            })
        );
    }

    #[test]
    fn event_type_matches_serialized_tag() {
        let events = vec![
            ResponseStreamEvent::Created {
                response: Response::in_progress("r", "m", 0),
                sequence_number: 0,
            },
            ResponseStreamEvent::ReasoningDelta {
                delta: "hmm".into(),
                sequence_number: 1,
            },
            ResponseStreamEvent::OutputItemAdded {
                item: OutputItem::Message(OutputMessage::assistant(
                    "id",
                    ItemStatus::InProgress,
                    vec![],
                )),
                output_index: 0,
                sequence_number: 2,
            },
            ResponseStreamEvent::ContentPartAdded {
                content_index: 0,
                item_id: "id".into(),
                output_index: 0,
                part: ContentPart::refusal(""),
                sequence_number: 3,
            },
            text_delta(4),
            ResponseStreamEvent::RefusalDelta {
                content_index: 1,
                delta: "no".into(),
                item_id: "id".into(),
                output_index: 0,
                sequence_number: 5,
            },
            ResponseStreamEvent::ContentPartDone {
                content_index: 0,
                item_id: "id".into(),
                output_index: 0,
                part: ContentPart::text("Hel"),
                sequence_number: 6,
            },
            ResponseStreamEvent::FunctionCallArgumentsDelta {
                delta: "{}".into(),
                item_id: "id".into(),
                output_index: 1,
                sequence_number: 7,
            },
            ResponseStreamEvent::OutputItemDone {
                item: OutputItem::FunctionCall(FunctionToolCall::default()),
                output_index: 1,
                sequence_number: 8,
            },
            ResponseStreamEvent::Completed {
                response: Response::in_progress("r", "m", 0),
                sequence_number: 9,
            },
        ];

        for (i, event) in events.iter().enumerate() {
            let v = serde_json::to_value(event).unwrap();
            assert_eq!(v["type"], event.event_type());
            assert_eq!(event.sequence_number(), i as u64);
        }
        assert!(events.last().unwrap().is_terminal());
        assert!(!events[0].is_terminal());
    }

    #[test]
    fn deserializes_from_wire() {
        let event: ResponseStreamEvent = serde_json::from_value(json!({
            "type": "thinking.delta",
            "delta": "step 1",
            "sequence_number": 7
        }))
        .unwrap();
        assert_matches!(
            event,
            ResponseStreamEvent::ReasoningDelta { ref delta, sequence_number: 7 } if delta == "step 1"
        );
    }
}
