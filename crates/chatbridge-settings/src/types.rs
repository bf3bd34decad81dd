//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a partial JSON file only needs the keys it overrides.

use chatbridge_core::FAKE_RESPONSES_ID;
use chatbridge_core::logging::LogFormat;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "stream": { "placeholderItemId": "__fake_id__" },
///   "response": { "model": "gpt-4o" },
///   "logging": { "level": "debug", "format": "json" },
///   "output": { "format": "sse" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeSettings {
    /// Translator settings.
    pub stream: StreamSettings,
    /// Response shell settings.
    pub response: ResponseSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Output framing of the command-line harness.
    pub output: OutputSettings,
}

impl BridgeSettings {
    /// Reject values the translator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.stream.placeholder_item_id.trim().is_empty() {
            return Err(SettingsError::EmptyValue {
                key: "stream.placeholderItemId",
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(SettingsError::EmptyValue {
                key: "logging.level",
            });
        }
        Ok(())
    }
}

/// Translator settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamSettings {
    /// Id stamped on every item and part created mid-stream.
    pub placeholder_item_id: String,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            placeholder_item_id: FAKE_RESPONSES_ID.to_string(),
        }
    }
}

/// Response shell settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseSettings {
    /// Model name reported in the response shell.
    pub model: String,
}

impl Default for ResponseSettings {
    fn default() -> Self {
        Self {
            model: "unknown".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive (`warn`, `chatbridge_stream=debug`, ...).
    pub level: String,
    /// Stderr format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Output framing settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    /// How events are written.
    pub format: OutputFormat,
}

/// How stream events are framed on output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Ndjson,
    /// `event:` / `data:` frames.
    Sse,
}

impl OutputFormat {
    /// Parse a format name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            "sse" => Some(Self::Sse),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
