//! Settings error types.

use thiserror::Error;

/// Failure loading or validating chatbridge settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid JSON for [`BridgeSettings`](crate::BridgeSettings).
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A required string setting is empty or whitespace.
    #[error("invalid settings value: {key} must not be empty")]
    EmptyValue {
        /// Dotted camelCase path of the setting, as written in the file.
        key: &'static str,
    },
}

impl SettingsError {
    /// Dotted key of the offending setting, for value errors.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::EmptyValue { key } => Some(*key),
            Self::Io(_) | Self::Json(_) => None,
        }
    }
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
