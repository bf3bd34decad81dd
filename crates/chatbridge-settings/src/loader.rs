//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`BridgeSettings::default()`]
//! 2. If `~/.chatbridge/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `CHATBRIDGE_*` environment overrides
//! 4. Validate

use std::path::{Path, PathBuf};

use chatbridge_core::logging::LogFormat;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{BridgeSettings, OutputFormat};

/// Resolve the path to the settings file (`~/.chatbridge/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".chatbridge").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<BridgeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<BridgeSettings> {
    let defaults = serde_json::to_value(BridgeSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: BridgeSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// Objects merge per key, arrays and primitives are replaced, and nulls in
/// `source` leave `target` untouched.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = match target_map.remove(&key) {
                    Some(target_val) => deep_merge(target_val, source_val),
                    None => source_val,
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `CHATBRIDGE_*` overrides. Unparseable values are logged and skipped.
pub fn apply_env_overrides(settings: &mut BridgeSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary lookup (env vars in production).
fn apply_overrides<F>(settings: &mut BridgeSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("CHATBRIDGE_PLACEHOLDER_ID") {
        settings.stream.placeholder_item_id = v;
    }
    if let Some(v) = read("CHATBRIDGE_MODEL") {
        settings.response.model = v;
    }
    if let Some(v) = read("CHATBRIDGE_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read("CHATBRIDGE_LOG_FORMAT") {
        match LogFormat::parse(&v) {
            Some(format) => settings.logging.format = format,
            None => warn!(key = "CHATBRIDGE_LOG_FORMAT", value = %v, "invalid log format env var, ignoring"),
        }
    }
    if let Some(v) = read("CHATBRIDGE_OUTPUT_FORMAT") {
        match OutputFormat::parse(&v) {
            Some(format) => settings.output.format = format,
            None => warn!(key = "CHATBRIDGE_OUTPUT_FORMAT", value = %v, "invalid output format env var, ignoring"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
