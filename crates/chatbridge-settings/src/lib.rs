//! # chatbridge-settings
//!
//! Configuration for the chatbridge translator and its command-line harness.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`BridgeSettings::default()`]
//! 2. **User file** — `~/.chatbridge/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `CHATBRIDGE_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
