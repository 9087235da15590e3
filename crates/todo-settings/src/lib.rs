//! # todo-settings
//!
//! Configuration management with layered sources for the to-do store.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TodoSettings::default()`]
//! 2. **User file**: `~/.todo/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TODO_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, deep_merge, load_settings, load_settings_from_path,
    settings_dir, settings_path,
};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton, initialized on first access.
static SETTINGS: OnceLock<TodoSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.todo/settings.json` with env var
/// overrides. If loading fails, the failure is logged and compiled defaults
/// are used.
pub fn get_settings() -> &'static TodoSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            TodoSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: TodoSettings) -> std::result::Result<(), TodoSettings> {
    SETTINGS.set(settings)
}
