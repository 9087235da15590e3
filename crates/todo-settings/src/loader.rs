//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TodoSettings::default()`]
//! 2. If `~/.todo/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `TODO_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::TodoSettings;

/// Overrides `database.path`.
pub const ENV_DB_PATH: &str = "TODO_DB_PATH";
/// Overrides `database.poolSize` (1..=64).
pub const ENV_DB_POOL_SIZE: &str = "TODO_DB_POOL_SIZE";
/// Overrides `database.busyTimeoutMs` (0..=600000).
pub const ENV_DB_BUSY_TIMEOUT_MS: &str = "TODO_DB_BUSY_TIMEOUT_MS";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "TODO_LOG_LEVEL";
/// Overrides `logging.json`.
pub const ENV_LOG_JSON: &str = "TODO_LOG_JSON";

/// Resolve the settings directory (`~/.todo`).
pub fn settings_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".todo")
}

/// Resolve the path to the settings file (`~/.todo/settings.json`).
pub fn settings_path() -> PathBuf {
    settings_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TodoSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON or out-of-range values, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TodoSettings> {
    let defaults = serde_json::to_value(TodoSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: TodoSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut TodoSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are treated as unset. Values that fail to parse or fall
/// outside their range are ignored with a warning.
pub fn apply_overrides<F>(settings: &mut TodoSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read(ENV_DB_PATH) {
        settings.database.path = v;
    }
    if let Some(v) = read(ENV_DB_POOL_SIZE) {
        match parse_u32_range(&v, 1, 64) {
            Some(n) => settings.database.pool_size = n,
            None => warn!(key = ENV_DB_POOL_SIZE, value = %v, "invalid u32 env var, ignoring"),
        }
    }
    if let Some(v) = read(ENV_DB_BUSY_TIMEOUT_MS) {
        match parse_u32_range(&v, 0, 600_000) {
            Some(n) => settings.database.busy_timeout_ms = n,
            None => {
                warn!(key = ENV_DB_BUSY_TIMEOUT_MS, value = %v, "invalid u32 env var, ignoring");
            }
        }
    }
    if let Some(v) = read(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
    if let Some(v) = read(ENV_LOG_JSON) {
        match parse_bool(&v) {
            Some(b) => settings.logging.json = b,
            None => warn!(key = ENV_LOG_JSON, value = %v, "invalid boolean env var, ignoring"),
        }
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u32` within an inclusive range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}
