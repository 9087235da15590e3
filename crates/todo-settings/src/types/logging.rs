//! Logging settings.

use serde::{Deserialize, Serialize};

/// Log filter and output format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive (`RUST_LOG` still wins when set).
    pub level: String,
    /// Emit JSON lines instead of the compact text format.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}
