//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a settings file may contain any subset of fields. Each type implements
//! [`Default`] with production values.

mod database;
mod logging;

pub use database::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// Loaded from `~/.todo/settings.json` with defaults applied for
/// missing fields. Environment variables can override specific values.
///
/// ```json
/// {
///   "database": { "path": "todos.db", "poolSize": 2 },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoSettings {
    /// Settings schema version.
    pub version: String,
    /// Local database settings.
    pub database: DatabaseSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for TodoSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            database: DatabaseSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl TodoSettings {
    /// Reject values the store cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.database.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "database.poolSize must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
