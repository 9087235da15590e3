//! Local database settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where the task database lives and how connections to it are managed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Database file. Relative paths resolve against the settings directory.
    pub path: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
    /// How long a caller waits for a pooled connection, in milliseconds.
    pub connection_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "todos.db".to_string(),
            pool_size: 4,
            busy_timeout_ms: 5_000,
            connection_timeout_ms: 5_000,
        }
    }
}

impl DatabaseSettings {
    /// Resolve [`Self::path`] against `base` unless it is already absolute.
    pub fn resolve_path(&self, base: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_joins_base() {
        let settings = DatabaseSettings::default();
        let resolved = settings.resolve_path(Path::new("/home/me/.todo"));
        assert_eq!(resolved, PathBuf::from("/home/me/.todo/todos.db"));
    }

    #[test]
    fn absolute_path_kept() {
        let settings = DatabaseSettings {
            path: "/var/lib/todo/data.db".to_string(),
            ..Default::default()
        };
        let resolved = settings.resolve_path(Path::new("/home/me/.todo"));
        assert_eq!(resolved, PathBuf::from("/var/lib/todo/data.db"));
    }
}
