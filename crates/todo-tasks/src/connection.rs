//! `SQLite` connection pool.
//!
//! Uses `r2d2` connection pooling with the `r2d2_sqlite` backend. Every
//! store operation checks a connection out and hands it back when the
//! guard drops, on success and error paths alike. The [`PragmaCustomizer`]
//! runs on each new connection.

use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use todo_settings::DatabaseSettings;

use crate::errors::Result;

/// Alias for the connection pool type.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Alias for a pooled connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Configuration for the connection pool.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Maximum pool size (default: 4).
    pub pool_size: u32,
    /// Busy timeout in milliseconds (default: 5000).
    pub busy_timeout_ms: u32,
    /// How long `get` waits for a free connection (default: 5s).
    pub connection_timeout: Duration,
    /// Open the database read-only.
    pub read_only: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            busy_timeout_ms: 5_000,
            connection_timeout: Duration::from_secs(5),
            read_only: false,
        }
    }
}

impl From<&DatabaseSettings> for ConnectionConfig {
    fn from(settings: &DatabaseSettings) -> Self {
        Self {
            pool_size: settings.pool_size.max(1),
            busy_timeout_ms: settings.busy_timeout_ms,
            connection_timeout: Duration::from_millis(settings.connection_timeout_ms),
            read_only: false,
        }
    }
}

/// `SQLite` pragma customizer that runs on each new connection.
#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
    read_only: bool,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(&format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms))?;
        // journal mode changes are writes
        if !self.read_only {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;\
                 PRAGMA synchronous = NORMAL;",
            )?;
        }
        Ok(())
    }
}

fn open_flags(read_only: bool) -> OpenFlags {
    if read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
    } else {
        OpenFlags::default()
    }
}

/// Create a file-backed connection pool, creating the parent directory
/// when it is missing.
pub fn new_file(path: &Path, config: &ConnectionConfig) -> Result<ConnectionPool> {
    if !config.read_only {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    let manager = SqliteConnectionManager::file(path).with_flags(open_flags(config.read_only));
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connection_timeout)
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
            read_only: config.read_only,
        }))
        .build(manager)?;
    Ok(pool)
}

/// Create an in-memory connection pool (for testing).
///
/// Each in-memory connection is its own database, so the pool is pinned
/// to a single connection that is never recycled.
pub fn new_in_memory(config: &ConnectionConfig) -> Result<ConnectionPool> {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder()
        .max_size(1)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_timeout(config.connection_timeout)
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
            read_only: false,
        }))
        .build(manager)?;
    Ok(pool)
}

/// Read back the journal mode of a connection.
pub fn journal_mode(conn: &Connection) -> Result<String> {
    let mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_pool_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("todos.db");
        let pool = new_file(&path, &ConnectionConfig::default()).unwrap();
        let conn = pool.get().unwrap();
        assert_eq!(journal_mode(&conn).unwrap(), "wal");
        assert!(path.exists());
    }

    #[test]
    fn in_memory_pool_keeps_one_database() {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute_batch("CREATE TABLE scratch (x INTEGER);").unwrap();
        }
        let conn = pool.get().unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM scratch", [], |row| row.get(0))
            .unwrap();
        assert_eq!(n, 0);
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn config_from_settings() {
        let settings = DatabaseSettings {
            pool_size: 0,
            busy_timeout_ms: 250,
            connection_timeout_ms: 1_500,
            ..Default::default()
        };
        let config = ConnectionConfig::from(&settings);
        assert_eq!(config.pool_size, 1);
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.connection_timeout, Duration::from_millis(1_500));
        assert!(!config.read_only);
    }

    #[test]
    fn read_only_pool_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        let writable = new_file(&path, &ConnectionConfig::default()).unwrap();
        writable
            .get()
            .unwrap()
            .execute_batch("CREATE TABLE scratch (x INTEGER);")
            .unwrap();

        let config = ConnectionConfig {
            read_only: true,
            ..Default::default()
        };
        let read_only = new_file(&path, &config).unwrap();
        let conn = read_only.get().unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM scratch", [], |row| row.get(0))
            .unwrap();
        assert_eq!(n, 0);
        assert!(conn.execute("INSERT INTO scratch (x) VALUES (1)", []).is_err());
    }
}
