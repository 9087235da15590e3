//! SQL DDL for the to-do table.
//!
//! One table, one entity. There is no versioned migration chain: the
//! schema is created once and [`run_migrations`] is a no-op afterwards.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::errors::Result;

/// Name of the table holding every task.
pub const TODOS_TABLE: &str = "todos";

/// Create the task table.
///
/// Idempotent, safe to call on every startup (uses `IF NOT EXISTS`).
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let existed = table_exists(conn, TODOS_TABLE)?;
    conn.execute_batch(TODOS_SCHEMA)?;
    if !existed {
        info!(table = TODOS_TABLE, "created table");
    }
    Ok(())
}

/// Whether a table with the given name exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// DDL for the task table. `end_time` holds the free-text due date.
const TODOS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    priority TEXT,
    end_time TEXT,
    description TEXT,
    status INTEGER
);
";
