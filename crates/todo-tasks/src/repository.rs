//! SQL data access layer for tasks.
//!
//! [`TaskStore`] owns the connection pool and translates between [`Task`]
//! and rows of the `todos` table. Every method checks out its own
//! connection and runs a single statement; nothing is held across calls and
//! no transaction spans two operations.

use std::path::Path;

use rusqlite::{OptionalExtension, params};
use todo_settings::DatabaseSettings;
use tracing::{debug, info, warn};

use crate::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::errors::Result;
use crate::migrations;
use crate::types::{Task, TaskStatus};

const SELECT_COLUMNS: &str = "SELECT id, name, priority, end_time, description, status FROM todos";

/// Task store for SQL CRUD operations.
#[derive(Clone, Debug)]
pub struct TaskStore {
    pool: ConnectionPool,
}

impl TaskStore {
    /// Wrap an existing pool. The schema is not touched.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Open (or create) a database file and make sure the table exists.
    pub fn open(path: &Path, config: &ConnectionConfig) -> Result<Self> {
        let store = Self::new(connection::new_file(path, config)?);
        store.initialize_schema()?;
        let mode = connection::journal_mode(&*store.conn()?)?;
        info!(path = %path.display(), journal_mode = %mode, "task store opened");
        Ok(store)
    }

    /// Open the database named by the process-wide settings
    /// ([`todo_settings::get_settings`]), resolving relative paths against
    /// the settings directory.
    pub fn open_default() -> Result<Self> {
        Self::from_settings(
            &todo_settings::get_settings().database,
            &todo_settings::settings_dir(),
        )
    }

    /// Open the database described by `settings`, resolving relative paths
    /// against `base_dir`.
    pub fn from_settings(settings: &DatabaseSettings, base_dir: &Path) -> Result<Self> {
        Self::open(
            &settings.resolve_path(base_dir),
            &ConnectionConfig::from(settings),
        )
    }

    /// Open a private in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let store = Self::new(connection::new_in_memory(&ConnectionConfig::default())?);
        store.initialize_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> PooledConnection {
        self.pool.get().unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Schema
    // ─────────────────────────────────────────────────────────────────────

    /// Ensure the `todos` table exists. Safe to call on every startup.
    pub fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        migrations::run_migrations(&conn)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Task CRUD
    // ─────────────────────────────────────────────────────────────────────

    /// Insert a new row. The record's `id` is ignored; returns the id the
    /// database assigned.
    pub fn insert(&self, record: &Task) -> Result<i64> {
        let conn = self.conn()?;
        let _ = conn.execute(
            "INSERT INTO todos (name, priority, end_time, description, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.name,
                record.priority,
                record.due_date,
                record.description,
                record.status.as_code(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(task_id = id, name = %record.name, "insert result");
        Ok(id)
    }

    /// Overwrite every field of the row with `id`. Returns the number of
    /// rows changed (0 when no row matched).
    pub fn update(&self, id: i64, record: &Task) -> Result<usize> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE todos
             SET name = ?1, priority = ?2, end_time = ?3, description = ?4, status = ?5
             WHERE id = ?6",
            params![
                record.name,
                record.priority,
                record.due_date,
                record.description,
                record.status.as_code(),
                id,
            ],
        )?;
        debug!(task_id = id, changed, "update result");
        Ok(changed)
    }

    /// Delete the row with `id`. Returns the number of rows removed.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        debug!(task_id = id, changed, "delete result");
        Ok(changed)
    }

    /// Get a single task by id.
    pub fn get(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Every task, ordered by id ascending.
    pub fn select_all(&self) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = tasks.len(), "select all result");
        Ok(tasks)
    }

    /// Tasks in one view, ordered by id ascending.
    ///
    /// Any non-zero status code belongs to the completed view, matching
    /// [`TaskStatus::from_code`].
    pub fn select_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let condition = match status {
            TaskStatus::Active => "COALESCE(status, 0) = 0",
            TaskStatus::Completed => "COALESCE(status, 0) != 0",
        };
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE {condition} ORDER BY id"))?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Number of rows in the table.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?;
        Ok(u64::try_from(n).unwrap_or_default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row converters
// ─────────────────────────────────────────────────────────────────────────────

/// Columns may be NULL when a row was written outside this store.
fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let id: i64 = row.get("id")?;
    let code: Option<i64> = row.get("status")?;
    let code = code.unwrap_or_default();
    if !TaskStatus::is_known_code(code) {
        warn!(task_id = id, code, "unexpected status code, treating as completed");
    }

    Ok(Task {
        id,
        name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
        priority: row.get::<_, Option<String>>("priority")?.unwrap_or_default(),
        due_date: row.get::<_, Option<String>>("end_time")?.unwrap_or_default(),
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        status: TaskStatus::from_code(code),
    })
}
