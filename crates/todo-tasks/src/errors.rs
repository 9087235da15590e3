//! Task error types.
//!
//! Two layers:
//!
//! - [`StorageError`]: the database rejected or could not run a statement.
//!   Returned by every [`TaskStore`](crate::TaskStore) operation.
//! - [`ServiceError`]: a storage or validation failure wrapped with the
//!   action the user attempted. Cloneable so it can be fanned out to
//!   notification subscribers.
//!
//! A missing row is not an error at either layer: update and delete report
//! it as zero affected rows.

use thiserror::Error;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// `SQLite` rejected or failed to execute a statement.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Filesystem failure while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for storage results.
pub type Result<T> = std::result::Result<T, StorageError>;

/// The user-level action a [`ServiceError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Loading the task list.
    Load,
    /// Saving a new task.
    Create,
    /// Saving changes to an existing task.
    Update,
    /// Removing a task.
    Delete,
}

impl TaskAction {
    /// Short human-readable description used in notices.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Load => "load tasks",
            Self::Create => "save task",
            Self::Update => "update task",
            Self::Delete => "delete task",
        }
    }
}

impl std::fmt::Display for TaskAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Caller-facing failure of a task operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The storage layer failed.
    #[error("Failed to {action}: {message}")]
    Storage {
        /// What the user was doing.
        action: TaskAction,
        /// Rendered [`StorageError`].
        message: String,
    },

    /// The record was rejected before reaching storage.
    #[error("Failed to {action}: {reason}")]
    Invalid {
        /// What the user was doing.
        action: TaskAction,
        /// Which rule was violated.
        reason: String,
    },

    /// The background worker running the operation panicked or was cancelled.
    #[error("Failed to {action}: worker stopped: {message}")]
    Worker {
        /// What the user was doing.
        action: TaskAction,
        /// Join error detail.
        message: String,
    },
}

impl ServiceError {
    /// Wrap a storage failure.
    pub fn storage(action: TaskAction, err: &StorageError) -> Self {
        Self::Storage {
            action,
            message: err.to_string(),
        }
    }

    /// Build a validation failure.
    pub fn invalid(action: TaskAction, reason: impl Into<String>) -> Self {
        Self::Invalid {
            action,
            reason: reason.into(),
        }
    }

    /// The action that failed.
    #[must_use]
    pub fn action(&self) -> TaskAction {
        match self {
            Self::Storage { action, .. }
            | Self::Invalid { action, .. }
            | Self::Worker { action, .. } => *action,
        }
    }
}
