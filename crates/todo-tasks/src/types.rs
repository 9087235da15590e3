//! Core types for the to-do store.
//!
//! Serializable types use `camelCase` so a UI layer can hand them straight
//! to a view. `priority` and `due_date` are free text and never parsed.

use serde::{Deserialize, Serialize};

/// Completion state of a task, stored as an integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Still open (code 0).
    #[default]
    Active,
    /// Done (code 1).
    Completed,
}

impl TaskStatus {
    /// Integer code written to the `status` column.
    #[must_use]
    pub fn as_code(self) -> i64 {
        match self {
            Self::Active => 0,
            Self::Completed => 1,
        }
    }

    /// Map a stored code back to a status.
    ///
    /// Only `0` is active. Any other code counts as completed so every row
    /// lands in exactly one of the two views. The raw code is not kept: the
    /// next update of such a row writes `1`.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            Self::Active
        } else {
            Self::Completed
        }
    }

    /// Whether `code` is one the store writes itself.
    #[must_use]
    pub fn is_known_code(code: i64) -> bool {
        code == 0 || code == 1
    }

    /// The other status.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Completed,
            Self::Completed => Self::Active,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

/// A persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identity. `0` means not yet persisted.
    pub id: i64,
    /// Label shown in lists.
    pub name: String,
    /// Free-text priority (e.g. "Hoch", "Mittel", "Niedrig").
    pub priority: String,
    /// Free-text due date, kept verbatim.
    pub due_date: String,
    /// Free-text notes.
    pub description: String,
    /// Completion state.
    pub status: TaskStatus,
}

impl Task {
    /// Whether this record has a store-assigned id.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Copy of this task with a different status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// User input for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    /// Label shown in lists.
    pub name: String,
    /// Free-text priority.
    pub priority: String,
    /// Free-text due date.
    pub due_date: String,
    /// Free-text notes.
    pub description: String,
}

impl TaskDraft {
    /// Draft with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the priority label.
    #[must_use]
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Set the due date text.
    #[must_use]
    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Unpersisted, active task built from this draft.
    #[must_use]
    pub fn into_task(self) -> Task {
        Task {
            id: 0,
            name: self.name,
            priority: self.priority,
            due_date: self.due_date,
            description: self.description,
            status: TaskStatus::Active,
        }
    }
}

/// Tasks split into the active and completed views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPartition {
    /// Tasks with [`TaskStatus::Active`].
    pub active: Vec<Task>,
    /// Tasks with [`TaskStatus::Completed`].
    pub completed: Vec<Task>,
}

impl TaskPartition {
    /// Split `tasks` by status, keeping their relative order.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let (active, completed) = tasks
            .into_iter()
            .partition(|t| t.status == TaskStatus::Active);
        Self { active, completed }
    }

    /// Total number of tasks in both views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    /// Whether both views are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}
