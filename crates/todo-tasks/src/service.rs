//! Business logic layer for task management.
//!
//! [`TaskService`] is the only surface a UI is meant to call. It wraps
//! [`TaskStore`] with record validation and uniform failure reporting:
//!
//! - `try_*` methods return `Result<_, ServiceError>` for callers that want
//!   to branch on the failure.
//! - The plain methods (`create`, `update`, `delete`, `list_all`) never fail.
//!   They return `false` or an empty list, log the error, and publish one
//!   [`ServiceError`] to every [`subscribe`](TaskService::subscribe)r.
//!
//! Update and delete of an unknown id return `false` without reporting
//! anything; a missing row is not a failure.

use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::errors::{ServiceError, TaskAction};
use crate::repository::TaskStore;
use crate::types::{Task, TaskDraft};

/// Buffered notices per subscriber before the oldest are dropped.
pub const NOTICE_CAPACITY: usize = 32;

/// Task service with validation and error reporting.
#[derive(Debug)]
pub struct TaskService {
    store: TaskStore,
    notices: broadcast::Sender<ServiceError>,
}

impl TaskService {
    /// Build a service over `store`.
    pub fn new(store: TaskStore) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { store, notices }
    }

    /// The underlying store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Receive every [`ServiceError`] reported from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceError> {
        self.notices.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Result-returning operations
    // ─────────────────────────────────────────────────────────────────────

    /// Persist a new active task built from `draft`. Returns the stored task.
    pub fn try_create(&self, draft: &TaskDraft) -> Result<Task, ServiceError> {
        validate_name(TaskAction::Create, &draft.name)?;

        let mut task = draft.clone().into_task();
        let id = self
            .store
            .insert(&task)
            .map_err(|e| ServiceError::storage(TaskAction::Create, &e))?;
        if id <= 0 {
            return Err(ServiceError::Storage {
                action: TaskAction::Create,
                message: format!("store returned invalid row id {id}"),
            });
        }
        task.id = id;
        debug!(task_id = id, "task created");
        Ok(task)
    }

    /// Overwrite the stored record with `task.id`. `Ok(false)` when no such
    /// row exists.
    pub fn try_update(&self, task: &Task) -> Result<bool, ServiceError> {
        validate_name(TaskAction::Update, &task.name)?;

        let changed = self
            .store
            .update(task.id, task)
            .map_err(|e| ServiceError::storage(TaskAction::Update, &e))?;
        Ok(changed > 0)
    }

    /// Remove the task with `id`. `Ok(false)` when no such row exists.
    pub fn try_delete(&self, id: i64) -> Result<bool, ServiceError> {
        let changed = self
            .store
            .delete(id)
            .map_err(|e| ServiceError::storage(TaskAction::Delete, &e))?;
        Ok(changed > 0)
    }

    /// Every task, ordered by id ascending.
    pub fn try_list_all(&self) -> Result<Vec<Task>, ServiceError> {
        self.store
            .select_all()
            .map_err(|e| ServiceError::storage(TaskAction::Load, &e))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reporting operations
    // ─────────────────────────────────────────────────────────────────────

    /// Create a task from `draft`. `true` iff a row was written.
    pub fn create(&self, draft: &TaskDraft) -> bool {
        match self.try_create(draft) {
            Ok(_) => true,
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    /// Save `task` over its stored row. `true` iff a row changed.
    pub fn update(&self, task: &Task) -> bool {
        self.try_update(task).unwrap_or_else(|e| {
            self.report(e);
            false
        })
    }

    /// Delete the task with `id`. `true` iff a row was removed.
    pub fn delete(&self, id: i64) -> bool {
        self.try_delete(id).unwrap_or_else(|e| {
            self.report(e);
            false
        })
    }

    /// Every task, or an empty list if loading failed.
    pub fn list_all(&self) -> Vec<Task> {
        self.try_list_all().unwrap_or_else(|e| {
            self.report(e);
            Vec::new()
        })
    }

    /// Log `err` and publish it to subscribers.
    pub(crate) fn report(&self, err: ServiceError) {
        error!(action = %err.action(), error = %err, "task operation failed");
        // no subscribers is fine
        let _ = self.notices.send(err);
    }
}

fn validate_name(action: TaskAction, name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::invalid(action, "name must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tokio::sync::broadcast::error::TryRecvError;
    use todo_core::logging::capture_logs;
    use tracing::Level;

    use super::*;
    use crate::types::TaskStatus;

    fn setup_service() -> TaskService {
        TaskService::new(TaskStore::in_memory().unwrap())
    }

    fn milk() -> TaskDraft {
        TaskDraft::new("Buy milk")
            .priority("Hoch")
            .due_date("2025-01-31")
            .description("2%")
    }

    #[test]
    fn test_create_returns_true_and_persists() {
        let service = setup_service();
        assert!(service.create(&milk()));

        let tasks = service.list_all();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Buy milk");
        assert_eq!(tasks[0].status, TaskStatus::Active);
    }

    #[test]
    fn test_try_create_returns_stored_task() {
        let service = setup_service();
        let task = service.try_create(&milk()).unwrap();
        assert!(task.is_persisted());
        assert_eq!(service.store().get(task.id).unwrap(), Some(task));
    }

    #[test]
    fn test_create_blank_name_rejected() {
        let service = setup_service();
        let mut rx = service.subscribe();

        assert!(!service.create(&TaskDraft::new("   ")));
        assert!(service.list_all().is_empty());
        assert_matches!(
            rx.try_recv(),
            Ok(ServiceError::Invalid { action: TaskAction::Create, .. })
        );
    }

    #[test]
    fn test_update_existing() {
        let service = setup_service();
        let task = service.try_create(&milk()).unwrap();

        assert!(service.update(&task.clone().with_status(TaskStatus::Completed)));
        assert_eq!(service.list_all()[0].status, TaskStatus::Completed);
    }

    #[test]
    fn test_update_missing_id_is_silent_false() {
        let service = setup_service();
        let mut rx = service.subscribe();
        let _ = service.try_create(&milk()).unwrap();
        let before = service.list_all();

        let ghost = Task {
            id: 99_999,
            ..milk().into_task()
        };
        assert!(!service.update(&ghost));
        assert_eq!(service.list_all(), before);
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_update_unpersisted_task_is_false() {
        let service = setup_service();
        let _ = service.try_create(&milk()).unwrap();
        assert!(!service.update(&milk().into_task()));
    }

    #[test]
    fn test_update_blank_name_rejected() {
        let service = setup_service();
        let mut task = service.try_create(&milk()).unwrap();
        task.name = String::new();

        assert_matches!(
            service.try_update(&task),
            Err(ServiceError::Invalid { action: TaskAction::Update, .. })
        );
        assert_eq!(service.list_all()[0].name, "Buy milk");
    }

    #[test]
    fn test_delete_existing_and_missing() {
        let service = setup_service();
        let mut rx = service.subscribe();
        let task = service.try_create(&milk()).unwrap();

        assert!(!service.delete(99_999));
        assert_eq!(service.list_all().len(), 1);
        assert!(service.delete(task.id));
        assert!(service.list_all().is_empty());
        assert!(!service.delete(task.id));
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_list_all_empty_is_not_failure() {
        let service = setup_service();
        let mut rx = service.subscribe();
        assert!(service.list_all().is_empty());
        assert!(service.try_list_all().unwrap().is_empty());
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_storage_failure_reported_once() {
        let service = setup_service();
        service
            .store()
            .conn_for_tests()
            .execute_batch("DROP TABLE todos")
            .unwrap();
        let mut rx = service.subscribe();
        let (logs, _guard) = capture_logs();

        assert!(service.list_all().is_empty());

        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.action(), TaskAction::Load);
        assert!(notice.to_string().starts_with("Failed to load tasks"));
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(logs.count_at_level(Level::ERROR), 1);
    }

    #[test]
    fn test_report_without_subscribers_does_not_panic() {
        let service = setup_service();
        service
            .store()
            .conn_for_tests()
            .execute_batch("DROP TABLE todos")
            .unwrap();
        assert!(!service.create(&milk()));
        assert!(!service.delete(1));
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TaskService>();
    }
}
