//! Headless view model for a single-screen to-do list.
//!
//! [`Dashboard`] keeps the last snapshot returned by the service and the
//! two views derived from it. Data flows one way: a mutation goes to the
//! service, and only a successful mutation triggers a fresh `list_all`.
//! The snapshot is never patched locally.
//!
//! Failures leave a single pending notice (the newest wins) that the UI
//! shows once and then takes.

use std::sync::Arc;

use tracing::debug;

use crate::errors::ServiceError;
use crate::service::TaskService;
use crate::types::{Task, TaskDraft, TaskPartition, TaskStatus};

/// Cached task list plus the active/completed views.
#[derive(Debug)]
pub struct Dashboard {
    service: Arc<TaskService>,
    views: TaskPartition,
    notice: Option<String>,
}

impl Dashboard {
    /// Empty dashboard. Call [`refresh`](Self::refresh) to load.
    pub fn new(service: Arc<TaskService>) -> Self {
        Self {
            service,
            views: TaskPartition::default(),
            notice: None,
        }
    }

    /// Replace the snapshot with the store's current contents.
    ///
    /// On failure the previous snapshot is kept and a notice is set.
    pub fn refresh(&mut self) -> bool {
        match self.service.try_list_all() {
            Ok(tasks) => {
                self.views = TaskPartition::from_tasks(tasks);
                debug!(
                    active = self.views.active.len(),
                    completed = self.views.completed.len(),
                    "dashboard refreshed"
                );
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Tasks with status active.
    pub fn active(&self) -> &[Task] {
        &self.views.active
    }

    /// Tasks with status completed.
    pub fn completed(&self) -> &[Task] {
        &self.views.completed
    }

    /// Total number of tasks in the snapshot.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Find a task in the snapshot.
    pub fn find(&self, id: i64) -> Option<&Task> {
        self.views
            .active
            .iter()
            .chain(&self.views.completed)
            .find(|t| t.id == id)
    }

    /// Save a new task.
    pub fn add(&mut self, draft: &TaskDraft) -> bool {
        let result = self.service.try_create(draft).map(|_| true);
        self.settle(result)
    }

    /// Save changes to an existing task.
    pub fn edit(&mut self, task: &Task) -> bool {
        let result = self.service.try_update(task);
        self.settle(result)
    }

    /// Mark a task in the snapshot as completed.
    pub fn complete(&mut self, id: i64) -> bool {
        self.set_status(id, TaskStatus::Completed)
    }

    /// Move a completed task back to the active view.
    pub fn reopen(&mut self, id: i64) -> bool {
        self.set_status(id, TaskStatus::Active)
    }

    /// Flip a task between the active and completed views.
    pub fn toggle(&mut self, id: i64) -> bool {
        let Some(status) = self.find(id).map(|t| t.status.toggled()) else {
            return false;
        };
        self.set_status(id, status)
    }

    /// Delete a task.
    pub fn remove(&mut self, id: i64) -> bool {
        let result = self.service.try_delete(id);
        self.settle(result)
    }

    /// The pending notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Take the pending notice, clearing it.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn set_status(&mut self, id: i64, status: TaskStatus) -> bool {
        let Some(task) = self.find(id).cloned() else {
            return false;
        };
        if task.status == status {
            return true;
        }
        self.edit(&task.with_status(status))
    }

    fn settle(&mut self, result: Result<bool, ServiceError>) -> bool {
        match result {
            Ok(true) => {
                let _ = self.refresh();
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    fn fail(&mut self, err: ServiceError) {
        self.notice = Some(err.to_string());
        self.service.report(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::TaskStore;

    fn setup() -> Dashboard {
        let service = TaskService::new(TaskStore::in_memory().unwrap());
        let mut dashboard = Dashboard::new(Arc::new(service));
        assert!(dashboard.refresh());
        dashboard
    }

    #[test]
    fn add_refreshes_snapshot() {
        let mut dashboard = setup();
        assert!(dashboard.is_empty());

        assert!(dashboard.add(&TaskDraft::new("Buy milk").priority("Hoch")));
        assert_eq!(dashboard.active().len(), 1);
        assert!(dashboard.completed().is_empty());
        assert_eq!(dashboard.active()[0].priority, "Hoch");
    }

    #[test]
    fn complete_and_reopen_move_between_views() {
        let mut dashboard = setup();
        assert!(dashboard.add(&TaskDraft::new("a")));
        assert!(dashboard.add(&TaskDraft::new("b")));
        let id = dashboard.active()[0].id;

        assert!(dashboard.complete(id));
        assert_eq!(dashboard.active().len(), 1);
        assert_eq!(dashboard.completed()[0].id, id);

        assert!(dashboard.reopen(id));
        assert_eq!(dashboard.active().len(), 2);
        assert!(dashboard.completed().is_empty());
    }

    #[test]
    fn toggle_flips_status_both_ways() {
        let mut dashboard = setup();
        assert!(dashboard.add(&TaskDraft::new("flip me")));
        let id = dashboard.active()[0].id;

        assert!(dashboard.toggle(id));
        assert_eq!(dashboard.find(id).unwrap().status, TaskStatus::Completed);
        assert!(dashboard.toggle(id));
        assert_eq!(dashboard.find(id).unwrap().status, TaskStatus::Active);
        assert!(!dashboard.toggle(404));
    }

    #[test]
    fn complete_unknown_id_is_false() {
        let mut dashboard = setup();
        assert!(!dashboard.complete(404));
        assert!(dashboard.notice().is_none());
    }

    #[test]
    fn remove_refreshes_snapshot() {
        let mut dashboard = setup();
        assert!(dashboard.add(&TaskDraft::new("gone soon")));
        let id = dashboard.active()[0].id;

        assert!(dashboard.remove(id));
        assert!(dashboard.is_empty());
        assert!(!dashboard.remove(id));
        assert!(dashboard.notice().is_none());
    }

    #[test]
    fn failure_sets_single_notice() {
        let mut dashboard = setup();
        assert!(!dashboard.add(&TaskDraft::new("")));

        let notice = dashboard.take_notice().unwrap();
        assert!(notice.starts_with("Failed to save task"), "got: {notice}");
        assert!(dashboard.take_notice().is_none());
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let mut dashboard = setup();
        assert!(dashboard.add(&TaskDraft::new("kept")));
        dashboard
            .service
            .store()
            .conn_for_tests()
            .execute_batch("DROP TABLE todos")
            .unwrap();

        assert!(!dashboard.refresh());
        assert_eq!(dashboard.len(), 1);
        assert!(dashboard.notice().unwrap().starts_with("Failed to load tasks"));
    }

    #[test]
    fn edit_missing_task_is_false_without_notice() {
        let mut dashboard = setup();
        let ghost = Task {
            id: 99_999,
            ..TaskDraft::new("ghost").into_task()
        };
        assert!(!dashboard.edit(&ghost));
        assert!(dashboard.notice().is_none());
    }
}
