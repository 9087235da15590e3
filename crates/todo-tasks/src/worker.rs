//! Async front end for [`TaskService`].
//!
//! Every `SQLite` call blocks, so a UI running on an async runtime must not
//! call the service from its own task. [`TaskWorker`] moves each operation
//! onto the blocking pool with `spawn_blocking` and holds an async mutex
//! across it, so operations still run one at a time in call order.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task;

use crate::errors::{ServiceError, TaskAction};
use crate::service::TaskService;
use crate::types::{Task, TaskDraft};

/// Cloneable async handle that serializes task operations.
#[derive(Clone, Debug)]
pub struct TaskWorker {
    service: Arc<TaskService>,
    gate: Arc<Mutex<()>>,
}

impl TaskWorker {
    /// Wrap a shared service.
    pub fn new(service: Arc<TaskService>) -> Self {
        Self {
            service,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// The wrapped service, for subscribing to notices.
    pub fn service(&self) -> &Arc<TaskService> {
        &self.service
    }

    async fn run<T, F>(&self, action: TaskAction, op: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&TaskService) -> Result<T, ServiceError> + Send + 'static,
    {
        // held until the blocking job ends, even if this future is dropped
        let turn = Arc::clone(&self.gate).lock_owned().await;
        let service = Arc::clone(&self.service);
        task::spawn_blocking(move || {
            let _turn = turn;
            op(&service)
        })
        .await
        .map_err(|e| ServiceError::Worker {
            action,
            message: e.to_string(),
        })?
    }

    fn settle<T>(&self, result: Result<T, ServiceError>, fallback: T) -> T {
        result.unwrap_or_else(|e| {
            self.service.report(e);
            fallback
        })
    }

    /// Async [`TaskService::try_create`].
    pub async fn try_create(&self, draft: TaskDraft) -> Result<Task, ServiceError> {
        self.run(TaskAction::Create, move |s| s.try_create(&draft)).await
    }

    /// Async [`TaskService::try_update`].
    pub async fn try_update(&self, task: Task) -> Result<bool, ServiceError> {
        self.run(TaskAction::Update, move |s| s.try_update(&task)).await
    }

    /// Async [`TaskService::try_delete`].
    pub async fn try_delete(&self, id: i64) -> Result<bool, ServiceError> {
        self.run(TaskAction::Delete, move |s| s.try_delete(id)).await
    }

    /// Async [`TaskService::try_list_all`].
    pub async fn try_list_all(&self) -> Result<Vec<Task>, ServiceError> {
        self.run(TaskAction::Load, TaskService::try_list_all).await
    }

    /// Async [`TaskService::create`].
    pub async fn create(&self, draft: TaskDraft) -> bool {
        let created = self.try_create(draft).await.map(|_| true);
        self.settle(created, false)
    }

    /// Async [`TaskService::update`].
    pub async fn update(&self, task: Task) -> bool {
        let result = self.try_update(task).await;
        self.settle(result, false)
    }

    /// Async [`TaskService::delete`].
    pub async fn delete(&self, id: i64) -> bool {
        let result = self.try_delete(id).await;
        self.settle(result, false)
    }

    /// Async [`TaskService::list_all`].
    pub async fn list_all(&self) -> Vec<Task> {
        let result = self.try_list_all().await;
        self.settle(result, Vec::new())
    }
}
