//! # todo-tasks
//!
//! To-do CRUD with `SQLite` persistence.
//!
//! - [`TaskStore`] owns the `todos` table and runs one statement per call.
//! - [`TaskService`] validates records, turns storage failures into
//!   [`ServiceError`] notices, and is the surface a UI calls.
//! - [`TaskWorker`] runs service calls off an async runtime, one at a time.
//! - [`Dashboard`] caches the list and splits it into active and completed
//!   views, re-fetching after every successful change.

#![deny(unsafe_code)]

pub mod connection;
pub mod dashboard;
pub mod errors;
pub mod migrations;
pub mod repository;
pub mod service;
pub mod types;
pub mod worker;

pub use connection::ConnectionConfig;
pub use dashboard::Dashboard;
pub use errors::{ServiceError, StorageError, TaskAction};
pub use repository::TaskStore;
pub use service::TaskService;
pub use types::{Task, TaskDraft, TaskPartition, TaskStatus};
pub use worker::TaskWorker;
