#![allow(missing_docs, unused_results)]

use todo_settings::{DatabaseSettings, TodoSettings, get_settings, init_settings};
use todo_tasks::{TaskDraft, TaskService, TaskStore};

#[test]
fn open_default_follows_global_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("global").join("todos.db");
    let settings = TodoSettings {
        database: DatabaseSettings {
            path: path.display().to_string(),
            pool_size: 2,
            ..DatabaseSettings::default()
        },
        ..TodoSettings::default()
    };
    init_settings(settings).unwrap();
    todo_core::logging::init_from_settings(&get_settings().logging);

    let service = TaskService::new(TaskStore::open_default().unwrap());
    assert!(service.create(&TaskDraft::new("from settings")));
    assert_eq!(service.list_all().len(), 1);
    assert!(path.exists());
}
