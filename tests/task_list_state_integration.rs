//! Integration tests for `TaskListManager` reconciliation over a mock API.
//!
//! Tests:
//! - Refresh replaces the collection wholesale and recomputes counts
//! - Create prepends and bumps counts by exactly one
//! - Toggle replaces in place; counts shift between pending and completed
//! - Delete is gated on confirmation; no DELETE is issued without it
//! - Failures leave the collection unchanged and surface notifications

use std::sync::Arc;

use mockito::Matcher;
use taskdeck::session::MemorySessionStore;
use taskdeck::state::{NotificationKind, TaskIntent, TaskListManager};
use taskdeck::types::TaskForm;
use taskdeck::{ClientConfig, TaskClient};

fn task_json(id: i64, title: &str, completed: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "completed": completed,
        "tags": [],
        "is_recurring": false,
        "created_at": "2024-05-01T09:00:00",
        "updated_at": "2024-05-01T09:00:00",
        "user_id": "u1"
    })
}

fn manager_for(server: &mockito::Server) -> TaskListManager {
    let config = ClientConfig::new(&server.url()).expect("mock server URL parses");
    let client =
        Arc::new(TaskClient::new(config, Arc::new(MemorySessionStore::new())).expect("client builds"));
    TaskListManager::new(client)
}

#[tokio::test]
async fn refresh_replaces_collection_and_recomputes_counts() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!([
                task_json(1, "a", false),
                task_json(2, "b", true),
                task_json(3, "c", false),
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let manager = manager_for(&server);
    assert!(!manager.is_loading());
    manager.refresh().await;

    let counts = manager.counts();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.pending, 2);
    assert_eq!(counts.completed, 1);
    assert!(!manager.is_loading());
}

#[tokio::test]
async fn create_prepends_and_increments_counts() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!([task_json(1, "existing", true)]).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/tasks")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(task_json(2, "fresh", false).to_string())
        .create_async()
        .await;

    let manager = manager_for(&server);
    manager.refresh().await;
    let before = manager.counts();

    let form = TaskForm {
        title: "fresh".to_string(),
        ..TaskForm::default()
    };
    let created = manager.create_task(&form).await.expect("create succeeds");
    assert_eq!(created.id, 2);

    // New task is first; totals bump by exactly one.
    let tasks = manager.tasks();
    assert_eq!(tasks[0].id, 2);
    let after = manager.counts();
    assert_eq!(after.total, before.total + 1);
    assert_eq!(after.pending, before.pending + 1);
    assert_eq!(after.completed, before.completed);

    let notes = manager.notifications().active();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Success);
    assert_eq!(notes[0].message, "Task created successfully");
}

#[tokio::test]
async fn toggle_updates_entry_in_place_and_shifts_counts() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!([task_json(1, "a", false), task_json(2, "b", false)]).to_string(),
        )
        .create_async()
        .await;
    server
        .mock("PATCH", "/tasks/2/complete")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(task_json(2, "b", true).to_string())
        .create_async()
        .await;

    let manager = manager_for(&server);
    manager.refresh().await;

    manager
        .toggle_completion(2)
        .await
        .expect("toggle succeeds");

    // Order preserved, entry replaced in place.
    let tasks = manager.tasks();
    assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(tasks[1].completed);

    let counts = manager.counts();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.pending, 1);
    assert_eq!(counts.completed, 1);

    let notes = manager.notifications().active();
    assert_eq!(notes[0].message, "Task marked as completed");
}

#[tokio::test]
async fn delete_is_never_dispatched_without_confirmation() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!([task_json(1, "a", false)]).to_string())
        .create_async()
        .await;
    let delete_mock = server
        .mock("DELETE", "/tasks/1")
        .with_status(204)
        .expect(0)
        .create_async()
        .await;

    let manager = manager_for(&server);
    manager.refresh().await;

    manager.request_delete(1);
    assert_eq!(manager.pending_delete(), Some(1));
    assert_eq!(manager.tasks().len(), 1);

    manager.cancel_delete();
    delete_mock.assert_async().await;
    assert_eq!(manager.tasks().len(), 1);
}

#[tokio::test]
async fn confirmed_delete_removes_entry_and_notifies() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!([task_json(1, "a", false), task_json(2, "b", true)]).to_string(),
        )
        .create_async()
        .await;
    let delete_mock = server
        .mock("DELETE", "/tasks/2")
        .with_status(204)
        .create_async()
        .await;

    let manager = manager_for(&server);
    manager.refresh().await;

    manager.request_delete(2);
    manager.confirm_delete().await;

    delete_mock.assert_async().await;
    assert_eq!(manager.pending_delete(), None);
    assert_eq!(manager.tasks().len(), 1);
    assert_eq!(manager.counts().completed, 0);
    assert_eq!(
        manager.notifications().active()[0].message,
        "Task deleted successfully"
    );
}

#[tokio::test]
async fn failed_delete_keeps_entry_and_confirmation_stage() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!([task_json(1, "a", false)]).to_string())
        .create_async()
        .await;
    server
        .mock("DELETE", "/tasks/1")
        .with_status(500)
        .create_async()
        .await;

    let manager = manager_for(&server);
    manager.refresh().await;

    manager.request_delete(1);
    manager.confirm_delete().await;

    // Stage survives so the user can retry from the open modal.
    assert_eq!(manager.pending_delete(), Some(1));
    assert_eq!(manager.tasks().len(), 1);

    let notes = manager.notifications().active();
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(notes[0].message, "Failed to delete task");
}

#[tokio::test]
async fn failed_create_leaves_collection_unchanged() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!([task_json(1, "a", false)]).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/tasks")
        .with_status(500)
        .create_async()
        .await;

    let manager = manager_for(&server);
    manager.refresh().await;

    let form = TaskForm {
        title: "doomed".to_string(),
        ..TaskForm::default()
    };
    let result = manager.create_task(&form).await;
    assert!(result.is_err());
    assert_eq!(manager.tasks().len(), 1);
    assert_eq!(manager.counts().total, 1);

    let notes = manager.notifications().active();
    assert_eq!(notes[0].kind, NotificationKind::Error);
}

#[tokio::test]
async fn filter_change_refetches_with_new_criteria() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!([task_json(1, "a", false), task_json(2, "b", true)]).to_string(),
        )
        .create_async()
        .await;
    let filtered_mock = server
        .mock("GET", "/tasks")
        .match_query(Matcher::Exact("status=pending".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!([task_json(1, "a", false)]).to_string())
        .create_async()
        .await;

    let manager = manager_for(&server);
    manager.refresh().await;
    assert_eq!(manager.counts().total, 2);

    manager
        .handle(TaskIntent::SetFilter(taskdeck::types::TaskFilter {
            status: taskdeck::types::StatusFilter::Pending,
            ..taskdeck::types::TaskFilter::default()
        }))
        .await
        .expect("intent succeeds");

    filtered_mock.assert_async().await;
    assert_eq!(manager.counts().total, 1);
    assert_eq!(manager.counts().pending, 1);
}
