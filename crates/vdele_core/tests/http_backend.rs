use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;
use vdele_core::{HttpBackend, PendingOp, RemoteBackend, SyncStage, Task, TaskList};

const TIMEOUT: Duration = Duration::from_secs(5);

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

#[test]
fn fetch_board_parses_snapshot_and_fills_list_ids() {
    let server = MockServer::start();
    let list_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/exec").query_param("action", "load");
        then.status(200).json_body(json!({
            "lists": [
                {
                    "id": list_id.to_string(),
                    "title": "Список покупок",
                    "items": [
                        {
                            "id": task_id.to_string(),
                            "title": "Памперсы размер 3",
                            "status": "open",
                            "category": "Личное",
                            "due_date": "2026-08-07",
                            "created_at": "2026-08-01"
                        }
                    ]
                }
            ]
        }));
    });

    let backend = HttpBackend::new(server.url("/exec"), TIMEOUT).unwrap();
    let snapshot = backend.fetch_board().unwrap();
    mock.assert();

    assert_eq!(snapshot.lists.len(), 1);
    let entry = &snapshot.lists[0];
    assert_eq!(entry.list.uuid, list_id);
    assert_eq!(entry.tasks.len(), 1);
    assert_eq!(entry.tasks[0].uuid, task_id);
    // Wire items omit list_id; the backend assigns the enclosing list.
    assert_eq!(entry.tasks[0].list_uuid, list_id);
    assert_eq!(entry.tasks[0].due_date, Some(today()));
}

#[test]
fn apply_posts_the_op_with_its_action_tag() {
    let server = MockServer::start();
    let list_id = Uuid::new_v4();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .json_body_partial(
                json!({
                    "action": "rename_list",
                    "list_id": list_id.to_string(),
                    "title": "Linko 2"
                })
                .to_string(),
            );
        then.status(200).json_body(json!({ "ok": true }));
    });

    let backend = HttpBackend::new(server.url("/exec"), TIMEOUT).unwrap();
    backend
        .apply(&PendingOp::RenameList {
            list_id,
            title: "Linko 2".to_string(),
        })
        .unwrap();
    mock.assert();
}

#[test]
fn apply_serializes_full_task_payloads() {
    let server = MockServer::start();
    let list = TaskList::new("Linko");
    let mut task = Task::new(list.uuid, "Подготовить презентацию", today());
    task.link = Some("https://example.com/deck".to_string());

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .json_body_partial(
                json!({
                    "action": "create_task",
                    "list_id": list.uuid.to_string(),
                    "task": {
                        "id": task.uuid.to_string(),
                        "title": "Подготовить презентацию",
                        "link": "https://example.com/deck"
                    }
                })
                .to_string(),
            );
        then.status(200);
    });

    let backend = HttpBackend::new(server.url("/exec"), TIMEOUT).unwrap();
    backend
        .apply(&PendingOp::CreateTask {
            list_id: list.uuid,
            task,
        })
        .unwrap();
    mock.assert();
}

#[test]
fn server_errors_and_throttling_are_retryable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(503);
    });

    let backend = HttpBackend::new(server.url("/exec"), TIMEOUT).unwrap();
    let err = backend
        .apply(&PendingOp::DeleteList {
            list_id: Uuid::new_v4(),
        })
        .unwrap_err();
    assert!(err.retryable);
    assert_eq!(err.stage, SyncStage::Push);
    assert_eq!(err.code, "http_status_503");

    let throttled = MockServer::start();
    throttled.mock(|when, then| {
        when.method(GET).path("/exec");
        then.status(429);
    });
    let backend = HttpBackend::new(throttled.url("/exec"), TIMEOUT).unwrap();
    let err = backend.fetch_board().unwrap_err();
    assert!(err.retryable);
    assert_eq!(err.stage, SyncStage::Pull);
}

#[test]
fn client_errors_are_terminal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(400);
    });

    let backend = HttpBackend::new(server.url("/exec"), TIMEOUT).unwrap();
    let err = backend
        .apply(&PendingOp::DeleteList {
            list_id: Uuid::new_v4(),
        })
        .unwrap_err();
    assert!(!err.retryable);
    assert_eq!(err.code, "http_status_400");
}

#[test]
fn unreachable_endpoint_is_retryable() {
    // Nothing listens on this port.
    let backend = HttpBackend::new("http://127.0.0.1:9", TIMEOUT).unwrap();
    let err = backend.fetch_board().unwrap_err();
    assert!(err.retryable);
    assert_eq!(err.stage, SyncStage::Pull);
}

#[test]
fn malformed_snapshot_body_is_terminal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/exec");
        then.status(200).body("not json at all");
    });

    let backend = HttpBackend::new(server.url("/exec"), TIMEOUT).unwrap();
    let err = backend.fetch_board().unwrap_err();
    assert!(!err.retryable);
    assert_eq!(err.code, "invalid_body");
}
