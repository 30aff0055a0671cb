use chrono::NaiveDate;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::VecDeque;
use vdele_core::db::open_db_in_memory;
use vdele_core::{
    load_board, BackendError, BackendResult, BoardSnapshot, ListService, ListWithTasks,
    OutboxQueue, PendingOp, RemoteBackend, SqliteListRepository, SqliteOutbox,
    SqliteTaskRepository, SyncEngine, SyncError, SyncStage, Task, TaskList, TaskService,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

/// Backend double that replays scripted outcomes and records calls.
struct ScriptedBackend {
    apply_results: RefCell<VecDeque<BackendResult<()>>>,
    applied: RefCell<Vec<String>>,
    fetch_result: RefCell<Option<BackendResult<BoardSnapshot>>>,
    fetch_calls: RefCell<u32>,
}

impl ScriptedBackend {
    fn new(
        apply_results: Vec<BackendResult<()>>,
        fetch_result: BackendResult<BoardSnapshot>,
    ) -> Self {
        Self {
            apply_results: RefCell::new(apply_results.into()),
            applied: RefCell::new(Vec::new()),
            fetch_result: RefCell::new(Some(fetch_result)),
            fetch_calls: RefCell::new(0),
        }
    }

    fn applied_actions(&self) -> Vec<String> {
        self.applied.borrow().clone()
    }

    fn fetch_calls(&self) -> u32 {
        *self.fetch_calls.borrow()
    }
}

impl RemoteBackend for ScriptedBackend {
    fn fetch_board(&self) -> BackendResult<BoardSnapshot> {
        *self.fetch_calls.borrow_mut() += 1;
        self.fetch_result
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Ok(BoardSnapshot::default()))
    }

    fn apply(&self, op: &PendingOp) -> BackendResult<()> {
        self.applied.borrow_mut().push(op.action().to_string());
        self.apply_results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

fn retryable(stage: SyncStage) -> BackendError {
    BackendError::new(stage, "connect", "connection refused", true)
}

fn terminal(stage: SyncStage) -> BackendError {
    BackendError::new(stage, "http_status_400", "bad request", false)
}

fn seed_local_edits(conn: &Connection) {
    let lists = ListService::new(
        SqliteListRepository::try_new(conn).unwrap(),
        SqliteOutbox::try_new(conn).unwrap(),
    );
    let tasks = TaskService::new(
        SqliteTaskRepository::try_new(conn).unwrap(),
        SqliteOutbox::try_new(conn).unwrap(),
    );

    let list = lists.create_list("Linko").unwrap();
    tasks
        .create_task(list.uuid, "Подготовить презентацию", today())
        .unwrap();
}

fn remote_snapshot() -> BoardSnapshot {
    let list = TaskList::with_id(uuid::Uuid::new_v4(), "Remote list");
    let task_a = Task::with_id(uuid::Uuid::new_v4(), list.uuid, "Remote task 1", today());
    let task_b = Task::with_id(uuid::Uuid::new_v4(), list.uuid, "Remote task 2", today());
    BoardSnapshot {
        lists: vec![ListWithTasks {
            list,
            tasks: vec![task_a, task_b],
        }],
    }
}

#[test]
fn sync_flushes_fifo_then_replaces_cache() {
    let conn = open_db_in_memory().unwrap();
    seed_local_edits(&conn);

    let backend = ScriptedBackend::new(vec![], Ok(remote_snapshot()));
    let engine = SyncEngine::new(&conn, backend);

    let report = engine.sync().unwrap();
    assert_eq!(report.pushed, 2);
    assert_eq!(report.dropped, 0);
    assert_eq!(report.pulled_lists, 1);
    assert_eq!(report.pulled_tasks, 2);
    assert!(!report.offline);
    assert_eq!(report.pending, 0);

    let board = load_board(&conn).unwrap();
    assert_eq!(board.lists.len(), 1);
    assert_eq!(board.lists[0].list.title, "Remote list");
    assert_eq!(board.lists[0].tasks.len(), 2);

    let status = engine.status().unwrap();
    assert_eq!(status.pending, 0);
    assert!(status.last_sync_at_ms.is_some());
}

#[test]
fn retryable_push_failure_stops_flush_and_skips_pull() {
    let conn = open_db_in_memory().unwrap();
    seed_local_edits(&conn);

    let backend = ScriptedBackend::new(
        vec![Err(retryable(SyncStage::Push))],
        Ok(remote_snapshot()),
    );
    let engine = SyncEngine::new(&conn, backend);

    let report = engine.sync().unwrap();
    assert!(report.offline);
    assert_eq!(report.pushed, 0);
    assert_eq!(report.pending, 2);
    assert_eq!(report.pulled_lists, 0);

    // The failing op stays at the front with its attempt recorded.
    let outbox = SqliteOutbox::try_new(&conn).unwrap();
    let front = outbox.front().unwrap().unwrap();
    assert_eq!(front.op.action(), "create_list");
    assert_eq!(front.attempts, 1);
    assert!(front.last_error.as_deref().unwrap_or("").contains("connect"));

    // Local edits survive untouched.
    let board = load_board(&conn).unwrap();
    assert_eq!(board.lists[0].list.title, "Linko");

    let status = engine.status().unwrap();
    assert_eq!(status.last_sync_at_ms, None);
}

#[test]
fn pull_is_skipped_while_ops_remain_queued() {
    let conn = open_db_in_memory().unwrap();
    seed_local_edits(&conn);

    let backend = ScriptedBackend::new(
        vec![Ok(()), Err(retryable(SyncStage::Push))],
        Ok(remote_snapshot()),
    );
    let engine = SyncEngine::new(&conn, backend);

    let report = engine.sync().unwrap();
    assert!(report.offline);
    assert_eq!(report.pushed, 1);
    assert_eq!(report.pending, 1);
    assert_eq!(report.pulled_lists, 0);
}

#[test]
fn terminal_push_failure_drops_only_that_op() {
    let conn = open_db_in_memory().unwrap();
    seed_local_edits(&conn);

    let backend = ScriptedBackend::new(
        vec![Err(terminal(SyncStage::Push)), Ok(())],
        Ok(remote_snapshot()),
    );
    let engine = SyncEngine::new(&conn, backend);

    let report = engine.sync().unwrap();
    assert!(!report.offline);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.pushed, 1);
    assert_eq!(report.pending, 0);
    assert_eq!(report.pulled_lists, 1);
}

#[test]
fn retryable_pull_failure_keeps_serving_the_cache() {
    let conn = open_db_in_memory().unwrap();
    seed_local_edits(&conn);

    let backend = ScriptedBackend::new(vec![], Err(retryable(SyncStage::Pull)));
    let engine = SyncEngine::new(&conn, backend);

    let report = engine.sync().unwrap();
    assert!(report.offline);
    assert_eq!(report.pushed, 2);
    assert_eq!(report.pulled_lists, 0);

    let board = load_board(&conn).unwrap();
    assert_eq!(board.lists[0].list.title, "Linko");
}

#[test]
fn terminal_pull_failure_surfaces_as_error() {
    let conn = open_db_in_memory().unwrap();

    let backend = ScriptedBackend::new(vec![], Err(terminal(SyncStage::Pull)));
    let engine = SyncEngine::new(&conn, backend);

    let err = engine.sync().unwrap_err();
    match err {
        SyncError::Backend(backend_err) => {
            assert_eq!(backend_err.stage, SyncStage::Pull);
            assert!(!backend_err.retryable);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_queue_sync_only_pulls() {
    let conn = open_db_in_memory().unwrap();

    let backend = ScriptedBackend::new(vec![], Ok(remote_snapshot()));
    let engine = SyncEngine::new(&conn, backend);

    let report = engine.sync().unwrap();
    assert_eq!(report.pushed, 0);
    assert_eq!(report.pulled_lists, 1);
    assert_eq!(report.pulled_tasks, 2);

    let board = load_board(&conn).unwrap();
    assert_eq!(board.lists[0].list.title, "Remote list");
}

#[test]
fn scripted_backend_sees_actions_in_fifo_order() {
    let conn = open_db_in_memory().unwrap();
    seed_local_edits(&conn);

    let backend = ScriptedBackend::new(vec![], Ok(BoardSnapshot::default()));
    let applied = {
        let engine = SyncEngine::new(&conn, &backend);
        engine.sync().unwrap();
        backend.applied_actions()
    };
    assert_eq!(applied, vec!["create_list", "create_task"]);
    assert_eq!(backend.fetch_calls(), 1);
}
