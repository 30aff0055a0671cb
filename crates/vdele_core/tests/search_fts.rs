use chrono::NaiveDate;
use vdele_core::db::open_db_in_memory;
use vdele_core::{
    search_tasks, ListRepository, SearchError, SearchQuery, SqliteListRepository,
    SqliteTaskRepository, Task, TaskList, TaskRepository, TaskStatus,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

fn seeded_board(conn: &rusqlite::Connection) -> (Task, Task, Task) {
    let list_repo = SqliteListRepository::try_new(conn).unwrap();
    let task_repo = SqliteTaskRepository::try_new(conn).unwrap();

    let list = TaskList::new("Linko");
    list_repo.create_list(&list).unwrap();

    let mut presentation = Task::new(list.uuid, "Подготовить презентацию", today());
    presentation.category = Some("Конференция".to_string());
    presentation.assignee = Some("Сергей Лебедев".to_string());
    task_repo.create_task(&presentation).unwrap();

    let mut targeting = Task::new(list.uuid, "Настроить таргетинг", today());
    targeting.status = TaskStatus::Risk;
    targeting.description = Some("Бюджет согласован".to_string());
    task_repo.create_task(&targeting).unwrap();

    let mut deleted = Task::new(list.uuid, "Старая презентация", today());
    task_repo.create_task(&deleted).unwrap();
    task_repo.soft_delete_task(deleted.uuid).unwrap();
    deleted.is_deleted = true;

    (presentation, targeting, deleted)
}

#[test]
fn finds_tasks_by_title_and_skips_tombstones() {
    let conn = open_db_in_memory().unwrap();
    let (presentation, _, deleted) = seeded_board(&conn);

    let hits = search_tasks(&conn, &SearchQuery::new("презентацию")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].task_id, presentation.uuid);
    assert_eq!(hits[0].list_id, presentation.list_uuid);
    assert!(hits[0].snippet.contains("презентацию"));

    let tombstoned = search_tasks(&conn, &SearchQuery::new("Старая")).unwrap();
    assert!(tombstoned.is_empty(), "deleted {} should not match", deleted.uuid);
}

#[test]
fn finds_tasks_by_description_category_and_assignee() {
    let conn = open_db_in_memory().unwrap();
    let (presentation, targeting, _) = seeded_board(&conn);

    let by_description = search_tasks(&conn, &SearchQuery::new("бюджет")).unwrap();
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].task_id, targeting.uuid);

    let by_category = search_tasks(&conn, &SearchQuery::new("конференция")).unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].task_id, presentation.uuid);

    let by_assignee = search_tasks(&conn, &SearchQuery::new("лебедев")).unwrap();
    assert_eq!(by_assignee.len(), 1);
    assert_eq!(by_assignee[0].task_id, presentation.uuid);
}

#[test]
fn status_filter_narrows_hits() {
    let conn = open_db_in_memory().unwrap();
    let (_, targeting, _) = seeded_board(&conn);

    let query = SearchQuery {
        status: Some(TaskStatus::Risk),
        ..SearchQuery::new("таргетинг")
    };
    let hits = search_tasks(&conn, &query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].task_id, targeting.uuid);
    assert_eq!(hits[0].status, TaskStatus::Risk);

    let query = SearchQuery {
        status: Some(TaskStatus::Closed),
        ..SearchQuery::new("таргетинг")
    };
    assert!(search_tasks(&conn, &query).unwrap().is_empty());
}

#[test]
fn blank_query_and_zero_limit_return_nothing() {
    let conn = open_db_in_memory().unwrap();
    seeded_board(&conn);

    assert!(search_tasks(&conn, &SearchQuery::new("   ")).unwrap().is_empty());

    let query = SearchQuery {
        limit: 0,
        ..SearchQuery::new("презентацию")
    };
    assert!(search_tasks(&conn, &query).unwrap().is_empty());
}

#[test]
fn quotes_in_user_input_are_escaped() {
    let conn = open_db_in_memory().unwrap();
    seeded_board(&conn);

    // Must not be parsed as FTS5 syntax.
    let hits = search_tasks(&conn, &SearchQuery::new("\"презентацию")).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn raw_syntax_errors_surface_as_invalid_query() {
    let conn = open_db_in_memory().unwrap();
    seeded_board(&conn);

    let query = SearchQuery {
        raw_fts_syntax: true,
        ..SearchQuery::new("AND AND (((")
    };
    let err = search_tasks(&conn, &query).unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery { .. }));
}
