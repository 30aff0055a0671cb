//! Whole-board cache loading and replacement.
//!
//! # Responsibility
//! - Materialize the cached board as one snapshot for views and sync.
//! - Atomically swap the cache for a freshly pulled remote snapshot.
//!
//! # Invariants
//! - `replace_board` runs in a single transaction and never touches the
//!   outbox queue.
//! - Snapshot list order is preserved via re-assigned positions.

use crate::model::list::{BoardSnapshot, ListWithTasks};
use crate::repo::list_repo::{ListRepository, SqliteListRepository};
use crate::repo::task_repo::{
    bool_to_int, status_to_db, SqliteTaskRepository, TaskListQuery, TaskRepository,
};
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

/// Loads every active list with its tasks, in board order.
pub fn load_board(conn: &Connection) -> RepoResult<BoardSnapshot> {
    let list_repo = SqliteListRepository::try_new(conn)?;
    let task_repo = SqliteTaskRepository::try_new(conn)?;

    let mut lists = Vec::new();
    for list in list_repo.list_lists(false)? {
        let tasks = task_repo.list_tasks(&TaskListQuery {
            list: Some(list.uuid),
            ..TaskListQuery::default()
        })?;
        lists.push(ListWithTasks { list, tasks });
    }

    Ok(BoardSnapshot { lists })
}

/// Replaces the entire cached board with a remote snapshot.
///
/// Tombstones are dropped: the remote is authoritative once the outbox has
/// been flushed.
pub fn replace_board(conn: &Connection, snapshot: &BoardSnapshot) -> RepoResult<()> {
    for entry in &snapshot.lists {
        entry.list.validate()?;
        for task in &entry.tasks {
            task.validate()?;
        }
    }

    let tx = conn.unchecked_transaction()?;

    tx.execute("DELETE FROM tasks;", [])?;
    tx.execute("DELETE FROM lists;", [])?;

    for (index, entry) in snapshot.lists.iter().enumerate() {
        tx.execute(
            "INSERT INTO lists (uuid, title, position, is_deleted)
             VALUES (?1, ?2, ?3, 0);",
            params![
                entry.list.uuid.to_string(),
                entry.list.title.as_str(),
                index as i64,
            ],
        )?;

        for task in &entry.tasks {
            tx.execute(
                "INSERT INTO tasks (
                    uuid,
                    list_uuid,
                    title,
                    status,
                    category,
                    description,
                    link,
                    assignee,
                    due_date,
                    created_at,
                    is_deleted
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
                params![
                    task.uuid.to_string(),
                    entry.list.uuid.to_string(),
                    task.title.as_str(),
                    status_to_db(task.status),
                    task.category.as_deref(),
                    task.description.as_deref(),
                    task.link.as_deref(),
                    task.assignee.as_deref(),
                    task.due_date.map(|date| date.to_string()),
                    task.created_at.to_string(),
                    bool_to_int(task.is_deleted),
                ],
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}
