//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide task CRUD over the cached `tasks` table.
//! - Keep task rows in the order they were appended to their list.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::list::ListId;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::repo::{ensure_schema_version, ensure_table_columns, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
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
FROM tasks";

const TASK_COLUMNS: &[&str] = &[
    "uuid",
    "list_uuid",
    "title",
    "status",
    "category",
    "description",
    "link",
    "assignee",
    "due_date",
    "created_at",
    "is_deleted",
    "updated_at",
];

/// Query options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    /// Restrict to one list.
    pub list: Option<ListId>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId, include_deleted: bool) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_version(conn)?;
        ensure_table_columns(conn, "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
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
                task.list_uuid.to_string(),
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

        Ok(task.uuid)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                list_uuid = ?1,
                title = ?2,
                status = ?3,
                category = ?4,
                description = ?5,
                link = ?6,
                assignee = ?7,
                due_date = ?8,
                created_at = ?9,
                is_deleted = ?10,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?11;",
            params![
                task.list_uuid.to_string(),
                task.title.as_str(),
                status_to_db(task.status),
                task.category.as_deref(),
                task.description.as_deref(),
                task.link.as_deref(),
                task.assignee.as_deref(),
                task.due_date.map(|date| date.to_string()),
                task.created_at.to_string(),
                bool_to_int(task.is_deleted),
                task.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.uuid));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId, include_deleted: bool) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }

        if let Some(list) = query.list {
            sql.push_str(" AND list_uuid = ?");
            bind_values.push(Value::Text(list.to_string()));
        }

        // rowid keeps the append order tasks had on the board.
        sql.push_str(" ORDER BY rowid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn soft_delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

pub(crate) fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "tasks.uuid")?;

    let list_uuid_text: String = row.get("list_uuid")?;
    let list_uuid = parse_uuid(&list_uuid_text, "tasks.list_uuid")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let due_date = row
        .get::<_, Option<String>>("due_date")?
        .map(|value| parse_date(&value, "tasks.due_date"))
        .transpose()?;

    let created_text: String = row.get("created_at")?;
    let created_at = parse_date(&created_text, "tasks.created_at")?;

    let is_deleted = parse_deleted_flag(row.get::<_, i64>("is_deleted")?, "tasks.is_deleted")?;

    let task = Task {
        uuid,
        list_uuid,
        title: row.get("title")?,
        status,
        category: row.get("category")?,
        description: row.get("description")?,
        link: row.get("link")?,
        assignee: row.get("assignee")?,
        due_date,
        created_at,
        is_deleted,
    };
    task.validate()?;
    Ok(task)
}

pub(crate) fn parse_deleted_flag(value: i64, context: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid is_deleted value `{other}` in {context}"
        ))),
    }
}

fn parse_date(value: &str, context: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{value}` in {context}")))
}

pub(crate) fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Open => "open",
        TaskStatus::Closed => "closed",
        TaskStatus::Risk => "risk",
    }
}

pub(crate) fn parse_status(value: &str) -> Option<TaskStatus> {
    match value {
        "open" => Some(TaskStatus::Open),
        "closed" => Some(TaskStatus::Closed),
        "risk" => Some(TaskStatus::Risk),
        _ => None,
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
