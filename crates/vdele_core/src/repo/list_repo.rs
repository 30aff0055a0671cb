//! List repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list CRUD over the cached `lists` table.
//! - Own the prepend-on-create and cascade-tombstone semantics.
//!
//! # Invariants
//! - New lists receive a position strictly below the current minimum, so
//!   they render first on the board.
//! - Deleting a list tombstones the list and all its tasks in one
//!   transaction.

use crate::model::list::{ListId, TaskList};
use crate::repo::task_repo::parse_deleted_flag;
use crate::repo::{ensure_schema_version, ensure_table_columns, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const LIST_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    position,
    is_deleted
FROM lists";

const LIST_COLUMNS: &[&str] = &["uuid", "title", "position", "is_deleted", "updated_at"];

/// Repository interface for list CRUD operations.
pub trait ListRepository {
    /// Creates a list at the front of the board and returns its id.
    fn create_list(&self, list: &TaskList) -> RepoResult<ListId>;
    fn rename_list(&self, id: ListId, title: &str) -> RepoResult<()>;
    fn get_list(&self, id: ListId, include_deleted: bool) -> RepoResult<Option<TaskList>>;
    /// Lists active lists in board order (position ascending).
    fn list_lists(&self, include_deleted: bool) -> RepoResult<Vec<TaskList>>;
    /// Tombstones the list and every task it contains.
    fn soft_delete_list(&self, id: ListId) -> RepoResult<()>;
}

/// SQLite-backed list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_version(conn)?;
        ensure_table_columns(conn, "lists", LIST_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, list: &TaskList) -> RepoResult<ListId> {
        list.validate()?;

        // Position below the current minimum: new lists are prepended.
        self.conn.execute(
            "INSERT INTO lists (uuid, title, position, is_deleted)
             VALUES (
                ?1,
                ?2,
                (SELECT COALESCE(MIN(position), 1) - 1 FROM lists),
                ?3
             );",
            params![
                list.uuid.to_string(),
                list.title.as_str(),
                i64::from(list.is_deleted),
            ],
        )?;

        Ok(list.uuid)
    }

    fn rename_list(&self, id: ListId, title: &str) -> RepoResult<()> {
        let probe = TaskList::with_id(id, title);
        probe.validate()?;

        let changed = self.conn.execute(
            "UPDATE lists
             SET
                title = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2
               AND is_deleted = 0;",
            params![title, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_list(&self, id: ListId, include_deleted: bool) -> RepoResult<Option<TaskList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), i64::from(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_list_row(row)?));
        }

        Ok(None)
    }

    fn list_lists(&self, include_deleted: bool) -> RepoResult<Vec<TaskList>> {
        let mut sql = String::from(LIST_SELECT_SQL);
        if !include_deleted {
            sql.push_str(" WHERE is_deleted = 0");
        }
        sql.push_str(" ORDER BY position ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();

        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }

        Ok(lists)
    }

    fn soft_delete_list(&self, id: ListId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE lists
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "UPDATE tasks
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE list_uuid = ?1;",
            [id.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn parse_list_row(row: &Row<'_>) -> RepoResult<TaskList> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "lists.uuid")?;
    let is_deleted = parse_deleted_flag(row.get::<_, i64>("is_deleted")?, "lists.is_deleted")?;

    let list = TaskList {
        uuid,
        title: row.get("title")?,
        position: row.get("position")?,
        is_deleted,
    };
    list.validate()?;
    Ok(list)
}
