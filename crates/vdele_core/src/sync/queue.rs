//! Durable outbox queue over SQLite.
//!
//! # Responsibility
//! - Persist pending mutations in arrival order.
//! - Track replay attempts and the last replay error per op.
//! - Keep sync bookkeeping (`last_sync_at_ms`) in `sync_state`.
//!
//! # Invariants
//! - `front` always returns the oldest op (autoincrement id order).
//! - Ops leave the queue only via `remove`; failed replays keep them.

use crate::repo::{ensure_schema_version, ensure_table_columns, RepoError, RepoResult};
use crate::sync::op::PendingOp;
use rusqlite::{params, Connection, OptionalExtension};

const OUTBOX_COLUMNS: &[&str] = &["id", "payload", "enqueued_at", "attempts", "last_error"];

const LAST_SYNC_KEY: &str = "last_sync_at_ms";

/// One queued op with its replay bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedOp {
    pub id: i64,
    pub op: PendingOp,
    pub enqueued_at_ms: i64,
    pub attempts: u32,
    pub last_error: Option<String>,
}

/// Queue interface used by services and the sync engine.
pub trait OutboxQueue {
    fn enqueue(&self, op: &PendingOp) -> RepoResult<i64>;
    /// Returns the oldest queued op, or `None` when the queue is empty.
    fn front(&self) -> RepoResult<Option<QueuedOp>>;
    /// Records one failed replay attempt without dequeuing.
    fn mark_attempt(&self, id: i64, error: &str) -> RepoResult<()>;
    fn remove(&self, id: i64) -> RepoResult<()>;
    fn pending_count(&self) -> RepoResult<u64>;
}

/// SQLite-backed outbox queue.
pub struct SqliteOutbox<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOutbox<'conn> {
    /// Constructs a queue from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_version(conn)?;
        ensure_table_columns(conn, "outbox_ops", OUTBOX_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl OutboxQueue for SqliteOutbox<'_> {
    fn enqueue(&self, op: &PendingOp) -> RepoResult<i64> {
        let payload = serde_json::to_string(op)
            .map_err(|err| RepoError::InvalidData(format!("unserializable op payload: {err}")))?;

        self.conn.execute(
            "INSERT INTO outbox_ops (payload) VALUES (?1);",
            [payload.as_str()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn front(&self) -> RepoResult<Option<QueuedOp>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, payload, enqueued_at, attempts, last_error
             FROM outbox_ops
             ORDER BY id ASC
             LIMIT 1;",
        )?;

        let mut rows = stmt.query([])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let id: i64 = row.get("id")?;
        let payload: String = row.get("payload")?;
        let op = serde_json::from_str(&payload).map_err(|err| {
            RepoError::InvalidData(format!("invalid op payload in outbox_ops.id={id}: {err}"))
        })?;

        Ok(Some(QueuedOp {
            id,
            op,
            enqueued_at_ms: row.get("enqueued_at")?,
            attempts: row.get("attempts")?,
            last_error: row.get("last_error")?,
        }))
    }

    fn mark_attempt(&self, id: i64, error: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE outbox_ops
             SET
                attempts = attempts + 1,
                last_error = ?1
             WHERE id = ?2;",
            params![error, id],
        )?;

        if changed == 0 {
            return Err(RepoError::InvalidData(format!(
                "mark_attempt on unknown outbox_ops.id={id}"
            )));
        }

        Ok(())
    }

    fn remove(&self, id: i64) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM outbox_ops WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn pending_count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM outbox_ops;", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Returns the last successful pull time in epoch milliseconds.
pub fn last_sync_at_ms(conn: &Connection) -> RepoResult<Option<i64>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM sync_state WHERE key = ?1;",
            [LAST_SYNC_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(None),
        Some(text) => text.parse::<i64>().map(Some).map_err(|_| {
            RepoError::InvalidData(format!("invalid {LAST_SYNC_KEY} value `{text}`"))
        }),
    }
}

/// Stamps the last successful pull with the database clock.
pub fn record_sync_now(conn: &Connection) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO sync_state (key, value)
         VALUES (?1, CAST(strftime('%s', 'now') * 1000 AS TEXT))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        [LAST_SYNC_KEY],
    )?;
    Ok(())
}
