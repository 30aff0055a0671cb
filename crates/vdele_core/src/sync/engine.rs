//! Best-effort sync engine: flush the outbox, then refresh the cache.
//!
//! # Responsibility
//! - Replay queued mutations FIFO against the remote backend.
//! - Replace the cached board with the remote snapshot once the queue is
//!   empty.
//!
//! # Invariants
//! - A retryable failure stops the run and leaves remaining ops queued.
//! - A terminal failure drops only the failing op; replay continues.
//! - The cache is never replaced while ops are still queued, so local
//!   edits cannot be overwritten by a stale snapshot mid-flush.

use crate::repo::board_repo::replace_board;
use crate::repo::{RepoError, RepoResult};
use crate::sync::backend::{BackendError, RemoteBackend};
use crate::sync::queue::{last_sync_at_ms, record_sync_now, OutboxQueue, SqliteOutbox};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sync failure outside the best-effort replay path.
#[derive(Debug)]
pub enum SyncError {
    /// Local cache or queue failure.
    Repo(RepoError),
    /// Terminal backend failure while pulling the snapshot.
    Backend(BackendError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Backend(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<RepoError> for SyncError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Ops replayed successfully.
    pub pushed: u32,
    /// Ops dropped after a terminal backend failure.
    pub dropped: u32,
    /// Lists in the pulled snapshot (0 when pull was skipped).
    pub pulled_lists: u32,
    /// Tasks in the pulled snapshot (0 when pull was skipped).
    pub pulled_tasks: u32,
    /// Whether the run ended early on a retryable failure.
    pub offline: bool,
    /// Ops still queued after the run.
    pub pending: u64,
}

/// Current sync bookkeeping for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub pending: u64,
    pub last_sync_at_ms: Option<i64>,
}

/// Drives the outbox queue and cache against one remote backend.
pub struct SyncEngine<'conn, B: RemoteBackend> {
    conn: &'conn Connection,
    backend: B,
}

impl<'conn, B: RemoteBackend> SyncEngine<'conn, B> {
    pub fn new(conn: &'conn Connection, backend: B) -> Self {
        Self { conn, backend }
    }

    /// Runs one full sync: flush queued ops, then pull the snapshot.
    pub fn sync(&self) -> Result<SyncReport, SyncError> {
        let outbox = SqliteOutbox::try_new(self.conn)?;
        let mut report = SyncReport::default();

        info!(
            "event=sync_run module=sync status=start pending={}",
            outbox.pending_count()?
        );

        self.flush(&outbox, &mut report)?;
        report.pending = outbox.pending_count()?;

        if report.offline {
            info!(
                "event=sync_run module=sync status=offline pushed={} dropped={} pending={}",
                report.pushed, report.dropped, report.pending
            );
            return Ok(report);
        }

        self.pull(&mut report)?;

        info!(
            "event=sync_run module=sync status={} pushed={} dropped={} pulled_lists={} pulled_tasks={} pending={}",
            if report.offline { "offline" } else { "ok" },
            report.pushed,
            report.dropped,
            report.pulled_lists,
            report.pulled_tasks,
            report.pending
        );
        Ok(report)
    }

    /// Returns queue depth and last successful pull time.
    pub fn status(&self) -> Result<SyncStatus, SyncError> {
        let outbox = SqliteOutbox::try_new(self.conn)?;
        Ok(SyncStatus {
            pending: outbox.pending_count()?,
            last_sync_at_ms: last_sync_at_ms(self.conn)?,
        })
    }

    fn flush(&self, outbox: &SqliteOutbox<'_>, report: &mut SyncReport) -> RepoResult<()> {
        loop {
            let Some(queued) = outbox.front()? else {
                return Ok(());
            };

            match self.backend.apply(&queued.op) {
                Ok(()) => {
                    outbox.remove(queued.id)?;
                    report.pushed += 1;
                    info!(
                        "event=op_replay module=sync status=ok action={} op_id={}",
                        queued.op.action(),
                        queued.id
                    );
                }
                Err(err) if err.retryable => {
                    outbox.mark_attempt(queued.id, &err.to_string())?;
                    report.offline = true;
                    warn!(
                        "event=op_replay module=sync status=retry action={} op_id={} attempts={} error_code={} error={}",
                        queued.op.action(),
                        queued.id,
                        queued.attempts + 1,
                        err.code,
                        err.message
                    );
                    return Ok(());
                }
                Err(err) => {
                    outbox.remove(queued.id)?;
                    report.dropped += 1;
                    warn!(
                        "event=op_replay module=sync status=dropped action={} op_id={} error_code={} error={}",
                        queued.op.action(),
                        queued.id,
                        err.code,
                        err.message
                    );
                }
            }
        }
    }

    fn pull(&self, report: &mut SyncReport) -> Result<(), SyncError> {
        match self.backend.fetch_board() {
            Ok(snapshot) => {
                report.pulled_lists = snapshot.lists.len() as u32;
                report.pulled_tasks = snapshot.task_count() as u32;
                replace_board(self.conn, &snapshot)?;
                record_sync_now(self.conn)?;
                Ok(())
            }
            Err(err) if err.retryable => {
                // Offline pull: keep serving the cached board.
                report.offline = true;
                warn!(
                    "event=snapshot_pull module=sync status=retry error_code={} error={}",
                    err.code, err.message
                );
                Ok(())
            }
            Err(err) => Err(SyncError::Backend(err)),
        }
    }
}
