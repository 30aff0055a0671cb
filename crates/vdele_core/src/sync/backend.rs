//! Remote backend SPI and its error envelope.
//!
//! # Responsibility
//! - Define the seam between the sync engine and any remote board store.
//! - Classify backend failures as retryable (offline-style) or terminal.

use crate::model::list::BoardSnapshot;
use crate::sync::op::PendingOp;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BackendResult<T> = Result<T, BackendError>;

/// Sync stage a backend error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Replaying a queued mutation.
    Push,
    /// Fetching the board snapshot.
    Pull,
}

impl Display for SyncStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Pull => write!(f, "pull"),
        }
    }
}

/// Structured backend failure.
///
/// `retryable` drives engine behavior: retryable errors leave queued work
/// in place (the device is treated as offline), terminal errors drop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub stage: SyncStage,
    /// Stable machine-readable code (`http_status_500`, `network`, ...).
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl BackendError {
    pub fn new(
        stage: SyncStage,
        code: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            stage,
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "backend {} failed ({}, retryable={}): {}",
            self.stage, self.code, self.retryable, self.message
        )
    }
}

impl Error for BackendError {}

/// Remote board store interface.
///
/// Implementations are free to map ops onto any wire protocol; the engine
/// only relies on the retryable classification.
pub trait RemoteBackend {
    /// Fetches the full remote board.
    fn fetch_board(&self) -> BackendResult<BoardSnapshot>;
    /// Applies one queued mutation remotely.
    fn apply(&self, op: &PendingOp) -> BackendResult<()>;
}

impl<B: RemoteBackend + ?Sized> RemoteBackend for &B {
    fn fetch_board(&self) -> BackendResult<BoardSnapshot> {
        (**self).fetch_board()
    }

    fn apply(&self, op: &PendingOp) -> BackendResult<()> {
        (**self).apply(op)
    }
}
