//! List use-case service.
//!
//! # Responsibility
//! - Provide list create/rename/delete entry points for the board.
//! - Mirror every successful mutation into the outbox queue.
//!
//! # Invariants
//! - Created lists appear at the front of the board.
//! - Rename with blank input is a no-op and enqueues nothing.
//! - Deleting a list also removes all of its tasks.

use crate::model::list::{ListId, TaskList};
use crate::repo::list_repo::ListRepository;
use crate::repo::RepoError;
use crate::sync::op::PendingOp;
use crate::sync::queue::OutboxQueue;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for list use-cases.
#[derive(Debug)]
pub enum ListServiceError {
    /// Target list does not exist (or is tombstoned).
    ListNotFound(ListId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ListServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent list state: {details}"),
        }
    }
}

impl Error for ListServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ListServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ListNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// List service facade over repository and outbox implementations.
pub struct ListService<R: ListRepository, Q: OutboxQueue> {
    repo: R,
    outbox: Q,
}

impl<R: ListRepository, Q: OutboxQueue> ListService<R, Q> {
    pub fn new(repo: R, outbox: Q) -> Self {
        Self { repo, outbox }
    }

    /// Creates a list at the front of the board.
    pub fn create_list(&self, title: &str) -> Result<TaskList, ListServiceError> {
        let list = TaskList::new(title.trim());
        self.repo.create_list(&list)?;

        // Read back for the position assigned by persistence.
        let created = self
            .repo
            .get_list(list.uuid, false)?
            .ok_or(ListServiceError::InconsistentState(
                "created list not found in read-back",
            ))?;
        self.outbox.enqueue(&PendingOp::CreateList {
            list: created.clone(),
        })?;
        Ok(created)
    }

    /// Replaces the list title; blank input is a no-op.
    pub fn rename_list(&self, id: ListId, title: &str) -> Result<TaskList, ListServiceError> {
        let current = self.require(id)?;
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Ok(current);
        }

        self.repo.rename_list(id, trimmed)?;
        self.outbox.enqueue(&PendingOp::RenameList {
            list_id: id,
            title: trimmed.to_string(),
        })?;

        self.repo
            .get_list(id, false)?
            .ok_or(ListServiceError::InconsistentState(
                "renamed list not found in read-back",
            ))
    }

    /// Deletes the list and all of its tasks.
    pub fn delete_list(&self, id: ListId) -> Result<(), ListServiceError> {
        self.repo.soft_delete_list(id)?;
        self.outbox
            .enqueue(&PendingOp::DeleteList { list_id: id })?;
        Ok(())
    }

    /// Gets one active list by ID.
    pub fn get_list(&self, id: ListId) -> Result<Option<TaskList>, ListServiceError> {
        Ok(self.repo.get_list(id, false)?)
    }

    /// Lists active lists in board order.
    pub fn list_lists(&self) -> Result<Vec<TaskList>, ListServiceError> {
        Ok(self.repo.list_lists(false)?)
    }

    fn require(&self, id: ListId) -> Result<TaskList, ListServiceError> {
        self.repo
            .get_list(id, false)?
            .ok_or(ListServiceError::ListNotFound(id))
    }
}
