//! Task use-case service.
//!
//! # Responsibility
//! - Provide the task mutations the board UI exposes: create, rename,
//!   describe, reschedule, toggle closed/risk, delete.
//! - Mirror every successful mutation into the outbox queue.
//!
//! # Invariants
//! - New tasks default to open status, due today, created today.
//! - Rename with blank or unchanged input is a no-op and enqueues nothing.
//! - Blank description input clears the description.

use crate::model::list::ListId;
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::sync::op::PendingOp;
use crate::sync::queue::OutboxQueue;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Target task does not exist (or is tombstoned).
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository and outbox implementations.
pub struct TaskService<R: TaskRepository, Q: OutboxQueue> {
    repo: R,
    outbox: Q,
}

impl<R: TaskRepository, Q: OutboxQueue> TaskService<R, Q> {
    pub fn new(repo: R, outbox: Q) -> Self {
        Self { repo, outbox }
    }

    /// Creates a task in the given list with board defaults.
    pub fn create_task(
        &self,
        list_id: ListId,
        title: &str,
        today: NaiveDate,
    ) -> Result<Task, TaskServiceError> {
        let task = Task::new(list_id, title.trim(), today);
        self.repo.create_task(&task)?;
        self.outbox.enqueue(&PendingOp::CreateTask {
            list_id,
            task: task.clone(),
        })?;

        self.read_back(task.uuid, "created task not found in read-back")
    }

    /// Replaces the task title; blank or unchanged input is a no-op.
    pub fn rename_task(&self, id: TaskId, title: &str) -> Result<Task, TaskServiceError> {
        let mut task = self.require(id)?;
        let trimmed = title.trim();
        if trimmed.is_empty() || trimmed == task.title {
            return Ok(task);
        }

        task.title = trimmed.to_string();
        self.update_and_enqueue(task)
    }

    /// Replaces the description; blank input clears it.
    pub fn set_description(&self, id: TaskId, text: &str) -> Result<Task, TaskServiceError> {
        let mut task = self.require(id)?;
        task.set_description(text);
        self.update_and_enqueue(task)
    }

    /// Sets or clears the due date.
    pub fn set_due_date(
        &self,
        id: TaskId,
        due: Option<NaiveDate>,
    ) -> Result<Task, TaskServiceError> {
        let mut task = self.require(id)?;
        task.due_date = due;
        self.update_and_enqueue(task)
    }

    /// Checkbox / right-swipe: flips open↔closed, clearing risk.
    pub fn toggle_closed(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        let mut task = self.require(id)?;
        task.toggle_closed();
        self.update_and_enqueue(task)
    }

    /// Dropdown item: flips the at-risk flag.
    pub fn toggle_risk(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        let mut task = self.require(id)?;
        task.toggle_risk();
        self.update_and_enqueue(task)
    }

    /// Left-swipe / dropdown delete: tombstones the task.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        let task = self.require(id)?;
        self.repo.soft_delete_task(id)?;
        self.outbox.enqueue(&PendingOp::DeleteTask {
            list_id: task.list_uuid,
            task_id: id,
        })?;
        Ok(())
    }

    /// Gets one active task by ID.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.repo.get_task(id, false)?)
    }

    fn require(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id, false)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    fn update_and_enqueue(&self, task: Task) -> Result<Task, TaskServiceError> {
        self.repo.update_task(&task)?;
        self.outbox
            .enqueue(&PendingOp::UpdateTask { task: task.clone() })?;
        self.read_back(task.uuid, "updated task not found in read-back")
    }

    fn read_back(&self, id: TaskId, context: &'static str) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id, false)?
            .ok_or(TaskServiceError::InconsistentState(context))
    }
}
