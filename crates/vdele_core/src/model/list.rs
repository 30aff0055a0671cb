//! List domain model and whole-board snapshot.
//!
//! # Responsibility
//! - Define the list record and the board snapshot exchanged with the
//!   remote spreadsheet backend.
//!
//! # Invariants
//! - `position` orders lists ascending; new lists get a position strictly
//!   below the current minimum (they appear first).
//! - Snapshot JSON uses the spreadsheet wire names (`id`, `items`).

use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every list.
pub type ListId = Uuid;

/// Validation error for list records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListValidationError {
    /// Title is empty or whitespace-only.
    BlankTitle,
}

impl Display for ListValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "list title cannot be blank"),
        }
    }
}

impl Error for ListValidationError {}

/// Canonical list record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    /// Stable global ID used for sync mapping.
    #[serde(rename = "id")]
    pub uuid: ListId,
    pub title: String,
    /// Board ordering key, ascending.
    #[serde(default)]
    pub position: i64,
    /// Soft delete tombstone kept until the next successful sync pull.
    #[serde(default)]
    pub is_deleted: bool,
}

impl TaskList {
    /// Creates a list with a generated stable ID at position zero.
    ///
    /// Persistence assigns the real front-of-board position.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a list with a caller-provided stable ID.
    pub fn with_id(uuid: ListId, title: impl Into<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
            position: 0,
            is_deleted: false,
        }
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ListValidationError> {
        if self.title.trim().is_empty() {
            return Err(ListValidationError::BlankTitle);
        }
        Ok(())
    }

    /// Marks this list as softly deleted (tombstoned).
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Returns whether this list should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// One list together with its tasks, in board order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWithTasks {
    #[serde(flatten)]
    pub list: TaskList,
    #[serde(rename = "items", default)]
    pub tasks: Vec<Task>,
}

/// The whole cached board, also the remote `load` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub lists: Vec<ListWithTasks>,
}

impl BoardSnapshot {
    /// Total number of tasks across all lists.
    pub fn task_count(&self) -> usize {
        self.lists.iter().map(|entry| entry.tasks.len()).sum()
    }
}
