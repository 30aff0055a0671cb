//! Queued mutation payloads.
//!
//! # Responsibility
//! - Define the serialized shape of every offline mutation.
//!
//! # Invariants
//! - Each op carries the full entity snapshot; replay retries the whole
//!   payload, never a diff.
//! - The JSON `action` tag doubles as the remote request action.

use crate::model::list::{ListId, TaskList};
use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};

/// One durable board mutation awaiting replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PendingOp {
    CreateList {
        list: TaskList,
    },
    RenameList {
        list_id: ListId,
        title: String,
    },
    DeleteList {
        list_id: ListId,
    },
    CreateTask {
        list_id: ListId,
        task: Task,
    },
    UpdateTask {
        task: Task,
    },
    DeleteTask {
        list_id: ListId,
        task_id: TaskId,
    },
}

impl PendingOp {
    /// Stable action name, used for logging and the remote request body.
    pub fn action(&self) -> &'static str {
        match self {
            Self::CreateList { .. } => "create_list",
            Self::RenameList { .. } => "rename_list",
            Self::DeleteList { .. } => "delete_list",
            Self::CreateTask { .. } => "create_task",
            Self::UpdateTask { .. } => "update_task",
            Self::DeleteTask { .. } => "delete_task",
        }
    }
}
