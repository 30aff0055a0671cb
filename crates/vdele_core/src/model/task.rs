//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by board, storage and sync.
//! - Provide lifecycle helpers for status toggles and soft-delete semantics.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another task.
//! - `status` is exactly one of open/closed/risk; closing always clears risk.
//! - `is_deleted` is the source of truth for tombstone state.

use crate::model::list::ListId;
use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every task on the board.
pub type TaskId = Uuid;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("valid link regex"));

/// Maximum assignee avatars shown before collapsing into a `+N` badge.
pub const MAX_VISIBLE_ASSIGNEES: usize = 2;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Actionable, not finished.
    Open,
    /// Completed.
    Closed,
    /// Flagged as at-risk; still open work.
    Risk,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Validation error for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    BlankTitle,
    /// Link is present but not an http(s) URL.
    InvalidLink(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title cannot be blank"),
            Self::InvalidLink(value) => write!(f, "task link is not an http(s) URL: `{value}`"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Optional fields mirror the spreadsheet row shape: absent cells stay
/// `None` instead of empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for sync mapping and auditing.
    #[serde(rename = "id")]
    pub uuid: TaskId,
    /// Owning list ID. Defaults to nil for snapshot items, where the
    /// enclosing list is authoritative.
    #[serde(rename = "list_id", default)]
    pub list_uuid: ListId,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Category label rendered as a colored pill.
    pub category: Option<String>,
    pub description: Option<String>,
    /// Optional http(s) reference link.
    pub link: Option<String>,
    /// Comma-separated assignee display names.
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    /// Soft delete tombstone kept until the next successful sync pull.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Task {
    /// Creates a task with a generated stable ID and board defaults:
    /// open status, due today, created today.
    pub fn new(list_uuid: ListId, title: impl Into<String>, today: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4(), list_uuid, title, today)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by import/sync paths where identity already exists remotely.
    pub fn with_id(
        uuid: TaskId,
        list_uuid: ListId,
        title: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            uuid,
            list_uuid,
            title: title.into(),
            status: TaskStatus::Open,
            category: None,
            description: None,
            link: None,
            assignee: None,
            due_date: Some(today),
            created_at: today,
            is_deleted: false,
        }
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        if let Some(link) = self.link.as_deref() {
            if !LINK_RE.is_match(link) {
                return Err(TaskValidationError::InvalidLink(link.to_string()));
            }
        }
        Ok(())
    }

    /// Flips between open and closed. Leaving either state clears risk.
    pub fn toggle_closed(&mut self) {
        self.status = match self.status {
            TaskStatus::Closed => TaskStatus::Open,
            TaskStatus::Open | TaskStatus::Risk => TaskStatus::Closed,
        };
    }

    /// Flips the at-risk flag; any non-risk state becomes risk.
    pub fn toggle_risk(&mut self) {
        self.status = match self.status {
            TaskStatus::Risk => TaskStatus::Open,
            TaskStatus::Open | TaskStatus::Closed => TaskStatus::Risk,
        };
    }

    /// Replaces the description; blank input clears it.
    pub fn set_description(&mut self, text: &str) {
        let trimmed = text.trim();
        self.description = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Marks this task as softly deleted (tombstoned).
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Returns whether this task should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Quick-pick options of the due date dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuePreset {
    Today,
    Tomorrow,
    NextWeek,
    NoDate,
}

impl DuePreset {
    /// Resolves the preset against the caller's local date.
    pub fn resolve(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Today => Some(today),
            Self::Tomorrow => today.checked_add_days(Days::new(1)),
            Self::NextWeek => today.checked_add_days(Days::new(7)),
            Self::NoDate => None,
        }
    }
}

/// One parsed assignee entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignee {
    pub name: String,
}

impl Assignee {
    /// Single-character avatar initial (uppercased first letter).
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Avatar row projection: up to [`MAX_VISIBLE_ASSIGNEES`] entries plus a
/// `+N` overflow count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeBadges {
    pub visible: Vec<Assignee>,
    pub overflow: usize,
}

/// Parses a comma-separated assignee cell into entries.
///
/// Blank segments are skipped; names keep their original casing.
pub fn parse_assignees(raw: &str) -> Vec<Assignee> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Assignee {
            name: name.to_string(),
        })
        .collect()
}

/// Builds the avatar row for a raw assignee cell.
///
/// Returns `None` when no assignee is present at all.
pub fn assignee_badges(raw: &str) -> Option<AssigneeBadges> {
    let assignees = parse_assignees(raw);
    if assignees.is_empty() {
        return None;
    }

    let overflow = assignees.len().saturating_sub(MAX_VISIBLE_ASSIGNEES);
    let visible = assignees
        .into_iter()
        .take(MAX_VISIBLE_ASSIGNEES)
        .collect::<Vec<_>>();
    Some(AssigneeBadges { visible, overflow })
}
