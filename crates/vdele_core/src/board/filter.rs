//! Task filtering and status counters.
//!
//! # Responsibility
//! - Implement the date-range, status and free-text filters of the board
//!   header.
//!
//! # Invariants
//! - Tasks without a due date never match the today/week ranges.
//! - The week range is `today ..= today + 7 days`, inclusive.
//! - Search is a case-insensitive substring over title, description,
//!   category and assignee.

use crate::model::list::BoardSnapshot;
use crate::model::task::{Task, TaskStatus};
use chrono::{Days, NaiveDate};

/// Date-range tab of the board header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Week,
}

/// Status chip row under the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
    Risk,
}

impl StatusFilter {
    fn accepts(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Open => status == TaskStatus::Open,
            Self::Closed => status == TaskStatus::Closed,
            Self::Risk => status == TaskStatus::Risk,
        }
    }
}

/// Combined board filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    pub date: DateFilter,
    pub status: StatusFilter,
    /// Raw search input; trimmed and lowercased on use.
    pub search: String,
}

impl BoardFilter {
    /// Normalized search needle, or `None` for a blank query.
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Full filter: date AND status AND search.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        self.matches_date(task, today)
            && self.status.accepts(task.status)
            && matches_search(task, self.search_needle().as_deref())
    }

    /// Status-only filter, used for the list-title search fallback.
    pub fn matches_status_only(&self, task: &Task) -> bool {
        self.status.accepts(task.status)
    }

    fn matches_date(&self, task: &Task, today: NaiveDate) -> bool {
        match self.date {
            DateFilter::All => true,
            DateFilter::Today => task.due_date == Some(today),
            DateFilter::Week => match task.due_date {
                Some(due) => {
                    let week_end = today.checked_add_days(Days::new(7)).unwrap_or(today);
                    due >= today && due <= week_end
                }
                None => false,
            },
        }
    }

    /// Date + search, without status: the counter badge filter.
    fn matches_for_count(&self, task: &Task, today: NaiveDate) -> bool {
        self.matches_date(task, today)
            && matches_search(task, self.search_needle().as_deref())
    }
}

fn matches_search(task: &Task, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };

    let haystacks = [
        Some(task.title.as_str()),
        task.description.as_deref(),
        task.category.as_deref(),
        task.assignee.as_deref(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(needle))
}

/// Counter badge values for the status chip row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: u32,
    pub open: u32,
    pub closed: u32,
    pub risk: u32,
}

/// Computes the status counters across the whole board.
///
/// The active status chip does not influence its own counters, so the
/// counts stay stable while switching chips.
pub fn count_board(snapshot: &BoardSnapshot, filter: &BoardFilter, today: NaiveDate) -> StatusCounts {
    let mut counts = StatusCounts::default();

    for entry in &snapshot.lists {
        for task in &entry.tasks {
            if !filter.matches_for_count(task, today) {
                continue;
            }

            counts.all += 1;
            match task.status {
                TaskStatus::Closed => counts.closed += 1,
                TaskStatus::Risk => counts.risk += 1,
                TaskStatus::Open => counts.open += 1,
            }
        }
    }

    counts
}
