//! Board card projection and accordion state.
//!
//! # Responsibility
//! - Project the filtered snapshot into the ordered card stack.
//! - Implement the one-card-at-a-time accordion semantics.
//!
//! # Invariants
//! - Lists with matching tasks come before empty lists; the relative
//!   order within each group is preserved.
//! - A non-blank search auto-expands every card that has matches.
//! - When a search matches only the list title, the card falls back to
//!   showing its tasks filtered by status alone.

use crate::board::filter::BoardFilter;
use crate::model::list::{BoardSnapshot, ListId, TaskList};
use crate::model::task::Task;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Display state of one list card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Full task stack visible.
    Expanded,
    /// Header plus first-task preview.
    Peeked,
    /// Header only; the card has nothing to show under the filter.
    Collapsed,
}

/// One projected list card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCard {
    pub list: TaskList,
    /// Tasks surviving the filter, in board order.
    pub tasks: Vec<Task>,
    pub state: CardState,
}

impl ListCard {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Peek preview: the first task and how many more are hidden.
    pub fn preview(&self) -> Option<(&Task, usize)> {
        self.tasks
            .first()
            .map(|first| (first, self.tasks.len().saturating_sub(1)))
    }
}

/// The projected board, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub cards: Vec<ListCard>,
}

/// Projects the snapshot through the filter into the card stack.
pub fn project_board(
    snapshot: &BoardSnapshot,
    filter: &BoardFilter,
    today: NaiveDate,
    expanded: &HashSet<ListId>,
) -> BoardView {
    let needle = filter.search_needle();

    let mut cards = Vec::with_capacity(snapshot.lists.len());
    for entry in &snapshot.lists {
        let mut tasks: Vec<Task> = entry
            .tasks
            .iter()
            .filter(|task| filter.matches(task, today))
            .cloned()
            .collect();

        // Search matched the list name itself: surface its tasks with the
        // status filter only.
        if tasks.is_empty() {
            if let Some(needle) = needle.as_deref() {
                if entry.list.title.to_lowercase().contains(needle) {
                    tasks = entry
                        .tasks
                        .iter()
                        .filter(|task| filter.matches_status_only(task))
                        .cloned()
                        .collect();
                }
            }
        }

        cards.push(ListCard {
            list: entry.list.clone(),
            tasks,
            state: CardState::Collapsed,
        });
    }

    // Stable partition: cards with tasks first, empty cards after.
    cards.sort_by_key(ListCard::is_empty);

    let auto_expand = needle.is_some();
    for card in &mut cards {
        card.state = if card.is_empty() {
            CardState::Collapsed
        } else if auto_expand || expanded.contains(&card.list.uuid) {
            CardState::Expanded
        } else {
            CardState::Peeked
        };
    }

    BoardView { cards }
}

/// Accordion toggle: expanding one card collapses every other one.
///
/// Toggling the already-expanded card leaves nothing expanded.
pub fn toggle_expanded(expanded: &mut HashSet<ListId>, id: ListId) {
    let was_expanded = expanded.contains(&id);
    expanded.clear();
    if !was_expanded {
        expanded.insert(id);
    }
}
