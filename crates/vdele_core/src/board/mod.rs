//! Board presentation logic: filtering, counters and card projection.
//!
//! # Responsibility
//! - Turn a cached board snapshot into the filtered card stack the UI
//!   renders, including the accordion card states.
//! - Compute the status counter badges.
//!
//! # Invariants
//! - All functions are pure over the snapshot; "today" is a parameter.
//! - Counters apply the date filter and search but never the status
//!   filter.

pub mod filter;
pub mod palette;
pub mod view;

pub use filter::{count_board, BoardFilter, DateFilter, StatusCounts, StatusFilter};
pub use palette::category_color;
pub use view::{project_board, toggle_expanded, BoardView, CardState, ListCard};
