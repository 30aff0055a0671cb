//! Core domain logic for the "Я в деле" offline-first to-do board.
//! This crate is the single source of truth for business invariants.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod sync;

pub use board::{
    category_color, count_board, project_board, toggle_expanded, BoardFilter, BoardView,
    CardState, DateFilter, ListCard, StatusCounts, StatusFilter,
};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::list::{BoardSnapshot, ListId, ListWithTasks, TaskList};
pub use model::task::{DuePreset, Task, TaskId, TaskStatus};
pub use repo::board_repo::{load_board, replace_board};
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use search::fts::{search_tasks, SearchError, SearchHit, SearchQuery, SearchResult};
pub use service::list_service::{ListService, ListServiceError};
pub use service::task_service::{TaskService, TaskServiceError};
pub use sync::backend::{BackendError, BackendResult, RemoteBackend, SyncStage};
pub use sync::engine::{SyncEngine, SyncError, SyncReport, SyncStatus};
pub use sync::http_backend::HttpBackend;
pub use sync::op::PendingOp;
pub use sync::queue::{OutboxQueue, QueuedOp, SqliteOutbox};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
