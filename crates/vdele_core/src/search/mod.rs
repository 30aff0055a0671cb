//! Full-text search over cached tasks.
//!
//! # Responsibility
//! - Provide keyword search across task title, description, category and
//!   assignee columns.
//!
//! # Invariants
//! - Only non-deleted tasks are returned.
//! - Result ordering is deterministic by rank and `updated_at`.

pub mod fts;
