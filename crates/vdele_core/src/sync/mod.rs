//! Offline-first synchronization subsystem.
//!
//! # Responsibility
//! - Record every local mutation in a durable outbox queue.
//! - Replay queued mutations against the remote spreadsheet backend and
//!   refresh the local cache from remote snapshots.
//!
//! # Invariants
//! - Queue replay is strictly FIFO.
//! - A retryable failure stops replay and leaves the op queued.
//! - The cache is only replaced after the queue has fully drained.

pub mod backend;
pub mod engine;
pub mod http_backend;
pub mod op;
pub mod queue;
