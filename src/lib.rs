//! Corkboard - an ordered task-board engine for teams.
//!
//! This library provides the core functionality for the `cork` CLI tool:
//! tasks filed into fixed time-frame buckets, integer-rank ordering with
//! drag-style reorder and move operations, optimistic mutation against a
//! pluggable persistence store, a bounded undo ledger for destructive
//! actions, and derived warning flags computed from wall-clock time.

pub mod action_log;
pub mod board;
pub mod cli;
pub mod commands;
pub mod engine;
pub mod gesture;
pub mod models;
pub mod status;
pub mod store;
pub mod undo;

/// Library-level error type for Corkboard operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task {id} is not in the {frame} bucket")]
    UnknownMember { id: String, frame: String },

    #[error("Nothing to undo")]
    UndoEmpty,
}

/// Result type alias for Corkboard operations.
pub type Result<T> = std::result::Result<T, Error>;
