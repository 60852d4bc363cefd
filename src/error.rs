//! Error types for tick.
//!
//! The task model itself never fails: lookups return `Option` and illegal
//! completion toggles are ignored. Errors only come out of the storage layer
//! and the command-line workflows built on top of it.

use thiserror::Error;

/// Main error type for tick operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date/time '{0}'. Use YYYY-MM-DD HH:MM.")]
    InvalidDateTime(String),

    #[error("Task {0} not found.")]
    TaskNotFound(String),

    #[error("Task id '{0}' matches more than one task.")]
    AmbiguousId(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Task {0} has already started and can no longer be edited.")]
    NotEditable(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for tick operations
pub type Result<T> = std::result::Result<T, Error>;
