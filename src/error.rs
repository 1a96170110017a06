// error.rs

use crate::task::{TaskId, TaskState};
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Errors returned by task store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// The date or time field did not match `YYYY-MM-DD` / `HH:MM`.
    #[error("invalid date or time format: {input:?}")]
    Validation { input: String },

    /// The parsed due time is not in the future.
    #[error("due time {due_at} is not in the future")]
    PastDue { due_at: NaiveDateTime },

    #[error("no task with id {0}")]
    NotFound(TaskId),

    #[error("cannot move task from {from:?} to {to:?}")]
    InvalidTransition { from: TaskState, to: TaskState },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}
