//! Error types for the board controller, the backend client and the
//! upload pipeline.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::task::{Status, TaskId};

// ── Board ──────────────────────────────────────────────────────

/// Local failures of the board controller. None of these touch the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The column exists as a status but not on the active layout.
    #[error("column not on this board: {0}")]
    ColumnNotFound(Status),

    /// A drag can only start from idle.
    #[error("drag already in progress for task {0}")]
    DragInProgress(TaskId),

    #[error("no drag in progress")]
    NoActiveDrag,
}

// ── Backend ────────────────────────────────────────────────────

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never completed or the response could not be read.
    #[error("network failure: {0}")]
    Network(String),

    /// 4xx, with field errors when the body carried them.
    #[error("validation failed ({status}): {message}")]
    Validation {
        status: u16,
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// 5xx or a body that does not have the expected shape.
    #[error("server failure ({status}): {message}")]
    Server { status: u16, message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

/// Failures of the controller operations that reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

// ── Upload ─────────────────────────────────────────────────────

/// Preconditions checked before a batch starts. Per-file failures are not
/// errors; they end up in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("no files selected")]
    NoFiles,

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

// ── Settings ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
