// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor errors.

use crate::history::HistoryError;
use adframe_link::LinkError;
use adframe_timeline::TimelineError;

/// Errors surfaced by the editor session and its file helpers.
///
/// Unknown layers and frames at the session surface are not errors; they
/// are logged and reported as unchanged.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Entity graph error, in practice a malformed frame id
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Drag ordering error
    #[error("Drag error: {0}")]
    Timeline(#[from] TimelineError),

    /// History error
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON write error
    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A drag call arrived with no drag in progress
    #[error("No clip drag in progress")]
    NoDrag,
}
