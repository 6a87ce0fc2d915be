// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless banner animation editor.
//!
//! Provides the editing surface over an [`adframe_link::Project`]:
//! - Clip edits and ordered drags with linked-layer sync
//! - Link/unlink and GIF frame visibility toggles
//! - Two-mode playback with a background tick driver
//! - Snapshot-based undo/redo
//! - RON configuration and JSON project files

pub mod commands;
pub mod config;
pub mod driver;
pub mod history;
pub mod session;

mod error;

pub use commands::{CommandOutcome, EditorCommand};
pub use config::EditorConfig;
pub use driver::{SharedSession, ThreadTicker};
pub use error::EditorError;
pub use history::{History, HistoryError};
pub use session::EditorSession;
