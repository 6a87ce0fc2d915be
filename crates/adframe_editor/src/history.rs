// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo over whole-project snapshots.
//!
//! Every recorded edit keeps the bincode-encoded project from before and
//! after it. The history is one list with a cursor: entries left of the
//! cursor can be undone, entries right of it redone. Recording a new edit
//! drops everything right of the cursor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Cursor is at the oldest entry
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Cursor is at the newest entry
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Encoded project state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    data: Vec<u8>,
}

impl StateSnapshot {
    /// Encode a value
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self, HistoryError> {
        Ok(Self {
            data: bincode::serialize(value)?,
        })
    }

    /// Decode the value
    pub fn to_value<T: for<'de> Deserialize<'de>>(&self) -> Result<T, HistoryError> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Encoded size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// One recorded edit
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Sequence number, increasing over the session
    pub seq: u64,
    /// Menu label, e.g. "Move logo-1"
    pub description: String,
    /// Project before the edit
    pub before: StateSnapshot,
    /// Project after the edit
    pub after: StateSnapshot,
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStats {
    /// Entries that can be undone
    pub undo_count: usize,
    /// Entries that can be redone
    pub redo_count: usize,
    /// Bytes held by every kept snapshot
    pub memory_used: usize,
    /// Undoable entries kept at most
    pub max_depth: usize,
}

/// Bounded undo/redo list
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Number of entries currently applied
    cursor: usize,
    next_seq: u64,
    max_depth: usize,
}

impl History {
    /// Keep at most `max_depth` undoable edits (minimum 1)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            next_seq: 1,
            max_depth: max_depth.max(1),
        }
    }

    /// Record an edit and return its sequence number
    pub fn commit(
        &mut self,
        description: impl Into<String>,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> u64 {
        self.entries.truncate(self.cursor);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(HistoryEntry {
            seq,
            description: description.into(),
            before,
            after,
        });

        let excess = self.entries.len().saturating_sub(self.max_depth);
        if excess > 0 {
            self.entries.drain(..excess);
            tracing::trace!(dropped = excess, "history depth reached");
        }
        self.cursor = self.entries.len();
        seq
    }

    /// Step back one edit and return it; restore its `before`
    pub fn undo(&mut self) -> Result<&HistoryEntry, HistoryError> {
        if self.cursor == 0 {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step forward one edit and return it; restore its `after`
    pub fn redo(&mut self) -> Result<&HistoryEntry, HistoryError> {
        let entry = self
            .entries
            .get(self.cursor)
            .ok_or(HistoryError::NothingToRedo)?;
        self.cursor += 1;
        Ok(entry)
    }

    /// Whether an edit can be undone
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether an edit can be redone
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Current counts and memory use
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.cursor,
            redo_count: self.entries.len() - self.cursor,
            memory_used: self
                .entries
                .iter()
                .map(|e| e.before.size() + e.after.size())
                .sum(),
            max_depth: self.max_depth,
        }
    }

    /// Label of the edit `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.description.as_str())
    }

    /// Label of the edit `redo` would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.cursor)
            .map(|e| e.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_depth(crate::config::DEFAULT_HISTORY_DEPTH)
    }
}
