// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline errors.

/// Errors raised by stateful timeline objects.
///
/// Clip arithmetic itself never fails; out-of-range values saturate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// A drag delta arrived with a sequence number other than the next one
    #[error("Out-of-order drag delta: expected #{expected}, got #{got}")]
    OutOfOrderDelta {
        /// Sequence number the drag was waiting for
        expected: u64,
        /// Sequence number that arrived
        got: u64,
    },

    /// The drag session was already finished or cancelled
    #[error("Drag session is closed")]
    DragClosed,
}
