// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline clock and playback scheduling for adframe.
//!
//! This crate knows nothing about layers or ad sizes. It provides:
//! - Time/pixel conversion for a single animation track
//! - Clamped clip edits (move, resize-left, resize-right)
//! - Ordered drag sessions over those edits
//! - A two-mode playback scheduler (continuous animation, GIF sequence)
//! - Tick sources that feed the scheduler with monotonic deltas
//!
//! ## Architecture
//!
//! Every edit is a pure function of `(clip, delta)`. The only stateful
//! pieces are [`ClipDrag`] and [`PlaybackScheduler`], and neither owns a
//! timer: the host decides how ticks are produced.

pub mod clock;
pub mod drag;
pub mod playback;
pub mod ticker;

mod error;

pub use clock::{
    Clip, ClipEdit, TimelineClock, DEFAULT_TRACK_DURATION, MIN_CLIP_DURATION, NOMINAL_TRACK_WIDTH,
};
pub use drag::ClipDrag;
pub use error::TimelineError;
pub use playback::{
    PlaybackEvent, PlaybackMode, PlaybackScheduler, PlaybackState, SequenceFrame, SequencePlan,
};
pub use ticker::{pump, InstantTicker, ManualTicker, TickLease, TickSource};
