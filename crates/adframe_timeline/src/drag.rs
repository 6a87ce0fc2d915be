// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag sessions over clip edits.
//!
//! A drag delivers many small deltas. Each one is applied to the clip state
//! left by the previous one, so the final clip equals replaying the deltas in
//! order from the original clip. Deltas carry a sequence number; a gap or a
//! reordering is rejected instead of being applied to a stale state.

use crate::clock::{Clip, ClipEdit, TimelineClock};
use crate::error::TimelineError;

/// An in-progress drag on one clip
#[derive(Debug)]
pub struct ClipDrag {
    edit: ClipEdit,
    origin: Clip,
    current: Clip,
    next_seq: u64,
    open: bool,
}

impl ClipDrag {
    /// Start dragging `clip`
    pub fn begin(edit: ClipEdit, clip: Clip) -> Self {
        tracing::debug!(edit = edit.name(), start = clip.start, duration = clip.duration, "drag begin");
        Self {
            edit,
            origin: clip,
            current: clip,
            next_seq: 0,
            open: true,
        }
    }

    /// Kind of edit this drag performs
    pub fn edit(&self) -> ClipEdit {
        self.edit
    }

    /// Clip state when the drag started
    pub fn origin(&self) -> Clip {
        self.origin
    }

    /// Clip state after the last applied delta
    pub fn current(&self) -> Clip {
        self.current
    }

    /// Sequence number the next delta must carry
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Whether the drag still accepts deltas
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Apply the time delta numbered `seq`
    pub fn apply(
        &mut self,
        clock: &TimelineClock,
        seq: u64,
        delta: f32,
    ) -> Result<Clip, TimelineError> {
        if !self.open {
            return Err(TimelineError::DragClosed);
        }
        if seq != self.next_seq {
            tracing::warn!(expected = self.next_seq, got = seq, "rejecting out-of-order drag delta");
            return Err(TimelineError::OutOfOrderDelta {
                expected: self.next_seq,
                got: seq,
            });
        }

        self.current = clock.apply(self.edit, self.current, delta);
        self.next_seq += 1;
        Ok(self.current)
    }

    /// Apply a pixel delta numbered `seq`
    pub fn apply_pixels(
        &mut self,
        clock: &TimelineClock,
        seq: u64,
        dx: f32,
    ) -> Result<Clip, TimelineError> {
        self.apply(clock, seq, clock.delta_from_pixels(dx))
    }

    /// Commit the drag and return the final clip
    pub fn finish(mut self) -> Clip {
        self.open = false;
        tracing::debug!(deltas = self.next_seq, "drag finished");
        self.current
    }

    /// Abort the drag and return the original clip
    pub fn cancel(mut self) -> Clip {
        self.open = false;
        tracing::debug!("drag cancelled");
        self.origin
    }
}

impl Drop for ClipDrag {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            tracing::debug!(deltas = self.next_seq, "drag released without finish");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_apply_to_current_state() {
        let clock = TimelineClock::new(5.0);
        let start = Clip::new(1.0, 1.0);
        let deltas = [0.5, 0.25, -0.1, 3.0, -0.4];

        let mut drag = ClipDrag::begin(ClipEdit::Move, start);
        for (seq, delta) in deltas.iter().enumerate() {
            drag.apply(&clock, seq as u64, *delta).unwrap();
        }

        let replayed = deltas
            .iter()
            .fold(start, |clip, delta| clock.move_clip(clip, *delta));
        assert_eq!(drag.finish(), replayed);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let clock = TimelineClock::new(5.0);
        let mut drag = ClipDrag::begin(ClipEdit::ResizeRight, Clip::new(0.0, 1.0));
        drag.apply(&clock, 0, 0.5).unwrap();

        let err = drag.apply(&clock, 2, 0.5).unwrap_err();
        assert_eq!(err, TimelineError::OutOfOrderDelta { expected: 1, got: 2 });
        assert_eq!(drag.current().duration, 1.5);

        drag.apply(&clock, 1, 0.5).unwrap();
        assert_eq!(drag.current().duration, 2.0);
    }

    #[test]
    fn test_cancel_restores_origin() {
        let clock = TimelineClock::new(5.0);
        let mut drag = ClipDrag::begin(ClipEdit::ResizeLeft, Clip::new(1.0, 2.0));
        drag.apply(&clock, 0, 0.5).unwrap();
        assert_eq!(drag.cancel(), Clip::new(1.0, 2.0));
    }

    #[test]
    fn test_pixel_deltas_use_clock_width() {
        let mut clock = TimelineClock::new(10.0);
        clock.set_track_width(Some(1000.0));
        let mut drag = ClipDrag::begin(ClipEdit::Move, Clip::new(0.0, 1.0));
        let clip = drag.apply_pixels(&clock, 0, 100.0).unwrap();
        assert!((clip.start - 1.0).abs() < 1e-5);
    }
}
