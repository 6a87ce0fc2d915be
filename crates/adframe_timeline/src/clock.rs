// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time/pixel mapping and clamped clip edits on a single track.

use serde::{Deserialize, Serialize};

/// Shortest clip the track accepts, in seconds
pub const MIN_CLIP_DURATION: f32 = 0.1;

/// Track width used until the host reports a measured width
pub const NOMINAL_TRACK_WIDTH: f32 = 600.0;

/// Track duration of a new document, in seconds
pub const DEFAULT_TRACK_DURATION: f32 = 5.0;

/// Clamp that tolerates an inverted range; the lower bound wins.
pub(crate) fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// The `(start, duration)` interval of one animation on the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Start time in seconds
    pub start: f32,
    /// Duration in seconds
    pub duration: f32,
}

impl Clip {
    /// Create a clip
    pub fn new(start: f32, duration: f32) -> Self {
        Self { start, duration }
    }

    /// End time in seconds
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Whether `time` falls inside the clip
    pub fn contains(&self, time: f32) -> bool {
        time >= self.start && time < self.end()
    }
}

/// Kind of interactive edit applied to a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipEdit {
    /// Drag the whole clip
    Move,
    /// Drag the left handle
    ResizeLeft,
    /// Drag the right handle
    ResizeRight,
}

impl ClipEdit {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move => "Move",
            Self::ResizeLeft => "Resize Left",
            Self::ResizeRight => "Resize Right",
        }
    }
}

/// Time/position conversion for one track.
///
/// The clock is a value: every edit returns a new [`Clip`] and leaves the
/// clock untouched, so a sequence of edits can be replayed exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineClock {
    /// Track length in seconds
    pub track_duration: f32,
    /// Measured track width in pixels, if known
    track_width: Option<f32>,
    /// Width used while `track_width` is unknown
    nominal_width: f32,
}

impl TimelineClock {
    /// Create a clock with an unmeasured track
    pub fn new(track_duration: f32) -> Self {
        Self {
            track_duration,
            track_width: None,
            nominal_width: NOMINAL_TRACK_WIDTH,
        }
    }

    /// Override the fallback width
    pub fn with_nominal_width(mut self, width: f32) -> Self {
        if width > 0.0 {
            self.nominal_width = width;
        }
        self
    }

    /// Set the measured width; non-positive widths count as unmeasured
    pub fn set_track_width(&mut self, width: Option<f32>) {
        self.track_width = width.filter(|w| *w > 0.0);
    }

    /// Whether the host has reported a real width
    pub fn is_measured(&self) -> bool {
        self.track_width.is_some()
    }

    /// Width used for conversions
    pub fn width(&self) -> f32 {
        self.track_width.unwrap_or(self.nominal_width)
    }

    /// Convert a time to an x offset on the track
    pub fn position_from_time(&self, time: f32) -> f32 {
        if self.track_duration <= 0.0 {
            return 0.0;
        }
        (time / self.track_duration) * self.width()
    }

    /// Convert an x offset to a time, clamped to the track
    pub fn time_from_position(&self, position: f32) -> f32 {
        let time = (position / self.width()) * self.track_duration;
        clamp_range(time, 0.0, self.track_duration)
    }

    /// Convert a pixel delta to a time delta (unclamped)
    pub fn delta_from_pixels(&self, dx: f32) -> f32 {
        (dx / self.width()) * self.track_duration
    }

    /// Move a clip, keeping it inside the track
    pub fn move_clip(&self, clip: Clip, delta: f32) -> Clip {
        let max_start = self.track_duration - clip.duration;
        Clip {
            start: clamp_range(clip.start + delta, 0.0, max_start),
            duration: clip.duration,
        }
    }

    /// Drag the left handle. The right edge stays where it was.
    pub fn resize_left(&self, clip: Clip, delta: f32) -> Clip {
        let end = clip.end();
        let mut start = clip.start + delta;
        let mut duration = clip.duration - delta;

        if duration < MIN_CLIP_DURATION {
            duration = MIN_CLIP_DURATION;
            start = end - MIN_CLIP_DURATION;
        }
        if start < 0.0 {
            start = 0.0;
            duration = end.max(MIN_CLIP_DURATION);
        }

        Clip { start, duration }
    }

    /// Drag the right handle
    pub fn resize_right(&self, clip: Clip, delta: f32) -> Clip {
        let max_duration = self.track_duration - clip.start;
        Clip {
            start: clip.start,
            duration: clamp_range(clip.duration + delta, MIN_CLIP_DURATION, max_duration),
        }
    }

    /// Apply an edit of the given kind
    pub fn apply(&self, edit: ClipEdit, clip: Clip, delta: f32) -> Clip {
        match edit {
            ClipEdit::Move => self.move_clip(clip, delta),
            ClipEdit::ResizeLeft => self.resize_left(clip, delta),
            ClipEdit::ResizeRight => self.resize_right(clip, delta),
        }
    }

    /// Bring an arbitrary clip back inside the track
    pub fn clamp_clip(&self, clip: Clip) -> Clip {
        let duration = clamp_range(clip.duration, MIN_CLIP_DURATION, self.track_duration);
        let start = clamp_range(clip.start, 0.0, self.track_duration - duration);
        Clip { start, duration }
    }
}

impl Default for TimelineClock {
    fn default() -> Self {
        Self::new(DEFAULT_TRACK_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_position_round_trip() {
        let mut clock = TimelineClock::new(5.0);
        clock.set_track_width(Some(437.0));
        for i in 0..=50 {
            let t = i as f32 * 0.1;
            let back = clock.time_from_position(clock.position_from_time(t));
            assert!((back - t).abs() < EPS, "{t} -> {back}");
        }
    }

    #[test]
    fn test_unmeasured_width_falls_back() {
        let mut clock = TimelineClock::new(10.0);
        assert!(!clock.is_measured());
        assert_eq!(clock.position_from_time(5.0), NOMINAL_TRACK_WIDTH / 2.0);

        clock.set_track_width(Some(0.0));
        assert!(!clock.is_measured());

        clock.set_track_width(Some(200.0));
        assert_eq!(clock.position_from_time(5.0), 100.0);
    }

    #[test]
    fn test_time_from_position_clamps() {
        let clock = TimelineClock::new(5.0);
        assert_eq!(clock.time_from_position(-50.0), 0.0);
        assert_eq!(clock.time_from_position(10_000.0), 5.0);
    }

    #[test]
    fn test_move_saturates_at_end() {
        let clock = TimelineClock::new(5.0);
        let clip = Clip::new(1.0, 1.5);
        for delta in [3.0, 10.0, 1e6] {
            let moved = clock.move_clip(clip, delta);
            assert!((moved.start - 3.5).abs() < EPS);
            assert_eq!(moved.duration, 1.5);
        }
        assert_eq!(clock.move_clip(clip, -100.0).start, 0.0);
    }

    #[test]
    fn test_resize_left_pins_min_duration() {
        let clock = TimelineClock::new(5.0);
        let clip = Clip::new(1.0, 1.0);
        let resized = clock.resize_left(clip, 5.0);
        assert!((resized.duration - MIN_CLIP_DURATION).abs() < EPS);
        assert!((resized.end() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_resize_left_clamps_start() {
        let clock = TimelineClock::new(5.0);
        let resized = clock.resize_left(Clip::new(1.0, 1.0), -4.0);
        assert_eq!(resized.start, 0.0);
        assert!((resized.end() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_resize_right_bounds() {
        let clock = TimelineClock::new(5.0);
        let clip = Clip::new(2.0, 1.0);
        assert!((clock.resize_right(clip, 10.0).duration - 3.0).abs() < EPS);
        assert!((clock.resize_right(clip, -10.0).duration - MIN_CLIP_DURATION).abs() < EPS);
    }

    #[test]
    fn test_min_duration_holds_across_edits() {
        let clock = TimelineClock::new(5.0);
        let mut clip = Clip::new(0.5, 2.0);
        let deltas = [0.7, -3.0, 4.2, 1.9, -0.3, 8.0, -8.0, 0.05];
        for (i, delta) in deltas.iter().enumerate() {
            clip = if i % 2 == 0 {
                clock.resize_left(clip, *delta)
            } else {
                clock.resize_right(clip, *delta)
            };
            assert!(clip.duration >= MIN_CLIP_DURATION - EPS);
            assert!(clip.start >= 0.0);
            assert!(clip.end() <= 5.0 + EPS);
        }
    }

    #[test]
    fn test_clamp_clip() {
        let clock = TimelineClock::new(5.0);
        let clip = clock.clamp_clip(Clip::new(4.5, 2.0));
        assert!((clip.start - 3.0).abs() < EPS);
        assert!((clip.duration - 2.0).abs() < EPS);
    }
}
