// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback scheduling.
//!
//! [`PlaybackScheduler`] has two mutually exclusive modes:
//!
//! - **Animation**: one track plays from the current time to the end of the
//!   track and stops there.
//! - **GIF sequence**: a list of frames plays in a loop. Each frame holds
//!   still for its delay, then runs the track clock for `track_duration`.
//!
//! The scheduler owns no timer. The host calls [`PlaybackScheduler::on_tick`]
//! with monotonic wall-clock deltas and drains the resulting events with
//! [`PlaybackScheduler::take_events`].

use crate::clock::clamp_range;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Which clock the scheduler is driving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Continuous single animation
    #[default]
    Animation,
    /// Looping frame-by-frame GIF sequence
    GifSequence,
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not ticking
    #[default]
    Stopped,
    /// Ticking
    Playing,
}

/// Something the host should react to after a tick or a seek
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent<K> {
    /// Animation track time changed
    TimeChanged(f32),
    /// Sequence time changed: `local_time` is relative to the active frame
    FrameTime {
        /// Active frame
        frame: K,
        /// Time on the frame's own animation clock
        local_time: f32,
    },
    /// A different GIF frame became active
    ActiveFrameChanged(K),
    /// Animation reached the end of the track
    Finished,
    /// The tick loop stopped; the host must cancel its tick source
    Stopped(PlaybackMode),
}

/// One frame in a GIF sequence plan
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceFrame<K> {
    /// Frame key
    pub key: K,
    /// Hold time before the frame's animation starts
    pub delay: f32,
    /// Length of the frame's own animation clock
    pub duration: f32,
    /// `delay + duration`
    pub total_duration: f32,
    /// Sum of the totals of all earlier frames
    pub start_offset: f32,
}

/// Ordered frames with precomputed offsets
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePlan<K> {
    frames: Vec<SequenceFrame<K>>,
    total: f32,
    /// Every frame runs for the shared track duration
    uniform: bool,
}

impl<K: Clone> SequencePlan<K> {
    /// Build a plan from `(key, delay)` pairs sharing one track duration
    pub fn new(frames: impl IntoIterator<Item = (K, f32)>, track_duration: f32) -> Self {
        let mut plan = Self::from_frames(
            frames
                .into_iter()
                .map(|(key, delay)| (key, delay, track_duration)),
        );
        plan.uniform = true;
        plan
    }

    /// Build a plan from `(key, delay, duration)` triples in playback order
    pub fn from_frames(frames: impl IntoIterator<Item = (K, f32, f32)>) -> Self {
        let mut offset = 0.0;
        let frames: Vec<_> = frames
            .into_iter()
            .map(|(key, delay, duration)| {
                let delay = delay.max(0.0);
                let duration = duration.max(0.0);
                let total_duration = delay + duration;
                let frame = SequenceFrame {
                    key,
                    delay,
                    duration,
                    total_duration,
                    start_offset: offset,
                };
                offset += total_duration;
                frame
            })
            .collect();

        Self {
            frames,
            total: offset,
            uniform: false,
        }
    }

    /// Rebuild offsets for a new track duration.
    ///
    /// Plans built with per-frame durations are returned unchanged.
    pub fn with_track_duration(&self, track_duration: f32) -> Self {
        if !self.uniform {
            return self.clone();
        }
        Self::new(
            self.frames.iter().map(|f| (f.key.clone(), f.delay)),
            track_duration,
        )
    }

    /// Length of one loop of the sequence
    pub fn total_duration(&self) -> f32 {
        self.total
    }

    /// All frames
    pub fn frames(&self) -> &[SequenceFrame<K>] {
        &self.frames
    }

    /// Frame count
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Find the active frame index and its local time at sequence time `t`
    pub fn locate(&self, t: f32) -> Option<(usize, f32)> {
        let last = self.frames.len().checked_sub(1)?;
        let index = self
            .frames
            .iter()
            .position(|f| f.start_offset <= t && t < f.start_offset + f.total_duration)
            .unwrap_or(if t < 0.0 { 0 } else { last });

        let frame = &self.frames[index];
        let local_time = (t - frame.start_offset - frame.delay).max(0.0);
        Some((index, local_time))
    }
}

impl<K> Default for SequencePlan<K> {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            total: 0.0,
            uniform: true,
        }
    }
}

/// Two-mode playback state machine
#[derive(Debug, Clone)]
pub struct PlaybackScheduler<K> {
    mode: PlaybackMode,
    state: PlaybackState,
    track_duration: f32,
    /// Current time on the animation track
    animation_time: f32,
    /// Current time within one loop of the GIF sequence
    sequence_time: f32,
    /// Track/sequence time when the current run started
    initial_track_time: f32,
    /// Wall-clock seconds accumulated since the run started
    elapsed: f32,
    sequence: SequencePlan<K>,
    active_frame: Option<usize>,
    local_time: f32,
    pending_events: Vec<PlaybackEvent<K>>,
}

impl<K: Clone + PartialEq + Debug> PlaybackScheduler<K> {
    /// Create a stopped scheduler
    pub fn new(track_duration: f32) -> Self {
        Self {
            mode: PlaybackMode::Animation,
            state: PlaybackState::Stopped,
            track_duration,
            animation_time: 0.0,
            sequence_time: 0.0,
            initial_track_time: 0.0,
            elapsed: 0.0,
            sequence: SequencePlan::default(),
            active_frame: None,
            local_time: 0.0,
            pending_events: Vec::new(),
        }
    }

    /// Current mode
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the tick loop should keep running
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Track length in seconds
    pub fn track_duration(&self) -> f32 {
        self.track_duration
    }

    /// Animation track time
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }

    /// Time within the current loop of the sequence
    pub fn sequence_time(&self) -> f32 {
        self.sequence_time
    }

    /// Time for the current mode
    pub fn current_time(&self) -> f32 {
        match self.mode {
            PlaybackMode::Animation => self.animation_time,
            PlaybackMode::GifSequence => self.sequence_time,
        }
    }

    /// The GIF sequence plan
    pub fn sequence(&self) -> &SequencePlan<K> {
        &self.sequence
    }

    /// Key of the active GIF frame
    pub fn active_frame(&self) -> Option<&K> {
        self.active_frame
            .and_then(|i| self.sequence.frames().get(i))
            .map(|f| &f.key)
    }

    /// Local time inside the active GIF frame
    pub fn local_time(&self) -> f32 {
        self.local_time
    }

    /// Change the track length. Animation time is clamped to the new length.
    pub fn set_track_duration(&mut self, track_duration: f32) {
        self.track_duration = track_duration.max(0.0);
        self.animation_time = clamp_range(self.animation_time, 0.0, self.track_duration);
        self.sequence = self.sequence.with_track_duration(self.track_duration);
        self.rebase();
    }

    /// Replace the GIF frames, as `(key, delay)` in playback order
    pub fn set_sequence(&mut self, frames: impl IntoIterator<Item = (K, f32)>) {
        let plan = SequencePlan::new(frames, self.track_duration);
        self.set_sequence_plan(plan);
    }

    /// Replace the GIF frames with a prepared plan
    pub fn set_sequence_plan(&mut self, plan: SequencePlan<K>) {
        let previous = self.active_frame().cloned();
        self.sequence = plan;
        self.sequence_time = clamp_range(self.sequence_time, 0.0, self.sequence.total_duration());

        self.active_frame = previous
            .and_then(|key| self.sequence.frames().iter().position(|f| f.key == key));
        if self.active_frame.is_none() && !self.sequence.is_empty() {
            self.active_frame = Some(0);
        }
        self.rebase();
    }

    /// Start ticking in `mode`.
    ///
    /// A loop already running in the other mode is stopped first. Starting
    /// the mode that is already playing does nothing.
    pub fn start(&mut self, mode: PlaybackMode) {
        if self.is_playing() {
            if self.mode == mode {
                return;
            }
            self.stop();
        }

        self.mode = mode;
        if mode == PlaybackMode::Animation && self.animation_time >= self.track_duration {
            self.animation_time = 0.0;
        }
        if mode == PlaybackMode::GifSequence && self.sequence.is_empty() {
            tracing::debug!("no GIF frames to play");
            return;
        }

        self.state = PlaybackState::Playing;
        self.initial_track_time = self.current_time();
        self.elapsed = 0.0;
        tracing::debug!(?mode, from = self.initial_track_time, "playback started");
    }

    /// Stop ticking. The current time is kept.
    pub fn stop(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.state = PlaybackState::Stopped;
        self.pending_events.push(PlaybackEvent::Stopped(self.mode));
        tracing::debug!(mode = ?self.mode, at = self.current_time(), "playback stopped");
    }

    /// Toggle play/pause for `mode`
    pub fn toggle(&mut self, mode: PlaybackMode) {
        if self.is_playing() && self.mode == mode {
            self.stop();
        } else {
            self.start(mode);
        }
    }

    /// Jump to `time` in `mode`. A running loop continues from there.
    pub fn seek(&mut self, mode: PlaybackMode, time: f32) {
        match mode {
            PlaybackMode::Animation => {
                self.animation_time = clamp_range(time, 0.0, self.track_duration);
                self.pending_events
                    .push(PlaybackEvent::TimeChanged(self.animation_time));
            }
            PlaybackMode::GifSequence => {
                let total = self.sequence.total_duration();
                let time = if total > 0.0 && time >= total {
                    time.rem_euclid(total)
                } else {
                    time.max(0.0)
                };
                self.publish_sequence_time(time);
            }
        }
        if self.mode == mode {
            self.rebase();
        }
    }

    /// Advance by `dt` wall-clock seconds
    pub fn on_tick(&mut self, dt: f32) {
        if !self.is_playing() {
            return;
        }
        self.elapsed += dt.max(0.0);
        let t = self.initial_track_time + self.elapsed;

        match self.mode {
            PlaybackMode::Animation => self.tick_animation(t),
            PlaybackMode::GifSequence => self.tick_sequence(t),
        }
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<PlaybackEvent<K>> {
        std::mem::take(&mut self.pending_events)
    }

    fn tick_animation(&mut self, t: f32) {
        if t >= self.track_duration {
            self.animation_time = self.track_duration;
            self.pending_events
                .push(PlaybackEvent::TimeChanged(self.animation_time));
            self.pending_events.push(PlaybackEvent::Finished);
            self.stop();
        } else {
            self.animation_time = t;
            self.pending_events.push(PlaybackEvent::TimeChanged(t));
        }
    }

    fn tick_sequence(&mut self, t: f32) {
        let total = self.sequence.total_duration();
        if total <= 0.0 {
            self.stop();
            return;
        }

        let t = if t >= total {
            // Loop: restart the run from the remainder past the wrap.
            let wrapped = t.rem_euclid(total);
            self.initial_track_time = wrapped;
            self.elapsed = 0.0;
            wrapped
        } else {
            t
        };
        self.publish_sequence_time(t);
    }

    fn publish_sequence_time(&mut self, t: f32) {
        self.sequence_time = t;
        let Some((index, local_time)) = self.sequence.locate(t) else {
            self.active_frame = None;
            self.local_time = 0.0;
            return;
        };

        let key = self.sequence.frames()[index].key.clone();
        if self.active_frame != Some(index) {
            self.active_frame = Some(index);
            self.pending_events
                .push(PlaybackEvent::ActiveFrameChanged(key.clone()));
        }
        self.local_time = local_time;
        self.pending_events
            .push(PlaybackEvent::FrameTime { frame: key, local_time });
    }

    /// Restart the run reference from the current time
    fn rebase(&mut self) {
        self.initial_track_time = self.current_time();
        self.elapsed = 0.0;
    }
}

impl<K: Clone + PartialEq + Debug> Default for PlaybackScheduler<K> {
    fn default() -> Self {
        Self::new(crate::clock::DEFAULT_TRACK_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn three_frames() -> PlaybackScheduler<&'static str> {
        let mut scheduler = PlaybackScheduler::new(5.0);
        scheduler.set_sequence([("a", 2.5), ("b", 2.5), ("c", 2.5)]);
        scheduler
    }

    #[test]
    fn test_plan_offsets() {
        let plan = SequencePlan::new([("a", 1.0), ("b", 0.0)], 2.0);
        assert_eq!(plan.total_duration(), 3.0 + 2.0);
        assert_eq!(plan.frames()[1].start_offset, 3.0);
        assert_eq!(plan.locate(0.5), Some((0, 0.0)));
        assert_eq!(plan.locate(1.5), Some((0, 0.5)));
        assert_eq!(plan.locate(4.0), Some((1, 1.0)));
    }

    #[test]
    fn test_per_frame_durations() {
        let plan = SequencePlan::from_frames([("A", 1.0, 2.0), ("B", 0.0, 3.0)]);
        assert_eq!(plan.total_duration(), 6.0);
        assert_eq!(plan.locate(4.0), Some((1, 1.0)));
        assert_eq!(plan.with_track_duration(10.0), plan);
    }

    #[test]
    fn test_animation_plays_to_end_and_stops() {
        let mut scheduler: PlaybackScheduler<u32> = PlaybackScheduler::new(5.0);
        scheduler.seek(PlaybackMode::Animation, 1.0);
        scheduler.take_events();
        scheduler.start(PlaybackMode::Animation);

        scheduler.on_tick(1.5);
        assert!((scheduler.animation_time() - 2.5).abs() < EPS);
        assert!(scheduler.is_playing());

        scheduler.on_tick(10.0);
        assert_eq!(scheduler.animation_time(), 5.0);
        assert!(!scheduler.is_playing());

        let events = scheduler.take_events();
        assert!(events.contains(&PlaybackEvent::Finished));
        assert_eq!(events.last(), Some(&PlaybackEvent::Stopped(PlaybackMode::Animation)));
    }

    #[test]
    fn test_pause_keeps_time() {
        let mut scheduler: PlaybackScheduler<u32> = PlaybackScheduler::new(5.0);
        scheduler.start(PlaybackMode::Animation);
        scheduler.on_tick(1.25);
        scheduler.stop();
        scheduler.on_tick(1.0);
        assert!((scheduler.animation_time() - 1.25).abs() < EPS);

        scheduler.start(PlaybackMode::Animation);
        scheduler.on_tick(0.5);
        assert!((scheduler.animation_time() - 1.75).abs() < EPS);
    }

    #[test]
    fn test_restart_from_end() {
        let mut scheduler: PlaybackScheduler<u32> = PlaybackScheduler::new(2.0);
        scheduler.start(PlaybackMode::Animation);
        scheduler.on_tick(3.0);
        assert!(!scheduler.is_playing());

        scheduler.start(PlaybackMode::Animation);
        scheduler.on_tick(0.5);
        assert!((scheduler.animation_time() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_sequence_wraps() {
        let mut scheduler = three_frames();
        assert_eq!(scheduler.sequence().total_duration(), 22.5);

        scheduler.start(PlaybackMode::GifSequence);
        scheduler.on_tick(22.6);

        assert!(scheduler.is_playing());
        assert_eq!(scheduler.active_frame(), Some(&"a"));
        assert!((scheduler.sequence_time() - 0.1).abs() < EPS);
        assert_eq!(scheduler.local_time(), 0.0);

        scheduler.on_tick(2.5);
        assert!((scheduler.local_time() - 0.1).abs() < EPS);
    }

    #[test]
    fn test_sequence_wrap_without_delay() {
        let mut scheduler = PlaybackScheduler::new(1.0);
        scheduler.set_sequence([(0u32, 0.0), (1, 0.0)]);
        scheduler.start(PlaybackMode::GifSequence);
        scheduler.on_tick(2.25);
        assert_eq!(scheduler.active_frame(), Some(&0));
        assert!((scheduler.local_time() - 0.25).abs() < EPS);
    }

    #[test]
    fn test_active_frame_changes_reported_once() {
        let mut scheduler = PlaybackScheduler::new(2.0);
        scheduler.set_sequence([("A", 1.0), ("B", 0.0)]);
        scheduler.start(PlaybackMode::GifSequence);

        scheduler.on_tick(1.0);
        scheduler.on_tick(1.0);
        scheduler.on_tick(2.0);
        assert_eq!(scheduler.active_frame(), Some(&"B"));
        assert!((scheduler.local_time() - 1.0).abs() < EPS);

        let changes: Vec<_> = scheduler
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, PlaybackEvent::ActiveFrameChanged(_)))
            .collect();
        assert_eq!(changes, vec![PlaybackEvent::ActiveFrameChanged("B")]);
    }

    #[test]
    fn test_empty_sequence_does_not_start() {
        let mut scheduler: PlaybackScheduler<u32> = PlaybackScheduler::new(5.0);
        scheduler.start(PlaybackMode::GifSequence);
        assert!(!scheduler.is_playing());
    }

    #[test]
    fn test_sequence_stops_when_frames_removed() {
        let mut scheduler = three_frames();
        scheduler.start(PlaybackMode::GifSequence);
        scheduler.set_sequence(Vec::new());
        scheduler.on_tick(0.1);
        assert!(!scheduler.is_playing());
    }

    #[test]
    fn test_mode_switch_stops_previous_loop() {
        let mut scheduler = three_frames();
        scheduler.start(PlaybackMode::Animation);
        scheduler.on_tick(1.0);
        scheduler.take_events();

        scheduler.start(PlaybackMode::GifSequence);
        assert_eq!(scheduler.mode(), PlaybackMode::GifSequence);
        assert_eq!(
            scheduler.take_events(),
            vec![PlaybackEvent::Stopped(PlaybackMode::Animation)]
        );
        assert!((scheduler.animation_time() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_seek_while_playing_rebases() {
        let mut scheduler: PlaybackScheduler<u32> = PlaybackScheduler::new(5.0);
        scheduler.start(PlaybackMode::Animation);
        scheduler.on_tick(1.0);
        scheduler.seek(PlaybackMode::Animation, 3.0);
        scheduler.on_tick(0.5);
        assert!((scheduler.animation_time() - 3.5).abs() < EPS);
    }
}
