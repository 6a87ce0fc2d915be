// SPDX-License-Identifier: MIT OR Apache-2.0
//! The editing session.
//!
//! [`EditorSession`] is the surface a UI talks to. It owns the project, the
//! undo history and the playback scheduler, and turns calls carrying plain
//! ids and deltas into commands:
//!
//! - clip edits: `move_clip`, `resize_clip_left`, `resize_clip_right`, and
//!   the drag variants that deliver many ordered deltas as one undo step
//! - linking: `link_layer`, `unlink_layer`
//! - GIF frames: `toggle_layer_visibility`, `toggle_layer_override`
//! - playback: `play`, `pause`, `seek`, `tick`
//! - history: `undo`, `redo`
//!
//! Unknown layers and frames are logged and leave the project untouched.
//! Malformed frame ids are the one input error returned to the caller.

use crate::commands::{
    editable_clip, ClipEditCommand, CommandOutcome, EditorCommand, FrameLayerCommand,
    FrameToggle, LinkCommand, SetClipCommand,
};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::history::{History, HistoryError, StateSnapshot};
use adframe_link::{
    AdSizeId, Animation, ExportPlan, GifFrameId, GroupId, LayerId, Project, SyncTicket,
    VisibilityOutcome,
};
use adframe_timeline::{
    Clip, ClipDrag, ClipEdit, PlaybackEvent, PlaybackMode, PlaybackScheduler, TickSource,
    TimelineClock,
};
use std::path::Path;

/// An open drag on one animation
#[derive(Debug)]
struct ActiveDrag {
    layer: LayerId,
    index: usize,
    drag: ClipDrag,
    ticket: Option<SyncTicket>,
}

/// Headless editor state
#[derive(Debug)]
pub struct EditorSession {
    project: Project,
    config: EditorConfig,
    history: History,
    scheduler: PlaybackScheduler<GifFrameId>,
    /// Ad size whose GIF frames play in sequence mode
    active_ad_size: Option<AdSizeId>,
    /// Frame selected by GIF playback
    selected_frame: Option<GifFrameId>,
    track_width: Option<f32>,
    drag: Option<ActiveDrag>,
    events: Vec<PlaybackEvent<GifFrameId>>,
    dirty: bool,
}

impl EditorSession {
    /// Start a session on `project`
    pub fn new(mut project: Project, config: EditorConfig) -> Self {
        project.set_default_gif_delay(config.default_gif_delay);
        let scheduler = PlaybackScheduler::new(project.track_duration());
        let active_ad_size = project.ad_size_ids().next().cloned();

        let mut session = Self {
            history: History::with_max_depth(config.history_depth),
            project,
            config,
            scheduler,
            active_ad_size,
            selected_frame: None,
            track_width: None,
            drag: None,
            events: Vec::new(),
            dirty: false,
        };
        session.refresh_sequence();
        session
    }

    /// Start a session on an empty project
    pub fn empty(name: impl Into<String>, config: EditorConfig) -> Self {
        let mut project = Project::new(name);
        project.set_track_duration(config.track_duration);
        Self::new(project, config)
    }

    /// Load a JSON project.
    ///
    /// Clips are clamped to the track, and link groups are recomputed when
    /// the config asks for it.
    pub fn open(path: &Path, config: EditorConfig) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        let mut project: Project = serde_json::from_str(&content)?;

        project.set_track_duration(project.track_duration());
        if config.auto_link_on_load {
            project.auto_link();
        }
        tracing::info!(
            "Loaded project {:?} from {:?} ({} ad sizes)",
            project.name,
            path,
            project.ad_sizes().count()
        );
        Ok(Self::new(project, config))
    }

    /// Save the project as JSON
    pub fn save(&mut self, path: &Path) -> Result<(), EditorError> {
        std::fs::write(path, self.snapshot_json()?)?;
        self.dirty = false;
        tracing::info!("Saved project to {:?}", path);
        Ok(())
    }

    // ---- state ------------------------------------------------------------

    /// The project
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// The configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether there are unsaved changes
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Copy of the project as plain data
    pub fn snapshot(&self) -> Project {
        self.project.clone()
    }

    /// The project as pretty JSON
    pub fn snapshot_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.project)?)
    }

    /// Clock for the project's track at the current width
    pub fn clock(&self) -> TimelineClock {
        let mut clock = self
            .project
            .clock()
            .with_nominal_width(self.config.nominal_track_width);
        clock.set_track_width(self.track_width);
        clock
    }

    /// Report the measured track width, or `None` before layout
    pub fn set_track_width(&mut self, width: Option<f32>) {
        self.track_width = width;
    }

    // ---- commands ---------------------------------------------------------

    /// Run a command and record it for undo if it changed the project
    pub fn execute(&mut self, command: &dyn EditorCommand) -> Result<CommandOutcome, EditorError> {
        let before = StateSnapshot::from_value(&self.project)?;
        self.execute_from(before, command)
    }

    fn execute_from(
        &mut self,
        before: StateSnapshot,
        command: &dyn EditorCommand,
    ) -> Result<CommandOutcome, EditorError> {
        let outcome = command.execute(&mut self.project)?;
        if outcome.applied() {
            self.record(command.description(), before)?;
        }
        Ok(outcome)
    }

    /// Run a direct project edit as one undo step
    pub fn apply<R>(
        &mut self,
        description: &str,
        edit: impl FnOnce(&mut Project) -> R,
    ) -> Result<R, EditorError> {
        let before = StateSnapshot::from_value(&self.project)?;
        let result = edit(&mut self.project);
        self.record(description.to_string(), before)?;
        Ok(result)
    }

    fn record(&mut self, description: String, before: StateSnapshot) -> Result<(), EditorError> {
        let after = StateSnapshot::from_value(&self.project)?;
        if before == after {
            return Ok(());
        }
        tracing::debug!("{description}");
        self.history.commit(description, before, after);
        self.dirty = true;
        self.refresh_sequence();
        Ok(())
    }

    // ---- clip edits -------------------------------------------------------

    /// Move a clip by `delta` seconds
    pub fn move_clip(
        &mut self,
        layer: &LayerId,
        index: usize,
        delta: f32,
    ) -> Result<Option<Animation>, EditorError> {
        self.edit_clip(ClipEdit::Move, layer, index, delta)
    }

    /// Drag a clip's left handle by `delta` seconds
    pub fn resize_clip_left(
        &mut self,
        layer: &LayerId,
        index: usize,
        delta: f32,
    ) -> Result<Option<Animation>, EditorError> {
        self.edit_clip(ClipEdit::ResizeLeft, layer, index, delta)
    }

    /// Drag a clip's right handle by `delta` seconds
    pub fn resize_clip_right(
        &mut self,
        layer: &LayerId,
        index: usize,
        delta: f32,
    ) -> Result<Option<Animation>, EditorError> {
        self.edit_clip(ClipEdit::ResizeRight, layer, index, delta)
    }

    fn edit_clip(
        &mut self,
        edit: ClipEdit,
        layer: &LayerId,
        index: usize,
        delta: f32,
    ) -> Result<Option<Animation>, EditorError> {
        let command = ClipEditCommand {
            layer: layer.clone(),
            index,
            edit,
            delta,
        };
        Ok(animation_of(self.execute(&command)?))
    }

    /// Start dragging a clip. An open drag is cancelled first.
    ///
    /// Returns the clip at drag start, or `None` when the animation cannot
    /// be edited.
    pub fn begin_clip_drag(
        &mut self,
        layer: &LayerId,
        index: usize,
        edit: ClipEdit,
    ) -> Result<Option<Clip>, EditorError> {
        self.cancel_clip_drag();
        let Some(clip) = editable_clip(&self.project, layer, index) else {
            return Ok(None);
        };
        let ticket = self.project.sync().prepare(layer);
        self.drag = Some(ActiveDrag {
            layer: layer.clone(),
            index,
            drag: ClipDrag::begin(edit, clip),
            ticket,
        });
        Ok(Some(clip))
    }

    /// Apply delta number `seq` (starting at 0) to the open drag.
    ///
    /// The dragged clip is updated live; linked layers follow when the drag
    /// ends. Returns `None` when the animation disappeared mid-drag, which
    /// also closes the drag.
    pub fn drag_clip(&mut self, seq: u64, delta: f32) -> Result<Option<Clip>, EditorError> {
        let clock = self.clock();
        let active = self.drag.as_mut().ok_or(EditorError::NoDrag)?;
        let clip = active.drag.apply(&clock, seq, delta)?;

        match self.project.set_animation_clip(&active.layer, active.index, clip) {
            Ok(_) => Ok(Some(clip)),
            Err(e) if e.is_not_found() => {
                tracing::warn!("drag target vanished: {e}");
                self.drag = None;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a pixel delta to the open drag
    pub fn drag_clip_pixels(&mut self, seq: u64, dx: f32) -> Result<Option<Clip>, EditorError> {
        let delta = self.clock().delta_from_pixels(dx);
        self.drag_clip(seq, delta)
    }

    /// Finish the open drag as one undo step and sync linked layers.
    ///
    /// If the layer was unlinked while dragging, nothing is synced.
    pub fn end_clip_drag(&mut self) -> Result<Option<Animation>, EditorError> {
        let active = self.drag.take().ok_or(EditorError::NoDrag)?;
        let origin = active.drag.origin();
        let edit = active.drag.edit();
        let clip = active.drag.finish();

        // Undo returns to the pre-drag clip, keeping edits made meanwhile.
        let mut baseline = self.project.clone();
        if baseline
            .set_animation_clip(&active.layer, active.index, origin)
            .is_err()
        {
            tracing::warn!(layer = %active.layer, "drag target vanished before release");
            return Ok(None);
        }
        let before = StateSnapshot::from_value(&baseline)?;

        let command = SetClipCommand {
            layer: active.layer,
            index: active.index,
            edit,
            clip,
            ticket: active.ticket,
        };
        Ok(animation_of(self.execute_from(before, &command)?))
    }

    /// Abort the open drag and put the clip back. Returns the restored clip.
    pub fn cancel_clip_drag(&mut self) -> Option<Clip> {
        let active = self.drag.take()?;
        let origin = active.drag.cancel();
        if let Err(e) = self
            .project
            .set_animation_clip(&active.layer, active.index, origin)
        {
            tracing::warn!("drag cancel: {e}");
        }
        Some(origin)
    }

    /// Whether a drag is open
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // ---- linking ----------------------------------------------------------

    /// Link a layer with its same-named siblings
    pub fn link_layer(&mut self, layer: &LayerId) -> Result<Option<GroupId>, EditorError> {
        let command = LinkCommand {
            layer: layer.clone(),
            link: true,
        };
        match self.execute(&command)? {
            CommandOutcome::Linked(group) => Ok(Some(group)),
            _ => Ok(None),
        }
    }

    /// Take a layer out of its group. Returns whether it was linked.
    pub fn unlink_layer(&mut self, layer: &LayerId) -> Result<bool, EditorError> {
        let command = LinkCommand {
            layer: layer.clone(),
            link: false,
        };
        Ok(self.execute(&command)?.applied())
    }

    // ---- GIF frames -------------------------------------------------------

    /// Toggle a layer's visibility in the frame named `frame`
    pub fn toggle_layer_visibility(
        &mut self,
        frame: &str,
        layer: &LayerId,
    ) -> Result<Option<VisibilityOutcome>, EditorError> {
        match self.frame_command(frame, layer, FrameToggle::Visibility)? {
            CommandOutcome::Visibility(outcome) => Ok(Some(outcome)),
            _ => Ok(None),
        }
    }

    /// Toggle a layer's propagation override in the frame named `frame`
    pub fn toggle_layer_override(
        &mut self,
        frame: &str,
        layer: &LayerId,
    ) -> Result<Option<bool>, EditorError> {
        match self.frame_command(frame, layer, FrameToggle::Override)? {
            CommandOutcome::Override(flag) => Ok(Some(flag)),
            _ => Ok(None),
        }
    }

    fn frame_command(
        &mut self,
        frame: &str,
        layer: &LayerId,
        toggle: FrameToggle,
    ) -> Result<CommandOutcome, EditorError> {
        let frame = GifFrameId::parse(frame)?;
        self.execute(&FrameLayerCommand {
            frame,
            layer: layer.clone(),
            toggle,
        })
    }

    /// Append a GIF frame to an ad size
    pub fn add_gif_step(&mut self, ad_size: &AdSizeId) -> Result<Option<GifFrameId>, EditorError> {
        let step = self.apply("Add GIF Frame", |project| project.add_gif_step(ad_size))?;
        Ok(ok_or_log(step))
    }

    /// Set the hold time of the frame named `frame`
    pub fn set_frame_delay(&mut self, frame: &str, delay: f32) -> Result<bool, EditorError> {
        let frame = GifFrameId::parse(frame)?;
        let result = self.apply("Set Frame Delay", |project| project.set_frame_delay(&frame, delay))?;
        Ok(ok_or_log(result).is_some())
    }

    // ---- playback ---------------------------------------------------------

    /// The playback scheduler
    pub fn scheduler(&self) -> &PlaybackScheduler<GifFrameId> {
        &self.scheduler
    }

    /// Ad size used by GIF playback
    pub fn active_ad_size(&self) -> Option<&AdSizeId> {
        self.active_ad_size.as_ref()
    }

    /// Choose the ad size whose frames GIF playback runs through
    pub fn set_active_ad_size(&mut self, ad_size: &AdSizeId) -> bool {
        if self.project.ad_size(ad_size).is_none() {
            tracing::warn!(%ad_size, "unknown ad size");
            return false;
        }
        if self.scheduler.mode() == PlaybackMode::GifSequence {
            self.scheduler.stop();
        }
        self.active_ad_size = Some(ad_size.clone());
        self.refresh_sequence();
        self.drain_scheduler();
        true
    }

    /// GIF frame last made active by playback
    pub fn selected_frame(&self) -> Option<&GifFrameId> {
        self.selected_frame.as_ref()
    }

    /// Start playback in `mode`. The other mode is stopped first.
    pub fn play(&mut self, mode: PlaybackMode) {
        if mode == PlaybackMode::GifSequence {
            self.refresh_sequence();
        }
        self.scheduler.start(mode);
        self.drain_scheduler();
    }

    /// Pause playback, keeping the current time
    pub fn pause(&mut self) {
        self.scheduler.stop();
        self.drain_scheduler();
    }

    /// Jump to `time` in `mode`
    pub fn seek(&mut self, mode: PlaybackMode, time: f32) {
        self.scheduler.seek(mode, time);
        self.drain_scheduler();
    }

    /// Advance playback by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.scheduler.on_tick(dt);
        self.drain_scheduler();
    }

    /// Feed one tick from `source`. Returns whether to keep ticking.
    pub fn pump<S: TickSource + ?Sized>(&mut self, source: &mut S) -> bool {
        let more = adframe_timeline::pump(&mut self.scheduler, source);
        self.drain_scheduler();
        more
    }

    /// Drain playback notifications for the renderer
    pub fn take_events(&mut self) -> Vec<PlaybackEvent<GifFrameId>> {
        std::mem::take(&mut self.events)
    }

    fn drain_scheduler(&mut self) {
        for event in self.scheduler.take_events() {
            if let PlaybackEvent::ActiveFrameChanged(frame) = &event {
                tracing::debug!(%frame, "active GIF frame changed");
                self.selected_frame = Some(frame.clone());
            }
            self.events.push(event);
        }
    }

    /// Rebuild the scheduler's sequence from the active ad size's frames
    fn refresh_sequence(&mut self) {
        self.scheduler.set_track_duration(self.project.track_duration());
        let frames: Vec<(GifFrameId, f32)> = match &self.active_ad_size {
            Some(ad_size) => self
                .project
                .frames_for(ad_size)
                .into_iter()
                .map(|f| (f.id.clone(), f.delay))
                .collect(),
            None => Vec::new(),
        };
        self.scheduler.set_sequence(frames);
    }

    // ---- history ----------------------------------------------------------

    /// Undo the last edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let before = match self.history.undo() {
            Ok(operation) => operation.before.clone(),
            Err(HistoryError::NothingToUndo) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        self.restore(&before)?;
        Ok(true)
    }

    /// Redo the last undone edit. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let after = match self.history.redo() {
            Ok(operation) => operation.after.clone(),
            Err(HistoryError::NothingToRedo) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        self.restore(&after)?;
        Ok(true)
    }

    fn restore(&mut self, snapshot: &StateSnapshot) -> Result<(), EditorError> {
        self.project = snapshot.to_value()?;
        self.drag = None;
        self.dirty = true;
        self.refresh_sequence();
        self.drain_scheduler();
        Ok(())
    }

    // ---- export -----------------------------------------------------------

    /// Export plan for the continuous animation of an ad size
    pub fn export_animation(&self, ad_size: &AdSizeId) -> Result<ExportPlan, EditorError> {
        Ok(ExportPlan::animation(&self.project, ad_size)?)
    }

    /// Export plan for an ad size's GIF frames
    pub fn export_gif(&self, ad_size: &AdSizeId) -> Result<ExportPlan, EditorError> {
        Ok(ExportPlan::gif_sequence(
            &self.project,
            ad_size,
            self.project.track_duration(),
        )?)
    }
}

fn animation_of(outcome: CommandOutcome) -> Option<Animation> {
    match outcome {
        CommandOutcome::Clip { animation, .. } => Some(animation),
        _ => None,
    }
}

/// Turn a not-found store error into a logged `None`
fn ok_or_log<T>(result: Result<T, adframe_link::LinkError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("edit skipped: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adframe_link::{AdSize, AnimationKind, AnimationMode, Layer, LayerKind};

    fn session() -> EditorSession {
        let mut project = Project::new("Session");
        for (n, width) in [(1, 300), (2, 728)] {
            project
                .add_ad_size(
                    AdSize::new(format!("frame-{n}"), width, 250)
                        .with_layer(
                            Layer::new(format!("logo-{n}"), "Logo", LayerKind::Image)
                                .with_animation(Animation::new(
                                    AnimationKind::Fade,
                                    AnimationMode::Entrance,
                                    0.0,
                                    1.0,
                                )),
                        )
                        .with_layer(Layer::new(format!("text-{n}"), "Text", LayerKind::Text)),
                )
                .unwrap();
        }
        project.auto_link();
        EditorSession::new(project, EditorConfig::default())
    }

    fn id(s: &str) -> LayerId {
        LayerId::new(s)
    }

    #[test]
    fn test_move_clip_syncs_and_undoes() {
        let mut session = session();
        let moved = session.move_clip(&id("logo-1"), 0, 1.5).unwrap().unwrap();
        assert_eq!(moved.start_time, 1.5);
        assert_eq!(
            session.project().layer(&id("logo-2")).unwrap().animations[0].start_time,
            1.5
        );
        assert_eq!(session.history().undo_description(), Some("Move logo-1"));

        assert!(session.undo().unwrap());
        assert_eq!(
            session.project().layer(&id("logo-2")).unwrap().animations[0].start_time,
            0.0
        );
        assert!(session.redo().unwrap());
        assert_eq!(
            session.project().layer(&id("logo-1")).unwrap().animations[0].start_time,
            1.5
        );
        assert!(!session.redo().unwrap());
    }

    #[test]
    fn test_unknown_targets_are_noops() {
        let mut session = session();
        assert_eq!(session.move_clip(&id("ghost"), 0, 1.0).unwrap(), None);
        assert_eq!(session.resize_clip_left(&id("logo-1"), 4, 1.0).unwrap(), None);
        assert_eq!(
            session
                .toggle_layer_visibility("gif-frame-frame-1-1", &id("ghost"))
                .unwrap(),
            None
        );
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_invalid_frame_id_is_error() {
        let mut session = session();
        let result = session.toggle_layer_override("gif-frame-frame", &id("logo-1"));
        assert!(matches!(
            result,
            Err(EditorError::Link(adframe_link::LinkError::InvalidFrameId(_)))
        ));
    }

    #[test]
    fn test_saturated_edit_not_recorded() {
        let mut session = session();
        let animation = session.move_clip(&id("logo-1"), 0, -3.0).unwrap().unwrap();
        assert_eq!(animation.start_time, 0.0);
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut session = session();
        session
            .begin_clip_drag(&id("logo-1"), 0, ClipEdit::ResizeRight)
            .unwrap()
            .unwrap();
        session.drag_clip(0, 0.5).unwrap();
        session.drag_clip(1, 0.5).unwrap();
        assert!(matches!(
            session.drag_clip(3, 0.5),
            Err(EditorError::Timeline(_))
        ));
        // Linked layers follow only on release.
        assert_eq!(
            session.project().layer(&id("logo-2")).unwrap().animations[0].duration,
            1.0
        );

        let animation = session.end_clip_drag().unwrap().unwrap();
        assert!((animation.duration - 2.0).abs() < 1e-5);
        assert!(
            (session.project().layer(&id("logo-2")).unwrap().animations[0].duration - 2.0).abs()
                < 1e-5
        );
        assert_eq!(session.history().stats().undo_count, 1);

        session.undo().unwrap();
        assert_eq!(
            session.project().layer(&id("logo-1")).unwrap().animations[0].duration,
            1.0
        );
    }

    #[test]
    fn test_unlink_during_drag_wins() {
        let mut session = session();
        session
            .begin_clip_drag(&id("logo-1"), 0, ClipEdit::Move)
            .unwrap();
        session.drag_clip(0, 2.0).unwrap();
        assert!(session.unlink_layer(&id("logo-1")).unwrap());
        session.end_clip_drag().unwrap();

        assert_eq!(
            session.project().layer(&id("logo-1")).unwrap().animations[0].start_time,
            2.0
        );
        assert_eq!(
            session.project().layer(&id("logo-2")).unwrap().animations[0].start_time,
            0.0
        );
        assert!(!session.project().links().is_linked(&id("logo-1")));
    }

    #[test]
    fn test_cancel_drag_restores_clip() {
        let mut session = session();
        session
            .begin_clip_drag(&id("logo-1"), 0, ClipEdit::ResizeLeft)
            .unwrap();
        session.drag_clip(0, 0.5).unwrap();
        assert_eq!(session.cancel_clip_drag(), Some(Clip::new(0.0, 1.0)));
        assert!(!session.is_dragging());
        assert!(matches!(session.end_clip_drag(), Err(EditorError::NoDrag)));
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_gif_playback_selects_frames() {
        let mut session = session();
        let ad = AdSizeId::new("frame-1");
        session.add_gif_step(&ad).unwrap();
        session.add_gif_step(&ad).unwrap();
        session.set_frame_delay("gif-frame-frame-1-1", 1.0).unwrap();
        session.take_events();

        session.play(PlaybackMode::GifSequence);
        session.tick(6.5);
        assert_eq!(
            session.selected_frame(),
            Some(&GifFrameId::new(ad.clone(), 2))
        );
        assert!(session
            .take_events()
            .iter()
            .any(|e| matches!(e, PlaybackEvent::ActiveFrameChanged(_))));

        session.pause();
        assert!(!session.scheduler().is_playing());
    }

    #[test]
    fn test_snapshot_json() {
        let mut session = session();
        session
            .toggle_layer_visibility("gif-frame-frame-1-1", &id("text-1"))
            .unwrap()
            .unwrap();
        let json = session.snapshot_json().unwrap();
        let restored: Project = serde_json::from_str(&json).unwrap();
        let frame = GifFrameId::new(AdSizeId::new("frame-2"), 1);
        assert!(restored.gif_frame(&frame).unwrap().is_hidden(&id("text-2")));
        assert!(session.has_unsaved_changes());
    }
}
