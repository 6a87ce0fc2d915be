// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor commands.
//!
//! A command is one user-level edit against the [`Project`]. The session
//! snapshots the project around [`EditorCommand::execute`] and records the
//! pair in the undo history when anything changed.
//!
//! Commands that name a layer, frame or animation that does not exist log
//! the miss and return [`CommandOutcome::Unchanged`].

use crate::error::EditorError;
use adframe_link::{
    Animation, GifFrameId, GroupId, LayerId, Project, SyncReport, SyncTicket, VisibilityOutcome,
};
use adframe_timeline::{Clip, ClipEdit};

/// Trait for editor commands that can be undone/redone
pub trait EditorCommand: Send + Sync {
    /// Get a description of this command
    fn description(&self) -> String;

    /// Execute the command
    fn execute(&self, project: &mut Project) -> Result<CommandOutcome, EditorError>;
}

/// What a command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A clip changed; carries the resulting animation and the sync it caused
    Clip {
        /// Animation after the edit
        animation: Animation,
        /// Propagation to linked layers
        sync: SyncReport,
    },
    /// Layer is in this group
    Linked(GroupId),
    /// Layer left its group
    Unlinked,
    /// A visibility toggle ran
    Visibility(VisibilityOutcome),
    /// Override flag after the toggle
    Override(bool),
    /// Nothing to do
    Unchanged,
}

impl CommandOutcome {
    /// Whether the command reached its target
    pub fn applied(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Apply a time delta to one animation's clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipEditCommand {
    /// Layer that owns the animation
    pub layer: LayerId,
    /// Animation index on the layer
    pub index: usize,
    /// Kind of edit
    pub edit: ClipEdit,
    /// Time delta in seconds
    pub delta: f32,
}

impl EditorCommand for ClipEditCommand {
    fn description(&self) -> String {
        format!("{} {}", self.edit.name(), self.layer)
    }

    fn execute(&self, project: &mut Project) -> Result<CommandOutcome, EditorError> {
        let Some(current) = editable_clip(project, &self.layer, self.index) else {
            return Ok(CommandOutcome::Unchanged);
        };
        let clip = project.clock().apply(self.edit, current, self.delta);
        set_clip_and_sync(project, &self.layer, self.index, clip, None)
    }
}

/// Set one animation's clip to the result of a finished drag
#[derive(Debug, Clone, PartialEq)]
pub struct SetClipCommand {
    /// Layer that owns the animation
    pub layer: LayerId,
    /// Animation index on the layer
    pub index: usize,
    /// Kind of edit that produced the clip
    pub edit: ClipEdit,
    /// Final clip
    pub clip: Clip,
    /// Sync captured when the drag started
    pub ticket: Option<SyncTicket>,
}

impl EditorCommand for SetClipCommand {
    fn description(&self) -> String {
        format!("{} {}", self.edit.name(), self.layer)
    }

    fn execute(&self, project: &mut Project) -> Result<CommandOutcome, EditorError> {
        if editable_clip(project, &self.layer, self.index).is_none() {
            return Ok(CommandOutcome::Unchanged);
        }
        set_clip_and_sync(project, &self.layer, self.index, self.clip, self.ticket.as_ref())
    }
}

/// Link or unlink a layer
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCommand {
    /// Target layer
    pub layer: LayerId,
    /// `true` to link, `false` to unlink
    pub link: bool,
}

impl EditorCommand for LinkCommand {
    fn description(&self) -> String {
        let verb = if self.link { "Link" } else { "Unlink" };
        format!("{verb} {}", self.layer)
    }

    fn execute(&self, project: &mut Project) -> Result<CommandOutcome, EditorError> {
        if project.layer(&self.layer).is_none() {
            tracing::warn!(layer = %self.layer, "link: unknown layer");
            return Ok(CommandOutcome::Unchanged);
        }
        let outcome = if self.link {
            project
                .link_layer(&self.layer)
                .map_or(CommandOutcome::Unchanged, CommandOutcome::Linked)
        } else if project.unlink_layer(&self.layer) {
            CommandOutcome::Unlinked
        } else {
            CommandOutcome::Unchanged
        };
        Ok(outcome)
    }
}

/// Which per-frame flag a [`FrameLayerCommand`] flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameToggle {
    /// Hidden/visible, mirrored to sibling frames
    Visibility,
    /// Propagation override
    Override,
}

/// Toggle a layer's visibility or override flag in one GIF frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayerCommand {
    /// Target frame
    pub frame: GifFrameId,
    /// Target layer
    pub layer: LayerId,
    /// Flag to flip
    pub toggle: FrameToggle,
}

impl EditorCommand for FrameLayerCommand {
    fn description(&self) -> String {
        match self.toggle {
            FrameToggle::Visibility => format!("Toggle {} in {}", self.layer, self.frame),
            FrameToggle::Override => format!("Override {} in {}", self.layer, self.frame),
        }
    }

    fn execute(&self, project: &mut Project) -> Result<CommandOutcome, EditorError> {
        let mut tracker = project.visibility();
        let outcome = match self.toggle {
            FrameToggle::Visibility => tracker
                .toggle_visibility(&self.frame, &self.layer)
                .map(CommandOutcome::Visibility),
            FrameToggle::Override => tracker
                .toggle_override(&self.frame, &self.layer)
                .map(CommandOutcome::Override),
        };
        Ok(outcome.unwrap_or(CommandOutcome::Unchanged))
    }
}

/// Current clip of an animation that may be edited.
///
/// `None` (logged) when the layer or animation is missing or the layer is
/// locked.
pub(crate) fn editable_clip(project: &Project, layer: &LayerId, index: usize) -> Option<Clip> {
    let Some(found) = project.layer(layer) else {
        tracing::warn!(%layer, "clip edit: unknown layer");
        return None;
    };
    if found.locked {
        tracing::debug!(%layer, "clip edit: layer is locked");
        return None;
    }
    match found.animations.get(index) {
        Some(animation) => Some(animation.clip()),
        None => {
            tracing::warn!(%layer, index, "clip edit: no such animation");
            None
        }
    }
}

fn set_clip_and_sync(
    project: &mut Project,
    layer: &LayerId,
    index: usize,
    clip: Clip,
    ticket: Option<&SyncTicket>,
) -> Result<CommandOutcome, EditorError> {
    let animation = match project.set_animation_clip(layer, index, clip) {
        Ok(animation) => animation,
        Err(e) if e.is_not_found() => {
            tracing::warn!("clip edit skipped: {e}");
            return Ok(CommandOutcome::Unchanged);
        }
        Err(e) => return Err(e.into()),
    };
    let sync = match ticket {
        Some(ticket) => project.sync().commit(ticket),
        None => project.sync().sync_from(layer),
    };
    Ok(CommandOutcome::Clip { animation, sync })
}
