// SPDX-License-Identifier: MIT OR Apache-2.0
//! GIF frame visibility toggles mirrored across ad sizes.
//!
//! Frame `n` of every ad size is one logical step of the GIF. Hiding a layer
//! in frame `n` of one ad size hides the same-named layer in frame `n` of the
//! others, unless a per-layer, per-frame override says otherwise:
//!
//! - an override on the toggled layer keeps the change local;
//! - an override on a sibling keeps that sibling out of inbound changes.
//!
//! Siblings are forced to the source's new state rather than toggled, so a
//! sibling that was already in step stays in step. Frames are created on
//! first touch.

use crate::frame_id::GifFrameId;
use crate::ids::{AdSizeId, LayerId};
use crate::project::Project;

/// What a visibility toggle did
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOutcome {
    /// Frame that was toggled
    pub frame: GifFrameId,
    /// Layer that was toggled
    pub layer: LayerId,
    /// New hidden state of the layer in `frame`
    pub hidden: bool,
    /// Visible layers left in `frame`
    pub visible_layer_count: usize,
    /// Whether the toggled layer is overridden in `frame`
    pub overridden: bool,
    /// Sibling frames that were brought in step
    pub propagated: Vec<GifFrameId>,
    /// Ad sizes with no layer of the same name
    pub missing_siblings: Vec<AdSizeId>,
    /// Ad sizes whose matching layer is overridden in its frame
    pub overridden_siblings: Vec<AdSizeId>,
}

/// Toggles layer visibility and override flags in GIF frames
#[derive(Debug)]
pub struct VisibilityOverrideTracker<'p> {
    project: &'p mut Project,
}

impl<'p> VisibilityOverrideTracker<'p> {
    /// Work on `project`
    pub fn new(project: &'p mut Project) -> Self {
        Self { project }
    }

    /// Flip `layer` in `frame` and mirror the result onto sibling frames.
    ///
    /// Returns `None`, changing nothing, when the ad size or the layer does
    /// not exist.
    pub fn toggle_visibility(
        &mut self,
        frame: &GifFrameId,
        layer: &LayerId,
    ) -> Option<VisibilityOutcome> {
        let name = self.layer_name(frame, layer)?;

        let target = self.project.ensure_gif_frame(frame, true)?;
        let hidden = !target.is_hidden(layer);
        target.set_hidden(layer, hidden);
        let overridden = target.is_overridden(layer);
        let visible_layer_count = target.visible_layer_count();

        let mut outcome = VisibilityOutcome {
            frame: frame.clone(),
            layer: layer.clone(),
            hidden,
            visible_layer_count,
            overridden,
            propagated: Vec::new(),
            missing_siblings: Vec::new(),
            overridden_siblings: Vec::new(),
        };

        if overridden {
            tracing::debug!(%frame, %layer, hidden, "visibility changed locally (overridden)");
            return Some(outcome);
        }

        let siblings: Vec<AdSizeId> = self
            .project
            .ad_size_ids()
            .filter(|id| **id != frame.ad_size)
            .cloned()
            .collect();

        for ad_size in siblings {
            let Some(sibling_layer) = self
                .project
                .ad_size(&ad_size)
                .and_then(|a| a.layer_by_name(&name))
                .map(|l| l.id.clone())
            else {
                tracing::debug!(%ad_size, %name, "no matching layer; sibling skipped");
                outcome.missing_siblings.push(ad_size);
                continue;
            };

            let sibling_id = frame.sibling(&ad_size);
            let Some(sibling) = self.project.ensure_gif_frame(&sibling_id, false) else {
                outcome.missing_siblings.push(ad_size);
                continue;
            };
            if sibling.is_overridden(&sibling_layer) {
                outcome.overridden_siblings.push(ad_size);
                continue;
            }
            sibling.set_hidden(&sibling_layer, hidden);
            outcome.propagated.push(sibling_id);
        }

        tracing::debug!(
            %frame,
            %layer,
            hidden,
            propagated = outcome.propagated.len(),
            skipped = outcome.missing_siblings.len(),
            "visibility toggled"
        );
        Some(outcome)
    }

    /// Flip the override flag of `layer` in `frame`. Visibility is untouched.
    ///
    /// Returns the new flag, or `None` when the ad size or layer is unknown.
    pub fn toggle_override(&mut self, frame: &GifFrameId, layer: &LayerId) -> Option<bool> {
        self.layer_name(frame, layer)?;
        let target = self.project.ensure_gif_frame(frame, true)?;
        let entry = target.overrides.entry(layer.clone()).or_default();
        entry.overridden = !entry.overridden;
        tracing::debug!(%frame, %layer, overridden = entry.overridden, "override toggled");
        Some(entry.overridden)
    }

    /// Name of `layer`, provided it lives in the frame's ad size
    fn layer_name(&self, frame: &GifFrameId, layer: &LayerId) -> Option<String> {
        let Some(ad_size) = self.project.ad_size(&frame.ad_size) else {
            tracing::warn!(%frame, "unknown ad size for frame");
            return None;
        };
        let Some(found) = ad_size.layer(layer) else {
            tracing::warn!(%frame, %layer, "layer not in frame's ad size");
            return None;
        };
        Some(found.name.clone())
    }
}
