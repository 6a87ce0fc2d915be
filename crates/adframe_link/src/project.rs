// SPDX-License-Identifier: MIT OR Apache-2.0
//! The project store.
//!
//! A [`Project`] owns every ad size, GIF frame and link group of a document.
//! The engines in this crate borrow it mutably for the duration of one
//! operation; nothing else writes to its collections directly.
//!
//! Ad sizes keep creation order, which is also the order auto-link uses to
//! pick main layers. Layer ids are unique across the whole project.

use crate::error::LinkError;
use crate::frame_id::GifFrameId;
use crate::ids::{AdSizeId, GroupId, LayerId};
use crate::model::{AdSize, Animation, GifFrame, Layer, SyncMode};
use crate::registry::LinkRegistry;
use crate::sync::AnimationSyncEngine;
use crate::visibility::VisibilityOverrideTracker;
use adframe_timeline::{Clip, TimelineClock, DEFAULT_TRACK_DURATION, MIN_CLIP_DURATION};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A banner document: ad sizes, GIF frames and link groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,
    #[serde(default = "default_track_duration")]
    track_duration: f32,
    #[serde(default)]
    default_gif_delay: f32,
    pub(crate) ad_sizes: IndexMap<AdSizeId, AdSize>,
    #[serde(default)]
    gif_frames: IndexMap<GifFrameId, GifFrame>,
    #[serde(default)]
    links: LinkRegistry,
}

fn default_track_duration() -> f32 {
    DEFAULT_TRACK_DURATION
}

impl Project {
    /// Create an empty project with the default track duration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            track_duration: DEFAULT_TRACK_DURATION,
            default_gif_delay: 0.0,
            ad_sizes: IndexMap::new(),
            gif_frames: IndexMap::new(),
            links: LinkRegistry::new(),
        }
    }

    // ---- timing -----------------------------------------------------------

    /// Length of the animation track in seconds
    pub fn track_duration(&self) -> f32 {
        self.track_duration
    }

    /// Change the track length. Every animation is clamped back inside it.
    pub fn set_track_duration(&mut self, duration: f32) {
        self.track_duration = duration.max(MIN_CLIP_DURATION);
        let clock = self.clock();
        for animation in self
            .ad_sizes
            .values_mut()
            .flat_map(|a| a.layers.iter_mut())
            .flat_map(|l| l.animations.iter_mut())
        {
            animation.set_clip(clock.clamp_clip(animation.clip()));
        }
        tracing::debug!(duration = self.track_duration, "track duration changed");
    }

    /// A clock for this project's track
    pub fn clock(&self) -> TimelineClock {
        TimelineClock::new(self.track_duration)
    }

    /// Delay given to GIF frames created on first touch
    pub fn default_gif_delay(&self) -> f32 {
        self.default_gif_delay
    }

    /// Set the delay for GIF frames created from now on
    pub fn set_default_gif_delay(&mut self, delay: f32) {
        self.default_gif_delay = delay.max(0.0);
    }

    // ---- ad sizes ---------------------------------------------------------

    /// Add an ad size with its layers.
    ///
    /// Animations are clamped to the track. Link info carried by the input is
    /// discarded; call [`Project::auto_link`] or [`Project::link_layer`].
    pub fn add_ad_size(&mut self, mut ad_size: AdSize) -> Result<(), LinkError> {
        if self.ad_sizes.contains_key(&ad_size.id) {
            return Err(LinkError::DuplicateAdSize(ad_size.id));
        }
        for (i, layer) in ad_size.layers.iter().enumerate() {
            if self.contains_layer(&layer.id) || ad_size.layers[..i].iter().any(|l| l.id == layer.id)
            {
                return Err(LinkError::DuplicateLayer(layer.id.clone()));
            }
        }

        let clock = self.clock();
        for layer in &mut ad_size.layers {
            prepare_layer(layer, &clock);
        }

        tracing::debug!(ad_size = %ad_size.id, layers = ad_size.layers.len(), "ad size added");
        self.ad_sizes.insert(ad_size.id.clone(), ad_size);
        Ok(())
    }

    /// Deep-copy an ad size under a new id.
    ///
    /// Copied layers get `<new id>/<old layer id>` ids and join the link
    /// groups of their originals' names. GIF frames are not copied.
    pub fn duplicate_ad_size(
        &mut self,
        source: &AdSizeId,
        new_id: AdSizeId,
        width: u32,
        height: u32,
    ) -> Result<(), LinkError> {
        let original = self
            .ad_sizes
            .get(source)
            .ok_or_else(|| LinkError::UnknownAdSize(source.clone()))?;

        let mut copy = AdSize {
            id: new_id.clone(),
            width,
            height,
            layers: original.layers.clone(),
        };
        for layer in &mut copy.layers {
            layer.id = LayerId(format!("{}/{}", new_id, layer.id));
            for (i, animation) in layer.animations.iter_mut().enumerate() {
                let kept = layer.link.as_ref().is_some_and(|l| l.local_overrides.contains(&i));
                animation.overridden = animation.overridden || kept;
            }
        }
        let new_layers: Vec<LayerId> = copy.layers.iter().map(|l| l.id.clone()).collect();

        self.add_ad_size(copy)?;
        for layer in &new_layers {
            self.links.link(&mut self.ad_sizes, layer);
        }
        tracing::info!(%source, copy = %new_id, "ad size duplicated");
        Ok(())
    }

    /// Remove an ad size, its layers' links and its GIF frames
    pub fn remove_ad_size(&mut self, id: &AdSizeId) -> Result<AdSize, LinkError> {
        let removed = self
            .ad_sizes
            .shift_remove(id)
            .ok_or_else(|| LinkError::UnknownAdSize(id.clone()))?;

        for layer in &removed.layers {
            self.links.forget(&mut self.ad_sizes, &layer.id);
        }
        let before = self.gif_frames.len();
        self.gif_frames.retain(|frame_id, _| &frame_id.ad_size != id);

        tracing::info!(
            ad_size = %id,
            frames = before - self.gif_frames.len(),
            "ad size removed"
        );
        Ok(removed)
    }

    /// Get an ad size
    pub fn ad_size(&self, id: &AdSizeId) -> Option<&AdSize> {
        self.ad_sizes.get(id)
    }

    /// All ad sizes in creation order
    pub fn ad_sizes(&self) -> impl Iterator<Item = &AdSize> {
        self.ad_sizes.values()
    }

    /// All ad size ids in creation order
    pub fn ad_size_ids(&self) -> impl Iterator<Item = &AdSizeId> {
        self.ad_sizes.keys()
    }

    // ---- layers -----------------------------------------------------------

    /// Append a layer to an ad size. Existing GIF frames of that ad size
    /// pick it up as visible.
    pub fn add_layer(&mut self, ad_size: &AdSizeId, mut layer: Layer) -> Result<(), LinkError> {
        if self.contains_layer(&layer.id) {
            return Err(LinkError::DuplicateLayer(layer.id));
        }
        let clock = self.clock();
        let target = self
            .ad_sizes
            .get_mut(ad_size)
            .ok_or_else(|| LinkError::UnknownAdSize(ad_size.clone()))?;

        prepare_layer(&mut layer, &clock);
        for frame in self.gif_frames.values_mut().filter(|f| f.ad_size() == ad_size) {
            frame.layer_ids.push(layer.id.clone());
        }
        tracing::debug!(%ad_size, layer = %layer.id, "layer added");
        target.layers.push(layer);
        Ok(())
    }

    /// Remove a layer, unlinking it and purging it from GIF frames
    pub fn remove_layer(&mut self, id: &LayerId) -> Result<Layer, LinkError> {
        let (ad_index, layer_index) = self
            .locate_layer(id)
            .ok_or_else(|| LinkError::UnknownLayer(id.clone()))?;
        let (ad_id, ad_size) = self
            .ad_sizes
            .get_index_mut(ad_index)
            .ok_or_else(|| LinkError::UnknownLayer(id.clone()))?;
        let ad_id = ad_id.clone();
        let removed = ad_size.layers.remove(layer_index);

        self.links.forget(&mut self.ad_sizes, id);
        for frame in self.gif_frames.values_mut().filter(|f| *f.ad_size() == ad_id) {
            frame.forget_layer(id);
        }
        tracing::debug!(ad_size = %ad_id, layer = %id, "layer removed");
        Ok(removed)
    }

    /// Get a layer from any ad size
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.ad_sizes.values().find_map(|a| a.layer(id))
    }

    pub(crate) fn layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.ad_sizes
            .values_mut()
            .flat_map(|a| a.layers.iter_mut())
            .find(|l| &l.id == id)
    }

    /// Ad size that owns a layer
    pub fn owner_of(&self, id: &LayerId) -> Option<&AdSizeId> {
        self.ad_sizes
            .values()
            .find(|a| a.layer(id).is_some())
            .map(|a| &a.id)
    }

    /// First layer named `name` in an ad size
    pub fn find_layer_by_name(&self, ad_size: &AdSizeId, name: &str) -> Option<&Layer> {
        self.ad_sizes.get(ad_size).and_then(|a| a.layer_by_name(name))
    }

    /// Show or hide a layer in animation mode
    pub fn set_layer_visible(&mut self, id: &LayerId, visible: bool) -> Result<(), LinkError> {
        self.expect_layer(id)?.visible = visible;
        Ok(())
    }

    /// Lock or unlock a layer
    pub fn set_layer_locked(&mut self, id: &LayerId, locked: bool) -> Result<(), LinkError> {
        self.expect_layer(id)?.locked = locked;
        Ok(())
    }

    fn contains_layer(&self, id: &LayerId) -> bool {
        self.locate_layer(id).is_some()
    }

    fn locate_layer(&self, id: &LayerId) -> Option<(usize, usize)> {
        self.ad_sizes.values().enumerate().find_map(|(ad_index, a)| {
            a.layers
                .iter()
                .position(|l| &l.id == id)
                .map(|layer_index| (ad_index, layer_index))
        })
    }

    fn expect_layer(&mut self, id: &LayerId) -> Result<&mut Layer, LinkError> {
        self.layer_mut(id)
            .ok_or_else(|| LinkError::UnknownLayer(id.clone()))
    }

    // ---- animations -------------------------------------------------------

    /// Append an animation, clamped to the track. Returns its index.
    pub fn add_animation(&mut self, id: &LayerId, mut animation: Animation) -> Result<usize, LinkError> {
        animation.set_clip(self.clock().clamp_clip(animation.clip()));
        let layer = self.expect_layer(id)?;
        layer.animations.push(animation);
        Ok(layer.animations.len() - 1)
    }

    /// Remove an animation. Local override marks on later slots move down
    /// with them.
    pub fn remove_animation(&mut self, id: &LayerId, index: usize) -> Result<Animation, LinkError> {
        let layer = self.expect_layer(id)?;
        if index >= layer.animations.len() {
            return Err(LinkError::AnimationIndex {
                layer: id.clone(),
                index,
            });
        }
        let removed = layer.animations.remove(index);
        if let Some(link) = &mut layer.link {
            link.local_overrides = link
                .local_overrides
                .iter()
                .filter(|i| **i != index)
                .map(|i| if *i > index { i - 1 } else { *i })
                .collect();
        }
        Ok(removed)
    }

    /// Replace an animation, clamped to the track
    pub fn set_animation(
        &mut self,
        id: &LayerId,
        index: usize,
        mut animation: Animation,
    ) -> Result<(), LinkError> {
        animation.set_clip(self.clock().clamp_clip(animation.clip()));
        *self.animation_mut(id, index)? = animation;
        Ok(())
    }

    /// Replace an animation's interval, clamped to the track
    pub fn set_animation_clip(
        &mut self,
        id: &LayerId,
        index: usize,
        clip: Clip,
    ) -> Result<Animation, LinkError> {
        let clip = self.clock().clamp_clip(clip);
        let animation = self.animation_mut(id, index)?;
        animation.set_clip(clip);
        Ok(animation.clone())
    }

    /// Get an animation
    pub fn animation(&self, id: &LayerId, index: usize) -> Result<&Animation, LinkError> {
        self.layer(id)
            .ok_or_else(|| LinkError::UnknownLayer(id.clone()))?
            .animations
            .get(index)
            .ok_or_else(|| LinkError::AnimationIndex {
                layer: id.clone(),
                index,
            })
    }

    /// Exempt an animation from inbound sync, or stop exempting it
    pub fn set_animation_overridden(
        &mut self,
        id: &LayerId,
        index: usize,
        overridden: bool,
    ) -> Result<(), LinkError> {
        self.animation_mut(id, index)?.overridden = overridden;
        Ok(())
    }

    fn animation_mut(&mut self, id: &LayerId, index: usize) -> Result<&mut Animation, LinkError> {
        self.expect_layer(id)?
            .animations
            .get_mut(index)
            .ok_or_else(|| LinkError::AnimationIndex {
                layer: id.clone(),
                index,
            })
    }

    // ---- linking ----------------------------------------------------------

    /// The link registry
    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }

    /// Group every same-named layer across ad sizes. Returns the group count.
    pub fn auto_link(&mut self) -> usize {
        self.links.auto_link(&mut self.ad_sizes)
    }

    /// Link a layer with its same-named siblings
    pub fn link_layer(&mut self, id: &LayerId) -> Option<GroupId> {
        self.links.link(&mut self.ad_sizes, id)
    }

    /// Take a layer out of its group. Returns whether it was linked.
    pub fn unlink_layer(&mut self, id: &LayerId) -> bool {
        self.links.unlink(&mut self.ad_sizes, id)
    }

    /// Make a layer the main member of its group
    pub fn set_main_layer(&mut self, id: &LayerId) -> bool {
        self.links.set_main(&mut self.ad_sizes, id)
    }

    /// Set how a linked layer receives sync.
    ///
    /// Returns `Ok(false)` when the layer exists but is not linked.
    pub fn set_sync_mode(&mut self, id: &LayerId, mode: SyncMode) -> Result<bool, LinkError> {
        match &mut self.expect_layer(id)?.link {
            Some(link) => {
                link.sync_mode = mode;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mark or clear an animation slot as local in the layer's link settings
    pub fn set_local_override(
        &mut self,
        id: &LayerId,
        index: usize,
        local: bool,
    ) -> Result<bool, LinkError> {
        match &mut self.expect_layer(id)?.link {
            Some(link) if local => Ok(link.local_overrides.insert(index)),
            Some(link) => Ok(link.local_overrides.remove(&index)),
            None => Ok(false),
        }
    }

    /// Animation sync over this project
    pub fn sync(&mut self) -> AnimationSyncEngine<'_> {
        AnimationSyncEngine::new(self)
    }

    // ---- GIF frames -------------------------------------------------------

    /// Get a GIF frame
    pub fn gif_frame(&self, id: &GifFrameId) -> Option<&GifFrame> {
        self.gif_frames.get(id)
    }

    /// Every GIF frame, in creation order
    pub fn gif_frames(&self) -> impl Iterator<Item = &GifFrame> {
        self.gif_frames.values()
    }

    /// An ad size's GIF frames ordered by frame number
    pub fn frames_for(&self, ad_size: &AdSizeId) -> Vec<&GifFrame> {
        let mut frames: Vec<&GifFrame> = self
            .gif_frames
            .values()
            .filter(|f| f.ad_size() == ad_size)
            .collect();
        frames.sort_by_key(|f| f.frame_number());
        frames
    }

    /// Append a new frame to an ad size's sequence
    pub fn add_gif_step(&mut self, ad_size: &AdSizeId) -> Result<GifFrameId, LinkError> {
        let next = self
            .frames_for(ad_size)
            .last()
            .map_or(1, |f| f.frame_number() + 1);
        let id = GifFrameId::new(ad_size.clone(), next);
        self.ensure_gif_frame(&id, true)
            .ok_or_else(|| LinkError::UnknownAdSize(ad_size.clone()))?;
        Ok(id)
    }

    /// Locate a frame, creating it from the ad size's current layer list on
    /// first touch. `None` when the ad size does not exist.
    pub(crate) fn ensure_gif_frame(
        &mut self,
        id: &GifFrameId,
        source_of_truth: bool,
    ) -> Option<&mut GifFrame> {
        let ad_size = self.ad_sizes.get(&id.ad_size)?;
        let delay = self.default_gif_delay;
        let frame = self.gif_frames.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(frame = %id, source_of_truth, "GIF frame created");
            GifFrame::new(
                id.clone(),
                ad_size.layers.iter().map(|l| l.id.clone()).collect(),
                delay,
            )
        });
        frame.source_of_truth |= source_of_truth;
        Some(frame)
    }

    /// Delete a GIF frame
    pub fn remove_gif_frame(&mut self, id: &GifFrameId) -> Result<GifFrame, LinkError> {
        self.gif_frames
            .shift_remove(id)
            .ok_or_else(|| LinkError::UnknownFrame(id.clone()))
    }

    /// Set a frame's hold time. Negative values become zero.
    pub fn set_frame_delay(&mut self, id: &GifFrameId, delay: f32) -> Result<(), LinkError> {
        let frame = self
            .gif_frames
            .get_mut(id)
            .ok_or_else(|| LinkError::UnknownFrame(id.clone()))?;
        frame.delay = delay.max(0.0);
        Ok(())
    }

    /// Visibility toggles over this project
    pub fn visibility(&mut self) -> VisibilityOverrideTracker<'_> {
        VisibilityOverrideTracker::new(self)
    }
}

/// Clamp a new layer's animations and drop stale link info
fn prepare_layer(layer: &mut Layer, clock: &TimelineClock) {
    layer.link = None;
    for animation in &mut layer.animations {
        animation.set_clip(clock.clamp_clip(animation.clip()));
    }
}
