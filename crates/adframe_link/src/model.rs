// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain data records: ad sizes, layers, animations, GIF frames.
//!
//! These carry no behavior beyond small accessors. All mutation that has to
//! keep cross-entity invariants goes through [`crate::Project`].

use crate::frame_id::GifFrameId;
use crate::ids::{AdSizeId, GroupId, LayerId};
use adframe_timeline::Clip;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Visual element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerKind {
    /// Text block
    Text,
    /// Bitmap or vector image
    #[default]
    Image,
    /// Call-to-action button
    Button,
    /// Plain shape
    Shape,
    /// Group of elements
    Group,
}

/// Visual effect an animation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationKind {
    /// Opacity ramp
    #[default]
    Fade,
    /// Translate in from / out to an edge
    Slide,
    /// Scale up or down
    Scale,
    /// Spin around the layer's center
    Rotate,
    /// Overshooting scale
    Bounce,
    /// Scale and fade combined
    Zoom,
}

impl AnimationKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fade => "Fade",
            Self::Slide => "Slide",
            Self::Scale => "Scale",
            Self::Rotate => "Rotate",
            Self::Bounce => "Bounce",
            Self::Zoom => "Zoom",
        }
    }
}

/// Whether an animation brings a layer in or takes it out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationMode {
    /// Layer animates in
    #[default]
    Entrance,
    /// Layer animates out
    Exit,
}

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Slow start
    EaseIn,
    /// Slow end
    #[default]
    EaseOut,
    /// Slow start and end
    EaseInOut,
    /// Bounce at the end
    Bounce,
}

/// Slide direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// From/to the left edge
    Left,
    /// From/to the right edge
    Right,
    /// From/to the top edge
    Up,
    /// From/to the bottom edge
    Down,
}

/// Effect-specific parameters. Unused fields stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectParams {
    /// Target scale factor
    pub scale: Option<f32>,
    /// Rotation in degrees
    pub rotation: Option<f32>,
    /// Slide direction
    pub direction: Option<Direction>,
    /// Target opacity (0-1)
    pub opacity: Option<f32>,
}

/// One entrance or exit animation on a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Effect type
    pub kind: AnimationKind,
    /// Entrance or exit
    pub mode: AnimationMode,
    /// Start time in seconds
    pub start_time: f32,
    /// Duration in seconds
    pub duration: f32,
    /// Easing curve
    #[serde(default)]
    pub easing: Easing,
    /// Effect parameters
    #[serde(default)]
    pub params: EffectParams,
    /// Exempt from inbound sync
    #[serde(default)]
    pub overridden: bool,
}

impl Animation {
    /// Create an animation with default easing and parameters
    pub fn new(kind: AnimationKind, mode: AnimationMode, start_time: f32, duration: f32) -> Self {
        Self {
            kind,
            mode,
            start_time,
            duration,
            easing: Easing::default(),
            params: EffectParams::default(),
            overridden: false,
        }
    }

    /// Set easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set effect parameters
    pub fn with_params(mut self, params: EffectParams) -> Self {
        self.params = params;
        self
    }

    /// The animation's interval on the track
    pub fn clip(&self) -> Clip {
        Clip::new(self.start_time, self.duration)
    }

    /// Replace the interval
    pub fn set_clip(&mut self, clip: Clip) {
        self.start_time = clip.start;
        self.duration = clip.duration;
    }

    /// Copy timing fields (mode, start, duration, easing) from `other`
    pub fn copy_timing(&mut self, other: &Animation) {
        self.mode = other.mode;
        self.start_time = other.start_time;
        self.duration = other.duration;
        self.easing = other.easing;
    }
}

/// How a linked layer takes part in sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncMode {
    /// Mirror whole animation slots, list length included
    #[default]
    Full,
    /// Mirror timing only on slots that already exist
    Partial,
    /// Receive nothing
    Independent,
}

/// Link membership written onto a layer by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkInfo {
    /// Group the layer belongs to
    pub group_id: GroupId,
    /// How this member receives sync
    pub sync_mode: SyncMode,
    /// Whether this member is the group's main layer
    pub is_main: bool,
    /// Animation slots kept local during sync
    pub local_overrides: BTreeSet<usize>,
}

impl LinkInfo {
    /// Membership with default sync settings
    pub fn new(group_id: GroupId, is_main: bool) -> Self {
        Self {
            group_id,
            sync_mode: SyncMode::Full,
            is_main,
            local_overrides: BTreeSet::new(),
        }
    }
}

/// A named visual element inside an ad size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique layer ID
    pub id: LayerId,
    /// Layer name, the join key for linking
    pub name: String,
    /// Element type
    #[serde(default)]
    pub kind: LayerKind,
    /// Visible in animation mode
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    /// Locked against timeline edits
    #[serde(default)]
    pub locked: bool,
    /// Ordered animations
    #[serde(default)]
    pub animations: Vec<Animation>,
    /// Link membership
    #[serde(default)]
    pub link: Option<LinkInfo>,
}

fn visible_by_default() -> bool {
    true
}

impl Layer {
    /// Create a visible, unlocked layer without animations
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: LayerId::new(id),
            name: name.into(),
            kind,
            visible: true,
            locked: false,
            animations: Vec::new(),
            link: None,
        }
    }

    /// Add an animation
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    /// Whether the layer is in a link group
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    /// Whether animation slot `index` is kept local during sync
    pub fn is_slot_overridden(&self, index: usize) -> bool {
        self.animations.get(index).is_some_and(|a| a.overridden)
            || self
                .link
                .as_ref()
                .is_some_and(|l| l.local_overrides.contains(&index))
    }

    /// Sync mode, `Full` when unlinked
    pub fn sync_mode(&self) -> SyncMode {
        self.link.as_ref().map(|l| l.sync_mode).unwrap_or_default()
    }
}

/// One fixed-dimension variant of the creative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSize {
    /// Unique ad size ID
    pub id: AdSizeId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Base layer list, bottom to top
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl AdSize {
    /// Create an empty ad size
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: AdSizeId::new(id),
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Add a layer
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Display label such as `300x250`
    pub fn label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Get a layer by ID
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    /// First layer with the given name
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

/// Per-layer, per-frame propagation flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerOverride {
    /// Visibility toggles on this layer stay local to the frame
    pub overridden: bool,
}

/// A still step in an ad size's GIF sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GifFrame {
    /// Frame ID (ad size + frame number)
    pub id: GifFrameId,
    /// Hold time before the frame's animation runs
    pub delay: f32,
    /// Layer list captured when the frame was created
    pub layer_ids: Vec<LayerId>,
    /// Layers hidden in this frame
    pub hidden_layers: BTreeSet<LayerId>,
    /// Propagation flags by layer
    pub overrides: BTreeMap<LayerId, LayerOverride>,
    /// Canonical frame for this position; false for frames created by propagation
    pub source_of_truth: bool,
}

impl GifFrame {
    /// Create a frame showing every layer in `layer_ids`
    pub fn new(id: GifFrameId, layer_ids: Vec<LayerId>, delay: f32) -> Self {
        Self {
            id,
            delay: delay.max(0.0),
            layer_ids,
            hidden_layers: BTreeSet::new(),
            overrides: BTreeMap::new(),
            source_of_truth: false,
        }
    }

    /// Owning ad size
    pub fn ad_size(&self) -> &AdSizeId {
        &self.id.ad_size
    }

    /// Position in the sequence
    pub fn frame_number(&self) -> u32 {
        self.id.frame_number
    }

    /// Whether `layer` is hidden in this frame
    pub fn is_hidden(&self, layer: &LayerId) -> bool {
        self.hidden_layers.contains(layer)
    }

    /// Whether toggles on `layer` stay local
    pub fn is_overridden(&self, layer: &LayerId) -> bool {
        self.overrides.get(layer).is_some_and(|o| o.overridden)
    }

    /// Hide or show `layer`. Returns whether anything changed.
    pub fn set_hidden(&mut self, layer: &LayerId, hidden: bool) -> bool {
        if !self.layer_ids.contains(layer) {
            self.layer_ids.push(layer.clone());
        }
        if hidden {
            self.hidden_layers.insert(layer.clone())
        } else {
            self.hidden_layers.remove(layer)
        }
    }

    /// `total layers - hidden layers`
    pub fn visible_layer_count(&self) -> usize {
        let hidden = self
            .layer_ids
            .iter()
            .filter(|id| self.hidden_layers.contains(*id))
            .count();
        self.layer_ids.len() - hidden
    }

    /// Drop every reference to `layer`
    pub fn forget_layer(&mut self, layer: &LayerId) {
        self.layer_ids.retain(|id| id != layer);
        self.hidden_layers.remove(layer);
        self.overrides.remove(layer);
    }
}
