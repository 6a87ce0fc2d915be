// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export plans handed to encoders.
//!
//! An encoder (GIF, HTML, video) needs an ordered list of frames with
//! resolved dimensions, layer visibility and animation timing. It does not
//! need to know about links or overrides, so a plan is flat plain data.

use crate::error::LinkError;
use crate::frame_id::GifFrameId;
use crate::ids::{AdSizeId, LayerId};
use crate::model::{AdSize, Animation, GifFrame, LayerKind};
use crate::project::Project;
use adframe_timeline::SequencePlan;
use serde::{Deserialize, Serialize};

/// Which playback semantics a plan was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportKind {
    /// One continuous animation
    Animation,
    /// Looping GIF frame sequence
    GifSequence,
}

/// A layer as an encoder sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLayer {
    /// Layer ID
    pub id: LayerId,
    /// Layer name
    pub name: String,
    /// Element type
    pub kind: LayerKind,
    /// Whether the layer is drawn in this frame
    pub visible: bool,
    /// Animations to run while the frame plays
    pub animations: Vec<Animation>,
}

/// One output frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFrame {
    /// Source GIF frame, `None` for the animation plan
    pub frame: Option<GifFrameId>,
    /// Hold time before the animation runs
    pub delay: f32,
    /// Length of the frame's animation
    pub duration: f32,
    /// Start of the frame within the whole output
    pub start_offset: f32,
    /// Layers bottom to top
    pub layers: Vec<ExportLayer>,
}

impl ExportFrame {
    /// `delay + duration`
    pub fn total_duration(&self) -> f32 {
        self.delay + self.duration
    }
}

/// Ordered frames for one ad size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPlan {
    /// Ad size the plan renders
    pub ad_size: AdSizeId,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Playback semantics
    pub kind: ExportKind,
    /// Frames in playback order
    pub frames: Vec<ExportFrame>,
}

impl ExportPlan {
    /// Single-frame plan for the continuous animation of an ad size
    pub fn animation(project: &Project, ad_size: &AdSizeId) -> Result<Self, LinkError> {
        let ad = expect_ad_size(project, ad_size)?;
        let frame = ExportFrame {
            frame: None,
            delay: 0.0,
            duration: project.track_duration(),
            start_offset: 0.0,
            layers: ad
                .layers
                .iter()
                .map(|l| ExportLayer {
                    id: l.id.clone(),
                    name: l.name.clone(),
                    kind: l.kind,
                    visible: l.visible,
                    animations: l.animations.clone(),
                })
                .collect(),
        };
        Ok(Self::from_ad(ad, ExportKind::Animation, vec![frame]))
    }

    /// Plan for an ad size's GIF frames, each running for `track_duration`
    /// after its delay
    pub fn gif_sequence(
        project: &Project,
        ad_size: &AdSizeId,
        track_duration: f32,
    ) -> Result<Self, LinkError> {
        let ad = expect_ad_size(project, ad_size)?;
        let duration = track_duration.max(0.0);

        let mut offset = 0.0;
        let frames = project
            .frames_for(ad_size)
            .into_iter()
            .map(|gif| {
                let frame = ExportFrame {
                    frame: Some(gif.id.clone()),
                    delay: gif.delay,
                    duration,
                    start_offset: offset,
                    layers: frame_layers(ad, gif),
                };
                offset += frame.total_duration();
                frame
            })
            .collect();

        Ok(Self::from_ad(ad, ExportKind::GifSequence, frames))
    }

    /// Total running time of one pass through the plan
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(ExportFrame::total_duration).sum()
    }

    /// The GIF frames of this plan as a playback sequence
    pub fn sequence_plan(&self) -> SequencePlan<GifFrameId> {
        SequencePlan::from_frames(
            self.frames
                .iter()
                .filter_map(|f| f.frame.clone().map(|id| (id, f.delay, f.duration))),
        )
    }

    fn from_ad(ad: &AdSize, kind: ExportKind, frames: Vec<ExportFrame>) -> Self {
        Self {
            ad_size: ad.id.clone(),
            width: ad.width,
            height: ad.height,
            kind,
            frames,
        }
    }
}

fn expect_ad_size<'a>(project: &'a Project, id: &AdSizeId) -> Result<&'a AdSize, LinkError> {
    project
        .ad_size(id)
        .ok_or_else(|| LinkError::UnknownAdSize(id.clone()))
}

/// Ad size layers with this frame's visibility. Layers added after the
/// frame was created are visible.
fn frame_layers(ad: &AdSize, frame: &GifFrame) -> Vec<ExportLayer> {
    ad.layers
        .iter()
        .map(|l| ExportLayer {
            id: l.id.clone(),
            name: l.name.clone(),
            kind: l.kind,
            visible: !frame.is_hidden(&l.id),
            animations: l.animations.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnimationKind, AnimationMode, Layer};

    const EPS: f32 = 1e-4;

    fn project() -> Project {
        let mut project = Project::new("Export");
        let mut hidden = Layer::new("badge", "Badge", LayerKind::Image);
        hidden.visible = false;
        project
            .add_ad_size(
                AdSize::new("frame-1", 300, 250)
                    .with_layer(Layer::new("bg", "Background", LayerKind::Shape).with_animation(
                        Animation::new(AnimationKind::Fade, AnimationMode::Entrance, 0.0, 1.0),
                    ))
                    .with_layer(hidden),
            )
            .unwrap();
        project
    }

    #[test]
    fn test_animation_plan() {
        let project = project();
        let plan = ExportPlan::animation(&project, &AdSizeId::new("frame-1")).unwrap();
        assert_eq!(plan.kind, ExportKind::Animation);
        assert_eq!((plan.width, plan.height), (300, 250));
        assert_eq!(plan.frames.len(), 1);
        assert!(!plan.frames[0].layers[1].visible);
        assert!((plan.total_duration() - 5.0).abs() < EPS);
        assert!(plan.sequence_plan().is_empty());
    }

    #[test]
    fn test_gif_sequence_plan() {
        let mut project = project();
        let ad = AdSizeId::new("frame-1");
        let first = project.add_gif_step(&ad).unwrap();
        let second = project.add_gif_step(&ad).unwrap();
        project.set_frame_delay(&first, 1.0).unwrap();
        project.visibility().toggle_visibility(&second, &LayerId::new("bg")).unwrap();

        let plan = ExportPlan::gif_sequence(&project, &ad, 2.0).unwrap();
        assert_eq!(plan.frames.len(), 2);
        assert!((plan.frames[1].start_offset - 3.0).abs() < EPS);
        assert!((plan.total_duration() - 5.0).abs() < EPS);
        assert!(plan.frames[0].layers[0].visible);
        assert!(!plan.frames[1].layers[0].visible);

        let sequence = plan.sequence_plan();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.locate(4.0).map(|(i, _)| i), Some(1));
    }

    #[test]
    fn test_unknown_ad_size() {
        let project = project();
        assert_eq!(
            ExportPlan::gif_sequence(&project, &AdSizeId::new("frame-7"), 5.0),
            Err(LinkError::UnknownAdSize(AdSizeId::new("frame-7")))
        );
    }
}
