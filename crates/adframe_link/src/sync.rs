// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation sync across a link group.
//!
//! Editing one member's animations pushes them to the other members:
//!
//! - `Full` members get the source's slots index by index. Slots the member
//!   overrides are kept. The list is truncated or extended to the source's
//!   length, except that overridden slots past the end survive (along with
//!   anything before them) so their indices stay put.
//! - `Partial` members only take timing (mode, start, duration, easing) on
//!   slots both lists have.
//! - `Independent` members are skipped.
//!
//! Running the same sync twice changes nothing the second time.

use crate::ids::{GroupId, LayerId};
use crate::model::{Animation, Layer, SyncMode};
use crate::project::Project;

/// A sync captured before the edit that triggers it is committed.
///
/// If the source layer is unlinked between [`AnimationSyncEngine::prepare`]
/// and [`AnimationSyncEngine::commit`], the ticket is dropped: the unlink
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTicket {
    /// Layer whose animations are pushed
    pub source: LayerId,
    /// Group the source belonged to when the ticket was taken
    pub group: GroupId,
    /// Registry generation when the ticket was taken
    pub generation: u64,
}

/// What a sync did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Members whose animations changed
    pub updated: Vec<LayerId>,
    /// Members already matching the source
    pub unchanged: Vec<LayerId>,
    /// Members skipped because they are `Independent`
    pub independent: Vec<LayerId>,
    /// `(member, slot)` pairs kept because they are overridden
    pub overridden_slots: Vec<(LayerId, usize)>,
    /// Members listed in the group but missing from the project
    pub missing: Vec<LayerId>,
    /// The ticket was dropped because the source was unlinked first
    pub cancelled: bool,
}

impl SyncReport {
    /// Whether any layer changed
    pub fn changed(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// Propagates animation edits to linked layers
#[derive(Debug)]
pub struct AnimationSyncEngine<'p> {
    project: &'p mut Project,
}

impl<'p> AnimationSyncEngine<'p> {
    /// Work on `project`
    pub fn new(project: &'p mut Project) -> Self {
        Self { project }
    }

    /// Push `layer`'s animations to its group right away
    pub fn sync_from(&mut self, layer: &LayerId) -> SyncReport {
        match self.prepare(layer) {
            Some(ticket) => self.commit(&ticket),
            None => SyncReport::default(),
        }
    }

    /// Capture a sync for `layer`. `None` when the layer is not linked.
    pub fn prepare(&self, layer: &LayerId) -> Option<SyncTicket> {
        let links = self.project.links();
        let Some(group) = links.group_of(layer) else {
            tracing::trace!(%layer, "sync: layer not linked");
            return None;
        };
        Some(SyncTicket {
            source: layer.clone(),
            group: group.id,
            generation: links.generation(),
        })
    }

    /// Run a captured sync against the current state of the project
    pub fn commit(&mut self, ticket: &SyncTicket) -> SyncReport {
        let links = self.project.links();
        let still_member = links
            .group_of(&ticket.source)
            .is_some_and(|g| g.id == ticket.group);
        if !still_member || links.unlinked_since(&ticket.source, ticket.generation) {
            tracing::debug!(source = %ticket.source, "sync dropped: source was unlinked");
            return SyncReport {
                cancelled: true,
                ..SyncReport::default()
            };
        }

        let Some(source) = self.project.layer(&ticket.source).map(|l| l.animations.clone()) else {
            tracing::warn!(source = %ticket.source, "sync: source layer missing");
            return SyncReport::default();
        };
        let members = links.linked_layer_ids_of(&ticket.source);

        let mut report = SyncReport::default();
        for member_id in members {
            let Some(member) = self.project.layer_mut(&member_id) else {
                tracing::warn!(member = %member_id, "sync: linked layer missing");
                report.missing.push(member_id);
                continue;
            };

            match member.sync_mode() {
                SyncMode::Independent => {
                    report.independent.push(member_id);
                    continue;
                }
                SyncMode::Full => {
                    let merged = merge_full(&source, member, &member_id, &mut report);
                    record(member, merged, member_id, &mut report);
                }
                SyncMode::Partial => {
                    let merged = merge_partial(&source, member, &member_id, &mut report);
                    record(member, merged, member_id, &mut report);
                }
            }
        }

        tracing::debug!(
            source = %ticket.source,
            updated = report.updated.len(),
            skipped_slots = report.overridden_slots.len(),
            "animations synced"
        );
        report
    }
}

fn record(member: &mut Layer, merged: Vec<Animation>, id: LayerId, report: &mut SyncReport) {
    if member.animations == merged {
        report.unchanged.push(id);
    } else {
        member.animations = merged;
        report.updated.push(id);
    }
}

fn merge_full(
    source: &[Animation],
    member: &Layer,
    member_id: &LayerId,
    report: &mut SyncReport,
) -> Vec<Animation> {
    let last_kept = (0..member.animations.len())
        .rev()
        .find(|i| member.is_slot_overridden(*i));
    let len = source.len().max(last_kept.map_or(0, |i| i + 1));

    (0..len)
        .filter_map(|i| match (source.get(i), member.animations.get(i)) {
            (_, Some(local)) if member.is_slot_overridden(i) => {
                report.overridden_slots.push((member_id.clone(), i));
                Some(local.clone())
            }
            (Some(incoming), _) => Some(Animation {
                overridden: false,
                ..incoming.clone()
            }),
            // Past the source's end but before a kept slot: leave as is.
            (None, local) => local.cloned(),
        })
        .collect()
}

fn merge_partial(
    source: &[Animation],
    member: &Layer,
    member_id: &LayerId,
    report: &mut SyncReport,
) -> Vec<Animation> {
    member
        .animations
        .iter()
        .enumerate()
        .map(|(i, local)| {
            let mut out = local.clone();
            match source.get(i) {
                Some(_) if member.is_slot_overridden(i) => {
                    report.overridden_slots.push((member_id.clone(), i));
                }
                Some(incoming) => out.copy_timing(incoming),
                None => {}
            }
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdSize, AnimationKind, AnimationMode, Easing, LayerKind};

    fn fade(start: f32, duration: f32) -> Animation {
        Animation::new(AnimationKind::Fade, AnimationMode::Entrance, start, duration)
    }

    fn project() -> Project {
        let mut project = Project::new("Spring Sale");
        for n in 1..=3 {
            let ad = AdSize::new(format!("frame-{n}"), 300, 250 * n)
                .with_layer(Layer::new(format!("logo-{n}"), "Logo", LayerKind::Image).with_animation(fade(0.0, 1.0)));
            project.add_ad_size(ad).unwrap();
        }
        project.auto_link();
        project
    }

    fn id(s: &str) -> LayerId {
        LayerId::new(s)
    }

    #[test]
    fn test_full_sync_copies_slots() {
        let mut project = project();
        let edited = fade(0.5, 2.0).with_easing(Easing::Linear);
        project.set_animation(&id("logo-1"), 0, edited.clone()).unwrap();

        let report = project.sync().sync_from(&id("logo-1"));
        assert_eq!(report.updated, vec![id("logo-2"), id("logo-3")]);
        assert_eq!(project.layer(&id("logo-3")).unwrap().animations, vec![edited]);
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut project = project();
        project.set_animation(&id("logo-2"), 0, fade(1.0, 1.5)).unwrap();
        project.sync().sync_from(&id("logo-2"));
        let first = project.clone();

        let report = project.sync().sync_from(&id("logo-2"));
        assert!(!report.changed());
        assert_eq!(project.layer(&id("logo-1")), first.layer(&id("logo-1")));
    }

    #[test]
    fn test_overridden_slot_kept() {
        let mut project = project();
        project.set_animation_overridden(&id("logo-2"), 0, true).unwrap();
        project.set_animation(&id("logo-1"), 0, fade(2.0, 0.5)).unwrap();

        let report = project.sync().sync_from(&id("logo-1"));
        assert_eq!(report.overridden_slots, vec![(id("logo-2"), 0)]);
        let kept = &project.layer(&id("logo-2")).unwrap().animations[0];
        assert_eq!(kept.start_time, 0.0);
        assert!(kept.overridden);
    }

    #[test]
    fn test_length_reconciliation() {
        let mut project = project();
        project
            .add_animation(&id("logo-1"), Animation::new(AnimationKind::Slide, AnimationMode::Exit, 3.0, 1.0))
            .unwrap();
        project.sync().sync_from(&id("logo-1"));
        assert_eq!(project.layer(&id("logo-2")).unwrap().animations.len(), 2);

        project.remove_animation(&id("logo-1"), 1).unwrap();
        project.remove_animation(&id("logo-1"), 0).unwrap();
        project.sync().sync_from(&id("logo-1"));
        assert!(project.layer(&id("logo-3")).unwrap().animations.is_empty());
    }

    #[test]
    fn test_partial_copies_timing_only() {
        let mut project = project();
        project.set_sync_mode(&id("logo-3"), SyncMode::Partial).unwrap();
        project
            .set_animation(
                &id("logo-1"),
                0,
                Animation::new(AnimationKind::Scale, AnimationMode::Entrance, 1.0, 2.0),
            )
            .unwrap();
        project.add_animation(&id("logo-1"), fade(3.5, 1.0)).unwrap();

        project.sync().sync_from(&id("logo-1"));
        let partial = &project.layer(&id("logo-3")).unwrap().animations;
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].kind, AnimationKind::Fade);
        assert_eq!(partial[0].start_time, 1.0);
        assert_eq!(partial[0].duration, 2.0);
    }

    #[test]
    fn test_independent_member_skipped() {
        let mut project = project();
        project.set_sync_mode(&id("logo-2"), SyncMode::Independent).unwrap();
        project.set_animation(&id("logo-1"), 0, fade(0.25, 1.0)).unwrap();

        let report = project.sync().sync_from(&id("logo-1"));
        assert_eq!(report.independent, vec![id("logo-2")]);
        assert_eq!(project.layer(&id("logo-2")).unwrap().animations[0].start_time, 0.0);
    }

    #[test]
    fn test_unlink_beats_pending_sync() {
        let mut project = project();
        let ticket = project.sync().prepare(&id("logo-1")).unwrap();
        project.set_animation(&id("logo-1"), 0, fade(1.0, 1.0)).unwrap();
        project.unlink_layer(&id("logo-1"));

        let report = project.sync().commit(&ticket);
        assert!(report.cancelled);
        assert_eq!(project.layer(&id("logo-2")).unwrap().animations[0].start_time, 0.0);
        assert!(!project.links().is_linked(&id("logo-1")));

        // Relinking is a new action; the old ticket stays dead.
        project.link_layer(&id("logo-1"));
        assert!(project.sync().commit(&ticket).cancelled);
    }

    #[test]
    fn test_unlinked_layer_syncs_nothing() {
        let mut project = project();
        project.unlink_layer(&id("logo-3"));
        let report = project.sync().sync_from(&id("logo-3"));
        assert_eq!(report, SyncReport::default());
    }
}
