// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link groups: which layers across ad sizes are "the same element".
//!
//! Grouping is computed by [`compute_groups`], a pure function over the ad
//! sizes, and applied by [`LinkRegistry`]. Iteration order is ad size creation
//! order, then layer order inside each ad size, so the main layer picked for a
//! group is the same on every run.

use crate::ids::{AdSizeId, GroupId, LayerId};
use crate::model::{AdSize, LinkInfo};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A set of same-named layers, at most one per ad size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGroup {
    /// Group ID
    pub id: GroupId,
    /// Shared layer name
    pub name: String,
    /// Members in first-encountered order
    pub members: Vec<LayerId>,
    /// Source-of-truth member
    pub main: LayerId,
}

impl LinkGroup {
    /// Whether `layer` is a member
    pub fn contains(&self, layer: &LayerId) -> bool {
        self.members.contains(layer)
    }

    /// Members other than the main layer
    pub fn secondaries(&self) -> impl Iterator<Item = &LayerId> {
        self.members.iter().filter(move |id| **id != self.main)
    }
}

/// Output of [`compute_groups`]: a candidate group before ids are assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NameGroup {
    /// Shared name
    pub name: String,
    /// Members, first one becomes main
    pub members: Vec<LayerId>,
}

/// Group layers by name across ad sizes.
///
/// Takes the first layer of each name per ad size, skips layers in
/// `detached`, and keeps only names found in at least two ad sizes.
pub fn compute_groups(
    ad_sizes: &IndexMap<AdSizeId, AdSize>,
    detached: &BTreeSet<LayerId>,
) -> Vec<NameGroup> {
    let mut by_name: IndexMap<&str, Vec<LayerId>> = IndexMap::new();

    for ad_size in ad_sizes.values() {
        let mut seen = BTreeSet::new();
        for layer in &ad_size.layers {
            if detached.contains(&layer.id) || !seen.insert(layer.name.as_str()) {
                continue;
            }
            by_name
                .entry(layer.name.as_str())
                .or_default()
                .push(layer.id.clone());
        }
    }

    by_name
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(name, members)| NameGroup {
            name: name.to_string(),
            members,
        })
        .collect()
}

/// Link group bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkRegistry {
    groups: IndexMap<GroupId, LinkGroup>,
    membership: BTreeMap<LayerId, GroupId>,
    /// Layers the user unlinked; auto-link leaves them alone
    detached: BTreeSet<LayerId>,
    /// Generation at which each layer was last unlinked
    last_unlink: BTreeMap<LayerId, u64>,
    generation: u64,
}

impl LinkRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every change to group membership
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All groups
    pub fn groups(&self) -> impl Iterator<Item = &LinkGroup> {
        self.groups.values()
    }

    /// Group count
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Get a group by ID
    pub fn group(&self, id: GroupId) -> Option<&LinkGroup> {
        self.groups.get(&id)
    }

    /// Group containing `layer`
    pub fn group_of(&self, layer: &LayerId) -> Option<&LinkGroup> {
        self.membership.get(layer).and_then(|id| self.groups.get(id))
    }

    /// Whether `layer` is in a group
    pub fn is_linked(&self, layer: &LayerId) -> bool {
        self.membership.contains_key(layer)
    }

    /// Whether `layer` is its group's main layer
    pub fn is_main(&self, layer: &LayerId) -> bool {
        self.group_of(layer).is_some_and(|g| &g.main == layer)
    }

    /// Other members of `layer`'s group
    pub fn linked_layer_ids_of(&self, layer: &LayerId) -> Vec<LayerId> {
        self.group_of(layer)
            .map(|g| g.members.iter().filter(|id| *id != layer).cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `layer` has been unlinked since `generation`
    pub fn unlinked_since(&self, layer: &LayerId, generation: u64) -> bool {
        self.last_unlink.get(layer).is_some_and(|g| *g > generation)
    }

    /// Whether the user explicitly unlinked `layer`
    pub fn is_detached(&self, layer: &LayerId) -> bool {
        self.detached.contains(layer)
    }

    /// Recompute every group from layer names.
    ///
    /// Existing group ids are reused when a candidate contains a layer that
    /// already belonged to a group. Returns the number of groups.
    pub fn auto_link(&mut self, ad_sizes: &mut IndexMap<AdSizeId, AdSize>) -> usize {
        let candidates = compute_groups(ad_sizes, &self.detached);
        let previous = std::mem::take(&mut self.membership);
        self.groups.clear();

        for candidate in candidates {
            let id = candidate
                .members
                .iter()
                .find_map(|layer| previous.get(layer).copied())
                .filter(|id| !self.groups.contains_key(id))
                .unwrap_or_default();

            for layer in &candidate.members {
                self.membership.insert(layer.clone(), id);
            }
            self.groups.insert(
                id,
                LinkGroup {
                    id,
                    name: candidate.name,
                    main: candidate.members[0].clone(),
                    members: candidate.members,
                },
            );
        }

        self.generation += 1;
        self.write_link_info(ad_sizes);
        tracing::info!(groups = self.groups.len(), "auto-linked layers");
        self.groups.len()
    }

    /// Link `layer` with every same-named layer.
    ///
    /// Joins an existing group of that name if there is one, otherwise forms
    /// a new group. Already-linked layers are left as they are. Returns the
    /// group, or `None` when no other layer shares the name or the layer
    /// is not the first of its name in its ad size.
    pub fn link(
        &mut self,
        ad_sizes: &mut IndexMap<AdSizeId, AdSize>,
        layer: &LayerId,
    ) -> Option<GroupId> {
        if let Some(id) = self.membership.get(layer) {
            return Some(*id);
        }
        let Some(name) = find_layer_name(ad_sizes, layer) else {
            tracing::debug!(%layer, "link: unknown layer");
            return None;
        };
        let same_name = layers_named(ad_sizes, &name);
        if !same_name.contains(layer) {
            tracing::debug!(%layer, %name, "link: an earlier layer in its ad size has this name");
            return None;
        }
        self.detached.remove(layer);

        let existing = same_name.iter().find_map(|id| self.membership.get(id).copied());

        let id = match existing {
            Some(id) => {
                if let Some(group) = self.groups.get_mut(&id) {
                    group.members.push(layer.clone());
                }
                self.membership.insert(layer.clone(), id);
                id
            }
            None => {
                let members: Vec<LayerId> = same_name
                    .into_iter()
                    .filter(|id| id == layer || !self.detached.contains(id))
                    .collect();
                if members.len() < 2 {
                    tracing::debug!(%layer, %name, "link: no other layer shares this name");
                    return None;
                }

                let id = GroupId::new();
                for member in &members {
                    self.membership.insert(member.clone(), id);
                }
                self.groups.insert(
                    id,
                    LinkGroup {
                        id,
                        name,
                        main: members[0].clone(),
                        members,
                    },
                );
                id
            }
        };

        self.generation += 1;
        self.write_link_info(ad_sizes);
        tracing::debug!(%layer, group = %id, "layer linked");
        Some(id)
    }

    /// Remove `layer` from its group.
    ///
    /// The rest of the group survives while two or more members remain. A
    /// removed main layer hands the role to the first remaining member.
    /// Returns whether the layer was linked.
    pub fn unlink(&mut self, ad_sizes: &mut IndexMap<AdSizeId, AdSize>, layer: &LayerId) -> bool {
        if !self.remove_member(layer) {
            return false;
        }
        self.detached.insert(layer.clone());
        self.last_unlink.insert(layer.clone(), self.generation);
        self.write_link_info(ad_sizes);
        tracing::debug!(%layer, "layer unlinked");
        true
    }

    /// Drop a deleted layer from the registry without marking it detached
    pub fn forget(&mut self, ad_sizes: &mut IndexMap<AdSizeId, AdSize>, layer: &LayerId) {
        self.detached.remove(layer);
        if self.remove_member(layer) {
            self.last_unlink.insert(layer.clone(), self.generation);
            self.write_link_info(ad_sizes);
        }
    }

    /// Make `layer` the main layer of its group. Returns whether it is linked.
    pub fn set_main(&mut self, ad_sizes: &mut IndexMap<AdSizeId, AdSize>, layer: &LayerId) -> bool {
        let Some(id) = self.membership.get(layer).copied() else {
            return false;
        };
        if let Some(group) = self.groups.get_mut(&id) {
            group.main = layer.clone();
        }
        self.generation += 1;
        self.write_link_info(ad_sizes);
        true
    }

    /// Take `layer` out of its group, dissolving groups left with one member
    fn remove_member(&mut self, layer: &LayerId) -> bool {
        let Some(id) = self.membership.remove(layer) else {
            return false;
        };
        self.generation += 1;

        let Some(group) = self.groups.get_mut(&id) else {
            return true;
        };
        group.members.retain(|m| m != layer);

        if group.members.len() < 2 {
            for member in &group.members {
                self.membership.remove(member);
            }
            tracing::debug!(group = %id, name = %group.name, "link group dissolved");
            self.groups.shift_remove(&id);
        } else if &group.main == layer {
            group.main = group.members[0].clone();
            tracing::debug!(group = %id, main = %group.main, "main layer promoted");
        }
        true
    }

    /// Mirror group membership onto the layers' `LinkInfo`.
    ///
    /// Per-layer settings (sync mode, local overrides) survive as long as the
    /// layer stays in the same group.
    fn write_link_info(&self, ad_sizes: &mut IndexMap<AdSizeId, AdSize>) {
        for layer in ad_sizes.values_mut().flat_map(|a| a.layers.iter_mut()) {
            let Some(group) = self.group_of(&layer.id) else {
                layer.link = None;
                continue;
            };
            let is_main = group.main == layer.id;
            match &mut layer.link {
                Some(info) if info.group_id == group.id => info.is_main = is_main,
                link => *link = Some(LinkInfo::new(group.id, is_main)),
            }
        }
    }
}

fn find_layer_name(ad_sizes: &IndexMap<AdSizeId, AdSize>, layer: &LayerId) -> Option<String> {
    ad_sizes
        .values()
        .find_map(|a| a.layer(layer))
        .map(|l| l.name.clone())
}

/// First layer named `name` in each ad size, in creation order
fn layers_named(ad_sizes: &IndexMap<AdSizeId, AdSize>, name: &str) -> Vec<LayerId> {
    ad_sizes
        .values()
        .filter_map(|a| a.layer_by_name(name))
        .map(|l| l.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layer, LayerKind};

    fn ad_sizes() -> IndexMap<AdSizeId, AdSize> {
        let mut map = IndexMap::new();
        for (n, w, h) in [(1, 300, 250), (2, 728, 90), (3, 160, 600)] {
            let ad = AdSize::new(format!("frame-{n}"), w, h)
                .with_layer(Layer::new(format!("h{n}"), "Headline", LayerKind::Text))
                .with_layer(Layer::new(format!("c{n}"), "CTA", LayerKind::Button));
            map.insert(ad.id.clone(), ad);
        }
        map
    }

    #[test]
    fn test_compute_groups_is_ordered() {
        let ads = ad_sizes();
        let groups = compute_groups(&ads, &BTreeSet::new());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Headline");
        assert_eq!(
            groups[0].members,
            vec![LayerId::new("h1"), LayerId::new("h2"), LayerId::new("h3")]
        );
    }

    #[test]
    fn test_compute_groups_skips_singletons_and_duplicates() {
        let mut ads = ad_sizes();
        ads[0].layers.push(Layer::new("h1b", "Headline", LayerKind::Text));
        ads[1].layers.push(Layer::new("solo", "Badge", LayerKind::Image));

        let groups = compute_groups(&ads, &BTreeSet::new());
        assert_eq!(groups.len(), 2);
        assert!(!groups[0].members.contains(&LayerId::new("h1b")));
    }

    #[test]
    fn test_auto_link_marks_first_as_main() {
        let mut ads = ad_sizes();
        let mut registry = LinkRegistry::new();
        assert_eq!(registry.auto_link(&mut ads), 2);

        assert!(registry.is_main(&LayerId::new("h1")));
        assert!(!registry.is_main(&LayerId::new("h2")));
        let info = ads[1].layers[0].link.as_ref().unwrap();
        assert!(!info.is_main);
        assert_eq!(
            registry.linked_layer_ids_of(&LayerId::new("h2")),
            vec![LayerId::new("h1"), LayerId::new("h3")]
        );
    }

    #[test]
    fn test_auto_link_reuses_group_ids() {
        let mut ads = ad_sizes();
        let mut registry = LinkRegistry::new();
        registry.auto_link(&mut ads);
        let before = registry.group_of(&LayerId::new("h1")).unwrap().id;
        registry.auto_link(&mut ads);
        assert_eq!(registry.group_of(&LayerId::new("h3")).unwrap().id, before);
    }

    #[test]
    fn test_unlink_promotes_main() {
        let mut ads = ad_sizes();
        let mut registry = LinkRegistry::new();
        registry.auto_link(&mut ads);

        assert!(registry.unlink(&mut ads, &LayerId::new("h1")));
        assert!(!registry.is_linked(&LayerId::new("h1")));
        assert!(ads[0].layers[0].link.is_none());
        assert!(registry.is_main(&LayerId::new("h2")));
        assert!(ads[1].layers[0].link.as_ref().unwrap().is_main);
    }

    #[test]
    fn test_unlink_dissolves_pairs() {
        let mut ads = ad_sizes();
        ads.shift_remove(&AdSizeId::new("frame-3"));
        let mut registry = LinkRegistry::new();
        registry.auto_link(&mut ads);

        registry.unlink(&mut ads, &LayerId::new("c2"));
        assert!(!registry.is_linked(&LayerId::new("c1")));
        assert_eq!(registry.group_count(), 1);
    }

    #[test]
    fn test_unlinked_layer_stays_out_of_auto_link() {
        let mut ads = ad_sizes();
        let mut registry = LinkRegistry::new();
        registry.auto_link(&mut ads);
        registry.unlink(&mut ads, &LayerId::new("h3"));

        registry.auto_link(&mut ads);
        assert!(!registry.is_linked(&LayerId::new("h3")));

        let group = registry.link(&mut ads, &LayerId::new("h3"));
        assert_eq!(group, registry.group_of(&LayerId::new("h1")).map(|g| g.id));
        assert!(!registry.is_detached(&LayerId::new("h3")));
    }

    #[test]
    fn test_link_is_noop_when_linked() {
        let mut ads = ad_sizes();
        let mut registry = LinkRegistry::new();
        registry.auto_link(&mut ads);
        let generation = registry.generation();
        registry.link(&mut ads, &LayerId::new("c2"));
        assert_eq!(registry.generation(), generation);
    }

    #[test]
    fn test_link_rejects_second_layer_of_a_name() {
        let mut ads = ad_sizes();
        ads[0].layers.push(Layer::new("h1b", "Headline", LayerKind::Text));
        let h1b = LayerId::new("h1b");

        // No group yet.
        let mut registry = LinkRegistry::new();
        assert_eq!(registry.link(&mut ads, &h1b), None);
        assert!(!registry.is_linked(&h1b));
        assert_eq!(registry.group_count(), 0);

        // Existing group keeps one member per ad size.
        registry.auto_link(&mut ads);
        let generation = registry.generation();
        assert_eq!(registry.link(&mut ads, &h1b), None);
        assert!(!registry.is_linked(&h1b));
        assert_eq!(registry.generation(), generation);
        assert_eq!(
            registry.group_of(&LayerId::new("h1")).unwrap().members,
            vec![LayerId::new("h1"), LayerId::new("h2"), LayerId::new("h3")]
        );
        assert!(ads[0].layers[2].link.is_none());
    }
}
