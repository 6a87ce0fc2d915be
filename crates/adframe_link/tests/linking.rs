// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cross-component scenarios over a three-size project.

use adframe_link::{
    AdSize, AdSizeId, Animation, AnimationKind, AnimationMode, Easing, GifFrameId, Layer,
    LayerId, LayerKind, LinkError, Project,
};

fn banner() -> Project {
    let mut project = Project::new("Autumn Launch");
    let sizes = [("frame-1", 300, 250), ("frame-2", 728, 90), ("frame-3", 160, 600)];
    for (n, (id, width, height)) in sizes.into_iter().enumerate() {
        let n = n + 1;
        let mut ad = AdSize::new(id, width, height)
            .with_layer(
                Layer::new(format!("headline-{n}"), "Headline", LayerKind::Text).with_animation(
                    Animation::new(AnimationKind::Slide, AnimationMode::Entrance, 0.0, 1.0),
                ),
            )
            .with_layer(Layer::new(format!("logo-{n}"), "Logo", LayerKind::Image));
        if n != 3 {
            ad = ad.with_layer(Layer::new(format!("cta-{n}"), "CTA", LayerKind::Button));
        }
        project.add_ad_size(ad).unwrap();
    }
    project.auto_link();
    project
}

fn id(s: &str) -> LayerId {
    LayerId::new(s)
}

#[test]
fn test_link_unlink_symmetry() {
    let mut project = banner();
    let a = id("headline-1");
    assert!(project.links().is_linked(&a));

    assert!(project.unlink_layer(&a));
    assert!(!project.links().is_linked(&a));
    assert!(project.layer(&a).unwrap().link.is_none());

    // Two Headlines remain, so their group survives.
    assert!(project.links().is_linked(&id("headline-2")));
    assert_eq!(
        project.links().linked_layer_ids_of(&id("headline-2")),
        vec![id("headline-3")]
    );

    let group = project.link_layer(&a).unwrap();
    assert_eq!(project.links().group_of(&id("headline-3")).unwrap().id, group);
    assert!(project.unlink_layer(&a));
    assert!(!project.links().is_linked(&a));
}

#[test]
fn test_exactly_one_main_per_group() {
    let mut project = banner();
    project.unlink_layer(&id("logo-1"));
    project.set_main_layer(&id("cta-2"));

    for group in project.links().groups() {
        let mains = group
            .members
            .iter()
            .filter(|m| project.layer(m).and_then(|l| l.link.as_ref()).is_some_and(|l| l.is_main))
            .count();
        assert_eq!(mains, 1, "group {}", group.name);
    }
}

#[test]
fn test_sync_respects_overrides() {
    let mut project = banner();
    let a = id("headline-1");
    let b = id("headline-2");
    let edited = Animation::new(AnimationKind::Zoom, AnimationMode::Entrance, 0.5, 1.5)
        .with_easing(Easing::EaseInOut);

    project.set_animation_overridden(&b, 0, true).unwrap();
    let before = project.layer(&b).unwrap().animations.clone();
    project.set_animation(&a, 0, edited.clone()).unwrap();
    project.sync().sync_from(&a);
    assert_eq!(project.layer(&b).unwrap().animations, before);

    project.set_animation_overridden(&b, 0, false).unwrap();
    project.sync().sync_from(&a);
    assert_eq!(project.layer(&b).unwrap().animations, vec![edited]);
}

#[test]
fn test_visibility_propagation() {
    let mut project = banner();
    let source: GifFrameId = "gif-frame-frame-1-2".parse().unwrap();
    let sibling: GifFrameId = "gif-frame-frame-2-2".parse().unwrap();

    let outcome = project
        .visibility()
        .toggle_visibility(&source, &id("logo-1"))
        .unwrap();
    assert!(outcome.hidden);
    assert!(project.gif_frame(&sibling).unwrap().is_hidden(&id("logo-2")));
    assert!(project
        .gif_frame(&"gif-frame-frame-3-2".parse().unwrap())
        .unwrap()
        .is_hidden(&id("logo-3")));
    assert!(project.gif_frame(&source).unwrap().source_of_truth);

    // CTA only exists in two sizes; the third is skipped, not an error.
    let outcome = project
        .visibility()
        .toggle_visibility(&source, &id("cta-1"))
        .unwrap();
    assert_eq!(outcome.missing_siblings, vec![AdSizeId::new("frame-3")]);
}

#[test]
fn test_override_blocks_propagation() {
    let mut project = banner();
    let source: GifFrameId = "gif-frame-frame-1-2".parse().unwrap();
    let sibling: GifFrameId = "gif-frame-frame-2-2".parse().unwrap();

    project.visibility().toggle_override(&source, &id("logo-1"));
    project.visibility().toggle_visibility(&source, &id("logo-1"));

    assert!(project.gif_frame(&source).unwrap().is_hidden(&id("logo-1")));
    assert!(project.gif_frame(&sibling).is_none());
}

#[test]
fn test_lazy_frames_are_unique() {
    let mut project = banner();
    let frame: GifFrameId = "gif-frame-frame-2-1".parse().unwrap();
    project.visibility().toggle_visibility(&frame, &id("logo-2"));
    project.visibility().toggle_visibility(&frame, &id("logo-2"));
    project
        .visibility()
        .toggle_visibility(&"gif-frame-frame-1-1".parse().unwrap(), &id("cta-1"));

    let ids: Vec<String> = project.gif_frames().map(|f| f.id.to_string()).collect();
    assert_eq!(
        ids,
        vec![
            "gif-frame-frame-2-1",
            "gif-frame-frame-1-1",
            "gif-frame-frame-3-1"
        ]
    );
}

#[test]
fn test_invalid_frame_id() {
    assert!(matches!(
        "gif-frame-frame-1".parse::<GifFrameId>(),
        Err(LinkError::InvalidFrameId(_))
    ));
}

#[test]
fn test_ron_round_trip() {
    let mut project = banner();
    let frame: GifFrameId = "gif-frame-frame-1-1".parse().unwrap();
    project.visibility().toggle_visibility(&frame, &id("logo-1"));

    let text = ron::to_string(&project).unwrap();
    let restored: Project = ron::from_str(&text).unwrap();

    assert_eq!(restored.name, project.name);
    assert_eq!(restored.links().group_count(), project.links().group_count());
    assert_eq!(restored.layer(&id("cta-2")), project.layer(&id("cta-2")));
    assert_eq!(restored.gif_frame(&frame), project.gif_frame(&frame));
    assert!(restored.links().is_main(&id("headline-1")));
}
