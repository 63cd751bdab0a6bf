//! Integration tests for the view and the radial geometry it feeds.

use kurbo::{Point, Shape, Size};

use sunburst::domain::{NodeTags, TreeContainer};
use sunburst::layout::{LayoutConfig, LayoutDomain, LayoutEngine, Placement};
use sunburst::render::{
    geometry_for, RadialGeometry, RenderError, SegmentGeometry, SunburstView, ViewUpdate,
};
use sunburst::util::testing;

fn container() -> TreeContainer {
    let mut c = TreeContainer::new();
    let a = c.add_root("A", 3.0, NodeTags::default()).unwrap();
    c.add_child(a, "A1", 1.0, NodeTags::default()).unwrap();
    c.add_child(a, "A2", 0.0, NodeTags::default()).unwrap();
    c.add_root("B", 1.0, NodeTags::new(3, Some(1))).unwrap();
    c
}

fn attached(animate: bool) -> (TreeContainer, SunburstView) {
    let mut c = container();
    let mut view = SunburstView::new(LayoutEngine::default(), animate);
    view.attach(&mut c);
    (c, view)
}

// ============================================================
// Event handling
// ============================================================

#[test]
fn given_attached_view_when_syncing_then_builds_full_layout() {
    testing::init_test_setup();
    let (c, mut view) = attached(true);

    assert_eq!(view.sync(&c), Some(ViewUpdate::Rebuilt { segments: 4 }));
    assert_eq!(view.layout().len(), 4);
    assert_eq!(view.sync(&c), None);
}

#[test]
fn given_weight_change_when_animating_then_keeps_transitions() {
    let (mut c, mut view) = attached(true);
    view.sync(&c);
    let before = view.layout().placement("B").unwrap();

    c.set_weight_at_path(3.0, &["B"]).unwrap();
    c.notify_weights_changed();
    let update = view.sync(&c);

    assert!(matches!(update, Some(ViewUpdate::Animated { transitions }) if transitions > 0));
    assert!(view.is_animating());
    let after = view.layout().placement("B").unwrap();
    assert_ne!(before, after);

    let start = view.frame(0.0);
    let b = start.iter().find(|f| f.segment.path == "B").unwrap();
    assert_eq!(b.placement, before);
    let end = view.frame(1.0);
    let b = end.iter().find(|f| f.segment.path == "B").unwrap();
    assert_eq!(b.placement, after);

    view.finish_animation();
    assert!(!view.is_animating());
}

#[test]
fn given_animation_off_when_weights_change_then_jumps() {
    let (mut c, mut view) = attached(false);
    view.sync(&c);

    c.set_weight_at_path(0.0, &["A"]).unwrap();
    c.notify_weights_changed();

    assert_eq!(view.sync(&c), Some(ViewUpdate::Jumped));
    assert!(view.transitions().is_empty());
    assert!(view.layout().get("A").map(|s| !s.is_visible()).unwrap());
}

#[test]
fn given_pending_structure_and_weight_events_when_syncing_then_rebuilds_once() {
    let (mut c, mut view) = attached(true);
    view.sync(&c);

    let b = c.find_path(&["B"]).unwrap();
    c.add_child(b, "B1", 1.0, NodeTags::default()).unwrap();
    c.notify_weights_changed();
    c.notify_structure_changed();

    assert_eq!(view.sync(&c), Some(ViewUpdate::Rebuilt { segments: 5 }));
    assert!(view.layout().get("B/B1").is_some());
}

#[test]
fn given_zero_weight_segment_when_framing_then_it_is_skipped() {
    let (c, mut view) = attached(true);
    view.sync(&c);

    let frame = view.frame(1.0);

    assert_eq!(frame.len(), 3);
    assert!(frame.iter().all(|f| f.segment.path != "A/A2"));
}

#[test]
fn given_radial_geometry_when_outlining_then_one_path_per_visible_segment() {
    let (c, mut view) = attached(true);
    view.sync(&c);
    let geometry = geometry_for(
        LayoutDomain::Radial,
        Size::new(400.0, 400.0),
        c.max_depth(),
        2.0,
        1.0,
    )
    .unwrap();

    let outlines = view.outlines(&*geometry, 1.0);

    assert_eq!(outlines.len(), 3);
    assert!(outlines.iter().all(|(_, path)| path.area().abs() > 0.0));
}

// ============================================================
// Geometry
// ============================================================

#[test]
fn given_percentage_domain_when_requesting_geometry_then_unsupported() {
    let err = geometry_for(LayoutDomain::Percentage, Size::new(100.0, 100.0), 2, 2.0, 1.0)
        .err()
        .unwrap();
    assert_eq!(err, RenderError::UnsupportedDomain(LayoutDomain::Percentage));
}

#[test]
fn given_viewport_when_fitting_then_rings_fill_the_smaller_side() {
    // (400 - 2 * 1) / ((2 + 2) * 2) = 49.75
    let geometry = RadialGeometry::fit(Size::new(600.0, 400.0), 2, 2.0, 1.0);

    assert_eq!(geometry.center, Point::new(300.0, 200.0));
    assert!((geometry.layer_height - 49.75).abs() < 1e-9);
    let (_, outer) = geometry.ring(2);
    assert!(outer <= 200.0);
    assert_eq!(RadialGeometry::preferred_side(2, 50.0, 2.0, 1.0), 202.0);
}

#[test]
fn given_segment_when_computing_anchor_then_lies_on_mid_radius() {
    let geometry = RadialGeometry::new(Point::new(0.0, 0.0), 10.0, 2.0);

    let anchor = geometry.anchor_and_extent(2, Placement::new(0.0, 90.0));

    let (inner, outer) = geometry.ring(2);
    let mid = (inner + outer) / 2.0;
    assert!((anchor.point.to_vec2().hypot() - mid).abs() < 1e-9);
    assert!((anchor.extent - mid * std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn given_icon_scale_when_placing_icon_then_only_fits_wide_segments() {
    let geometry = RadialGeometry::new(Point::new(0.0, 0.0), 10.0, 2.0);

    let wide = geometry.icon_placement(1, Placement::new(0.0, 90.0), 0.75);
    let narrow = geometry.icon_placement(1, Placement::new(0.0, 1.0), 0.75);

    let rect = wide.unwrap();
    assert!((rect.width() - 7.5).abs() < 1e-9);
    assert!(narrow.is_none());
}

#[test]
fn given_boxed_geometry_when_placing_icon_then_scales_with_layer_height() {
    // 202 is the preferred side for two rings of 50: layer height 25
    let geometry =
        geometry_for(LayoutDomain::Radial, Size::new(202.0, 202.0), 2, 2.0, 1.0).unwrap();

    let half = Placement::new(0.0, 180.0);

    let rect = geometry.icon_placement(1, half, 0.5).unwrap();

    let anchor = geometry.anchor_and_extent(1, half);
    assert!((geometry.layer_height() - 25.0).abs() < 1e-9);
    assert!((rect.width() - 12.5).abs() < 1e-9);
    assert!((rect.center() - anchor.point).hypot() < 1e-9);
}

#[test]
fn given_layout_config_when_building_view_then_domain_is_kept() {
    let engine = LayoutEngine::new(LayoutConfig {
        skip_length: 2.0,
        domain: LayoutDomain::Percentage,
    });
    let mut c = container();
    let mut view = SunburstView::new(engine, true);
    view.attach(&mut c);
    view.sync(&c);

    assert_eq!(view.layout().domain(), LayoutDomain::Percentage);
    assert!(view.layout().iter().all(|s| s.placement.end() <= 100.0));
}
