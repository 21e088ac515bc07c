use super::*;
use crate::foundation::core::{Point, Size, Vec2};

fn sample_layer() -> PhotoLayer {
    PhotoLayer(LayerTransform {
        position: Point::new(50.0, 153.5),
        size: Size::new(372.5, 298.0),
        scale: Vec2::new(1.2, 1.2),
        rotation_rad: 0.25,
    })
}

#[test]
fn mirror_divides_position_and_size_only() {
    let e = mirror_to_export(&sample_layer(), ScaleRatio::new(0.5));
    assert_eq!(e.0.position, Point::new(100.0, 307.0));
    assert_eq!(e.0.size, Size::new(745.0, 596.0));
    assert_eq!(e.0.scale, Vec2::new(1.2, 1.2));
    assert_eq!(e.0.rotation_rad, 0.25);
}

#[test]
fn mirror_is_idempotent() {
    let layer = sample_layer();
    let r = ScaleRatio::new(0.37);
    let mut cache = MirrorCache::default();
    let a = cache.commit(&layer, r);
    let b = cache.commit(&layer, r);
    assert_eq!(a, b);
    assert_eq!(cache.get(), Some(&b));
    assert_eq!(cache.commits(), 2);
}

#[test]
fn export_box_converted_back_equals_preview_box() {
    let layer = sample_layer();
    for ratio in [0.1, 0.33, 0.5, 1.0, 2.75] {
        let r = ScaleRatio::new(ratio);
        let back = preview_from_export(&mirror_to_export(&layer, r), r);
        assert!(back.0.approx_eq(&layer.0), "ratio {ratio}");
    }
}

#[test]
fn cache_consistency_tracks_layer_edits() {
    let mut layer = sample_layer();
    let r = ScaleRatio::new(0.5);
    let mut cache = MirrorCache::default();
    assert!(!cache.is_consistent_with(&layer, r));
    cache.commit(&layer, r);
    assert!(cache.is_consistent_with(&layer, r));

    layer.0.position.x += 3.0;
    assert!(!cache.is_consistent_with(&layer, r));
    cache.commit(&layer, r);
    assert!(cache.is_consistent_with(&layer, r));
}
