use super::*;
use crate::foundation::core::Vec2;
use crate::interaction::WHEEL_SCALE_STEP;

const PREVIEW_WIDTH: f64 = 472.5;

fn solid(w: u32, h: u32) -> PreparedImage {
    PreparedImage::from_straight_rgba8(w, h, [90, 120, 200, 255].repeat((w * h) as usize)).unwrap()
}

fn session_with(mode: InteractionMode, w: u32, h: u32) -> EditorSession {
    let mut s = EditorSession::new(Template::default(), mode).unwrap();
    s.observe_viewport(PREVIEW_WIDTH);
    s.load_photo(solid(w, h)).unwrap();
    s
}

fn mask_center() -> Point {
    Point::new(235.75, 283.5)
}

fn resize_from_bottom_right(s: &mut EditorSession, side: f64) {
    let b = s.preview_layer().unwrap().0.transform_box();
    let center = b.center();
    let corner = b.corners()[Anchor::BottomRight.corner_index()];
    assert_eq!(
        s.pointer_down(corner),
        PointerTarget::Anchor(Anchor::BottomRight)
    );
    s.pointer_move(center + (corner - center) * (side / b.width));
    assert!(s.pointer_up().is_some());
}

#[test]
fn fresh_session_has_identity_ratio_and_nothing_to_export() {
    let s = EditorSession::new(Template::default(), InteractionMode::Handles).unwrap();
    assert_eq!(s.ratio(), ScaleRatio::IDENTITY);
    assert!(!s.has_photo());
    assert_eq!(s.selection(), SelectionState::Unselected);
    assert!(!s.can_export());
    let err = s.export_scene().err().unwrap();
    assert!(err.to_string().starts_with("export unavailable:"));
}

#[test]
fn invalid_template_is_rejected() {
    let t = Template {
        width: 0.0,
        ..Template::default()
    };
    assert!(EditorSession::new(t, InteractionMode::Handles).is_err());
}

#[test]
fn loaded_photo_is_fitted_placed_mirrored_and_selected() {
    let s = session_with(InteractionMode::Handles, 1000, 800);
    assert_eq!(s.ratio().get(), 0.5);
    assert_eq!(s.preview_canvas_size(), Size::new(472.5, 649.5));

    let p = s.preview_layer().unwrap().0;
    assert_eq!(p.size.width, 372.5);
    assert!((p.size.height - 298.0).abs() < 1e-9);
    assert_eq!(p.position.x, 50.0);
    assert!((p.position.y - 351.5 * 567.0 / 1299.0).abs() < 1e-9);

    let e = s.export_layer().unwrap().0;
    assert_eq!(e.size.width, 745.0);
    assert!((e.size.height - 596.0).abs() < 1e-9);
    assert_eq!(e.position.x, 100.0);

    assert_eq!(s.selection(), SelectionState::Selected);
    assert!(s.handles_visible());
}

#[test]
fn resize_scenario_accepts_400_rejects_200_and_exports_800() {
    let mut s = session_with(InteractionMode::Handles, 1000, 1000);

    resize_from_bottom_right(&mut s, 400.0);
    let b = s.preview_layer().unwrap().0.transform_box();
    assert!((b.width - 400.0).abs() < 1e-9);
    assert!((b.height - 400.0).abs() < 1e-9);

    resize_from_bottom_right(&mut s, 200.0);
    let b = s.preview_layer().unwrap().0.transform_box();
    assert!((b.width - 400.0).abs() < 1e-9);
    assert!((b.height - 400.0).abs() < 1e-9);

    let e = s.export_layer().unwrap().0.transform_box();
    assert!((e.width - 800.0).abs() < 1e-9);
    assert!((e.height - 800.0).abs() < 1e-9);
}

#[test]
fn background_click_deselects_and_photo_click_selects() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    assert_eq!(s.click(Point::new(5.0, 5.0)), PointerTarget::Background);
    assert_eq!(s.selection(), SelectionState::Unselected);
    assert!(!s.handles_visible());

    assert_eq!(s.click(mask_center()), PointerTarget::Photo);
    assert_eq!(s.selection(), SelectionState::Selected);
}

#[test]
fn clipped_part_of_the_photo_is_not_hittable() {
    let s = session_with(InteractionMode::Handles, 1000, 800);
    let p = Point::new(60.0, 170.0);
    assert!(s.preview_layer().unwrap().0.contains(p));
    assert_eq!(s.hit_test(p), PointerTarget::Background);
}

#[test]
fn name_click_leaves_selection_alone() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    let on_name = Point::new(236.0, 500.0);
    assert_eq!(s.hit_test(on_name), PointerTarget::Background);

    s.set_name("Nguyễn Văn A");
    assert_eq!(s.click(on_name), PointerTarget::Name);
    assert_eq!(s.selection(), SelectionState::Selected);

    s.click(Point::new(5.0, 5.0));
    assert_eq!(s.click(on_name), PointerTarget::Name);
    assert_eq!(s.selection(), SelectionState::Unselected);
}

#[test]
fn anchors_are_only_hittable_while_selected() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    let corner = s.preview_layer().unwrap().0.transform_box().corners()[0];
    assert_eq!(s.hit_test(corner), PointerTarget::Anchor(Anchor::TopLeft));
    s.click(Point::new(5.0, 5.0));
    assert_eq!(s.hit_test(corner), PointerTarget::Background);
}

#[test]
fn pristine_photo_is_refitted_on_viewport_change() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    s.observe_viewport(945.0);
    assert_eq!(s.ratio().get(), 1.0);
    let p = s.preview_layer().unwrap().0;
    assert_eq!(p.size.width, 845.0);
    assert!((p.size.height - 676.0).abs() < 1e-9);
    assert_eq!(s.export_layer().unwrap().0.size, p.size);
}

#[test]
fn edited_photo_keeps_export_state_across_viewport_change() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    assert_eq!(s.pointer_down(mask_center()), PointerTarget::Photo);
    s.pointer_move(mask_center() + Vec2::new(10.0, 0.0));
    let committed = s.pointer_up().unwrap();
    assert_eq!(committed.0.position.x, 120.0);

    s.observe_viewport(945.0);
    let e = s.export_layer().unwrap();
    assert!(e.0.approx_eq(&committed.0));
    let p = s.preview_layer().unwrap().0;
    assert_eq!(p.position.x, 120.0);
    assert_eq!(p.size.width, 745.0);
}

#[test]
fn viewport_change_mid_gesture_waits_for_pointer_up() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    s.pointer_down(mask_center());
    s.observe_viewport(945.0);
    assert_eq!(s.ratio().get(), 0.5);

    s.pointer_move(mask_center() + Vec2::new(10.0, 0.0));
    assert_eq!(s.preview_layer().unwrap().0.position.x, 60.0);

    let committed = s.pointer_up().unwrap();
    assert_eq!(committed.0.position.x, 120.0);
    assert_eq!(s.ratio().get(), 1.0);
    assert_eq!(s.preview_layer().unwrap().0.position.x, 120.0);
}

#[test]
fn held_back_width_does_not_outlive_a_cleared_photo() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    s.pointer_down(mask_center());
    s.observe_viewport(300.0);
    assert_eq!(s.viewport().preview_width, PREVIEW_WIDTH);

    s.clear_photo();
    assert_eq!(s.viewport().preview_width, 300.0);
    s.observe_viewport(945.0);
    assert!(s.pointer_up().is_none());
    assert_eq!(s.viewport().preview_width, 945.0);
    assert_eq!(s.ratio().get(), 1.0);
}

#[test]
fn held_back_width_does_not_outlive_a_replaced_photo() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    s.pointer_down(mask_center());
    s.observe_viewport(300.0);

    s.load_photo(solid(10, 10)).unwrap();
    assert_eq!(s.viewport().preview_width, 300.0);
    s.observe_viewport(945.0);
    s.pointer_up();
    assert_eq!(s.viewport().preview_width, 945.0);
    assert_eq!(s.ratio().get(), 1.0);

    let expected = fitted_layer(s.template(), ScaleRatio::IDENTITY, &solid(10, 10));
    let layer = s.preview_layer().unwrap();
    assert!(layer.0.approx_eq(&expected.0), "{layer:?} vs {expected:?}");
}

#[test]
fn empty_photo_clears_the_current_one() {
    let mut s = session_with(InteractionMode::Handles, 4, 4);
    let empty = PreparedImage {
        width: 0,
        height: 0,
        rgba8_premul: std::sync::Arc::new(Vec::new()),
    };
    let err = s.load_photo(empty).err().unwrap();
    assert!(err.to_string().starts_with("decode error:"));
    assert!(!s.has_photo());
    assert_eq!(s.selection(), SelectionState::Unselected);
}

#[test]
fn undecodable_photo_clears_the_current_one() {
    let mut s = session_with(InteractionMode::Handles, 4, 4);
    let err = s.load_photo_bytes(b"definitely not an image").err().unwrap();
    assert!(err.to_string().starts_with("decode error:"));
    assert!(!s.has_photo());
    assert_eq!(s.selection(), SelectionState::Unselected);
    assert!(s.export_scene().is_err());
}

#[test]
fn replacing_the_photo_reselects() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    s.click(Point::new(5.0, 5.0));
    s.load_photo(solid(10, 10)).unwrap();
    assert_eq!(s.selection(), SelectionState::Selected);
    assert_eq!(s.photo_image().map(|i| i.width), Some(10));
}

#[test]
fn export_needs_photo_and_name() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    assert!(!s.can_export());
    s.set_name("   ");
    assert!(!s.can_export());
    s.set_name("Lan");
    assert!(s.can_export());
    s.clear_photo();
    assert!(!s.can_export());
}

#[test]
fn scenes_differ_only_by_space() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    s.set_name("Lan");

    let preview = s.scene(CanvasSpace::Preview).unwrap();
    assert_eq!((preview.canvas.width, preview.canvas.height), (473, 650));
    assert!(preview.handles.is_some());
    assert_eq!(preview.mask.radius, 123.5);
    assert_eq!(preview.name.as_ref().map(|n| n.placement.font_size), Some(36.0));

    let export = s.export_scene().unwrap();
    assert_eq!((export.canvas.width, export.canvas.height), (945, 1299));
    assert!(export.handles.is_none());
    assert_eq!(export.mask.radius, 247.0);
    assert_eq!(export.name.as_ref().map(|n| n.placement.font_size), Some(72.0));
    assert_eq!(export.photo.as_ref().map(|p| p.layer.size.width), Some(745.0));
}

#[test]
fn free_drag_zooms_without_handles() {
    let mut s = session_with(InteractionMode::FreeDrag, 1000, 800);
    assert!(!s.handles_visible());
    let e = s.wheel(-120.0).unwrap();
    assert_eq!(e.0.scale.x, 1.0 + WHEEL_SCALE_STEP);

    assert_eq!(s.pointer_down(mask_center()), PointerTarget::Photo);
    s.pointer_move(mask_center() + Vec2::new(5.0, 5.0));
    let e = s.pointer_up().unwrap();
    assert_eq!(e.0.position.x, 110.0);
    assert!(s.scene(CanvasSpace::Preview).unwrap().handles.is_none());
}

#[test]
fn handles_mode_ignores_the_wheel() {
    let mut s = session_with(InteractionMode::Handles, 1000, 800);
    assert!(s.wheel(-1.0).is_none());
}
