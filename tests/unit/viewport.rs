use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn ratio_is_preview_over_template_width() {
    let t = Template::default();
    let r = ScaleRatio::from_viewport(&t, ViewportState::new(472.5));
    assert_eq!(r.get(), 0.5);
    let r = ScaleRatio::from_viewport(&t, ViewportState::new(945.0));
    assert_eq!(r.get(), 1.0);
}

#[test]
fn zero_or_invalid_width_defaults_to_one() {
    let t = Template::default();
    for w in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        let r = ScaleRatio::from_viewport(&t, ViewportState::new(w));
        assert_eq!(r, ScaleRatio::IDENTITY, "width {w}");
    }
    assert!(!ViewportState::default().is_laid_out());
}

#[test]
fn box_round_trip_through_export_space() {
    let t = Template::default();
    let boxes = [
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(-13.25, 7.5, 400.0, 399.0),
        Rect::new(123.456, 78.9, 1001.1, 2002.2),
    ];
    for w in [1.0, 37.0, 320.0, 472.0, 472.5, 945.0, 1890.0, 3333.3] {
        let r = ScaleRatio::from_viewport(&t, ViewportState::new(w));
        for b in boxes {
            let back = r.rect_to_preview(r.rect_to_export(b));
            assert!(close(back.x0, b.x0) && close(back.y0, b.y0), "w={w} {b:?}");
            assert!(close(back.x1, b.x1) && close(back.y1, b.y1), "w={w} {b:?}");
        }
    }
}

#[test]
fn preview_canvas_keeps_template_aspect() {
    let t = Template::default();
    let s = preview_canvas_size(&t, ViewportState::new(472.5));
    assert_eq!(s.width, 472.5);
    assert_eq!(s.height, 649.5);
}
