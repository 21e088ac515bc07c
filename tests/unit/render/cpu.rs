use super::*;
use crate::foundation::core::Size;
use crate::layer::LayerTransform;
use crate::mask::ClipMask;
use crate::render::scene::CanvasSpace;
use crate::text::TextPlacement;

fn solid_image(rgba: [u8; 4], w: u32, h: u32) -> PreparedImage {
    let bytes = rgba.repeat((w * h) as usize);
    PreparedImage::from_straight_rgba8(w, h, bytes).unwrap()
}

fn scene_40() -> CardScene {
    CardScene {
        space: CanvasSpace::Preview,
        canvas: Canvas {
            width: 40,
            height: 40,
        },
        mask: ClipMask {
            center: Point::new(20.0, 20.0),
            radius: 10.0,
        },
        photo: None,
        name: None,
        handles: None,
    }
}

#[test]
fn empty_scene_is_white() {
    let mut r = CpuRenderer::new(CardAssets::default());
    let frame = r.render(&scene_40()).unwrap();
    assert_eq!((frame.width, frame.height), (40, 40));
    assert_eq!(frame.data.len(), 40 * 40 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(39, 39), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(40, 0), None);
}

#[test]
fn photo_is_clipped_to_the_mask_circle() {
    let mut r = CpuRenderer::new(CardAssets::default());
    let mut scene = scene_40();
    scene.photo = Some(ScenePhoto {
        image: solid_image([255, 0, 0, 255], 2, 2),
        layer: LayerTransform::new(Point::new(0.0, 0.0), Size::new(40.0, 40.0)),
    });
    let frame = r.render(&scene).unwrap();

    assert_eq!(frame.pixel(20, 20), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(15, 22), Some([255, 0, 0, 255]));
    // Covered by the photo but outside the circle.
    assert_eq!(frame.pixel(2, 2), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(37, 37), Some([255, 255, 255, 255]));
}

#[test]
fn raster_background_is_stretched_under_the_photo() {
    let assets = CardAssets {
        background: Some(Background::Raster(solid_image([0, 0, 255, 255], 1, 1))),
        font: None,
    };
    let mut r = CpuRenderer::new(assets);
    let frame = r.render(&scene_40()).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(39, 39), Some([0, 0, 255, 255]));

    // Cached paint is reused at the same size and rebuilt at another.
    let again = r.render(&scene_40()).unwrap();
    assert_eq!(again.data, frame.data);
    let mut small = scene_40();
    small.canvas = Canvas {
        width: 8,
        height: 8,
    };
    let frame = r.render(&small).unwrap();
    assert_eq!(frame.pixel(7, 7), Some([0, 0, 255, 255]));
}

#[test]
fn handles_draw_an_outline_around_the_frame() {
    let mut r = CpuRenderer::new(CardAssets::default());
    let mut scene = scene_40();
    scene.handles = Some(TransformBox {
        x: 5.5,
        y: 15.5,
        width: 30.0,
        height: 20.0,
        rotation_rad: 0.0,
    });
    let frame = r.render(&scene).unwrap();
    let edge = frame.pixel(13, 15).unwrap();
    assert!(edge[0] < 64, "expected handle stroke, got {edge:?}");
    assert!(edge[2] > 200);
    // Inside the frame nothing is drawn.
    assert_eq!(frame.pixel(20, 25), Some([255, 255, 255, 255]));
}

#[test]
fn name_without_font_is_skipped() {
    let mut r = CpuRenderer::new(CardAssets::default());
    let mut scene = scene_40();
    scene.name = Some(SceneName {
        text: "Lan".to_string(),
        placement: TextPlacement {
            x: 0.0,
            y: 10.0,
            width: 40.0,
            font_size: 12.0,
            color: Rgba8::opaque(0, 0, 0),
        },
    });
    let frame = r.render(&scene).unwrap();
    assert!(frame.data.iter().all(|b| *b == 255));
}
