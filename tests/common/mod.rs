#![allow(dead_code)]

use std::path::PathBuf;

/// Fresh scratch directory under `target/`, unique per test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cardframe-tests").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// A 60x80 template with a radius-20 mask at (30, 30) and no fit margin.
pub const TINY_TEMPLATE_JSON: &str = r#"{
    "width": 60,
    "height": 80,
    "mask_center": { "x": 30, "y": 30 },
    "mask_radius": 20,
    "name_y": 60,
    "font_size": 10,
    "fit_margin": 0
}"#;
