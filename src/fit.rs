//! Initial sizing and placement of a freshly loaded photo.

use crate::foundation::core::{Point, Size};
use crate::template::Template;

/// Fit a photo's natural size into the preview area, preserving its aspect ratio.
///
/// Landscape and square photos wider than the area are shrunk to `area.width - margin`; portrait
/// photos taller than the area are shrunk to `area.height - margin`. Photos that already fit keep
/// their natural size. The margin is not clamped: callers with tiny areas get tiny (or
/// non-positive) sizes back and should not render until the area is real.
pub fn fit_photo_size(natural: Size, area: Size, margin: f64) -> Size {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return Size::ZERO;
    }

    let aspect = natural.width / natural.height;
    if aspect >= 1.0 {
        if natural.width > area.width {
            let width = area.width - margin;
            let k = width / natural.width;
            return Size::new(width, natural.height * k);
        }
    } else if natural.height > area.height {
        let height = area.height - margin;
        let k = height / natural.height;
        return Size::new(natural.width * k, height);
    }
    natural
}

/// Top-left position of a fitted photo: horizontally centered, and vertically placed so the
/// leftover space is split in the same proportion as the mask center splits the template height.
pub fn initial_position(template: &Template, canvas: Size, fitted: Size) -> Point {
    Point::new(
        (canvas.width - fitted.width) / 2.0,
        (canvas.height - fitted.height) * template.mask_center.y / template.height,
    )
}

#[cfg(test)]
#[path = "../tests/unit/fit.rs"]
mod tests;
