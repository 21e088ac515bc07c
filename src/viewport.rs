//! Preview viewport tracking and the single preview/export scale ratio.

use crate::foundation::core::{Point, Rect, Size};
use crate::template::Template;

/// Observed layout of the preview container.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportState {
    /// Rendered width of the preview container, in preview pixels. `0` until laid out.
    pub preview_width: f64,
}

impl ViewportState {
    pub fn new(preview_width: f64) -> Self {
        Self { preview_width }
    }

    /// Whether a real (non-zero, finite) width has been observed.
    pub fn is_laid_out(self) -> bool {
        self.preview_width.is_finite() && self.preview_width > 0.0
    }
}

/// Conversion factor between preview space and export (template) space.
///
/// Preview quantities are divided by the ratio to get export quantities; template quantities are
/// multiplied by it to get preview quantities. Always finite and `> 0`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleRatio(f64);

impl Default for ScaleRatio {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScaleRatio {
    pub const IDENTITY: Self = Self(1.0);

    /// Derive the ratio for `viewport`. A container that has not been laid out yet maps to `1`.
    pub fn from_viewport(template: &Template, viewport: ViewportState) -> Self {
        if !viewport.is_laid_out() {
            return Self::IDENTITY;
        }
        Self::new(viewport.preview_width / template.width)
    }

    /// Wrap a raw ratio, falling back to `1` for non-positive or non-finite input.
    pub fn new(ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            Self(ratio)
        } else {
            Self::IDENTITY
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn to_export(self, v: f64) -> f64 {
        v / self.0
    }

    pub fn to_preview(self, v: f64) -> f64 {
        v * self.0
    }

    pub fn point_to_export(self, p: Point) -> Point {
        Point::new(p.x / self.0, p.y / self.0)
    }

    pub fn point_to_preview(self, p: Point) -> Point {
        Point::new(p.x * self.0, p.y * self.0)
    }

    pub fn size_to_export(self, s: Size) -> Size {
        Size::new(s.width / self.0, s.height / self.0)
    }

    pub fn size_to_preview(self, s: Size) -> Size {
        Size::new(s.width * self.0, s.height * self.0)
    }

    pub fn rect_to_export(self, r: Rect) -> Rect {
        Rect::new(r.x0 / self.0, r.y0 / self.0, r.x1 / self.0, r.y1 / self.0)
    }

    pub fn rect_to_preview(self, r: Rect) -> Rect {
        Rect::new(r.x0 * self.0, r.y0 * self.0, r.x1 * self.0, r.y1 * self.0)
    }
}

/// Size of the preview canvas: the full container width, with the template's aspect ratio.
pub fn preview_canvas_size(template: &Template, viewport: ViewportState) -> Size {
    let ratio = ScaleRatio::from_viewport(template, viewport);
    ratio.size_to_preview(template.size())
}

#[cfg(test)]
#[path = "../tests/unit/viewport.rs"]
mod tests;
