//! Circular clip region shared by the preview and export canvases.

use kurbo::Shape;

use crate::foundation::core::{BezPath, Point};
use crate::template::Template;
use crate::viewport::ScaleRatio;

const PATH_TOLERANCE: f64 = 0.1;

/// Circle that clips the photo group. Template background and name text are never clipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipMask {
    pub center: Point,
    pub radius: f64,
}

impl ClipMask {
    /// Mask in template (export) pixels.
    pub fn for_export(template: &Template) -> Self {
        Self {
            center: template.mask_center,
            radius: template.mask_radius,
        }
    }

    /// Mask in preview pixels.
    pub fn for_preview(template: &Template, ratio: ScaleRatio) -> Self {
        Self {
            center: ratio.point_to_preview(template.mask_center),
            radius: ratio.to_preview(template.mask_radius),
        }
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn contains(&self, p: Point) -> bool {
        (p - self.center).hypot2() <= self.radius * self.radius
    }

    /// Vector outline of the mask, suitable for path clipping at any zoom.
    pub fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(PATH_TOLERANCE)
    }
}
