//! Minimum-size filter applied to transform-handle proposals.

use crate::layer::TransformBox;
use crate::template::Template;
use crate::viewport::ScaleRatio;

/// Rejects any proposed box smaller than the mask diameter on either axis, so the photo always
/// fills the circular window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundConstraint {
    min_extent: f64,
}

impl BoundConstraint {
    /// Constraint for boxes expressed in the space described by `ratio`
    /// (`ScaleRatio::IDENTITY` for export space).
    pub fn for_mask(template: &Template, ratio: ScaleRatio) -> Self {
        Self::new(ratio.to_preview(template.mask_diameter()))
    }

    pub fn new(min_extent: f64) -> Self {
        Self { min_extent }
    }

    /// The mask diameter boxes are compared against.
    pub fn min_extent(&self) -> f64 {
        self.min_extent
    }

    pub fn accepts(&self, b: &TransformBox) -> bool {
        b.width >= self.min_extent && b.height >= self.min_extent
    }

    /// Return `new` if acceptable, otherwise keep `old` unchanged.
    pub fn limit(&self, old: TransformBox, new: TransformBox) -> TransformBox {
        if self.accepts(&new) {
            new
        } else {
            tracing::debug!(
                width = new.width,
                height = new.height,
                min = self.min_extent,
                "rejected transform box smaller than mask"
            );
            old
        }
    }
}
