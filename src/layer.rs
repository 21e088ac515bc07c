//! Photo layer geometry in preview and export space.
//!
//! A layer is drawn as its `size` rectangle, scaled by `scale` and rotated by `rotation_rad`
//! around its top-left `position`. The preview-space [`PhotoLayer`] is the single authoritative
//! transform; [`ExportPhotoLayer`] is always derived from it.

use crate::foundation::core::{Affine, Point, Rect, Size, Vec2};
use crate::foundation::math::approx_eq;

/// Position, base size, scale and rotation of the photo node.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerTransform {
    /// Top-left corner (rotation pivot).
    pub position: Point,
    /// Base size before scaling.
    pub size: Size,
    /// Per-axis scale factors.
    pub scale: Vec2,
    /// Clockwise rotation (y-down) in radians.
    pub rotation_rad: f64,
}

impl LayerTransform {
    /// An unscaled, unrotated layer.
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            scale: Vec2::new(1.0, 1.0),
            rotation_rad: 0.0,
        }
    }

    /// Local-to-canvas transform: `T(position) * R(rotation) * S(scale)`.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation_rad)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    /// Size actually covered on the canvas (`size * scale`).
    pub fn rendered_size(&self) -> Size {
        Size::new(
            (self.size.width * self.scale.x).abs(),
            (self.size.height * self.scale.y).abs(),
        )
    }

    /// Oriented bounding box as manipulated by the transform handles.
    pub fn transform_box(&self) -> TransformBox {
        TransformBox {
            x: self.position.x,
            y: self.position.y,
            width: self.size.width * self.scale.x,
            height: self.size.height * self.scale.y,
            rotation_rad: self.rotation_rad,
        }
    }

    /// Adopt `b` by moving the pivot and rescaling the unchanged base size.
    pub fn apply_box(&mut self, b: &TransformBox) {
        self.position = Point::new(b.x, b.y);
        if self.size.width != 0.0 {
            self.scale.x = b.width / self.size.width;
        }
        if self.size.height != 0.0 {
            self.scale.y = b.height / self.size.height;
        }
        self.rotation_rad = b.rotation_rad;
    }

    /// Whether the canvas point `p` falls on the layer rectangle.
    pub fn contains(&self, p: Point) -> bool {
        let a = self.affine();
        if a.determinant().abs() < 1e-12 {
            return false;
        }
        let local = a.inverse() * p;
        Rect::from_origin_size(Point::ORIGIN, self.size).contains(local)
    }

    /// Exact (within rounding) equality, used for mirror consistency checks.
    pub fn approx_eq(&self, other: &Self) -> bool {
        approx_eq(self.position.x, other.position.x)
            && approx_eq(self.position.y, other.position.y)
            && approx_eq(self.size.width, other.size.width)
            && approx_eq(self.size.height, other.size.height)
            && approx_eq(self.scale.x, other.scale.x)
            && approx_eq(self.scale.y, other.scale.y)
            && approx_eq(self.rotation_rad, other.rotation_rad)
    }
}

/// Photo layer in preview space. Owned by the editing session.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoLayer(pub LayerTransform);

/// Photo layer in export space. Only ever produced by the transform mirror.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportPhotoLayer(pub LayerTransform);

/// Oriented box in canvas space: top-left corner, signed size and rotation about that corner.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_rad: f64,
}

impl TransformBox {
    fn rotated(&self, v: Vec2) -> Vec2 {
        rotate_vec(self.rotation_rad, v)
    }

    /// Center of the box in canvas space.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y) + self.rotated(Vec2::new(self.width / 2.0, self.height / 2.0))
    }

    /// Box of `width` x `height` rotated by `rotation_rad` whose center is `center`.
    pub fn centered(center: Point, width: f64, height: f64, rotation_rad: f64) -> Self {
        let half = rotate_vec(rotation_rad, Vec2::new(width / 2.0, height / 2.0));
        let origin = center - half;
        Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
            rotation_rad,
        }
    }

    /// Canvas-space corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn corners(&self) -> [Point; 4] {
        let o = Point::new(self.x, self.y);
        [
            o,
            o + self.rotated(Vec2::new(self.width, 0.0)),
            o + self.rotated(Vec2::new(self.width, self.height)),
            o + self.rotated(Vec2::new(0.0, self.height)),
        ]
    }

    /// Canvas-space point centered above the top edge, `offset` away from it.
    pub fn rotate_handle(&self, offset: f64) -> Point {
        let o = Point::new(self.x, self.y);
        o + self.rotated(Vec2::new(self.width / 2.0, -offset))
    }
}

/// Rotate a canvas-space vector by `rotation_rad` (clockwise on a y-down canvas).
pub(crate) fn rotate_vec(rotation_rad: f64, v: Vec2) -> Vec2 {
    (Affine::rotate(rotation_rad) * v.to_point()).to_vec2()
}

#[cfg(test)]
#[path = "../tests/unit/layer.rs"]
mod tests;
