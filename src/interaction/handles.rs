use std::f64::consts::FRAC_PI_2;

use crate::constraint::BoundConstraint;
use crate::foundation::core::{Point, Vec2};
use crate::interaction::{InteractionMode, InteractionStrategy};
use crate::layer::{ExportPhotoLayer, PhotoLayer, TransformBox};
use crate::mirror::{MirrorCache, mirror_to_export, preview_from_export};
use crate::selection::{Anchor, PointerTarget};
use crate::template::Template;
use crate::viewport::ScaleRatio;

/// Side length of a corner anchor square, in preview pixels.
pub const ANCHOR_SIZE: f64 = 10.0;
/// Distance of the rotation handle above the top edge, in preview pixels.
pub const ROTATE_ANCHOR_OFFSET: f64 = 50.0;

#[derive(Clone, Copy, Debug)]
enum Gesture {
    Drag {
        grab: Vec2,
    },
    Resize {
        anchor: Anchor,
        start: TransformBox,
        accepted: TransformBox,
    },
    Rotate {
        start: TransformBox,
        accepted: TransformBox,
    },
}

#[derive(Clone, Copy, Debug)]
struct ActiveGesture {
    kind: Gesture,
    ratio: ScaleRatio,
    constraint: BoundConstraint,
    before: PhotoLayer,
}

/// Handle-based transform: drag the photo, resize from a corner (centered, aspect locked), or
/// rotate about the box center.
#[derive(Clone, Debug)]
pub struct HandleTransform {
    layer: PhotoLayer,
    ratio: ScaleRatio,
    mask_diameter: f64,
    mirror: MirrorCache,
    active: Option<ActiveGesture>,
    pristine: bool,
}

impl HandleTransform {
    /// Wrap a fitted preview layer and perform the first mirroring pass.
    pub fn new(initial: PhotoLayer, ratio: ScaleRatio, template: &Template) -> Self {
        let mut mirror = MirrorCache::default();
        mirror.commit(&initial, ratio);
        Self {
            layer: initial,
            ratio,
            mask_diameter: template.mask_diameter(),
            mirror,
            active: None,
            pristine: true,
        }
    }

    /// Constraint for boxes at the current preview ratio.
    pub fn constraint(&self) -> BoundConstraint {
        BoundConstraint::new(self.ratio.to_preview(self.mask_diameter))
    }

    /// Whether the cached export layer matches a fresh mirror of the preview layer.
    pub fn is_mirror_consistent(&self) -> bool {
        self.mirror.is_consistent_with(&self.layer, self.ratio)
    }

    /// Run a proposed box through the constraint and adopt the result.
    fn propose(&mut self, old: TransformBox, new: TransformBox, constraint: BoundConstraint) -> TransformBox {
        let accepted = constraint.limit(old, new);
        self.layer.0.apply_box(&accepted);
        accepted
    }
}

/// Centered, aspect-locked resize: project the pointer onto the anchor's diagonal.
fn resize_box(start: &TransformBox, anchor: Anchor, pointer: Point) -> TransformBox {
    let center = start.center();
    let corner = start.corners()[anchor.corner_index()];
    let diag = corner - center;
    let len2 = diag.hypot2();
    let k = if len2 > 0.0 {
        (pointer - center).dot(diag) / len2
    } else {
        1.0
    };
    TransformBox::centered(center, start.width * k, start.height * k, start.rotation_rad)
}

/// Rotate so the rotation handle points at the pointer, keeping the center fixed.
fn rotate_box(start: &TransformBox, pointer: Point) -> TransformBox {
    let center = start.center();
    let d = pointer - center;
    if d.hypot2() == 0.0 {
        return *start;
    }
    let rotation = d.y.atan2(d.x) + FRAC_PI_2;
    TransformBox::centered(center, start.width, start.height, rotation)
}

impl InteractionStrategy for HandleTransform {
    fn mode(&self) -> InteractionMode {
        InteractionMode::Handles
    }

    fn begin(&mut self, target: PointerTarget, pointer: Point, ratio: ScaleRatio) -> bool {
        if self.active.is_some() {
            return false;
        }
        if ratio != self.ratio {
            self.rescale(ratio);
        }
        let current = self.layer.0.transform_box();
        let kind = match target {
            PointerTarget::Photo => Gesture::Drag {
                grab: pointer - self.layer.0.position,
            },
            PointerTarget::Anchor(anchor) => Gesture::Resize {
                anchor,
                start: current,
                accepted: current,
            },
            PointerTarget::RotateHandle => Gesture::Rotate {
                start: current,
                accepted: current,
            },
            PointerTarget::Name | PointerTarget::Background => return false,
        };
        self.active = Some(ActiveGesture {
            kind,
            ratio,
            constraint: self.constraint(),
            before: self.layer,
        });
        true
    }

    fn update(&mut self, pointer: Point) {
        let Some(mut active) = self.active else {
            return;
        };
        match &mut active.kind {
            Gesture::Drag { grab } => {
                self.layer.0.position = pointer - *grab;
            }
            Gesture::Resize {
                anchor,
                start,
                accepted,
            } => {
                let proposed = resize_box(start, *anchor, pointer);
                *accepted = self.propose(*accepted, proposed, active.constraint);
            }
            Gesture::Rotate { start, accepted } => {
                let proposed = rotate_box(start, pointer);
                *accepted = self.propose(*accepted, proposed, active.constraint);
            }
        }
        self.active = Some(active);
    }

    fn end(&mut self) -> Option<ExportPhotoLayer> {
        let active = self.active.take()?;
        if self.layer != active.before {
            self.pristine = false;
        }
        Some(self.mirror.commit(&self.layer, active.ratio))
    }

    fn wheel(&mut self, _delta_y: f64) -> Option<ExportPhotoLayer> {
        None
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn preview_layer(&self) -> PhotoLayer {
        self.layer
    }

    fn export_layer(&self) -> ExportPhotoLayer {
        self.mirror
            .get()
            .copied()
            .unwrap_or_else(|| mirror_to_export(&self.layer, self.ratio))
    }

    fn rescale(&mut self, ratio: ScaleRatio) {
        if self.active.is_some() || ratio == self.ratio {
            return;
        }
        let export = self.export_layer();
        self.layer = preview_from_export(&export, ratio);
        self.ratio = ratio;
        self.mirror.commit(&self.layer, ratio);
    }

    fn shows_handles(&self) -> bool {
        true
    }

    fn is_pristine(&self) -> bool {
        self.pristine
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/handles.rs"]
mod tests;
