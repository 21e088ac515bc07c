use crate::foundation::core::{Point, Vec2};
use crate::interaction::{InteractionMode, InteractionStrategy};
use crate::layer::{ExportPhotoLayer, PhotoLayer};
use crate::mirror::{mirror_to_export, preview_from_export};
use crate::selection::PointerTarget;
use crate::viewport::ScaleRatio;

/// Scale change per wheel notch.
pub const WHEEL_SCALE_STEP: f64 = 0.025;
pub const WHEEL_SCALE_MIN: f64 = 0.0;
pub const WHEEL_SCALE_MAX: f64 = 2.0;

#[derive(Clone, Copy, Debug)]
struct DragState {
    ratio: ScaleRatio,
    pointer_start: Point,
    layer_offset: Vec2,
    before: ExportPhotoLayer,
}

/// Free drag with wheel zoom on one full-resolution node.
///
/// The node lives in export space; the preview shows it scaled by the ratio, so no mirroring
/// step exists. There is no minimum size.
#[derive(Clone, Debug)]
pub struct FreeDrag {
    node: ExportPhotoLayer,
    ratio: ScaleRatio,
    drag: Option<DragState>,
    pristine: bool,
}

impl FreeDrag {
    pub fn new(initial: PhotoLayer, ratio: ScaleRatio) -> Self {
        Self {
            node: mirror_to_export(&initial, ratio),
            ratio,
            drag: None,
            pristine: true,
        }
    }

    /// Current uniform zoom factor.
    pub fn zoom(&self) -> f64 {
        self.node.0.scale.x
    }
}

impl InteractionStrategy for FreeDrag {
    fn mode(&self) -> InteractionMode {
        InteractionMode::FreeDrag
    }

    fn begin(&mut self, target: PointerTarget, pointer: Point, ratio: ScaleRatio) -> bool {
        if self.drag.is_some() || target != PointerTarget::Photo {
            return false;
        }
        self.ratio = ratio;
        self.drag = Some(DragState {
            ratio,
            pointer_start: pointer,
            layer_offset: self.node.0.position.to_vec2() * ratio.get(),
            before: self.node,
        });
        true
    }

    fn update(&mut self, pointer: Point) {
        let Some(drag) = self.drag else {
            return;
        };
        let delta = pointer - drag.pointer_start;
        self.node.0.position = ((drag.layer_offset + delta) / drag.ratio.get()).to_point();
    }

    fn end(&mut self) -> Option<ExportPhotoLayer> {
        let drag = self.drag.take()?;
        if self.node != drag.before {
            self.pristine = false;
        }
        Some(self.node)
    }

    fn wheel(&mut self, delta_y: f64) -> Option<ExportPhotoLayer> {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return None;
        }
        let step = if delta_y < 0.0 {
            WHEEL_SCALE_STEP
        } else {
            -WHEEL_SCALE_STEP
        };
        let zoom = (self.zoom() + step).clamp(WHEEL_SCALE_MIN, WHEEL_SCALE_MAX);
        if zoom != self.zoom() {
            self.pristine = false;
        }
        self.node.0.scale = Vec2::new(zoom, zoom);
        Some(self.node)
    }

    fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    fn preview_layer(&self) -> PhotoLayer {
        preview_from_export(&self.node, self.ratio)
    }

    fn export_layer(&self) -> ExportPhotoLayer {
        self.node
    }

    fn rescale(&mut self, ratio: ScaleRatio) {
        if self.drag.is_none() {
            self.ratio = ratio;
        }
    }

    fn shows_handles(&self) -> bool {
        false
    }

    fn is_pristine(&self) -> bool {
        self.pristine
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/free_drag.rs"]
mod tests;
