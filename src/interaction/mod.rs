//! Pointer interaction models for the photo layer.
//!
//! Two strategies sit behind [`InteractionStrategy`]:
//!
//! - [`HandleTransform`] (default): drag plus corner-resize and rotate handles, mirrored into
//!   export space at each gesture commit and filtered through [`crate::BoundConstraint`].
//! - [`FreeDrag`]: drag plus wheel zoom applied directly to a single export-space node. It has no
//!   size constraint and no mask-fit guarantee.

mod free_drag;
mod handles;

pub use free_drag::{FreeDrag, WHEEL_SCALE_MAX, WHEEL_SCALE_MIN, WHEEL_SCALE_STEP};
pub use handles::{ANCHOR_SIZE, HandleTransform, ROTATE_ANCHOR_OFFSET};

use crate::foundation::core::Point;
use crate::layer::{ExportPhotoLayer, PhotoLayer};
use crate::selection::PointerTarget;
use crate::template::Template;
use crate::viewport::ScaleRatio;

/// Available interaction models.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Drag, corner resize and rotate handles with the mask-fit constraint.
    #[default]
    Handles,
    /// Drag and wheel zoom, unconstrained.
    FreeDrag,
}

/// A pointer-driven editor for one photo layer.
///
/// Pointer coordinates are preview-space. A gesture runs from [`begin`](Self::begin) to
/// [`end`](Self::end); the ratio passed to `begin` is held for the whole gesture.
pub trait InteractionStrategy {
    fn mode(&self) -> InteractionMode;

    /// Start a gesture on `target`. Returns `false` if the target does not start one.
    fn begin(&mut self, target: PointerTarget, pointer: Point, ratio: ScaleRatio) -> bool;

    /// Feed a pointer move to the active gesture. No-op without one.
    fn update(&mut self, pointer: Point);

    /// Finish the active gesture and return the committed export state.
    fn end(&mut self) -> Option<ExportPhotoLayer>;

    /// Apply one wheel notch. Returns the new export state if the strategy zooms.
    fn wheel(&mut self, delta_y: f64) -> Option<ExportPhotoLayer>;

    fn is_active(&self) -> bool;

    /// The layer as currently shown in preview space, including uncommitted gesture state.
    fn preview_layer(&self) -> PhotoLayer;

    /// The committed export-space layer.
    fn export_layer(&self) -> ExportPhotoLayer;

    /// Re-express the layer for a new preview ratio without changing its export state.
    fn rescale(&mut self, ratio: ScaleRatio);

    /// Whether the strategy draws transform handles when selected.
    fn shows_handles(&self) -> bool;

    /// `true` until a gesture changes the layer.
    fn is_pristine(&self) -> bool;
}

/// Build the strategy for `mode` around a freshly fitted preview layer.
pub fn create_strategy(
    mode: InteractionMode,
    initial: PhotoLayer,
    ratio: ScaleRatio,
    template: &Template,
) -> Box<dyn InteractionStrategy> {
    match mode {
        InteractionMode::Handles => Box::new(HandleTransform::new(initial, ratio, template)),
        InteractionMode::FreeDrag => Box::new(FreeDrag::new(initial, ratio)),
    }
}
