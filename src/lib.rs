//! cardframe composes a name and a user photo onto a fixed ID-card template.
//!
//! Two canvases are kept in step: a preview scaled to the available width, where all pointer
//! input happens, and a full-resolution export canvas at the template's pixel size.
//!
//! - Load and validate a [`Template`]
//! - Drive an [`EditorSession`] with viewport, photo, name and pointer events
//! - Render either canvas with [`CpuRenderer`], or encode the export with [`export_card`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Name catalog and diacritic-insensitive search.
pub mod catalog;
pub mod constraint;
/// Encoding of the export canvas.
pub mod export;
pub mod fit;
/// Pointer interaction models.
pub mod interaction;
pub mod layer;
pub mod mask;
pub mod mirror;
/// Scene description and CPU rasterization.
pub mod render;
pub mod selection;
/// Editing session API.
pub mod session;
pub mod template;
pub mod text;
pub mod viewport;

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::store::{Background, CardAssets, normalize_rel_path};
pub use crate::catalog::{NameCatalog, NameEntry, NameOption, fold_vietnamese};
pub use crate::constraint::BoundConstraint;
pub use crate::export::{ExportFormat, encode_frame, export_card};
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Size, Vec2};
pub use crate::foundation::error::{CardError, CardResult};
pub use crate::interaction::{InteractionMode, InteractionStrategy, create_strategy};
pub use crate::layer::{ExportPhotoLayer, LayerTransform, PhotoLayer, TransformBox};
pub use crate::mask::ClipMask;
pub use crate::mirror::{MirrorCache, mirror_to_export, preview_from_export};
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::scene::{CanvasSpace, CardScene, FrameRGBA, SceneName, ScenePhoto};
pub use crate::selection::{Anchor, PointerTarget, SelectionState};
pub use crate::session::EditorSession;
pub use crate::template::Template;
pub use crate::text::{NameLayout, TextLayoutEngine, TextPlacement};
pub use crate::viewport::{ScaleRatio, ViewportState, preview_canvas_size};
