//! Propagation of the preview-space photo transform into export space.

use crate::layer::{ExportPhotoLayer, LayerTransform, PhotoLayer};
use crate::viewport::ScaleRatio;

/// Derive the export-space layer from the preview-space layer.
///
/// Position and base size are divided by the ratio; scale factors and rotation are
/// ratio-independent and copied. Pure, so mirroring twice yields identical state.
pub fn mirror_to_export(layer: &PhotoLayer, ratio: ScaleRatio) -> ExportPhotoLayer {
    let l = &layer.0;
    ExportPhotoLayer(LayerTransform {
        position: ratio.point_to_export(l.position),
        size: ratio.size_to_export(l.size),
        scale: l.scale,
        rotation_rad: l.rotation_rad,
    })
}

/// Inverse of [`mirror_to_export`]: re-derive a preview layer for a (possibly new) ratio.
pub fn preview_from_export(layer: &ExportPhotoLayer, ratio: ScaleRatio) -> PhotoLayer {
    let l = &layer.0;
    PhotoLayer(LayerTransform {
        position: ratio.point_to_preview(l.position),
        size: ratio.size_to_preview(l.size),
        scale: l.scale,
        rotation_rad: l.rotation_rad,
    })
}

/// Export layer refreshed at gesture commit points rather than on every intermediate frame.
#[derive(Clone, Debug, Default)]
pub struct MirrorCache {
    cached: Option<ExportPhotoLayer>,
    commits: u64,
}

impl MirrorCache {
    /// Refresh the cache from `layer` and return the new export state.
    pub fn commit(&mut self, layer: &PhotoLayer, ratio: ScaleRatio) -> ExportPhotoLayer {
        let export = mirror_to_export(layer, ratio);
        self.cached = Some(export);
        self.commits = self.commits.saturating_add(1);
        tracing::debug!(commits = self.commits, ?export, "mirrored photo layer");
        export
    }

    pub fn get(&self) -> Option<&ExportPhotoLayer> {
        self.cached.as_ref()
    }

    /// Number of commits since creation.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Whether the cache equals a fresh mirror of `layer`.
    pub fn is_consistent_with(&self, layer: &PhotoLayer, ratio: ScaleRatio) -> bool {
        self.cached
            .is_some_and(|c| c.0.approx_eq(&mirror_to_export(layer, ratio).0))
    }
}

#[cfg(test)]
#[path = "../tests/unit/mirror.rs"]
mod tests;
