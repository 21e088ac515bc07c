use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::{PreparedImage, decode_image, parse_svg};
use crate::foundation::error::{CardError, CardResult};
use crate::template::Template;

/// Template artwork, kept in its source form so it can be rasterized at any canvas size.
#[derive(Clone, Debug)]
pub enum Background {
    /// Vector artwork.
    Svg(Arc<usvg::Tree>),
    /// Raster artwork, stretched to the canvas.
    Raster(PreparedImage),
}

/// Template-level resources shared by the preview and export canvases.
#[derive(Clone, Debug, Default)]
pub struct CardAssets {
    /// Artwork drawn under everything else. Without it the canvas is plain white.
    pub background: Option<Background>,
    /// Font used for the name. Without it the name is not drawn.
    pub font: Option<Arc<Vec<u8>>>,
}

impl CardAssets {
    /// Load the artwork and font referenced by `template`, resolving paths against `root`.
    ///
    /// IO and decoding happen here so rendering stays IO-free.
    #[tracing::instrument(skip(template))]
    pub fn load(template: &Template, root: &Path) -> CardResult<Self> {
        let background = match &template.background {
            None => None,
            Some(rel) => {
                let path = resolve(root, rel)?;
                let bytes = read_bytes(&path)?;
                let is_svg = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
                Some(if is_svg {
                    Background::Svg(parse_svg(&bytes, path.parent())?)
                } else {
                    Background::Raster(decode_image(&bytes)?)
                })
            }
        };

        let font = match &template.font {
            None => None,
            Some(rel) => Some(Arc::new(read_bytes(&resolve(root, rel)?)?)),
        };

        Ok(Self { background, font })
    }
}

fn resolve(root: &Path, rel: &Path) -> CardResult<PathBuf> {
    let s = rel
        .to_str()
        .ok_or_else(|| CardError::validation("asset paths must be valid UTF-8"))?;
    Ok(root.join(normalize_rel_path(s)?))
}

fn read_bytes(path: &Path) -> CardResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(CardError::from)
}

/// Normalize and validate template-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CardResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(CardError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(CardError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CardError::validation(
            "asset path must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
