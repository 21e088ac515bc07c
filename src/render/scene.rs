use crate::assets::decode::PreparedImage;
use crate::foundation::core::Canvas;
use crate::layer::{LayerTransform, TransformBox};
use crate::mask::ClipMask;
use crate::text::TextPlacement;

/// Which of the two canvases a scene describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasSpace {
    /// The resizable on-screen canvas.
    Preview,
    /// The fixed, template-resolution canvas.
    Export,
}

/// The photo as placed on one canvas.
#[derive(Clone, Debug)]
pub struct ScenePhoto {
    pub image: PreparedImage,
    pub layer: LayerTransform,
}

/// The name as placed on one canvas.
#[derive(Clone, Debug)]
pub struct SceneName {
    pub text: String,
    pub placement: TextPlacement,
}

/// Everything needed to draw one canvas.
///
/// Draw order: white fill, template artwork, photo clipped to `mask`, transform handles, name.
#[derive(Clone, Debug)]
pub struct CardScene {
    pub space: CanvasSpace,
    pub canvas: Canvas,
    pub mask: ClipMask,
    pub photo: Option<ScenePhoto>,
    pub name: Option<SceneName>,
    /// Transformer frame around the photo; only ever set for the preview.
    pub handles: Option<TransformBox>,
}

/// A rendered canvas as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha RGBA8 pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut px);
        }
        Some(px)
    }
}
