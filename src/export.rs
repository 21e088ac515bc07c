//! Serialize the export canvas to an image file.

use image::ImageEncoder;

use crate::foundation::error::{CardError, CardResult};
use crate::render::cpu::CpuRenderer;
use crate::render::scene::FrameRGBA;
use crate::session::EditorSession;

const JPEG_QUALITY: u8 = 92;

/// Output encoding for the exported card.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    /// Alpha is flattened onto white.
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Render the export canvas of `session` and encode it as `format`.
///
/// Every failure, including a missing photo, is reported as [`CardError::ExportUnavailable`].
#[tracing::instrument(skip(session, renderer))]
pub fn export_card(
    session: &EditorSession,
    renderer: &mut CpuRenderer,
    format: ExportFormat,
) -> CardResult<Vec<u8>> {
    let scene = session.export_scene()?;
    let frame = renderer
        .render(&scene)
        .map_err(|e| CardError::export_unavailable(e.to_string()))?;
    let bytes = encode_frame(&frame, format)?;
    tracing::debug!(bytes = bytes.len(), "export encoded");
    Ok(bytes)
}

/// Encode a rendered frame. Also used for writing preview snapshots.
pub fn encode_frame(frame: &FrameRGBA, format: ExportFormat) -> CardResult<Vec<u8>> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.data.len() != expected {
        return Err(CardError::export_unavailable("frame byte len mismatch"));
    }

    let mut out = Vec::new();
    let res = match format {
        ExportFormat::Png => {
            let mut rgba = frame.data.clone();
            if frame.premultiplied {
                crate::foundation::math::unpremultiply_rgba8_in_place(&mut rgba);
            }
            image::codecs::png::PngEncoder::new(&mut out).write_image(
                &rgba,
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgba8,
            )
        }
        ExportFormat::Jpeg => {
            let rgb = flatten_on_white(frame);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).write_image(
                &rgb,
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgb8,
            )
        }
    };
    res.map_err(|e| {
        CardError::export_unavailable(format!("{} encode failed: {e}", format.extension()))
    })?;
    Ok(out)
}

fn flatten_on_white(frame: &FrameRGBA) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(frame.data.len() / 4 * 3);
    for px in frame.data.chunks_exact(4) {
        let a = px[3];
        for &c in &px[..3] {
            let premul = if frame.premultiplied {
                c
            } else {
                crate::foundation::math::mul_div255_u8(u16::from(c), u16::from(a))
            };
            rgb.push(premul.saturating_add(255 - a));
        }
    }
    rgb
}
