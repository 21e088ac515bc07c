//! Placement and shaping of the name line drawn under the avatar.

use std::sync::Arc;

use crate::foundation::core::{Rect, Rgba8};
use crate::foundation::error::{CardError, CardResult};
use crate::template::Template;
use crate::viewport::ScaleRatio;

/// Where and how large the name is drawn on one canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPlacement {
    /// Left edge of the text box (always `0`).
    pub x: f64,
    /// Top edge of the text box.
    pub y: f64,
    /// Box width; the name is centered inside it.
    pub width: f64,
    pub font_size: f64,
    pub color: Rgba8,
}

impl TextPlacement {
    /// Place the name for a canvas at `ratio` (`ScaleRatio::IDENTITY` for export).
    pub fn for_ratio(template: &Template, ratio: ScaleRatio) -> Self {
        Self {
            x: 0.0,
            y: ratio.to_preview(template.name_y),
            width: ratio.to_preview(template.width),
            font_size: ratio.to_preview(template.font_size),
            color: template.name_color,
        }
    }

    pub fn for_export(template: &Template) -> Self {
        Self::for_ratio(template, ScaleRatio::IDENTITY)
    }

    /// Single-line box used for pointer hit testing.
    pub fn hit_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.font_size)
    }
}

/// A shaped name line ready to be drawn.
pub struct NameLayout {
    pub layout: parley::Layout<Rgba8>,
    pub font_bytes: Arc<Vec<u8>>,
}

impl NameLayout {
    /// Horizontal offset that centers the shaped line inside `placement`.
    pub fn centered_x(&self, placement: &TextPlacement) -> f64 {
        placement.x + (placement.width - f64::from(self.layout.width())) / 2.0
    }
}

/// Stateful helper for shaping text with Parley from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    registered: Option<(Arc<Vec<u8>>, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: None,
        }
    }

    fn family_for(&mut self, font_bytes: &Arc<Vec<u8>>) -> CardResult<String> {
        if let Some((bytes, family)) = &self.registered
            && Arc::ptr_eq(bytes, font_bytes)
        {
            return Ok(family.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::decode("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::decode("registered font family has no name"))?
            .to_string();
        self.registered = Some((Arc::clone(font_bytes), family.clone()));
        Ok(family)
    }

    /// Shape `text` on a single line at `placement`'s size and color.
    pub fn layout_name(
        &mut self,
        text: &str,
        font_bytes: &Arc<Vec<u8>>,
        placement: &TextPlacement,
    ) -> CardResult<NameLayout> {
        let size_px = placement.font_size as f32;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::validation(
                "name font size must be finite and > 0",
            ));
        }
        let family = self.family_for(font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(placement.color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(NameLayout {
            layout,
            font_bytes: Arc::clone(font_bytes),
        })
    }
}
