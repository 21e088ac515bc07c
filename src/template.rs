//! Fixed reference geometry of the ID-card artwork.
//!
//! A [`Template`] is loaded once per deployment (usually from JSON) and never mutated. All
//! quantities are expressed in template pixels, which are also export-space pixels.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{Point, Rgba8, Size};
use crate::foundation::error::{CardError, CardResult};

/// Canonical template width in pixels.
pub const TEMPLATE_WIDTH: f64 = 945.0;
/// Canonical template height in pixels.
pub const TEMPLATE_HEIGHT: f64 = 1299.0;
/// Horizontal center of the avatar mask. The artwork's circle sits one pixel left of the
/// geometric center line.
pub const MASK_CENTER_X: f64 = TEMPLATE_WIDTH / 2.0 - 1.0;
/// Vertical center of the avatar mask.
pub const MASK_CENTER_Y: f64 = 567.0;
/// Radius of the avatar mask.
pub const MASK_RADIUS: f64 = 247.0;
/// Top of the name text box.
pub const NAME_Y: f64 = 980.0;
/// Name font size at template resolution.
pub const NAME_FONT_SIZE: f64 = 72.0;
/// Padding kept between a freshly fitted photo and the preview edge.
pub const FIT_MARGIN: f64 = 100.0;

/// Reference geometry and styling of the card artwork.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Template {
    /// Canonical width `W`.
    pub width: f64,
    /// Canonical height `H`.
    pub height: f64,
    /// Mask center `(Cx, Cy)`.
    pub mask_center: Point,
    /// Mask radius `R`.
    pub mask_radius: f64,
    /// Top of the name text box `Ny`.
    pub name_y: f64,
    /// Base font size `F`.
    pub font_size: f64,
    /// Name fill color.
    pub name_color: Rgba8,
    /// Decorative family the name is set in. Informational; the face is taken from `font`.
    pub font_family: String,
    /// Padding used by the size fitter, in preview pixels.
    pub fit_margin: f64,
    /// Template artwork (SVG or raster), relative to the template file.
    pub background: Option<PathBuf>,
    /// Font file used for the name, relative to the template file.
    pub font: Option<PathBuf>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            width: TEMPLATE_WIDTH,
            height: TEMPLATE_HEIGHT,
            mask_center: Point::new(MASK_CENTER_X, MASK_CENTER_Y),
            mask_radius: MASK_RADIUS,
            name_y: NAME_Y,
            font_size: NAME_FONT_SIZE,
            name_color: Rgba8::opaque(0xFA, 0xEE, 0x65),
            font_family: "VL Selphia".to_string(),
            fit_margin: FIT_MARGIN,
            background: None,
            font: None,
        }
    }
}

impl Template {
    /// Parse a template from a JSON reader. Missing fields take the default deployment values.
    pub fn from_reader<R: std::io::Read>(r: R) -> CardResult<Self> {
        let template: Template = serde_json::from_reader(r)
            .map_err(|e| CardError::serde(format!("parse template JSON: {e}")))?;
        template.validate()?;
        Ok(template)
    }

    /// Parse a template from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardError::validation(format!("open template JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check that the geometry is usable.
    pub fn validate(&self) -> CardResult<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("mask_radius", self.mask_radius),
            ("font_size", self.font_size),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(CardError::validation(format!(
                    "template {name} must be finite and > 0"
                )));
            }
        }
        if !self.fit_margin.is_finite() || self.fit_margin < 0.0 {
            return Err(CardError::validation(
                "template fit_margin must be finite and >= 0",
            ));
        }
        if !self.name_y.is_finite() || self.name_y < 0.0 || self.name_y > self.height {
            return Err(CardError::validation(
                "template name_y must lie within the canvas",
            ));
        }

        let c = self.mask_center;
        let r = self.mask_radius;
        if !c.x.is_finite()
            || !c.y.is_finite()
            || c.x - r < 0.0
            || c.y - r < 0.0
            || c.x + r > self.width
            || c.y + r > self.height
        {
            return Err(CardError::validation(
                "template mask circle must lie inside the canvas",
            ));
        }
        Ok(())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Diameter of the mask in template pixels.
    pub fn mask_diameter(&self) -> f64 {
        2.0 * self.mask_radius
    }
}

#[cfg(test)]
#[path = "../tests/unit/template.rs"]
mod tests;
