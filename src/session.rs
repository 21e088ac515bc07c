//! One editing session: a template, a viewport, at most one photo and a name.
//!
//! Pointer input is preview-space. The session keeps the preview-space layer authoritative and
//! hands out export-space state through the active [`InteractionStrategy`].

use crate::assets::decode::{PreparedImage, decode_image};
use crate::fit::{fit_photo_size, initial_position};
use crate::foundation::core::{Canvas, Point, Rect, Size};
use crate::foundation::error::{CardError, CardResult};
use crate::interaction::{
    ANCHOR_SIZE, InteractionMode, InteractionStrategy, ROTATE_ANCHOR_OFFSET, create_strategy,
};
use crate::layer::{ExportPhotoLayer, LayerTransform, PhotoLayer};
use crate::mask::ClipMask;
use crate::render::scene::{CanvasSpace, CardScene, SceneName, ScenePhoto};
use crate::selection::{Anchor, PointerTarget, SelectionState};
use crate::template::Template;
use crate::text::TextPlacement;
use crate::viewport::{ScaleRatio, ViewportState, preview_canvas_size};

struct LoadedPhoto {
    image: PreparedImage,
    strategy: Box<dyn InteractionStrategy>,
}

/// Editing state behind the preview and export canvases.
pub struct EditorSession {
    template: Template,
    mode: InteractionMode,
    viewport: ViewportState,
    ratio: ScaleRatio,
    pending_viewport: Option<ViewportState>,
    photo: Option<LoadedPhoto>,
    selection: SelectionState,
    name: String,
}

impl EditorSession {
    /// Start a session with no photo, no name and no laid-out viewport (ratio `1`).
    pub fn new(template: Template, mode: InteractionMode) -> CardResult<Self> {
        template.validate()?;
        Ok(Self {
            template,
            mode,
            viewport: ViewportState::default(),
            ratio: ScaleRatio::IDENTITY,
            pending_viewport: None,
            photo: None,
            selection: SelectionState::Unselected,
            name: String::new(),
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// Ratio currently used for the preview canvas.
    pub fn ratio(&self) -> ScaleRatio {
        self.ratio
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn preview_canvas_size(&self) -> Size {
        preview_canvas_size(&self.template, self.viewport)
    }

    /// Record a new container width.
    ///
    /// While a gesture is in flight the update is held back and applied when it ends.
    #[tracing::instrument(skip(self))]
    pub fn observe_viewport(&mut self, preview_width: f64) {
        let viewport = ViewportState::new(preview_width);
        if self.is_gesture_active() {
            tracing::debug!(preview_width, "viewport change deferred until gesture ends");
            self.pending_viewport = Some(viewport);
            return;
        }
        self.apply_viewport(viewport);
    }

    fn apply_viewport(&mut self, viewport: ViewportState) {
        self.pending_viewport = None;
        self.viewport = viewport;
        self.ratio = ScaleRatio::from_viewport(&self.template, viewport);
        let ratio = self.ratio;
        let Some(photo) = &mut self.photo else {
            return;
        };
        if photo.strategy.is_pristine() {
            let fitted = fitted_layer(&self.template, ratio, &photo.image);
            photo.strategy = create_strategy(self.mode, fitted, ratio, &self.template);
        } else {
            photo.strategy.rescale(ratio);
        }
    }

    /// Place a decoded photo: fit it, mirror it, and select it.
    #[tracing::instrument(skip_all, fields(w = image.width, h = image.height))]
    pub fn load_photo(&mut self, image: PreparedImage) -> CardResult<()> {
        if image.width == 0 || image.height == 0 {
            self.clear_photo();
            return Err(CardError::decode("photo has no pixels"));
        }
        // The outgoing photo may have been mid-gesture with a held-back width.
        self.photo = None;
        self.flush_pending_viewport();
        let layer = fitted_layer(&self.template, self.ratio, &image);
        let strategy = create_strategy(self.mode, layer, self.ratio, &self.template);
        self.photo = Some(LoadedPhoto { image, strategy });
        self.selection = SelectionState::Selected;
        Ok(())
    }

    /// Decode and place a photo. A photo that cannot be decoded leaves the session without one.
    pub fn load_photo_bytes(&mut self, bytes: &[u8]) -> CardResult<()> {
        match decode_image(bytes) {
            Ok(image) => self.load_photo(image),
            Err(err) => {
                tracing::debug!(%err, "photo rejected");
                self.clear_photo();
                Err(err)
            }
        }
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
        self.selection = SelectionState::Unselected;
        self.flush_pending_viewport();
    }

    fn flush_pending_viewport(&mut self) {
        if let Some(viewport) = self.pending_viewport.take() {
            self.apply_viewport(viewport);
        }
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn photo_image(&self) -> Option<&PreparedImage> {
        self.photo.as_ref().map(|p| &p.image)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    fn is_gesture_active(&self) -> bool {
        self.photo.as_ref().is_some_and(|p| p.strategy.is_active())
    }

    pub fn handles_visible(&self) -> bool {
        self.selection.is_selected()
            && self
                .photo
                .as_ref()
                .is_some_and(|p| p.strategy.shows_handles())
    }

    /// Topmost element under the preview-space point `p`.
    pub fn hit_test(&self, p: Point) -> PointerTarget {
        let Some(photo) = &self.photo else {
            return self.hit_name_or_background(p);
        };
        let layer = photo.strategy.preview_layer();

        if self.handles_visible() {
            let frame = layer.0.transform_box();
            let corners = frame.corners();
            for anchor in Anchor::ALL {
                if anchor_rect(corners[anchor.corner_index()]).contains(p) {
                    return PointerTarget::Anchor(anchor);
                }
            }
            if anchor_rect(frame.rotate_handle(ROTATE_ANCHOR_OFFSET)).contains(p) {
                return PointerTarget::RotateHandle;
            }
        }

        match self.hit_name_or_background(p) {
            PointerTarget::Background => {}
            target => return target,
        }

        let mask = ClipMask::for_preview(&self.template, self.ratio);
        if layer.0.contains(p) && mask.contains(p) {
            return PointerTarget::Photo;
        }
        PointerTarget::Background
    }

    fn hit_name_or_background(&self, p: Point) -> PointerTarget {
        if self.has_name()
            && TextPlacement::for_ratio(&self.template, self.ratio)
                .hit_rect()
                .contains(p)
        {
            return PointerTarget::Name;
        }
        PointerTarget::Background
    }

    /// Press at `p`: update the selection, then start a gesture if the target supports one.
    pub fn pointer_down(&mut self, p: Point) -> PointerTarget {
        let target = self.hit_test(p);
        self.selection = self.selection.on_pointer(target);
        let ratio = self.ratio;
        if let Some(photo) = &mut self.photo {
            photo.strategy.begin(target, p, ratio);
        }
        target
    }

    pub fn pointer_move(&mut self, p: Point) {
        if let Some(photo) = &mut self.photo {
            photo.strategy.update(p);
        }
    }

    /// Release the pointer, commit the gesture and apply any deferred viewport change.
    pub fn pointer_up(&mut self) -> Option<ExportPhotoLayer> {
        let committed = self.photo.as_mut().and_then(|p| p.strategy.end());
        self.flush_pending_viewport();
        committed
    }

    /// Click or tap without a drag: selection only.
    pub fn click(&mut self, p: Point) -> PointerTarget {
        let target = self.hit_test(p);
        self.selection = self.selection.on_pointer(target);
        target
    }

    /// One wheel notch over the preview. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f64) -> Option<ExportPhotoLayer> {
        self.photo.as_mut().and_then(|p| p.strategy.wheel(delta_y))
    }

    pub fn preview_layer(&self) -> Option<PhotoLayer> {
        self.photo.as_ref().map(|p| p.strategy.preview_layer())
    }

    /// The committed export-space layer.
    pub fn export_layer(&self) -> Option<ExportPhotoLayer> {
        self.photo.as_ref().map(|p| p.strategy.export_layer())
    }

    /// Whether an export may be requested: a decoded photo and a non-empty name.
    pub fn can_export(&self) -> bool {
        self.photo.is_some() && self.has_name()
    }

    /// Describe one canvas for rendering.
    pub fn scene(&self, space: CanvasSpace) -> CardResult<CardScene> {
        let (ratio, layer): (ScaleRatio, Option<LayerTransform>) = match space {
            CanvasSpace::Preview => (self.ratio, self.preview_layer().map(|l| l.0)),
            CanvasSpace::Export => (ScaleRatio::IDENTITY, self.export_layer().map(|l| l.0)),
        };
        let canvas = Canvas::from_size(ratio.size_to_preview(self.template.size()))?;
        let mask = ClipMask::for_preview(&self.template, ratio);

        let photo = self.photo.as_ref().zip(layer).map(|(p, layer)| ScenePhoto {
            image: p.image.clone(),
            layer,
        });
        let name = self.has_name().then(|| SceneName {
            text: self.name.clone(),
            placement: TextPlacement::for_ratio(&self.template, ratio),
        });
        let handles = match (space, layer) {
            (CanvasSpace::Preview, Some(layer)) if self.handles_visible() => {
                Some(layer.transform_box())
            }
            _ => None,
        };

        Ok(CardScene {
            space,
            canvas,
            mask,
            photo,
            name,
            handles,
        })
    }

    /// The export canvas, or [`CardError::ExportUnavailable`] while no photo is loaded.
    pub fn export_scene(&self) -> CardResult<CardScene> {
        if self.photo.is_none() {
            return Err(CardError::export_unavailable("no photo loaded"));
        }
        self.scene(CanvasSpace::Export)
    }
}

fn fitted_layer(template: &Template, ratio: ScaleRatio, image: &PreparedImage) -> PhotoLayer {
    let canvas = ratio.size_to_preview(template.size());
    let size = fit_photo_size(image.natural_size(), canvas, template.fit_margin);
    PhotoLayer(LayerTransform::new(
        initial_position(template, canvas, size),
        size,
    ))
}

fn anchor_rect(center: Point) -> Rect {
    let half = ANCHOR_SIZE / 2.0;
    Rect::new(
        center.x - half,
        center.y - half,
        center.x + half,
        center.y + half,
    )
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
