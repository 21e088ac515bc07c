use std::sync::Arc;

use kurbo::{PathEl, Shape};

use crate::assets::decode::PreparedImage;
use crate::assets::store::{Background, CardAssets};
use crate::assets::svg_raster::rasterize_svg_to_premul_rgba8;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{CardError, CardResult};
use crate::interaction::{ANCHOR_SIZE, ROTATE_ANCHOR_OFFSET};
use crate::layer::TransformBox;
use crate::render::scene::{CardScene, FrameRGBA, SceneName, ScenePhoto};
use crate::text::TextLayoutEngine;

const HANDLE_STROKE: Rgba8 = Rgba8::opaque(0, 161, 255);
const HANDLE_FILL: Rgba8 = Rgba8::WHITE;
const HANDLE_STROKE_WIDTH: f64 = 1.0;
const PATH_TOLERANCE: f64 = 0.1;

/// CPU renderer powered by `vello_cpu` for both canvases.
///
/// Decoded images, the rasterized artwork and the loaded font are cached across frames, so a
/// preview redraw after a pointer move only re-encodes the transform.
pub struct CpuRenderer {
    assets: CardAssets,
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    background_cache: Option<(Canvas, vello_cpu::Image)>,
    photo_cache: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
    font_cache: Option<(Arc<Vec<u8>>, vello_cpu::peniko::FontData)>,
    warned_missing_font: bool,
}

impl CpuRenderer {
    pub fn new(assets: CardAssets) -> Self {
        Self {
            assets,
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            background_cache: None,
            photo_cache: None,
            font_cache: None,
            warned_missing_font: false,
        }
    }

    pub fn assets(&self) -> &CardAssets {
        &self.assets
    }

    /// Rasterize one canvas. The result is premultiplied RGBA8.
    #[tracing::instrument(skip(self, scene), fields(space = ?scene.space, w = scene.canvas.width, h = scene.canvas.height))]
    pub fn render(&mut self, scene: &CardScene) -> CardResult<FrameRGBA> {
        let width: u16 = scene
            .canvas
            .width
            .try_into()
            .map_err(|_| CardError::render("canvas width exceeds u16"))?;
        let height: u16 = scene
            .canvas
            .height
            .try_into()
            .map_err(|_| CardError::render("canvas height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.with_ctx_mut(width, height, |this, ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(to_color(Rgba8::WHITE));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));

            this.draw_background(scene.canvas, ctx)?;
            if let Some(photo) = &scene.photo {
                this.draw_photo(photo, scene, ctx)?;
            }
            if let Some(frame) = &scene.handles {
                draw_handles(frame, ctx);
            }
            if let Some(name) = &scene.name {
                this.draw_name(name, ctx)?;
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: scene.canvas.width,
            height: scene.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CardResult<R>,
    ) -> CardResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn background_paint_for(&mut self, canvas: Canvas) -> CardResult<Option<vello_cpu::Image>> {
        if let Some((cached, paint)) = &self.background_cache
            && *cached == canvas
        {
            return Ok(Some(paint.clone()));
        }
        let paint = match &self.assets.background {
            None => return Ok(None),
            Some(Background::Svg(tree)) => {
                let rgba = rasterize_svg_to_premul_rgba8(tree, canvas.width, canvas.height)?;
                rgba_premul_to_image(&rgba, canvas.width, canvas.height)?
            }
            Some(Background::Raster(img)) => {
                rgba_premul_to_image(&img.rgba8_premul, img.width, img.height)?
            }
        };
        self.background_cache = Some((canvas, paint.clone()));
        Ok(Some(paint))
    }

    fn draw_background(
        &mut self,
        canvas: Canvas,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CardResult<()> {
        let Some(paint) = self.background_paint_for(canvas)? else {
            return Ok(());
        };
        // Svg artwork is rasterized at canvas size; raster artwork is stretched here.
        let (src_w, src_h) = match &self.assets.background {
            Some(Background::Raster(img)) => (f64::from(img.width), f64::from(img.height)),
            _ => (f64::from(canvas.width), f64::from(canvas.height)),
        };
        let tr = Affine::scale_non_uniform(
            f64::from(canvas.width) / src_w,
            f64::from(canvas.height) / src_h,
        );
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, src_w, src_h));
        Ok(())
    }

    fn photo_paint_for(&mut self, image: &PreparedImage) -> CardResult<vello_cpu::Image> {
        if let Some((bytes, paint)) = &self.photo_cache
            && Arc::ptr_eq(bytes, &image.rgba8_premul)
        {
            return Ok(paint.clone());
        }
        let paint = rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;
        self.photo_cache = Some((Arc::clone(&image.rgba8_premul), paint.clone()));
        Ok(paint)
    }

    fn draw_photo(
        &mut self,
        photo: &ScenePhoto,
        scene: &CardScene,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CardResult<()> {
        if photo.image.width == 0 || photo.image.height == 0 {
            return Ok(());
        }
        let paint = self.photo_paint_for(&photo.image)?;
        let natural = photo.image.natural_size();
        let tr = photo.layer.affine()
            * Affine::scale_non_uniform(
                photo.layer.size.width / natural.width,
                photo.layer.size.height / natural.height,
            );

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.push_clip_layer(&bezpath_to_cpu(&scene.mask.to_path()));
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            natural.width,
            natural.height,
        ));
        ctx.pop_layer();
        Ok(())
    }

    fn font_for(&mut self, bytes: &Arc<Vec<u8>>) -> vello_cpu::peniko::FontData {
        if let Some((cached, font)) = &self.font_cache
            && Arc::ptr_eq(cached, bytes)
        {
            return font.clone();
        }
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        self.font_cache = Some((Arc::clone(bytes), font.clone()));
        font
    }

    fn draw_name(&mut self, name: &SceneName, ctx: &mut vello_cpu::RenderContext) -> CardResult<()> {
        if name.text.trim().is_empty() {
            return Ok(());
        }
        let Some(font_bytes) = self.assets.font.clone() else {
            if !self.warned_missing_font {
                tracing::warn!("template has no font; the name is not drawn");
                self.warned_missing_font = true;
            }
            return Ok(());
        };

        let shaped = self
            .text_engine
            .layout_name(&name.text, &font_bytes, &name.placement)?;
        let font = self.font_for(&shaped.font_bytes);
        let origin = Affine::translate((shaped.centered_x(&name.placement), name.placement.y));
        ctx.set_transform(affine_to_cpu(origin));

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(to_color(brush));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

fn draw_handles(frame: &TransformBox, ctx: &mut vello_cpu::RenderContext) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let corners = frame.corners();
    let mut outline = BezPath::new();
    outline.move_to(corners[0]);
    for c in &corners[1..] {
        outline.line_to(*c);
    }
    outline.close_path();

    let top_mid = corners[0].midpoint(corners[1]);
    let rotater = frame.rotate_handle(ROTATE_ANCHOR_OFFSET);
    let mut stem = BezPath::new();
    stem.move_to(top_mid);
    stem.line_to(rotater);

    ctx.set_paint(to_color(HANDLE_STROKE));
    for path in [&outline, &stem] {
        ctx.fill_path(&bezpath_to_cpu(&stroke_outline(path)));
    }

    for p in corners.into_iter().chain(std::iter::once(rotater)) {
        draw_anchor(p, ctx);
    }
}

fn draw_anchor(center: Point, ctx: &mut vello_cpu::RenderContext) {
    let half = ANCHOR_SIZE / 2.0;
    let square = Rect::new(
        center.x - half,
        center.y - half,
        center.x + half,
        center.y + half,
    );
    ctx.set_paint(to_color(HANDLE_FILL));
    ctx.fill_rect(&rect_to_cpu(square));
    ctx.set_paint(to_color(HANDLE_STROKE));
    ctx.fill_path(&bezpath_to_cpu(&stroke_outline(&square.to_path(PATH_TOLERANCE))));
}

fn stroke_outline(path: &BezPath) -> BezPath {
    kurbo::stroke(
        path.iter(),
        &kurbo::Stroke::new(HANDLE_STROKE_WIDTH),
        &kurbo::StrokeOpts::default(),
        PATH_TOLERANCE,
    )
}

fn to_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CardError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> CardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
