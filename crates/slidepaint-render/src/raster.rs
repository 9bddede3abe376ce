//! Offscreen CPU surface backed by `vello_cpu`.

use crate::handle::{GlyphRun, Handle};
use crate::surface::{Painter, RenderResult, RendererError, Surface, paint_scene};
use kurbo::{Affine, BezPath, Rect, Stroke};
use peniko::{Color, ImageData, ImageSampler};
use slidepaint_core::Viewport;
use vello_cpu::{Glyph, Image, ImageSource, Pixmap, RenderContext};

impl Painter for RenderContext {
    fn fill(&mut self, transform: Affine, color: Color, path: &BezPath) {
        self.set_transform(transform);
        self.set_paint(color);
        self.fill_path(path);
    }

    fn stroke(&mut self, transform: Affine, stroke: &Stroke, color: Color, path: &BezPath) {
        self.set_transform(transform);
        self.set_paint(color);
        self.set_stroke(stroke.clone());
        self.stroke_path(path);
    }

    fn draw_image(&mut self, transform: Affine, image: &ImageData) {
        if image.width > u16::MAX as u32 || image.height > u16::MAX as u32 {
            log::warn!("Skipping {}x{} image: too large", image.width, image.height);
            return;
        }
        self.set_transform(transform);
        self.set_paint(Image {
            image: ImageSource::from_peniko_image_data(image),
            sampler: ImageSampler::default(),
        });
        self.fill_rect(&Rect::new(0.0, 0.0, image.width as f64, image.height as f64));
    }

    fn draw_glyphs(&mut self, transform: Affine, run: &GlyphRun) {
        self.set_transform(transform);
        self.set_paint(run.color);
        let mut builder = self.glyph_run(&run.font).font_size(run.font_size).hint(false);
        if let Some(glyph_transform) = run.glyph_transform {
            builder = builder.glyph_transform(glyph_transform);
        }
        builder.fill_glyphs(run.glyphs.iter().map(|glyph| Glyph {
            id: glyph.id,
            x: glyph.x,
            y: glyph.y,
        }));
    }

    fn push_clip(&mut self, transform: Affine, clip: &BezPath) {
        self.set_transform(transform);
        self.push_clip_layer(clip);
    }

    fn push_opacity(&mut self, opacity: f32) {
        self.push_opacity_layer(opacity);
    }

    fn pop_layer(&mut self) {
        RenderContext::pop_layer(self);
    }
}

/// A slide rasterized into memory.
///
/// Used for thumbnails, export and tests. The committed handles (and the
/// image data they share) are kept until the next `clear` or `resize`.
pub struct PixmapSurface {
    viewport: Viewport,
    background: Color,
    handles: Vec<Handle>,
    pixmap: Pixmap,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("viewport", &self.viewport)
            .field("handles", &self.handles.len())
            .finish_non_exhaustive()
    }
}

fn pixmap_size(viewport: Viewport) -> RenderResult<(u16, u16)> {
    let invalid = RendererError::InvalidSize {
        width: viewport.width,
        height: viewport.height,
    };
    if viewport.is_empty() {
        return Err(invalid);
    }
    match (u16::try_from(viewport.width), u16::try_from(viewport.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(invalid),
    }
}

impl PixmapSurface {
    /// Create a surface sized for `viewport`, filled with transparent pixels.
    pub fn new(viewport: Viewport) -> RenderResult<Self> {
        let (width, height) = pixmap_size(viewport)?;
        Ok(Self {
            viewport,
            background: Color::WHITE,
            handles: Vec::new(),
            pixmap: Pixmap::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.viewport.width
    }

    pub fn height(&self) -> u32 {
        self.viewport.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Committed handles in paint order.
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Straight-alpha RGBA of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let index = (y * self.width() + x) as usize;
        self.pixmap.data().get(index).map(|p| unpremultiply([p.r, p.g, p.b, p.a]))
    }

    /// All pixels as straight-alpha RGBA8, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .data()
            .iter()
            .flat_map(|p| unpremultiply([p.r, p.g, p.b, p.a]))
            .collect()
    }

    /// Encode the current pixels as a PNG file.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut data, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer
                .write_image_data(&self.to_rgba8())
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| RendererError::Encode(e.to_string()))?;
        }
        Ok(data)
    }
}

fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 || a == 255 {
        return [r, g, b, a];
    }
    let alpha = 255.0 / f32::from(a);
    let channel = |c: u8| (f32::from(c) * alpha + 0.5).min(255.0) as u8;
    [channel(r), channel(g), channel(b), a]
}

impl Surface for PixmapSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> RenderResult<()> {
        let (width, height) = pixmap_size(viewport)?;
        self.viewport = viewport;
        self.handles.clear();
        self.pixmap = Pixmap::new(width, height);
        Ok(())
    }

    fn clear(&mut self) {
        self.handles.clear();
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn add(&mut self, handle: Handle) {
        self.handles.push(handle);
    }

    fn paint(&mut self) {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut ctx = RenderContext::new(width, height);
        paint_scene(&mut ctx, self.viewport, self.background, &self.handles);
        ctx.flush();
        let mut pixmap = Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        self.pixmap = pixmap;
    }
}
