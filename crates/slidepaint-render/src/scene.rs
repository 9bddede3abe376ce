//! Vello scene surface for hosts that present through the GPU.

use crate::handle::{GlyphRun, Handle};
use crate::surface::{Painter, RenderResult, RendererError, Surface, paint_scene};
use kurbo::{Affine, BezPath, Rect, Stroke};
use peniko::{BlendMode, Color, Fill, ImageData};
use slidepaint_core::Viewport;
use vello::Scene;

/// Records vello scene commands. Opacity layers cover the whole surface.
struct ScenePainter<'a> {
    scene: &'a mut Scene,
    bounds: Rect,
}

impl Painter for ScenePainter<'_> {
    fn fill(&mut self, transform: Affine, color: Color, path: &BezPath) {
        self.scene.fill(Fill::NonZero, transform, color, None, path);
    }

    fn stroke(&mut self, transform: Affine, stroke: &Stroke, color: Color, path: &BezPath) {
        self.scene.stroke(stroke, transform, color, None, path);
    }

    fn draw_image(&mut self, transform: Affine, image: &ImageData) {
        self.scene.draw_image(&image.clone().into(), transform);
    }

    fn draw_glyphs(&mut self, transform: Affine, run: &GlyphRun) {
        self.scene
            .draw_glyphs(&run.font)
            .brush(run.color)
            .hint(false)
            .transform(transform)
            .glyph_transform(run.glyph_transform)
            .font_size(run.font_size)
            .draw(
                Fill::NonZero,
                run.glyphs.iter().map(|glyph| vello::Glyph {
                    id: glyph.id,
                    x: glyph.x,
                    y: glyph.y,
                }),
            );
    }

    fn push_clip(&mut self, transform: Affine, clip: &BezPath) {
        self.scene.push_layer(BlendMode::default(), 1.0, transform, clip);
    }

    fn push_opacity(&mut self, opacity: f32) {
        self.scene
            .push_layer(BlendMode::default(), opacity, Affine::IDENTITY, &self.bounds);
    }

    fn pop_layer(&mut self) {
        self.scene.pop_layer();
    }
}

/// A surface that rebuilds a [`vello::Scene`] on every paint.
///
/// The host renders the scene to its own texture, typically with
/// `vello::Renderer::render_to_texture` at [`Surface::viewport`] size.
pub struct SceneSurface {
    scene: Scene,
    viewport: Viewport,
    background: Color,
    handles: Vec<Handle>,
}

impl SceneSurface {
    pub fn new(viewport: Viewport) -> RenderResult<Self> {
        if viewport.is_empty() {
            return Err(RendererError::InvalidSize {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            scene: Scene::new(),
            viewport,
            background: Color::WHITE,
            handles: Vec::new(),
        })
    }

    /// The scene built by the last paint.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the built scene, leaving an empty one behind.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }
}

impl Surface for SceneSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> RenderResult<()> {
        if viewport.is_empty() {
            return Err(RendererError::InvalidSize {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        self.handles.clear();
        self.scene.reset();
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
        self.scene.reset();
        let bounds = Rect::from_origin_size((0.0, 0.0), self.viewport.size());
        let mut painter = ScenePainter {
            scene: &mut self.scene,
            bounds,
        };
        paint_scene(&mut painter, self.viewport, self.background, &self.handles);
    }
}
