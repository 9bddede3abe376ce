//! Surface and painter abstractions.

use crate::handle::{Content, GlyphRun, Handle};
use kurbo::{Affine, BezPath, Rect, Shape, Stroke};
use peniko::{Color, ImageData};
use slidepaint_core::Viewport;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A target a slide is painted onto.
///
/// The render pipeline is the only writer, and it always runs the full
/// clear → background → add → paint sequence.
pub trait Surface {
    /// Current size and scale.
    fn viewport(&self) -> Viewport;

    /// Change the output size. Drops any committed handles.
    fn resize(&mut self, viewport: Viewport) -> RenderResult<()>;

    /// Remove every handle, releasing the resources they hold.
    fn clear(&mut self);

    /// Set the color painted behind every handle.
    fn set_background(&mut self, color: Color);

    /// Append a handle on top of those already added.
    fn add(&mut self, handle: Handle);

    /// Flush everything added so far to the output.
    fn paint(&mut self);
}

/// Drawing primitives a backend provides.
///
/// Every backend walks handles through [`paint_handle`], so the only thing
/// that differs between them is how each primitive reaches pixels.
pub trait Painter {
    fn fill(&mut self, transform: Affine, color: Color, path: &BezPath);

    fn stroke(&mut self, transform: Affine, stroke: &Stroke, color: Color, path: &BezPath);

    /// Draw an image with its top-left pixel at the transform's origin.
    fn draw_image(&mut self, transform: Affine, image: &ImageData);

    fn draw_glyphs(&mut self, transform: Affine, run: &GlyphRun);

    fn push_clip(&mut self, transform: Affine, clip: &BezPath);

    fn push_opacity(&mut self, opacity: f32);

    fn pop_layer(&mut self);
}

/// Paint a background and handles onto a painter sized for `viewport`.
pub fn paint_scene<P: Painter + ?Sized>(
    painter: &mut P,
    viewport: Viewport,
    background: Color,
    handles: &[Handle],
) {
    let bounds = Rect::new(0.0, 0.0, viewport.width as f64, viewport.height as f64);
    painter.fill(Affine::IDENTITY, background, &bounds.to_path(0.1));
    let transform = viewport.transform();
    for handle in handles {
        paint_handle(painter, handle, transform);
    }
}

/// Paint one handle (recursing into groups) under `parent`.
pub fn paint_handle<P: Painter + ?Sized>(painter: &mut P, handle: &Handle, parent: Affine) {
    if handle.opacity <= 0.0 {
        return;
    }
    let transform = parent * handle.transform;

    let mut layers = 0;
    if handle.opacity < 1.0 {
        painter.push_opacity(handle.opacity);
        layers += 1;
    }
    if let Some(clip) = &handle.clip {
        painter.push_clip(transform, clip);
        layers += 1;
    }

    match &handle.content {
        Content::Shape(shape) => {
            if let Some(fill) = shape.fill {
                painter.fill(transform, fill, &shape.path);
            }
            if let Some((stroke, color)) = &shape.stroke {
                painter.stroke(transform, stroke, *color, &shape.path);
            }
        }
        Content::Text(runs) => {
            for run in runs {
                painter.draw_glyphs(transform, run);
            }
        }
        Content::Image { image, offset } => {
            painter.draw_image(transform * Affine::translate(*offset), image);
        }
        Content::Group(children) => {
            for child in children {
                paint_handle(painter, child, transform);
            }
        }
    }

    for _ in 0..layers {
        painter.pop_layer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ShapePaint;

    /// Records primitive calls instead of drawing.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        depth: usize,
        max_depth: usize,
    }

    impl Painter for Recorder {
        fn fill(&mut self, transform: Affine, _color: Color, _path: &BezPath) {
            let [_, _, _, _, x, y] = transform.as_coeffs();
            self.calls.push(format!("fill@{x},{y}"));
        }

        fn stroke(&mut self, _transform: Affine, _stroke: &Stroke, _color: Color, _path: &BezPath) {
            self.calls.push("stroke".into());
        }

        fn draw_image(&mut self, _transform: Affine, _image: &ImageData) {
            self.calls.push("image".into());
        }

        fn draw_glyphs(&mut self, _transform: Affine, _run: &GlyphRun) {
            self.calls.push("glyphs".into());
        }

        fn push_clip(&mut self, _transform: Affine, _clip: &BezPath) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            self.calls.push("clip".into());
        }

        fn push_opacity(&mut self, _opacity: f32) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            self.calls.push("opacity".into());
        }

        fn pop_layer(&mut self) {
            self.depth -= 1;
            self.calls.push("pop".into());
        }
    }

    fn rect_handle(x: f64, opacity: f32, stroke: bool) -> Handle {
        Handle {
            transform: Affine::translate((x, 0.0)),
            opacity,
            clip: None,
            content: Content::Shape(ShapePaint {
                path: Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1),
                fill: Some(Color::BLACK),
                stroke: stroke.then(|| (Stroke::new(2.0), Color::WHITE)),
            }),
            index: 0,
            z_index: 0.0,
        }
    }

    #[test]
    fn test_fill_then_stroke() {
        let mut recorder = Recorder::default();
        paint_handle(&mut recorder, &rect_handle(5.0, 1.0, true), Affine::IDENTITY);
        assert_eq!(recorder.calls, vec!["fill@5,0", "stroke"]);
    }

    #[test]
    fn test_transparent_handle_is_skipped() {
        let mut recorder = Recorder::default();
        paint_handle(&mut recorder, &rect_handle(0.0, 0.0, false), Affine::IDENTITY);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_layers_are_balanced() {
        let mut child = rect_handle(1.0, 0.5, false);
        child.clip = Some(Rect::new(0.0, 0.0, 5.0, 5.0).to_path(0.1));
        let group = Handle {
            transform: Affine::translate((10.0, 0.0)),
            opacity: 0.8,
            clip: None,
            content: Content::Group(vec![child]),
            index: 0,
            z_index: 0.0,
        };
        let mut recorder = Recorder::default();
        paint_handle(&mut recorder, &group, Affine::IDENTITY);
        assert_eq!(recorder.depth, 0);
        assert_eq!(recorder.max_depth, 3);
        assert!(recorder.calls.contains(&"fill@11,0".to_string()));
    }

    #[test]
    fn test_paint_scene_scales_handles() {
        let mut recorder = Recorder::default();
        let viewport = Viewport::from_scale(0.5);
        paint_scene(&mut recorder, viewport, Color::WHITE, &[rect_handle(100.0, 1.0, false)]);
        assert_eq!(recorder.calls, vec!["fill@0,0", "fill@50,0"]);
    }
}
