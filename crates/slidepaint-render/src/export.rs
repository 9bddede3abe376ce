//! Thumbnails and full-resolution export.
//!
//! Both run the same pipeline as the viewer, one slide after another, each
//! onto its own offscreen surface.

use crate::pipeline::RenderPipeline;
use crate::raster::PixmapSurface;
use crate::surface::RenderResult;
use base64::{Engine, engine::general_purpose::STANDARD};
use slidepaint_core::{OrderedSlide, ScaleContext, Viewport};

/// One slide encoded as PNG.
#[derive(Debug, Clone)]
pub struct ExportedSlide {
    /// Slide number parsed from its key.
    pub number: u64,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl ExportedSlide {
    /// The PNG as a `data:image/png;base64,` URI.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

impl RenderPipeline {
    /// Thumbnails at the configured `thumbnail_width`.
    pub async fn thumbnails(&mut self, slides: &[OrderedSlide]) -> RenderResult<Vec<PixmapSurface>> {
        let width = self.config().thumbnail_width;
        render_thumbnails(self, slides, width).await
    }

    /// Export at the configured `export_multiplier`.
    pub async fn export(&mut self, slides: &[OrderedSlide]) -> RenderResult<Vec<ExportedSlide>> {
        let multiplier = self.config().export_multiplier;
        export_slides(self, slides, multiplier).await
    }
}

/// Render every slide at a fixed pixel `width`, in slide order.
pub async fn render_thumbnails(
    pipeline: &mut RenderPipeline,
    slides: &[OrderedSlide],
    width: u32,
) -> RenderResult<Vec<PixmapSurface>> {
    let viewport = Viewport::compute(ScaleContext::Fixed {
        width: width as f64,
    });
    let mut thumbnails = Vec::with_capacity(slides.len());
    for slide in slides {
        let mut surface = PixmapSurface::new(viewport)?;
        pipeline.render(&slide.document, &mut surface).await;
        thumbnails.push(surface);
    }
    Ok(thumbnails)
}

/// Render every slide at `multiplier` times the virtual canvas and encode it.
pub async fn export_slides(
    pipeline: &mut RenderPipeline,
    slides: &[OrderedSlide],
    multiplier: f64,
) -> RenderResult<Vec<ExportedSlide>> {
    let viewport = Viewport::compute(ScaleContext::Multiplier(multiplier));
    let mut exported = Vec::with_capacity(slides.len());
    for slide in slides {
        let mut surface = PixmapSurface::new(viewport)?;
        pipeline.render(&slide.document, &mut surface).await;
        let png = surface.encode_png()?;
        log::debug!("Exported slide {} ({} bytes)", slide.number, png.len());
        exported.push(ExportedSlide {
            number: slide.number,
            width: viewport.width,
            height: viewport.height,
            png,
        });
    }
    Ok(exported)
}
