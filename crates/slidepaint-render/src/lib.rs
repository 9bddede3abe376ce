//! slidepaint Render Library
//!
//! Rebuilds slide scenes into paint-ready handles and commits them to
//! surfaces. One pipeline serves the interactive viewer, thumbnails and
//! export. The default surface rasterizes on the CPU with vello_cpu; the
//! `vello-renderer` feature adds a GPU scene surface.

pub mod config;
mod export;
pub mod fetch;
pub mod handle;
mod pipeline;
mod raster;
mod reconstruct;
mod surface;
pub mod text;
mod viewer;

#[cfg(feature = "vello-renderer")]
mod scene;

#[cfg(test)]
mod testing;

pub use config::RenderConfig;
pub use export::{ExportedSlide, export_slides, render_thumbnails};
pub use fetch::{DefaultFetcher, ImageError, ImageFetcher, decode_image};
pub use handle::{Content, GlyphRun, Handle, PlacedGlyph, ShapePaint};
pub use pipeline::{PreparedSlide, RenderPipeline, SlidePlan};
pub use raster::PixmapSurface;
pub use reconstruct::Reconstructor;
pub use surface::{Painter, RenderResult, RendererError, Surface, paint_handle, paint_scene};
pub use text::{ShapedText, TextShaper};
pub use viewer::{GenerationCounter, ShowOutcome, SlideViewer};

#[cfg(feature = "vello-renderer")]
pub use scene::SceneSurface;
