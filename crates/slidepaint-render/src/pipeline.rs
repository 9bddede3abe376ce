//! The render pipeline shared by every consumer.
//!
//! Rendering a slide happens in three steps:
//!
//! 1. [`RenderPipeline::plan`] launches reconstruction for every object.
//!    Static objects are finished on the spot; images become pending futures.
//! 2. [`SlidePlan::resolve`] waits for the whole batch, drops failures and
//!    composites the rest into commit order.
//! 3. [`PreparedSlide::commit`] clears the surface, sets the background, adds
//!    every handle and paints once.
//!
//! Nothing touches the surface before step 3, so a slide never shows half
//! its objects.

use crate::config::RenderConfig;
use crate::fetch::{DefaultFetcher, ImageFetcher};
use crate::handle::Handle;
use crate::reconstruct::Reconstructor;
use crate::surface::Surface;
use crate::text::TextShaper;
use futures_util::future::join_all;
use peniko::Color;
use slidepaint_core::{BoxFuture, Layered, SlideDocument, composite};
use std::sync::Arc;

/// Reconstruction launched for a slide but not yet resolved.
pub struct SlidePlan {
    background: Color,
    /// `None` when the document has no objects array.
    pending: Option<Vec<(f64, usize, BoxFuture<'static, Option<Handle>>)>>,
}

impl SlidePlan {
    /// Number of objects being reconstructed.
    pub fn len(&self) -> usize {
        self.pending.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for every object and put the survivors in commit order.
    pub async fn resolve(self) -> PreparedSlide {
        let Some(pending) = self.pending else {
            return PreparedSlide {
                background: self.background,
                handles: Vec::new(),
            };
        };
        let (keys, futures): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .map(|(z_index, order, future)| ((z_index, order), future))
            .unzip();
        let resolved = join_all(futures).await;
        let layered = keys
            .into_iter()
            .zip(resolved)
            .filter_map(|((z_index, order), handle)| Some(Layered::new(z_index, order, handle?)))
            .collect();
        PreparedSlide {
            background: self.background,
            handles: composite(layered),
        }
    }
}

/// A fully resolved slide, ready to be committed to a surface.
#[derive(Debug, Clone)]
pub struct PreparedSlide {
    pub background: Color,
    /// Handles in commit order (back-most first).
    pub handles: Vec<Handle>,
}

impl PreparedSlide {
    /// Replace whatever the surface shows with this slide.
    pub fn commit<S: Surface + ?Sized>(self, surface: &mut S) {
        log::trace!("Committing {} handles", self.handles.len());
        surface.clear();
        surface.set_background(self.background);
        for handle in self.handles {
            surface.add(handle);
        }
        surface.paint();
    }
}

/// Turns slide documents into painted surfaces.
pub struct RenderPipeline {
    shaper: TextShaper,
    fetcher: Arc<dyn ImageFetcher>,
    config: RenderConfig,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(Arc::new(DefaultFetcher::new()))
    }
}

impl RenderPipeline {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self::from_config(&RenderConfig::default(), fetcher)
    }

    pub fn from_config(config: &RenderConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            shaper: TextShaper::new(config.fallback_font_family.clone()),
            fetcher,
            config: config.clone(),
        }
    }

    /// Settings the consumers built on this pipeline fall back to.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Launch reconstruction for every object in `document`.
    pub fn plan(&mut self, document: &SlideDocument) -> SlidePlan {
        let pending = document.objects.as_ref().map(|objects| {
            let mut reconstructor = Reconstructor::new(&mut self.shaper, self.fetcher.clone());
            objects
                .iter()
                .map(|object| (object.z_index, object.index, reconstructor.reconstruct(object)))
                .collect()
        });
        SlidePlan {
            background: document.background,
            pending,
        }
    }

    /// Plan and resolve without touching any surface.
    pub async fn prepare(&mut self, document: &SlideDocument) -> PreparedSlide {
        self.plan(document).resolve().await
    }

    /// Render `document` onto `surface`.
    pub async fn render<S: Surface + ?Sized>(&mut self, document: &SlideDocument, surface: &mut S) {
        self.prepare(document).await.commit(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Content;
    use crate::raster::PixmapSurface;
    use crate::testing::{StaticFetcher, init_logging, png_data_uri};
    use slidepaint_core::Viewport;

    fn document(json: &str) -> SlideDocument {
        SlideDocument::from_json(json).unwrap()
    }

    fn surface() -> PixmapSurface {
        PixmapSurface::new(Viewport::from_scale(0.1)).unwrap()
    }

    #[test]
    fn test_same_z_images_keep_descriptor_order() {
        init_logging();
        // The first image resolves last.
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with("a", png_data_uri(4, 4, [255, 0, 0, 255]), 5)
                .with("b", png_data_uri(4, 4, [0, 0, 255, 255]), 0),
        );
        let mut pipeline = RenderPipeline::new(fetcher.clone());
        let doc = document(
            r#"{"objects": [
                {"type": "image", "src": "a", "zIndex": 1},
                {"type": "image", "src": "b", "zIndex": 1}
            ]}"#,
        );
        let prepared = pollster::block_on(pipeline.prepare(&doc));
        assert_eq!(fetcher.completed(), vec!["b", "a"]);
        let order: Vec<_> = prepared.handles.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_missing_objects_paints_background_only() {
        let mut pipeline = RenderPipeline::default();
        let mut target = surface();
        let doc = document(r##"{"background": "#336699"}"##);
        assert!(pipeline.plan(&doc).is_empty());
        pollster::block_on(pipeline.render(&doc, &mut target));
        assert!(target.handles().is_empty());
        assert_eq!(target.pixel(5, 5), Some([0x33, 0x66, 0x99, 255]));
        assert_eq!(target.pixel(191, 107), Some([0x33, 0x66, 0x99, 255]));
    }

    #[test]
    fn test_unsupported_kind_changes_nothing() {
        let mut pipeline = RenderPipeline::default();
        let base = r#"{"type": "rect", "left": 100, "top": 100, "width": 400, "height": 300, "fill": "red"}"#;
        let with_unknown = document(&format!(r#"{{"objects": [{base}, {{"type": "video", "src": "x"}}]}}"#));
        let without = document(&format!(r#"{{"objects": [{base}]}}"#));

        let mut a = surface();
        let mut b = surface();
        pollster::block_on(pipeline.render(&with_unknown, &mut a));
        pollster::block_on(pipeline.render(&without, &mut b));
        assert_eq!(a.to_rgba8(), b.to_rgba8());
        assert_eq!(a.handles().len(), 1);
    }

    #[test]
    fn test_failed_image_is_dropped() {
        let fetcher = StaticFetcher::new().with("broken", "data:image/png;base64,AAAA".to_string(), 1);
        let mut pipeline = RenderPipeline::new(Arc::new(fetcher));
        let doc = document(
            r##"{"objects": [
                {"type": "image", "src": "broken"},
                {"type": "rect", "left": 0, "top": 0, "width": 1920, "height": 1080, "fill": "#00ff00"}
            ]}"##,
        );
        let mut target = surface();
        pollster::block_on(pipeline.render(&doc, &mut target));
        assert_eq!(target.handles().len(), 1);
        assert_eq!(target.pixel(96, 54), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_z_index_beats_descriptor_order() {
        let mut pipeline = RenderPipeline::default();
        let doc = document(
            r##"{"objects": [
                {"type": "rect", "zIndex": 1, "fill": "#0000ff"},
                {"type": "text", "text": "under", "zIndex": 0}
            ]}"##,
        );
        let mut target = surface();
        pollster::block_on(pipeline.render(&doc, &mut target));
        let kinds: Vec<_> = target.handles().iter().map(|h| h.content.kind()).collect();
        assert_eq!(kinds, vec!["text", "shape"]);
        assert!(matches!(target.handles()[1].content, Content::Shape(_)));
    }

    #[test]
    fn test_from_config_uses_fallback_family() {
        let config = RenderConfig::default().with_fallback_font_family("DejaVu Sans");
        let pipeline = RenderPipeline::from_config(&config, Arc::new(DefaultFetcher::new()));
        assert_eq!(pipeline.shaper.fallback_family(), "DejaVu Sans");
        assert_eq!(pipeline.config(), &config);
    }

    #[test]
    fn test_commit_replaces_previous_slide() {
        let mut pipeline = RenderPipeline::default();
        let mut target = surface();
        let first = document(r#"{"objects": [{"type": "rect"}, {"type": "circle"}]}"#);
        let second = document(r#"{"background": "black", "objects": []}"#);
        pollster::block_on(pipeline.render(&first, &mut target));
        assert_eq!(target.handles().len(), 2);
        pollster::block_on(pipeline.render(&second, &mut target));
        assert!(target.handles().is_empty());
        assert_eq!(target.pixel(0, 0), Some([0, 0, 0, 255]));
    }
}
