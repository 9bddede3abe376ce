//! Interactive slide viewer.

use crate::config::RenderConfig;
use crate::pipeline::RenderPipeline;
use crate::surface::{RenderResult, Surface};
use kurbo::Size;
use slidepaint_core::{OrderedSlide, ScaleContext, Viewport};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Hands out monotonically increasing render generations.
///
/// A render may commit only while its generation is still the newest one
/// handed out; anything older has been superseded by a later navigation.
#[derive(Debug, Default)]
pub struct GenerationCounter(AtomicU64);

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its id.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::Acquire) == generation
    }
}

/// What happened to a [`SlideViewer::show`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// The slide was committed to the surface.
    Painted,
    /// A newer request started first; nothing was committed.
    Superseded,
    /// No slide at that index.
    OutOfRange,
}

/// Shows one slide of a deck at a time on a surface.
///
/// Navigation can be issued again before the previous render finished. Only
/// the latest request ever reaches the surface, so a slow slide never
/// overwrites the one the user has moved on to.
pub struct SlideViewer<S: Surface> {
    slides: Vec<OrderedSlide>,
    pipeline: Mutex<RenderPipeline>,
    surface: Mutex<S>,
    generation: GenerationCounter,
    current: Mutex<Option<usize>>,
    config: RenderConfig,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: Surface> SlideViewer<S> {
    /// Create a viewer that takes its padding rules from the pipeline's config.
    pub fn new(slides: Vec<OrderedSlide>, pipeline: RenderPipeline, surface: S) -> Self {
        let config = pipeline.config().clone();
        Self::with_config(slides, pipeline, surface, config)
    }

    pub fn with_config(
        slides: Vec<OrderedSlide>,
        pipeline: RenderPipeline,
        surface: S,
        config: RenderConfig,
    ) -> Self {
        Self {
            slides,
            pipeline: Mutex::new(pipeline),
            surface: Mutex::new(surface),
            generation: GenerationCounter::new(),
            current: Mutex::new(None),
            config,
        }
    }

    pub fn slides(&self) -> &[OrderedSlide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index of the slide currently on the surface.
    pub fn current(&self) -> Option<usize> {
        *lock(&self.current)
    }

    /// Run `f` with the surface locked.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.surface))
    }

    /// Render slide `index` and commit it unless a newer `show` started
    /// while this one was waiting on images.
    pub async fn show(&self, index: usize) -> ShowOutcome {
        let Some(slide) = self.slides.get(index) else {
            return ShowOutcome::OutOfRange;
        };
        let generation = self.generation.advance();
        let plan = lock(&self.pipeline).plan(&slide.document);
        let prepared = plan.resolve().await;

        // Checked under the surface lock so a newer commit cannot slip in
        // between the check and this one.
        let mut surface = lock(&self.surface);
        if !self.generation.is_current(generation) {
            log::debug!("Discarding render of slide {} (generation {generation})", slide.number);
            return ShowOutcome::Superseded;
        }
        prepared.commit(&mut *surface);
        *lock(&self.current) = Some(index);
        ShowOutcome::Painted
    }

    /// Render the current slide again, e.g. after [`resize`](Self::resize).
    pub async fn refresh(&self) -> ShowOutcome {
        match self.current() {
            Some(index) => self.show(index).await,
            None => ShowOutcome::OutOfRange,
        }
    }

    /// Fit the surface to a container of `size`. The surface is left empty
    /// until the next `show` or `refresh`.
    pub fn resize(&self, size: Size) -> RenderResult<Viewport> {
        let viewport = Viewport::compute(ScaleContext::Container {
            size,
            padding: self.config.padding_for(size.width),
        });
        lock(&self.surface).resize(viewport)?;
        Ok(viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixmapSurface;
    use crate::testing::{StaticFetcher, init_logging, png_data_uri};
    use futures_util::future::join;
    use slidepaint_core::order_slides;
    use std::sync::Arc;

    fn viewer() -> SlideViewer<PixmapSurface> {
        let fetcher = StaticFetcher::new().with("slow", png_data_uri(2, 2, [255, 0, 0, 255]), 20);
        let slides = order_slides([
            (
                "/slides/slide-1.json",
                r##"{"background": "#ff0000", "objects": [{"type": "image", "src": "slow"}]}"##,
            ),
            ("/slides/slide-2.json", r##"{"background": "#0000ff"}"##),
        ]);
        SlideViewer::new(
            slides,
            RenderPipeline::new(Arc::new(fetcher)),
            PixmapSurface::new(Viewport::from_scale(0.05)).unwrap(),
        )
    }

    #[test]
    fn test_generation_counter() {
        let counter = GenerationCounter::new();
        let first = counter.advance();
        assert!(counter.is_current(first));
        let second = counter.advance();
        assert!(second > first);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn test_stale_render_is_discarded() {
        init_logging();
        let viewer = viewer();
        let (slow, fast) = pollster::block_on(join(viewer.show(0), viewer.show(1)));
        assert_eq!(slow, ShowOutcome::Superseded);
        assert_eq!(fast, ShowOutcome::Painted);
        assert_eq!(viewer.current(), Some(1));
        let pixel = viewer.with_surface(|s| s.pixel(0, 0));
        assert_eq!(pixel, Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_superseded_while_waiting_for_surface() {
        let viewer = viewer();
        let outcome = std::thread::scope(|scope| {
            let held = lock(&viewer.surface);
            let pending = scope.spawn(|| pollster::block_on(viewer.show(1)));
            // Once the run has its generation, start a newer one while the
            // surface is still held here.
            while viewer.generation.0.load(Ordering::Acquire) == 0 {
                std::thread::yield_now();
            }
            viewer.generation.advance();
            drop(held);
            pending.join().unwrap()
        });
        assert_eq!(outcome, ShowOutcome::Superseded);
        assert_eq!(viewer.current(), None);
    }

    #[test]
    fn test_sequential_navigation_paints_each() {
        let viewer = viewer();
        assert_eq!(pollster::block_on(viewer.show(0)), ShowOutcome::Painted);
        assert_eq!(viewer.with_surface(|s| s.handles().len()), 1);
        assert_eq!(pollster::block_on(viewer.show(1)), ShowOutcome::Painted);
        assert_eq!(viewer.with_surface(|s| s.handles().len()), 0);
    }

    #[test]
    fn test_out_of_range() {
        let viewer = viewer();
        assert_eq!(pollster::block_on(viewer.show(7)), ShowOutcome::OutOfRange);
        assert_eq!(pollster::block_on(viewer.refresh()), ShowOutcome::OutOfRange);
        assert_eq!(viewer.current(), None);
    }

    #[test]
    fn test_resize_fits_container() {
        let viewer = viewer();
        let viewport = viewer.resize(Size::new(800.0, 450.0)).unwrap();
        assert_eq!((viewport.width, viewport.height), (686, 386));
        assert_eq!(viewer.with_surface(|s| s.width()), 686);
        assert_eq!(pollster::block_on(viewer.show(1)), ShowOutcome::Painted);
        assert_eq!(pollster::block_on(viewer.refresh()), ShowOutcome::Painted);
    }
}
