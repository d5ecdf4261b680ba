//! Renderer backed by background loading and an LRU of decoded slides.
//!
//! Loads run as tokio tasks and report back over a channel that the host
//! drains with [`TerminalRenderer::poll_completed`]; a load that finishes
//! after the presenter has moved on simply lands in the cache. Loads started
//! before a [`TerminalRenderer::reset`] are discarded when they finish.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tokio::sync::mpsc;

use crate::constants::async_tasks::CHANNEL_BUFFER_SIZE;
use crate::error::Result;
use crate::render::cache::SlideCache;
use crate::render::loader::{load_slide, SlideFetcher};
use crate::render::{fit_size, RenderStatus, ScaledFrame, SlideRenderer};
use crate::types::{SlideId, Viewport};

struct LoadResult {
    generation: u64,
    slide: SlideId,
    result: Result<RgbaImage>,
}

/// Slide renderer producing frames for the terminal UI.
pub struct TerminalRenderer {
    fetcher: Arc<dyn SlideFetcher>,
    cache: SlideCache<Arc<RgbaImage>>,
    failures: HashMap<SlideId, String>,
    in_flight: HashSet<SlideId>,
    scaled: Option<(SlideId, Viewport, ScaledFrame)>,
    generation: u64,
    tx: mpsc::Sender<LoadResult>,
    rx: mpsc::Receiver<LoadResult>,
}

impl TerminalRenderer {
    /// Create a renderer keeping up to `cache_capacity` decoded slides.
    pub fn new(fetcher: Arc<dyn SlideFetcher>, cache_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            fetcher,
            cache: SlideCache::new(cache_capacity),
            failures: HashMap::new(),
            in_flight: HashSet::new(),
            scaled: None,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Collect finished loads. Returns how many arrived.
    pub fn poll_completed(&mut self) -> usize {
        let mut arrived = 0;
        while let Ok(LoadResult { generation, slide, result }) = self.rx.try_recv() {
            if generation != self.generation {
                tracing::debug!("Discarding {} loaded before reset", slide);
                continue;
            }
            self.in_flight.remove(&slide);
            match result {
                Ok(image) => {
                    tracing::debug!("Decoded {} ({}x{})", slide, image.width(), image.height());
                    self.failures.remove(&slide);
                    self.cache.put(slide, Arc::new(image));
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.failures.insert(slide, e.to_string());
                }
            }
            arrived += 1;
        }
        arrived
    }

    /// Whether a slide is decoded and cached.
    pub fn is_cached(&self, slide: &SlideId) -> bool {
        self.cache.contains(slide)
    }

    /// Number of loads still running.
    pub fn pending_loads(&self) -> usize {
        self.in_flight.len()
    }

    /// Forget cached content and failures, e.g. after reloading the slide list.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.cache.clear();
        self.failures.clear();
        self.in_flight.clear();
        self.scaled = None;
    }

    fn request(&mut self, slide: &SlideId) {
        if self.cache.contains(slide)
            || self.failures.contains_key(slide)
            || !self.in_flight.insert(slide.clone())
        {
            return;
        }

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let slide = slide.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = load_slide(fetcher.as_ref(), &slide).await;
            if tx.send(LoadResult { generation, slide, result }).await.is_err() {
                tracing::debug!("Renderer dropped before slide load finished");
            }
        });
    }
}

impl SlideRenderer for TerminalRenderer {
    fn render(&mut self, slide: &SlideId, viewport: Viewport) -> RenderStatus<'_> {
        if self.failures.contains_key(slide) {
            return self.failures.get(slide).map_or(RenderStatus::Pending, |m| RenderStatus::Failed(m.as_str()));
        }

        let up_to_date = self.scaled.as_ref()
            .is_some_and(|(id, vp, _)| id == slide && *vp == viewport);

        if !up_to_date {
            let Some(image) = self.cache.get(slide).map(Arc::clone) else {
                self.request(slide);
                return RenderStatus::Pending;
            };
            if viewport.is_empty() {
                return RenderStatus::Pending;
            }
            let frame = scale_to_fit(&image, viewport);
            self.scaled = Some((slide.clone(), viewport, frame));
        }

        self.scaled.as_ref().map_or(RenderStatus::Pending, |(_, _, frame)| RenderStatus::Ready(frame))
    }

    /// Failed slides are fetched again, so a transient error clears on the next visit.
    fn prefetch(&mut self, slide: &SlideId) {
        if self.failures.remove(slide).is_some() {
            tracing::debug!("Retrying {}", slide);
            if self.scaled.as_ref().is_some_and(|(id, _, _)| id == slide) {
                self.scaled = None;
            }
        }
        self.request(slide);
    }
}

/// Resize `image` to the largest size fitting `viewport`, preserving aspect ratio.
pub fn scale_to_fit(image: &RgbaImage, viewport: Viewport) -> ScaledFrame {
    let size = fit_size(Viewport::new(image.width(), image.height()), viewport);
    if size.is_empty() {
        return ScaledFrame::new(RgbaImage::new(0, 0));
    }
    ScaledFrame::new(imageops::resize(image, size.width, size.height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct PngFetcher;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// Fails the first fetch, then serves a PNG.
    #[derive(Default)]
    struct FlakyFetcher {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl SlideFetcher for FlakyFetcher {
        async fn fetch(&self, slide: &SlideId) -> Result<Vec<u8>> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(Error::slide(slide, "connection reset"));
            }
            Ok(png_bytes())
        }
    }

    struct SlowFetcher;

    #[async_trait]
    impl SlideFetcher for SlowFetcher {
        async fn fetch(&self, _slide: &SlideId) -> Result<Vec<u8>> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(png_bytes())
        }
    }

    #[async_trait]
    impl SlideFetcher for PngFetcher {
        async fn fetch(&self, slide: &SlideId) -> Result<Vec<u8>> {
            if slide.as_str().contains("broken") {
                return Err(Error::slide(slide, "server returned 404 Not Found"));
            }
            Ok(png_bytes())
        }
    }

    async fn wait_for_loads(renderer: &mut TerminalRenderer) {
        for _ in 0..200 {
            renderer.poll_completed();
            if renderer.pending_loads() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("slide loads did not finish");
    }

    #[tokio::test]
    async fn first_render_is_pending_then_ready() {
        let mut renderer = TerminalRenderer::new(Arc::new(PngFetcher), 4);
        let slide = SlideId::new("http://kiosk/images/a.png");
        let viewport = Viewport::new(20, 20);

        assert!(matches!(renderer.render(&slide, viewport), RenderStatus::Pending));
        wait_for_loads(&mut renderer).await;

        match renderer.render(&slide, viewport) {
            RenderStatus::Ready(frame) => {
                assert_eq!((frame.width(), frame.height()), (20, 10));
                assert_eq!(frame.rgb(0, 0), Some([0, 0, 255]));
            }
            other => panic!("expected ready frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failures_are_reported_per_slide() {
        let mut renderer = TerminalRenderer::new(Arc::new(PngFetcher), 4);
        let broken = SlideId::new("http://kiosk/images/broken.png");
        let fine = SlideId::new("http://kiosk/images/fine.png");

        renderer.prefetch(&broken);
        renderer.prefetch(&fine);
        wait_for_loads(&mut renderer).await;

        assert!(matches!(renderer.render(&broken, Viewport::new(10, 10)), RenderStatus::Failed(m) if m.contains("404")));
        assert!(renderer.render(&fine, Viewport::new(10, 10)).is_ready());
    }

    #[tokio::test]
    async fn prefetch_is_not_repeated_while_in_flight() {
        let mut renderer = TerminalRenderer::new(Arc::new(PngFetcher), 4);
        let slide = SlideId::new("http://kiosk/images/a.png");
        renderer.prefetch(&slide);
        renderer.prefetch(&slide);
        assert_eq!(renderer.pending_loads(), 1);
        wait_for_loads(&mut renderer).await;
        assert!(renderer.is_cached(&slide));
    }

    #[tokio::test]
    async fn failed_slide_is_fetched_again_on_next_visit() {
        let fetcher = Arc::new(FlakyFetcher::default());
        let mut renderer = TerminalRenderer::new(Arc::clone(&fetcher) as Arc<dyn SlideFetcher>, 4);
        let slide = SlideId::new("http://kiosk/images/a.png");
        let viewport = Viewport::new(20, 20);

        renderer.prefetch(&slide);
        wait_for_loads(&mut renderer).await;
        assert!(matches!(renderer.render(&slide, viewport), RenderStatus::Failed(m) if m.contains("connection reset")));

        renderer.prefetch(&slide);
        assert!(matches!(renderer.render(&slide, viewport), RenderStatus::Pending));
        wait_for_loads(&mut renderer).await;
        assert!(renderer.render(&slide, viewport).is_ready());
        assert_eq!(fetcher.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn loads_started_before_reset_are_discarded() {
        let mut renderer = TerminalRenderer::new(Arc::new(SlowFetcher), 4);
        let slide = SlideId::new("http://kiosk/images/a.png");

        renderer.prefetch(&slide);
        renderer.reset();
        assert_eq!(renderer.pending_loads(), 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        renderer.poll_completed();
        assert!(!renderer.is_cached(&slide));
    }

    #[test]
    fn scale_to_fit_keeps_aspect_ratio() {
        let img = RgbaImage::new(300, 100);
        let frame = scale_to_fit(&img, Viewport::new(60, 60));
        assert_eq!((frame.width(), frame.height()), (60, 20));
    }
}
