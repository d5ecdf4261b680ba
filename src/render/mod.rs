//! Slide rendering.
//!
//! The presenter never decodes slide content itself. It hands a slide
//! identifier and a viewport to a [`SlideRenderer`], which answers with a
//! frame scaled to fit, or reports that the frame is still loading or that
//! the slide could not be loaded.

/// Session-scoped cache of decoded slides
pub mod cache;
/// Fetching and decoding slide content
pub mod loader;
/// Renderer producing half-block terminal frames
pub mod terminal;

pub use cache::SlideCache;
pub use loader::{ContentFetcher, SlideFetcher};
pub use terminal::TerminalRenderer;

use image::RgbaImage;

use crate::types::{SlideId, Viewport};

/// One slide scaled to fit a viewport.
#[derive(Debug, Clone)]
pub struct ScaledFrame {
    image: RgbaImage,
}

impl ScaledFrame {
    /// Wrap an already scaled image.
    pub const fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGB value of a pixel, `None` outside the frame.
    pub fn rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let p = self.image.get_pixel_checked(x, y)?;
        Some([p[0], p[1], p[2]])
    }

    /// Alpha value of a pixel, `0` outside the frame.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel_checked(x, y).map_or(0, |p| p[3])
    }
}

/// Outcome of asking a renderer for a slide.
#[derive(Debug)]
pub enum RenderStatus<'a> {
    /// The slide is decoded and scaled to the requested viewport.
    Ready(&'a ScaledFrame),
    /// Content is still being fetched or decoded.
    Pending,
    /// The slide could not be loaded; the message is shown in its place.
    Failed(&'a str),
}

impl RenderStatus<'_> {
    /// Whether a frame is available.
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Capability that draws one identified slide into a viewport.
pub trait SlideRenderer {
    /// Produce the frame for `slide` scaled to fit `viewport`.
    ///
    /// Must not block: content that is not yet available is reported as
    /// [`RenderStatus::Pending`] and loaded in the background.
    fn render(&mut self, slide: &SlideId, viewport: Viewport) -> RenderStatus<'_>;

    /// Start loading `slide` ahead of time. Defaults to doing nothing.
    fn prefetch(&mut self, _slide: &SlideId) {}
}

/// Factor that scales `content` to fit inside `viewport` preserving aspect ratio.
///
/// Returns `0.0` for empty content or an empty viewport.
pub fn fit_scale(content: Viewport, viewport: Viewport) -> f64 {
    if content.is_empty() || viewport.is_empty() {
        return 0.0;
    }
    let sx = f64::from(viewport.width) / f64::from(content.width);
    let sy = f64::from(viewport.height) / f64::from(content.height);
    sx.min(sy)
}

/// Size of `content` after scaling it to fit inside `viewport`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_size(content: Viewport, viewport: Viewport) -> Viewport {
    let scale = fit_scale(content, viewport);
    if scale <= 0.0 {
        return Viewport::default();
    }
    let w = (f64::from(content.width) * scale).round() as u32;
    let h = (f64::from(content.height) * scale).round() as u32;
    Viewport::new(w.clamp(1, viewport.width), h.clamp(1, viewport.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_content_is_limited_by_width() {
        let content = Viewport::new(1600, 900);
        let viewport = Viewport::new(80, 80);
        assert!((fit_scale(content, viewport) - 0.05).abs() < f64::EPSILON);
        assert_eq!(fit_size(content, viewport), Viewport::new(80, 45));
    }

    #[test]
    fn tall_content_is_limited_by_height() {
        let content = Viewport::new(600, 800);
        let viewport = Viewport::new(200, 100);
        assert_eq!(fit_size(content, viewport), Viewport::new(75, 100));
    }

    #[test]
    fn small_content_is_scaled_up() {
        let content = Viewport::new(10, 10);
        let viewport = Viewport::new(40, 20);
        assert_eq!(fit_size(content, viewport), Viewport::new(20, 20));
    }

    #[test]
    fn empty_inputs_scale_to_nothing() {
        assert!(fit_scale(Viewport::new(0, 10), Viewport::new(10, 10)).abs() < f64::EPSILON);
        assert_eq!(fit_size(Viewport::new(10, 10), Viewport::new(0, 0)), Viewport::default());
    }
}
