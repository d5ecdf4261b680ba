//! Core type definitions for compile-time safety.
//!
//! Slide identifiers are opaque strings (URLs or file paths); wrapping them
//! keeps them from being mixed up with display names or listing paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier of one slide in the presentation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlideId(pub String);

impl SlideId {
    /// Create a new `SlideId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the slide is fetched over HTTP rather than read from disk.
    pub fn is_remote(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    /// Last path segment, used as the human-readable slide title.
    pub fn display_name(&self) -> &str {
        let trimmed = self.0.trim_end_matches(['/', '\\']);
        trimmed
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(trimmed)
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.display_name();
        let (stem, ext) = name.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SlideId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SlideId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<PathBuf> for SlideId {
    fn from(p: PathBuf) -> Self {
        Self(p.to_string_lossy().into_owned())
    }
}

impl AsRef<str> for SlideId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Size of the region a slide is drawn into, in pixels.
///
/// The terminal renderer maps one cell to one pixel horizontally and two
/// pixels vertically (half-block glyphs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport of the given size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether nothing can be drawn into this viewport.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_last_segment() {
        let id = SlideId::new("http://localhost:3001/images/A-3-7_Kaneda.jpg");
        assert_eq!(id.display_name(), "A-3-7_Kaneda.jpg");
        assert!(id.is_remote());

        let local = SlideId::new("/srv/kiosk/images/b.png");
        assert_eq!(local.display_name(), "b.png");
        assert!(!local.is_remote());
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(SlideId::new("/pdfs/A.PDF").extension().as_deref(), Some("pdf"));
        assert_eq!(SlideId::new("/pdfs/.hidden").extension(), None);
        assert_eq!(SlideId::new("/pdfs/noext").extension(), None);
    }

    #[test]
    fn empty_viewport() {
        assert!(Viewport::new(0, 10).is_empty());
        assert!(!Viewport::new(80, 48).is_empty());
    }
}
