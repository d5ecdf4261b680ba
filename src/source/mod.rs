//! Slide sources.
//!
//! A source produces the ordered slide list once, before the presentation
//! starts. Failures are returned to the host, which shows them on screen and
//! stays in its loading state.

/// Local directory scanning
pub mod directory;
/// HTTP listing endpoint client
pub mod http;

pub use directory::DirectorySource;
pub use http::HttpListingSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::SlideId;

/// One entry of a document listing: `{"name": "...", "path": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    /// File name, used for ordering.
    pub name: String,
    /// Server path the file is downloadable from.
    pub path: String,
}

/// Trait for slide list providers.
#[async_trait]
pub trait SlideSource: Send + Sync {
    /// Load the ordered slide list. An empty list is an error.
    async fn load(&self) -> Result<Vec<SlideId>>;

    /// Short description for status and log messages.
    fn describe(&self) -> String;
}

/// Fixed slide list known up front.
#[derive(Debug, Clone)]
pub struct StaticSource {
    slides: Vec<SlideId>,
}

impl StaticSource {
    /// Create a source yielding `slides` in the given order.
    pub fn new(slides: impl IntoIterator<Item = impl Into<SlideId>>) -> Self {
        Self {
            slides: slides.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SlideSource for StaticSource {
    async fn load(&self) -> Result<Vec<SlideId>> {
        non_empty(self.slides.clone())
    }

    fn describe(&self) -> String {
        format!("{} configured slides", self.slides.len())
    }
}

/// Progress of loading the slide list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The source has not answered yet.
    #[default]
    Loading,
    /// Slides are available and the presentation is running.
    Ready(Vec<SlideId>),
    /// The source failed; the message is shown to the user.
    Failed(String),
}

impl LoadState {
    /// Build the state from a source result.
    pub fn from_result(result: Result<Vec<SlideId>>) -> Self {
        match result {
            Ok(slides) if slides.is_empty() => Self::Failed(Error::EmptySlideList.user_message()),
            Ok(slides) => Self::Ready(slides),
            Err(e) => Self::Failed(e.user_message()),
        }
    }

    /// Whether the source is still loading.
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Order descriptors by name (byte-wise, so `A-3-10` sorts before `A-3-7`).
pub fn sort_descriptors(descriptors: &mut [DocumentDescriptor]) {
    descriptors.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Slide identifiers for sorted descriptors, with paths resolved against `base_url`.
pub fn slides_from_descriptors(base_url: &str, mut descriptors: Vec<DocumentDescriptor>) -> Vec<SlideId> {
    sort_descriptors(&mut descriptors);
    let base = base_url.trim_end_matches('/');
    descriptors
        .into_iter()
        .map(|d| {
            if d.path.starts_with("http://") || d.path.starts_with("https://") {
                SlideId::new(d.path)
            } else if d.path.starts_with('/') {
                SlideId::new(format!("{base}{}", d.path))
            } else {
                SlideId::new(format!("{base}/{}", d.path))
            }
        })
        .collect()
}

pub(crate) fn non_empty(slides: Vec<SlideId>) -> Result<Vec<SlideId>> {
    if slides.is_empty() {
        Err(Error::EmptySlideList)
    } else {
        Ok(slides)
    }
}
