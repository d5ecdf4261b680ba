//! Fetching and decoding slide content.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;
use reqwest::Client;

use crate::constants::source::HTTP_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::types::SlideId;

/// Extensions that name documents without a pre-rendered page image.
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Retrieves the raw bytes behind a slide identifier.
#[async_trait]
pub trait SlideFetcher: Send + Sync {
    /// Fetch the slide's content.
    async fn fetch(&self, slide: &SlideId) -> Result<Vec<u8>>;
}

/// Fetcher that reads `http(s)://` identifiers over the network and
/// everything else from the local filesystem.
#[derive(Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    /// Create a fetcher with the default request timeout.
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

}

impl Default for ContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlideFetcher for ContentFetcher {
    async fn fetch(&self, slide: &SlideId) -> Result<Vec<u8>> {
        if slide.is_remote() {
            let resp = self.client
                .get(slide.as_str())
                .send()
                .await
                .map_err(|e| Error::slide(slide, format!("request failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::slide(slide, format!("server returned {status}")));
            }

            let bytes = resp.bytes().await
                .map_err(|e| Error::slide(slide, format!("reading body failed: {e}")))?;
            Ok(bytes.to_vec())
        } else {
            let path = PathBuf::from(slide.as_str());
            tokio::fs::read(&path).await
                .map_err(|e| Error::slide(slide, format!("cannot read {}: {e}", path.display())))
        }
    }
}

/// Decode image bytes into RGBA pixels.
pub fn decode_slide(slide: &SlideId, bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| Error::slide(slide, format!("not a decodable image: {e}")))
}

/// Fetch and decode one slide. Decoding runs on the blocking pool.
pub async fn load_slide(fetcher: &dyn SlideFetcher, slide: &SlideId) -> Result<RgbaImage> {
    if slide.extension().is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str())) {
        return Err(Error::slide(
            slide,
            "no page image available; pre-render the document to an image",
        ));
    }

    let bytes = fetcher.fetch(slide).await?;
    let owned = slide.clone();
    tokio::task::spawn_blocking(move || decode_slide(&owned, &bytes))
        .await
        .map_err(|e| Error::slide(slide, format!("decoder task failed: {e}")))?
}
