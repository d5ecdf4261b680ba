//! Client for a document listing server.
//!
//! The server exposes `GET /api/<kind>` returning a JSON array of
//! `{name, path}` and serves each file at its `path`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::constants::source::HTTP_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::source::{non_empty, slides_from_descriptors, DocumentDescriptor, SlideSource};
use crate::types::SlideId;

/// Slide source backed by a listing endpoint.
#[derive(Clone)]
pub struct HttpListingSource {
    base_url: String,
    kind: String,
    client: Client,
}

impl HttpListingSource {
    /// Create a source for `GET {base_url}/api/{kind}`.
    pub fn new(base_url: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            kind: kind.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Full listing URL.
    pub fn listing_url(&self) -> String {
        format!("{}/api/{}", self.base_url, self.kind)
    }

    /// Fetch and decode the raw listing without ordering it.
    pub async fn fetch_listing(&self) -> Result<Vec<DocumentDescriptor>> {
        let url = self.listing_url();
        let resp = self.client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::source(
                format!("Request to {url} failed: {e}"),
                Some("Is the listing server running? Check SLIDE_SOURCE"),
            ))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::source_status(
                format!("Request to {url} returned {status}"),
                status.as_u16(),
            ));
        }

        let body = resp.text().await
            .map_err(|e| Error::Network(format!("Reading listing from {url} failed: {e}")))?;

        serde_json::from_str(&body)
            .map_err(|e| Error::parse(format!("Invalid listing JSON from {url}: {e}"), None))
    }
}

#[async_trait]
impl SlideSource for HttpListingSource {
    async fn load(&self) -> Result<Vec<SlideId>> {
        let descriptors = self.fetch_listing().await?;
        tracing::info!("Listing {} returned {} documents", self.listing_url(), descriptors.len());
        non_empty(slides_from_descriptors(&self.base_url, descriptors))
    }

    fn describe(&self) -> String {
        self.listing_url()
    }
}
