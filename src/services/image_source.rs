//! Background image loading.
//!
//! [`HttpImageSource`] fetches `http(s)` URLs with a bounded timeout and body
//! size, and decodes inline base64 `data:` URLs. Fetched bodies are cached
//! per source; decoding into pixels happens later, on the render thread.

use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;

use super::image_cache::{cache_key, ImageCache};
use crate::error::CardError;
use crate::models::BackgroundConfig;

/// Resolves an image URL to its encoded bytes
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load(&self, url: &str) -> Result<Arc<Vec<u8>>, CardError>;
}

/// Image source backed by an HTTP client
pub struct HttpImageSource {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
    cache: ImageCache,
}

impl HttpImageSource {
    pub fn new(config: &BackgroundConfig) -> Result<Self, CardError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("storycard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CardError::ImageLoad(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            timeout,
            max_bytes: config.max_bytes,
            cache: ImageCache::new(config.cache_entries, config.cache_ttl_secs),
        })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CardError> {
        let mut response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CardError::ImageLoad(format!("timed out after {}s: {url}", self.timeout.as_secs()))
            } else {
                CardError::ImageLoad(format!("request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CardError::ImageLoad(format!("HTTP {status} from {url}")));
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_bytes {
                return Err(self.too_large(length as usize));
            }
        }

        // Chunked responses carry no Content-Length; enforce the cap while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| CardError::ImageLoad(format!("failed to read body: {e}")))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(body.len() + chunk.len()));
            }
            body.extend_from_slice(&chunk);
        }
        if body.is_empty() {
            return Err(CardError::ImageLoad(format!("empty body from {url}")));
        }

        Ok(body)
    }

    fn too_large(&self, size: usize) -> CardError {
        CardError::ImageLoad(format!(
            "image too large: {size} bytes (max {})",
            self.max_bytes
        ))
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn load(&self, url: &str) -> Result<Arc<Vec<u8>>, CardError> {
        if let Some(data_url) = url.strip_prefix("data:") {
            let bytes = decode_data_url(data_url)?;
            if bytes.len() > self.max_bytes {
                return Err(self.too_large(bytes.len()));
            }
            return Ok(Arc::new(bytes));
        }

        let scheme = url.split_once("://").map(|(scheme, _)| scheme);
        if !matches!(scheme, Some("http" | "https")) {
            return Err(CardError::ImageLoad(format!("unsupported image URL: {url}")));
        }

        let key = cache_key(url);
        if let Some(bytes) = self.cache.get(&key) {
            return Ok(bytes);
        }

        tracing::debug!(url = %url, "Fetching background image");
        let bytes = Arc::new(self.fetch(url).await?);
        tracing::info!(url = %url, size_bytes = bytes.len(), "Fetched background image");

        self.cache.store(key, bytes.clone());
        Ok(bytes)
    }
}

/// Decode the part of a `data:` URL after the scheme.
///
/// Only base64 payloads are accepted; images are binary.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>, CardError> {
    let (meta, payload) = data_url
        .split_once(',')
        .ok_or_else(|| CardError::ImageLoad("malformed data URL".to_string()))?;

    if !meta.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(CardError::ImageLoad(
            "only base64 data URLs are supported".to_string(),
        ));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| CardError::ImageLoad(format!("invalid base64 in data URL: {e}")))
}
