use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

/// Retrieves raw image bytes for a background URL. Runs on a worker thread,
/// so implementations must be shareable across threads.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher. No timeout unless one is configured.
pub struct HttpImageFetcher {
    timeout: Option<Duration>,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let mut request = minreq::get(url.as_str());
        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout.as_secs());
        }

        let response = request
            .send()
            .map_err(|e| AppError::Fetch(format!("Failed to fetch image: {}", e)))?;

        if response.status_code < 200 || response.status_code >= 300 {
            return Err(AppError::Fetch(format!(
                "Image server returned error: {} {}",
                response.status_code, response.reason_phrase
            )));
        }

        Ok(response.into_bytes())
    }
}

/// Extract the image URL a share link embeds in its `imgurl` query
/// parameter. Dropped search-result links carry the actual image location
/// there; plain image URLs are returned unchanged.
pub fn direct_image_url(url: &Url) -> Url {
    for (key, value) in url.query_pairs() {
        if key == "imgurl" {
            if let Ok(embedded) = Url::parse(&value) {
                return embedded;
            }
        }
    }
    url.clone()
}
