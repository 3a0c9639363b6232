//! HTTP image fetching
//!
//! Blocking GET of an image URL, decoded by content (magic bytes), not
//! by extension. Used by the server inside `spawn_blocking`; never call
//! it from an async context directly.

use pixdiff_core::Raster;
use pixdiff_diff::{FetchError, ImageFetcher};
use tracing::debug;

/// Fetches images over HTTP with a blocking reqwest client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client.
    pub fn new() -> Self {
        HttpFetcher {
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Create a fetcher around an existing client (shared pools,
    /// custom timeouts).
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        HttpFetcher { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Raster, FetchError> {
        debug!(%url, "fetching image");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| FetchError::new(url, e))?;
        let bytes = response.bytes().map_err(|e| FetchError::new(url, e))?;

        let raster = pixdiff_io::decode_image(&bytes).map_err(|e| FetchError::new(url, e))?;
        debug!(%url, width = raster.width(), height = raster.height(), "decoded image");
        Ok(raster)
    }
}
