//! Object-store publishing
//!
//! Uploads finished overlays to an S3-compatible object store with a
//! plain HTTP PUT and returns the resulting public URL. Keys are
//! `prefix/name-<uuid>.png`; the uuid suffix makes every upload unique
//! so repeated diffs never overwrite each other.

use pixdiff_core::Raster;
use pixdiff_diff::{ArtifactPublisher, PublishError};
use tracing::{debug, info};
use uuid::Uuid;

/// Publishes PNG artifacts to an object-store base URL.
pub struct ObjectStorePublisher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ObjectStorePublisher {
    /// Create a publisher for the given base URL (endpoint plus
    /// bucket). A trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        ObjectStorePublisher {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a publisher around an existing client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        ObjectStorePublisher {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Build an object key: `prefix/name-<suffix>.png`, with the prefix
/// segment elided when empty.
fn object_key(name: &str, prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        format!("{name}-{suffix}.png")
    } else {
        format!("{prefix}/{name}-{suffix}.png")
    }
}

impl ArtifactPublisher for ObjectStorePublisher {
    fn publish(
        &self,
        image: &Raster,
        logical_name: &str,
        prefix: &str,
    ) -> Result<String, PublishError> {
        let data = pixdiff_io::encode_png(image).map_err(|e| PublishError::new(logical_name, e))?;
        let key = object_key(
            logical_name,
            prefix,
            &Uuid::new_v4().simple().to_string(),
        );
        let url = format!("{}/{}", self.base_url, key);

        debug!(%url, bytes = data.len(), "uploading overlay");
        self.client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(data)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| PublishError::new(logical_name, e))?;

        info!(%url, "published overlay");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_with_prefix() {
        assert_eq!(
            object_key("image-added", "compare", "abc123"),
            "compare/image-added-abc123.png"
        );
    }

    #[test]
    fn test_object_key_without_prefix() {
        assert_eq!(object_key("image-added", "", "abc123"), "image-added-abc123.png");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let publisher = ObjectStorePublisher::new("https://store.example.com/bucket/");
        assert_eq!(publisher.base_url(), "https://store.example.com/bucket");
    }
}
