//! Error taxonomy for the diff pipeline
//!
//! Collaborator failures ([`FetchError`], [`PublishError`]) carry the
//! failed resource and an opaque cause supplied by the implementation;
//! [`DiffError`] is the single error surface of the orchestrator. Every
//! failure is a distinct, inspectable value - nothing is swallowed.

use thiserror::Error;

/// Boxed error cause used at the collaborator seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure retrieving or decoding an input image.
///
/// Fatal to the invocation; the pipeline never retries a fetch.
#[derive(Error, Debug)]
#[error("failed to fetch image from {url}: {cause}")]
pub struct FetchError {
    /// URL of the image that could not be fetched
    pub url: String,
    /// Underlying transport or decode failure
    #[source]
    pub cause: BoxError,
}

impl FetchError {
    /// Wrap a cause with the URL it occurred for.
    pub fn new(url: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        FetchError {
            url: url.into(),
            cause: cause.into(),
        }
    }
}

/// Failure publishing a finished overlay.
#[derive(Error, Debug)]
#[error("failed to publish artifact {name}: {cause}")]
pub struct PublishError {
    /// Logical name of the artifact that failed to publish
    pub name: String,
    /// Underlying encode or transport failure
    #[source]
    pub cause: BoxError,
}

impl PublishError {
    /// Wrap a cause with the logical artifact name it occurred for.
    pub fn new(name: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        PublishError {
            name: name.into(),
            cause: cause.into(),
        }
    }
}

/// Orchestrator error surface.
#[derive(Error, Debug)]
pub enum DiffError {
    /// Missing or malformed request parameters
    #[error("invalid diff request: {0}")]
    InvalidInput(String),

    /// An input image could not be fetched or decoded
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Before/after images differ in shape; never cropped or scaled away
    #[error("dimension mismatch: before is {}x{}, after is {}x{}", .before.0, .before.1, .after.0, .after.1)]
    DimensionMismatch {
        before: (u32, u32),
        after: (u32, u32),
    },

    /// One or both overlay uploads failed; a failed upload never stops
    /// the other from being attempted, and all failures are reported
    #[error("failed to publish {} overlay(s)", .errors.len())]
    Publish {
        /// Every publish failure collected during the invocation
        errors: Vec<PublishError>,
    },

    /// Internal pixel-operation failure
    #[error(transparent)]
    Core(#[from] pixdiff_core::Error),

    /// Failure writing debug artifacts to the work directory
    #[error("failed to write work artifact: {0}")]
    Artifact(#[from] pixdiff_io::IoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::new(
            "http://example.com/a.png",
            std::io::Error::other("connection refused"),
        );
        let msg = err.to_string();
        assert!(msg.contains("http://example.com/a.png"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_publish_error_collection_display() {
        let err = DiffError::Publish {
            errors: vec![
                PublishError::new("image-added", std::io::Error::other("503")),
                PublishError::new("image-removed", std::io::Error::other("503")),
            ],
        };
        assert_eq!(err.to_string(), "failed to publish 2 overlay(s)");
    }
}
