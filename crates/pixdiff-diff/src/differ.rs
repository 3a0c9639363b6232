//! Diff orchestration
//!
//! [`Differ`] sequences the pipeline: fetch both inputs, check
//! dimensions, score, and - when the score exceeds the threshold -
//! derive both directional masks, composite both overlays, and publish
//! them. The fetch and publish collaborators sit behind the
//! [`ImageFetcher`] / [`ArtifactPublisher`] traits so the whole
//! pipeline runs against in-memory fakes in tests.
//!
//! Every step is a plain blocking call over owned buffers; concurrent
//! invocations share no state, and cancellation/timeouts belong to the
//! caller.

use crate::error::{DiffError, FetchError, PublishError};
use crate::mask::{ChangeDirection, DEFAULT_CHANGE_THRESHOLD, build_change_mask};
use crate::overlay::{Highlight, composite_overlay};
use crate::score::rms_difference;
use pixdiff_core::Raster;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default overlay opacity.
pub const DEFAULT_OPACITY: f32 = 0.65;

/// Default score threshold; any nonzero score produces overlays.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.0;

/// Default prefix for artifact names.
pub const DEFAULT_NAME_PREFIX: &str = "image";

/// Retrieves and decodes an input image.
pub trait ImageFetcher {
    /// Fetch the image at `url` into a raster.
    fn fetch(&self, url: &str) -> Result<Raster, FetchError>;
}

/// Stores a finished overlay and returns its public locator.
pub trait ArtifactPublisher {
    /// Publish `image` under `logical_name` within `prefix`, returning
    /// an opaque locator for the stored artifact. Implementations own
    /// uniqueness of storage naming.
    fn publish(
        &self,
        image: &Raster,
        logical_name: &str,
        prefix: &str,
    ) -> Result<String, PublishError>;
}

impl<F: ImageFetcher + ?Sized> ImageFetcher for Box<F> {
    fn fetch(&self, url: &str) -> Result<Raster, FetchError> {
        (**self).fetch(url)
    }
}

impl<F: ImageFetcher + ?Sized> ImageFetcher for &F {
    fn fetch(&self, url: &str) -> Result<Raster, FetchError> {
        (**self).fetch(url)
    }
}

impl<P: ArtifactPublisher + ?Sized> ArtifactPublisher for Box<P> {
    fn publish(
        &self,
        image: &Raster,
        logical_name: &str,
        prefix: &str,
    ) -> Result<String, PublishError> {
        (**self).publish(image, logical_name, prefix)
    }
}

impl<P: ArtifactPublisher + ?Sized> ArtifactPublisher for &P {
    fn publish(
        &self,
        image: &Raster,
        logical_name: &str,
        prefix: &str,
    ) -> Result<String, PublishError> {
        (**self).publish(image, logical_name, prefix)
    }
}

/// Parameters of a single diff invocation.
#[derive(Debug, Clone)]
pub struct DiffRequest {
    /// URL of the before image
    pub before_url: String,
    /// URL of the after image
    pub after_url: String,
    /// Optional directory for on-disk debug copies of inputs and
    /// overlays; the pipeline is purely in-memory when unset
    pub work_dir: Option<PathBuf>,
    /// Key prefix handed to the publisher
    pub publish_prefix: String,
    /// Prefix for artifact logical names
    pub name_prefix: String,
    /// Overlay opacity in [0, 1]
    pub opacity: f32,
    /// Score at or below this value counts as "no difference"
    pub threshold: f64,
}

impl DiffRequest {
    /// Create a request with default prefix, opacity, and threshold.
    pub fn new(before_url: impl Into<String>, after_url: impl Into<String>) -> Self {
        DiffRequest {
            before_url: before_url.into(),
            after_url: after_url.into(),
            work_dir: None,
            publish_prefix: String::new(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            opacity: DEFAULT_OPACITY,
            threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    fn validate(&self) -> Result<(), DiffError> {
        if self.before_url.trim().is_empty() {
            return Err(DiffError::InvalidInput("before_url is empty".to_string()));
        }
        if self.after_url.trim().is_empty() {
            return Err(DiffError::InvalidInput("after_url is empty".to_string()));
        }
        if self.name_prefix.trim().is_empty() {
            return Err(DiffError::InvalidInput("name_prefix is empty".to_string()));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(DiffError::InvalidInput(format!(
                "opacity must be in [0, 1], got {}",
                self.opacity
            )));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(DiffError::InvalidInput(format!(
                "threshold must be a finite value >= 0, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// A published overlay: the composited image plus its storage locator.
#[derive(Debug, Clone)]
pub struct OverlayArtifact {
    /// Locator returned by the publisher
    pub locator: String,
    /// The composited overlay image
    pub image: Raster,
}

/// Terminal state of a diff invocation.
#[derive(Debug, Clone)]
pub enum DiffOutcome {
    /// Score at or below the threshold; nothing was published
    NoDifference {
        /// The computed RMS difference score
        score: f64,
    },
    /// Both overlays were produced and published
    Changed {
        /// The computed RMS difference score
        score: f64,
        /// Green-highlighted overlay of content added in the after image
        added: OverlayArtifact,
        /// Red-highlighted overlay of content removed from the before image
        removed: OverlayArtifact,
    },
}

/// The diff pipeline orchestrator.
pub struct Differ<F, P> {
    fetcher: F,
    publisher: P,
}

impl<F: ImageFetcher, P: ArtifactPublisher> Differ<F, P> {
    /// Create an orchestrator over the given collaborators.
    pub fn new(fetcher: F, publisher: P) -> Self {
        Differ { fetcher, publisher }
    }

    /// Run the full pipeline for one request.
    ///
    /// Linear state machine: validate, fetch both inputs, dimension
    /// check, score, then (only above the threshold) mask and composite
    /// both directions and publish both overlays. A failed publish of
    /// one overlay does not stop the other from being attempted; all
    /// publish failures are reported together. Given identical inputs,
    /// repeated invocations produce pixel-identical overlays.
    ///
    /// # Errors
    ///
    /// See [`DiffError`]; any failure aborts the remaining steps of
    /// this invocation only.
    pub fn diff(&self, request: &DiffRequest) -> Result<DiffOutcome, DiffError> {
        request.validate()?;

        debug!(before = %request.before_url, after = %request.after_url, "fetching inputs");
        let before = self.fetcher.fetch(&request.before_url)?;
        let after = self.fetcher.fetch(&request.after_url)?;

        if !before.sizes_equal(&after) {
            return Err(DiffError::DimensionMismatch {
                before: (before.width(), before.height()),
                after: (after.width(), after.height()),
            });
        }

        if let Some(dir) = &request.work_dir {
            self.write_artifact(dir, &request.name_prefix, "before", &before)?;
            self.write_artifact(dir, &request.name_prefix, "after", &after)?;
        }

        let score = rms_difference(&before, &after)?;
        if score <= request.threshold {
            info!(score, threshold = request.threshold, "no significant difference");
            return Ok(DiffOutcome::NoDifference { score });
        }
        debug!(score, threshold = request.threshold, "difference above threshold");

        let added_mask =
            build_change_mask(&before, &after, ChangeDirection::Added, DEFAULT_CHANGE_THRESHOLD)?;
        let added_image =
            composite_overlay(&after, &added_mask, Highlight::added(request.opacity)?)?;

        let removed_mask = build_change_mask(
            &before,
            &after,
            ChangeDirection::Removed,
            DEFAULT_CHANGE_THRESHOLD,
        )?;
        let removed_image =
            composite_overlay(&before, &removed_mask, Highlight::removed(request.opacity)?)?;

        if let Some(dir) = &request.work_dir {
            self.write_artifact(dir, &request.name_prefix, "added", &added_image)?;
            self.write_artifact(dir, &request.name_prefix, "removed", &removed_image)?;
        }

        let added_name = format!("{}-added", request.name_prefix);
        let removed_name = format!("{}-removed", request.name_prefix);
        let added_locator =
            self.publisher
                .publish(&added_image, &added_name, &request.publish_prefix);
        let removed_locator =
            self.publisher
                .publish(&removed_image, &removed_name, &request.publish_prefix);

        match (added_locator, removed_locator) {
            (Ok(added), Ok(removed)) => {
                info!(score, %added, %removed, "diff published");
                Ok(DiffOutcome::Changed {
                    score,
                    added: OverlayArtifact {
                        locator: added,
                        image: added_image,
                    },
                    removed: OverlayArtifact {
                        locator: removed,
                        image: removed_image,
                    },
                })
            }
            (added, removed) => {
                let errors: Vec<PublishError> =
                    [added.err(), removed.err()].into_iter().flatten().collect();
                warn!(failed = errors.len(), "overlay publication failed");
                Err(DiffError::Publish { errors })
            }
        }
    }

    /// Write a debug copy of `image` into the work directory.
    fn write_artifact(
        &self,
        dir: &Path,
        name_prefix: &str,
        stage: &str,
        image: &Raster,
    ) -> Result<(), DiffError> {
        std::fs::create_dir_all(dir).map_err(pixdiff_io::IoError::from)?;
        let path = dir.join(format!("{name_prefix}-{stage}.png"));
        pixdiff_io::write_png_file(&path, image)?;
        debug!(path = %path.display(), "wrote work artifact");
        Ok(())
    }
}
