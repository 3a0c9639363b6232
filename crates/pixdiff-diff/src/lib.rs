//! pixdiff-diff - The visual diff pipeline
//!
//! This crate is the core of the pixdiff workspace:
//!
//! - [`score::rms_difference`] - scalar divergence between two images
//! - [`mask::build_change_mask`] - directional per-pixel change masks
//! - [`overlay::composite_overlay`] - colored highlight rendering
//! - [`differ::Differ`] - the orchestrator tying the stages together
//!   behind the [`ImageFetcher`] / [`ArtifactPublisher`] capability
//!   traits
//!
//! The pipeline is synchronous, allocation-owned, and free of shared
//! mutable state; production collaborators live in `pixdiff-remote`,
//! and the whole pipeline is exercised with in-memory fakes in this
//! crate's tests.

pub mod differ;
pub mod error;
pub mod mask;
pub mod overlay;
pub mod score;

pub use differ::{
    ArtifactPublisher, DEFAULT_NAME_PREFIX, DEFAULT_OPACITY, DEFAULT_SCORE_THRESHOLD, DiffOutcome,
    DiffRequest, Differ, ImageFetcher, OverlayArtifact,
};
pub use error::{BoxError, DiffError, FetchError, PublishError};
pub use mask::{ChangeDirection, ChangeMask, DEFAULT_CHANGE_THRESHOLD, build_change_mask};
pub use overlay::{Highlight, composite_overlay};
pub use score::rms_difference;
