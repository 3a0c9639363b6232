//! pixdiff-core - Raster data structures for the pixdiff image differ
//!
//! This crate provides the fundamental types used throughout the pixdiff
//! workspace:
//!
//! - [`Raster`] / [`RasterMut`] - the image container (immutable / mutable)
//! - [`ChannelMode`] - 3- vs 4-channel interpretation, with explicit
//!   normalization between the two
//! - [`color`] - packed `0xRRGGBBAA` pixel helpers
//!
//! The comparison pipeline itself (scoring, masking, overlay compositing)
//! lives in `pixdiff-diff`; image codecs live in `pixdiff-io`.

pub mod color;
pub mod error;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{ChannelMode, Raster, RasterMut};
