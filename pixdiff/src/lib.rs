//! pixdiff - Visual image diffing for Rust
//!
//! Computes a perceptual difference between two raster images and
//! renders annotated overlays highlighting added and removed regions.
//!
//! # Overview
//!
//! - RMS difference scoring between equally-shaped images
//! - Directional binary change masks (added vs removed content)
//! - Color-highlight overlay compositing
//! - A pipeline orchestrator with pluggable fetch/publish collaborators
//!
//! # Example
//!
//! ```
//! use pixdiff::color::pack_rgb;
//! use pixdiff::diff::rms_difference;
//! use pixdiff::{ChannelMode, Raster};
//!
//! let a = Raster::filled(10, 10, ChannelMode::Rgb, pack_rgb(0, 0, 0)).unwrap();
//! let b = Raster::filled(10, 10, ChannelMode::Rgb, pack_rgb(255, 255, 255)).unwrap();
//!
//! assert_eq!(rms_difference(&a, &a).unwrap(), 0.0);
//! assert!(rms_difference(&a, &b).unwrap() > 441.0);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixdiff_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use pixdiff_diff as diff;
pub use pixdiff_io as io;
pub use pixdiff_remote as remote;
