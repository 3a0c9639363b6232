//! Difference scoring
//!
//! Produces a single scalar distance between two equally-shaped images:
//! the root mean square of the per-channel pixel differences, computed
//! through a 256-bin histogram of absolute difference values.

use pixdiff_core::{Raster, Result, color};

/// Compute the RMS difference score between two images.
///
/// Both images are normalized to RGB, then a histogram `h[i]` counts
/// how often the absolute per-channel difference `i` occurs across all
/// pixels (three samples each). The score is
///
/// ```text
/// sqrt( sum(h[i] * i^2) / (width * height) )
/// ```
///
/// The normalization is by pixel count, not sample count, so identical
/// images score `0.0` and a fully-black versus fully-white pair scores
/// `sqrt(3) * 255` (~441.67), the maximum for any pixel count.
/// Deterministic and side-effect free.
///
/// # Errors
///
/// Returns [`pixdiff_core::Error::DimensionMismatch`] if the images
/// differ in width or height.
pub fn rms_difference(a: &Raster, b: &Raster) -> Result<f64> {
    a.require_same_size(b)?;

    let a = a.to_rgb();
    let b = b.to_rgb();

    let mut histogram = [0u64; 256];
    for y in 0..a.height() {
        for x in 0..a.width() {
            let (ra, ga, ba) = color::unpack_rgb(a.get_pixel_unchecked(x, y));
            let (rb, gb, bb) = color::unpack_rgb(b.get_pixel_unchecked(x, y));
            histogram[ra.abs_diff(rb) as usize] += 1;
            histogram[ga.abs_diff(gb) as usize] += 1;
            histogram[ba.abs_diff(bb) as usize] += 1;
        }
    }

    let weighted: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| count as f64 * (value * value) as f64)
        .sum();

    Ok((weighted / a.pixel_count() as f64).sqrt())
}
