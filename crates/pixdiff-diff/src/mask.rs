//! Change-mask derivation
//!
//! A [`ChangeMask`] marks, per pixel, whether two images differ in a
//! chosen direction. The derivation subtracts one image from the other
//! per channel with the result floor-clamped at zero, so only content
//! that is brighter on the minuend side counts. The direction is an
//! explicit [`ChangeDirection`] parameter with a fixed `(before, after)`
//! argument order - swapping arguments to flip direction is exactly the
//! bug class this API is shaped to prevent.

use pixdiff_core::{Raster, Result, color};
use pixdiff_core::error::Error;

/// Per-channel difference at or above this value marks a pixel changed,
/// unless a caller picks its own cutoff.
pub const DEFAULT_CHANGE_THRESHOLD: u8 = 10;

/// Which side of the comparison the mask describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    /// Content present (brighter) in the after image: `after - before`.
    Added,
    /// Content present (brighter) in the before image: `before - after`.
    Removed,
}

/// Per-pixel boolean grid marking changed pixels.
///
/// Same dimensions as the images it was derived from; immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl ChangeMask {
    /// Build a mask by evaluating `f` at every pixel position.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        ChangeMask {
            width,
            height,
            bits,
        }
    }

    /// Mask width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) is marked changed.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.bits[(y as usize) * (self.width as usize) + (x as usize)])
    }

    /// Whether the pixel at (x, y) is marked changed, without bounds
    /// checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> bool {
        self.bits[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Number of changed pixels.
    pub fn count_changed(&self) -> u64 {
        self.bits.iter().filter(|&&b| b).count() as u64
    }

    /// True if no pixel is marked changed.
    pub fn is_all_unchanged(&self) -> bool {
        self.bits.iter().all(|&b| !b)
    }
}

/// Build the change mask between two images in the given direction.
///
/// Both inputs are normalized to RGB. Per pixel, the subtrahend is
/// subtracted from the minuend channel-wise with negative results
/// clamped to zero (`Added` subtracts `after - before`, `Removed`
/// subtracts `before - after`), and the pixel is marked changed when
/// any clamped channel difference is `>= threshold`.
///
/// The two directions are intentionally not symmetric and not an
/// absolute difference: a region that only darkened shows up in one
/// direction and not the other. `build_change_mask(x, x, ..)` is
/// all-unchanged for either direction.
///
/// # Errors
///
/// Returns [`pixdiff_core::Error::DimensionMismatch`] if the images
/// differ in shape, or [`pixdiff_core::Error::InvalidParameter`] for a
/// zero threshold (which would mark every pixel changed).
pub fn build_change_mask(
    before: &Raster,
    after: &Raster,
    direction: ChangeDirection,
    threshold: u8,
) -> Result<ChangeMask> {
    before.require_same_size(after)?;
    if threshold == 0 {
        return Err(Error::InvalidParameter(
            "change threshold must be at least 1".to_string(),
        ));
    }

    let before = before.to_rgb();
    let after = after.to_rgb();
    let (minuend, subtrahend) = match direction {
        ChangeDirection::Added => (&after, &before),
        ChangeDirection::Removed => (&before, &after),
    };

    Ok(ChangeMask::from_fn(
        before.width(),
        before.height(),
        |x, y| {
            let (r1, g1, b1) = color::unpack_rgb(minuend.get_pixel_unchecked(x, y));
            let (r2, g2, b2) = color::unpack_rgb(subtrahend.get_pixel_unchecked(x, y));
            let dr = r1.saturating_sub(r2);
            let dg = g1.saturating_sub(g2);
            let db = b1.saturating_sub(b2);
            dr >= threshold || dg >= threshold || db >= threshold
        },
    ))
}
