//! Raster - the image container used throughout pixdiff
//!
//! A `Raster` is a width x height grid of packed 32-bit `0xRRGGBBAA`
//! pixels. The [`ChannelMode`] records whether the alpha byte carries
//! meaning (`Rgba`) or is a constant 255 (`Rgb`).
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership) and is
//! immutable. To modify pixel data, convert to [`RasterMut`] via
//! [`Raster::try_into_mut`] or [`Raster::to_mut`], then convert back
//! with `Into<Raster>`. This keeps every transformation observable as
//! "returns a new image" while allowing buffer reuse internally.

pub mod convert;

use crate::color;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Channel interpretation of a raster.
///
/// Comparison arithmetic runs on 3-channel data; compositing runs on
/// 4-channel data. Normalization between the two is always an explicit
/// step ([`Raster::to_rgb`] / [`Raster::to_rgba`]) so callers and tests
/// can assert on the exact channel count in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    /// 3 meaningful channels; the stored alpha byte is 255.
    Rgb,
    /// 4 meaningful channels.
    Rgba,
}

impl ChannelMode {
    /// Number of meaningful samples per pixel.
    pub fn channels(self) -> u32 {
        match self {
            ChannelMode::Rgb => 3,
            ChannelMode::Rgba => 4,
        }
    }
}

/// Internal raster data
#[derive(Debug)]
struct RasterData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Channel interpretation
    mode: ChannelMode,
    /// Row-major packed `0xRRGGBBAA` words, one per pixel
    data: Vec<u32>,
}

impl RasterData {
    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

/// Immutable raster image.
///
/// Cloning is cheap (shared `Arc`); pixel data never changes once a
/// `Raster` exists.
///
/// # Examples
///
/// ```
/// use pixdiff_core::{ChannelMode, Raster};
///
/// let raster = Raster::new(640, 480, ChannelMode::Rgb).unwrap();
/// assert_eq!(raster.width(), 640);
/// assert_eq!(raster.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new raster with every pixel zeroed.
    ///
    /// For `Rgb` mode the pixels are initialized to opaque black so the
    /// alpha-byte invariant holds; for `Rgba` mode they are transparent
    /// black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, mode: ChannelMode) -> Result<Self> {
        let fill = match mode {
            ChannelMode::Rgb => color::OPAQUE_BLACK,
            ChannelMode::Rgba => color::TRANSPARENT,
        };
        Self::filled(width, height, mode, fill)
    }

    /// Create a new raster with every pixel set to `pixel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or
    /// [`Error::InvalidParameter`] if an `Rgb` raster is filled with a
    /// non-opaque pixel.
    pub fn filled(width: u32, height: u32, mode: ChannelMode, pixel: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if mode == ChannelMode::Rgb && color::alpha(pixel) != 255 {
            return Err(Error::InvalidParameter(
                "Rgb rasters must keep alpha at 255".to_string(),
            ));
        }

        let data = vec![pixel; (width as usize) * (height as usize)];
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                mode,
                data,
            }),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel interpretation.
    #[inline]
    pub fn mode(&self) -> ChannelMode {
        self.inner.mode
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.inner.width) * u64::from(self.inner.height)
    }

    /// Raw access to the packed pixel words, row-major.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get a packed pixel at (x, y).
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.inner.data[self.inner.index(x, y)])
    }

    /// Get a packed pixel without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.inner.data[self.inner.index(x, y)]
    }

    /// Get the RGB components at (x, y).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.get_pixel(x, y).map(color::unpack_rgb)
    }

    /// Get the RGBA components at (x, y).
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        self.get_pixel(x, y).map(color::unpack_rgba)
    }

    /// Check whether two rasters have the same width and height.
    ///
    /// Channel mode is deliberately not part of this check; comparisons
    /// normalize modes explicitly.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Require that `other` has the same dimensions as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn require_same_size(&self, other: &Raster) -> Result<()> {
        if !self.sizes_equal(other) {
            return Err(Error::DimensionMismatch {
                expected: (self.inner.width, self.inner.height),
                actual: (other.inner.width, other.inner.height),
            });
        }
        Ok(())
    }

    /// Try to take exclusive ownership of the pixel data.
    ///
    /// Succeeds only if this is the sole reference. A raster freshly
    /// created in the same function always satisfies that.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create an independently mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: RasterData {
                width: self.inner.width,
                height: self.inner.height,
                mode: self.inner.mode,
                data: self.inner.data.clone(),
            },
        }
    }
}

impl PartialEq for Raster {
    /// Pixel-exact equality: same dimensions, same mode, same words.
    fn eq(&self, other: &Self) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.mode == other.inner.mode
            && self.inner.data == other.inner.data
    }
}

impl Eq for Raster {}

/// Mutable raster.
///
/// Holds the pixel data exclusively; convert back to an immutable
/// [`Raster`] with `Into<Raster>` when done.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel interpretation.
    #[inline]
    pub fn mode(&self) -> ChannelMode {
        self.inner.mode
    }

    /// Change the channel interpretation without touching pixel data.
    ///
    /// Callers are responsible for the alpha-byte invariant when
    /// switching to `Rgb`; the normalization functions in
    /// [`convert`](crate::raster::convert) do this for you.
    pub fn set_mode(&mut self, mode: ChannelMode) {
        self.inner.mode = mode;
    }

    /// Get a packed pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.inner.data[self.inner.index(x, y)])
    }

    /// Set a packed pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinates are outside the
    /// raster.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: u32) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.inner.width,
                height: self.inner.height,
            });
        }
        let idx = self.inner.index(x, y);
        self.inner.data[idx] = pixel;
        Ok(())
    }

    /// Set a packed pixel without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, pixel: u32) {
        let idx = self.inner.index(x, y);
        self.inner.data[idx] = pixel;
    }

    /// Set an opaque RGB pixel at (x, y).
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_pixel(x, y, color::pack_rgb(r, g, b))
    }

    /// Set an RGBA pixel at (x, y).
    pub fn set_rgba(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        self.set_pixel(x, y, color::pack_rgba(r, g, b, a))
    }

    /// Overwrite every pixel with `pixel`.
    pub fn fill(&mut self, pixel: u32) {
        self.inner.data.fill(pixel);
    }
}

impl From<RasterMut> for Raster {
    fn from(raster: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(Raster::new(0, 10, ChannelMode::Rgb).is_err());
        assert!(Raster::new(10, 0, ChannelMode::Rgba).is_err());
    }

    #[test]
    fn test_new_rgb_is_opaque_black() {
        let raster = Raster::new(4, 4, ChannelMode::Rgb).unwrap();
        assert_eq!(raster.get_rgba(0, 0), Some((0, 0, 0, 255)));
    }

    #[test]
    fn test_new_rgba_is_transparent() {
        let raster = Raster::new(4, 4, ChannelMode::Rgba).unwrap();
        assert_eq!(raster.get_rgba(3, 3), Some((0, 0, 0, 0)));
    }

    #[test]
    fn test_filled_rejects_translucent_rgb() {
        let pixel = color::pack_rgba(10, 20, 30, 128);
        assert!(Raster::filled(2, 2, ChannelMode::Rgb, pixel).is_err());
        assert!(Raster::filled(2, 2, ChannelMode::Rgba, pixel).is_ok());
    }

    #[test]
    fn test_get_set_roundtrip() {
        let raster = Raster::new(8, 8, ChannelMode::Rgb).unwrap();
        let mut rm = raster.to_mut();
        rm.set_rgb(3, 5, 10, 20, 30).unwrap();
        let raster: Raster = rm.into();

        assert_eq!(raster.get_rgb(3, 5), Some((10, 20, 30)));
        assert_eq!(raster.get_rgb(0, 0), Some((0, 0, 0)));
    }

    #[test]
    fn test_get_pixel_out_of_bounds() {
        let raster = Raster::new(4, 4, ChannelMode::Rgb).unwrap();
        assert_eq!(raster.get_pixel(4, 0), None);
        assert_eq!(raster.get_pixel(0, 4), None);
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let raster = Raster::new(4, 4, ChannelMode::Rgb).unwrap();
        let mut rm = raster.to_mut();
        assert!(matches!(
            rm.set_pixel(9, 0, 0xFF),
            Err(Error::OutOfBounds { x: 9, y: 0, .. })
        ));
    }

    #[test]
    fn test_try_into_mut_sole_owner() {
        let raster = Raster::new(2, 2, ChannelMode::Rgb).unwrap();
        assert!(raster.try_into_mut().is_ok());
    }

    #[test]
    fn test_try_into_mut_shared_fails() {
        let raster = Raster::new(2, 2, ChannelMode::Rgb).unwrap();
        let shared = raster.clone();
        assert!(shared.try_into_mut().is_err());
    }

    #[test]
    fn test_to_mut_is_independent() {
        let raster = Raster::new(2, 2, ChannelMode::Rgb).unwrap();
        let mut rm = raster.to_mut();
        rm.set_rgb(0, 0, 255, 0, 0).unwrap();
        let copy: Raster = rm.into();

        assert_eq!(raster.get_rgb(0, 0), Some((0, 0, 0)));
        assert_eq!(copy.get_rgb(0, 0), Some((255, 0, 0)));
    }

    #[test]
    fn test_require_same_size() {
        let a = Raster::new(10, 10, ChannelMode::Rgb).unwrap();
        let b = Raster::new(10, 10, ChannelMode::Rgba).unwrap();
        let c = Raster::new(20, 10, ChannelMode::Rgb).unwrap();

        assert!(a.require_same_size(&b).is_ok());
        assert!(matches!(
            a.require_same_size(&c),
            Err(Error::DimensionMismatch {
                expected: (10, 10),
                actual: (20, 10),
            })
        ));
    }

    #[test]
    fn test_pixel_equality() {
        let a = Raster::filled(3, 3, ChannelMode::Rgb, color::pack_rgb(1, 2, 3)).unwrap();
        let b = Raster::filled(3, 3, ChannelMode::Rgb, color::pack_rgb(1, 2, 3)).unwrap();
        let c = Raster::filled(3, 3, ChannelMode::Rgb, color::pack_rgb(9, 2, 3)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
