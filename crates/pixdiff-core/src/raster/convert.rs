//! Channel-mode normalization
//!
//! Comparison arithmetic wants 3-channel data; compositing wants
//! 4-channel data. Rather than coercing modes implicitly inside each
//! operation, normalization is an explicit, testable step at every
//! component boundary: callers convert first, then operate.

use super::{ChannelMode, Raster};
use crate::color;

impl Raster {
    /// Normalize to 3-channel RGB.
    ///
    /// The alpha byte of every pixel is forced to 255 and the mode set
    /// to [`ChannelMode::Rgb`]. Alpha content is discarded, not
    /// premultiplied. Already-RGB rasters are returned as a cheap
    /// shared clone.
    pub fn to_rgb(&self) -> Raster {
        if self.mode() == ChannelMode::Rgb {
            return self.clone();
        }

        let mut out = self.to_mut();
        for y in 0..out.height() {
            for x in 0..out.width() {
                let pixel = out.get_pixel(x, y).unwrap_or(color::OPAQUE_BLACK);
                out.set_pixel_unchecked(x, y, color::with_alpha(pixel, 255));
            }
        }
        out.set_mode(ChannelMode::Rgb);
        out.into()
    }

    /// Normalize to 4-channel RGBA.
    ///
    /// An RGB raster becomes fully opaque RGBA; an RGBA raster is
    /// returned as a cheap shared clone.
    pub fn to_rgba(&self) -> Raster {
        if self.mode() == ChannelMode::Rgba {
            return self.clone();
        }

        let mut out = self.to_mut();
        for y in 0..out.height() {
            for x in 0..out.width() {
                let pixel = out.get_pixel(x, y).unwrap_or(color::OPAQUE_BLACK);
                out.set_pixel_unchecked(x, y, color::with_alpha(pixel, 255));
            }
        }
        out.set_mode(ChannelMode::Rgba);
        out.into()
    }
}
