//! JPEG image format support (decode only)
//!
//! JPEG is an accepted input format for fetched images; published
//! overlays are always PNG, so no encoder is provided.

use crate::{IoError, IoResult};
use jpeg_decoder::PixelFormat;
use pixdiff_core::{ChannelMode, Raster, color};
use std::io::Read;

/// Read a JPEG image into an RGB raster.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Raster> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG decoder reported no image info".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    let raster = Raster::new(width, height, ChannelMode::Rgb)?;
    let mut out = raster.try_into_mut().unwrap();

    match info.pixel_format {
        PixelFormat::L8 => {
            for y in 0..height {
                let row_start = y as usize * width as usize;
                for x in 0..width {
                    let g = pixels[row_start + x as usize];
                    out.set_pixel_unchecked(x, y, color::pack_rgb(g, g, g));
                }
            }
        }
        PixelFormat::RGB24 => {
            for y in 0..height {
                let row_start = y as usize * width as usize * 3;
                for x in 0..width {
                    let idx = row_start + x as usize * 3;
                    out.set_pixel_unchecked(
                        x,
                        y,
                        color::pack_rgb(pixels[idx], pixels[idx + 1], pixels[idx + 2]),
                    );
                }
            }
        }
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_decode_garbage_fails() {
        let result = read_jpeg(Cursor::new(vec![0xFFu8, 0xD8, 0xFF, 0x00, 0x00]));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }
}
