//! PNG image format support

use crate::{IoError, IoResult};
use pixdiff_core::{ChannelMode, Raster, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{Read, Write};

/// Read a PNG image into a raster.
///
/// Paletted and low-bit-depth images are expanded and 16-bit channels
/// stripped to 8 bits by the decoder, so every PNG lands in one of the
/// two raster channel modes: gray and RGB content become [`ChannelMode::Rgb`],
/// anything carrying alpha becomes [`ChannelMode::Rgba`].
pub fn read_png<R: Read + std::io::BufRead + std::io::Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unexpected PNG output depth: {:?}",
            output_info.bit_depth
        )));
    }

    let width = output_info.width;
    let height = output_info.height;
    let mode = match output_info.color_type {
        ColorType::Grayscale | ColorType::Rgb => ChannelMode::Rgb,
        ColorType::GrayscaleAlpha | ColorType::Rgba => ChannelMode::Rgba,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unexpected PNG output color type: {:?}",
                other
            )));
        }
    };

    let raster = Raster::new(width, height, mode)?;
    let mut out = raster.try_into_mut().unwrap();

    let samples = match output_info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        _ => unreachable!(),
    };
    let data = &buf[..output_info.buffer_size()];

    for y in 0..height {
        let row_start = y as usize * output_info.line_size;
        for x in 0..width {
            let idx = row_start + x as usize * samples;
            let pixel = match output_info.color_type {
                ColorType::Grayscale => {
                    let g = data[idx];
                    color::pack_rgb(g, g, g)
                }
                ColorType::GrayscaleAlpha => {
                    let g = data[idx];
                    color::pack_rgba(g, g, g, data[idx + 1])
                }
                ColorType::Rgb => color::pack_rgb(data[idx], data[idx + 1], data[idx + 2]),
                ColorType::Rgba => {
                    color::pack_rgba(data[idx], data[idx + 1], data[idx + 2], data[idx + 3])
                }
                _ => unreachable!(),
            };
            out.set_pixel_unchecked(x, y, pixel);
        }
    }

    Ok(out.into())
}

/// Write a raster as an 8-bit PNG.
///
/// RGB rasters are written as `ColorType::Rgb`, RGBA rasters as
/// `ColorType::Rgba`.
pub fn write_png<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    let width = raster.width();
    let height = raster.height();

    let (color_type, samples) = match raster.mode() {
        ChannelMode::Rgb => (ColorType::Rgb, 3usize),
        ChannelMode::Rgba => (ColorType::Rgba, 4usize),
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = vec![0u8; width as usize * height as usize * samples];
    for y in 0..height {
        let row_start = y as usize * width as usize * samples;
        for x in 0..width {
            let (r, g, b, a) = color::unpack_rgba(raster.get_pixel_unchecked(x, y));
            let idx = row_start + x as usize * samples;
            data[idx] = r;
            data[idx + 1] = g;
            data[idx + 2] = b;
            if samples == 4 {
                data[idx + 3] = a;
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_rgb() {
        let raster = Raster::new(5, 5, ChannelMode::Rgb).unwrap();
        let mut rm = raster.to_mut();
        rm.set_rgb(0, 0, 255, 0, 0).unwrap();
        rm.set_rgb(1, 1, 0, 255, 0).unwrap();
        rm.set_rgb(2, 2, 0, 0, 255).unwrap();
        let raster: Raster = rm.into();

        let mut buffer = Vec::new();
        write_png(&raster, &mut buffer).unwrap();
        let decoded = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(decoded.mode(), ChannelMode::Rgb);
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_png_roundtrip_rgba() {
        let raster = Raster::new(4, 3, ChannelMode::Rgba).unwrap();
        let mut rm = raster.to_mut();
        rm.set_rgba(0, 0, 10, 20, 30, 40).unwrap();
        rm.set_rgba(3, 2, 200, 100, 50, 255).unwrap();
        let raster: Raster = rm.into();

        let mut buffer = Vec::new();
        write_png(&raster, &mut buffer).unwrap();
        let decoded = read_png(Cursor::new(buffer)).unwrap();

        assert_eq!(decoded.mode(), ChannelMode::Rgba);
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_png_decode_garbage_fails() {
        let result = read_png(Cursor::new(vec![0u8; 64]));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }
}
