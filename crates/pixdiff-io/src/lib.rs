//! pixdiff-io - Image decode/encode for the pixdiff image differ
//!
//! Decodes PNG and JPEG bytes into [`Raster`]s and encodes rasters as
//! PNG. Input format is identified by magic bytes, never by file
//! extension, because inputs usually arrive as anonymous bytes fetched
//! over the network.

pub mod error;
pub mod format;
pub mod jpeg;
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, sniff_format};

use pixdiff_core::Raster;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;

/// Decode an in-memory image into a raster, dispatching on the sniffed
/// format.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] when the bytes match no known
/// format, or a decode error from the format-specific reader.
pub fn decode_image(data: &[u8]) -> IoResult<Raster> {
    match sniff_format(data) {
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        ImageFormat::Unknown => Err(IoError::UnsupportedFormat(
            "unrecognized image signature".to_string(),
        )),
    }
}

/// Read an image file from disk.
pub fn read_image(path: impl AsRef<Path>) -> IoResult<Raster> {
    let data = std::fs::read(path)?;
    decode_image(&data)
}

/// Encode a raster as PNG bytes.
pub fn encode_png(raster: &Raster) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    png::write_png(raster, &mut buffer)?;
    Ok(buffer)
}

/// Write a raster to disk as a PNG file.
pub fn write_png_file(path: impl AsRef<Path>, raster: &Raster) -> IoResult<()> {
    let file = File::create(path)?;
    png::write_png(raster, BufWriter::new(file))
}

/// Read a PNG file from disk.
///
/// Counterpart of [`write_png_file`]; callers with anonymous bytes
/// should prefer [`decode_image`].
pub fn read_png_file(path: impl AsRef<Path>) -> IoResult<Raster> {
    let file = File::open(path)?;
    png::read_png(BufReader::new(file))
}
