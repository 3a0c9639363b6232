//! Image format identification
//!
//! Formats are identified by magic bytes rather than file extension so
//! that images fetched over the network are dispatched by their actual
//! content.

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// PNG format
    Png,
    /// JFIF JPEG format
    Jpeg,
}

impl ImageFormat {
    /// Get the conventional file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// PNG signature, first 8 bytes of every PNG stream.
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG streams begin with the SOI marker followed by another marker byte.
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Identify an image format from the leading bytes of `data`.
pub fn sniff_format(data: &[u8]) -> ImageFormat {
    if data.starts_with(&PNG_MAGIC) {
        ImageFormat::Png
    } else if data.starts_with(&JPEG_MAGIC) {
        ImageFormat::Jpeg
    } else {
        ImageFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_png() {
        let mut data = PNG_MAGIC.to_vec();
        data.extend_from_slice(&[0; 16]);
        assert_eq!(sniff_format(&data), ImageFormat::Png);
    }

    #[test]
    fn test_sniff_jpeg() {
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), ImageFormat::Jpeg);
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(sniff_format(b"GIF89a"), ImageFormat::Unknown);
        assert_eq!(sniff_format(&[]), ImageFormat::Unknown);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }
}
