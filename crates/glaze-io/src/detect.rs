//! Format detection.
//!
//! Reading trusts the file's magic bytes and falls back to the extension;
//! writing goes by extension alone.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use image::ImageFormat;

use crate::{IoError, IoResult};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
    /// Windows bitmap.
    Bmp,
    /// GIF (first frame).
    Gif,
    /// TIFF.
    Tiff,
    /// WebP (lossless encode).
    WebP,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Format; 6] = [
        Format::Png,
        Format::Jpeg,
        Format::Bmp,
        Format::Gif,
        Format::Tiff,
        Format::WebP,
    ];

    /// Format named by the path's extension, case-insensitive.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Some(Format::Png),
            Some("jpg") | Some("jpeg") => Some(Format::Jpeg),
            Some("bmp") => Some(Format::Bmp),
            Some("gif") => Some(Format::Gif),
            Some("tif") | Some("tiff") => Some(Format::Tiff),
            Some("webp") => Some(Format::WebP),
            _ => None,
        }
    }

    /// Format identified by a file header.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Format::Png);
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Format::Jpeg);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Format::Gif);
        }
        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
            return Some(Format::Tiff);
        }
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return Some(Format::WebP);
        }
        if bytes.starts_with(b"BM") {
            return Some(Format::Bmp);
        }
        None
    }

    /// Detects the format of an existing file: magic bytes first, then the
    /// extension.
    ///
    /// # Errors
    ///
    /// [`IoError::Io`] if the file cannot be opened,
    /// [`IoError::UnsupportedFormat`] if neither check succeeds.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let mut header = [0u8; 12];
        let mut file = File::open(path)?;
        let n = file.read(&mut header)?;

        Self::from_bytes(&header[..n])
            .or_else(|| Self::from_extension(path))
            .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))
    }

    /// Whether the format can store an alpha channel.
    pub const fn supports_alpha(&self) -> bool {
        !matches!(self, Format::Jpeg)
    }

    /// Canonical file extension.
    pub const fn extension(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpg",
            Format::Bmp => "bmp",
            Format::Gif => "gif",
            Format::Tiff => "tif",
            Format::WebP => "webp",
        }
    }

    pub(crate) fn image_format(&self) -> ImageFormat {
        match self {
            Format::Png => ImageFormat::Png,
            Format::Jpeg => ImageFormat::Jpeg,
            Format::Bmp => ImageFormat::Bmp,
            Format::Gif => ImageFormat::Gif,
            Format::Tiff => ImageFormat::Tiff,
            Format::WebP => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Png => "PNG",
            Format::Jpeg => "JPEG",
            Format::Bmp => "BMP",
            Format::Gif => "GIF",
            Format::Tiff => "TIFF",
            Format::WebP => "WebP",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("a.PNG"), Some(Format::Png));
        assert_eq!(Format::from_extension("dir/b.jpeg"), Some(Format::Jpeg));
        assert_eq!(Format::from_extension("c.JPG"), Some(Format::Jpeg));
        assert_eq!(Format::from_extension("d.tif"), Some(Format::Tiff));
        assert_eq!(Format::from_extension("e.webp"), Some(Format::WebP));
        assert_eq!(Format::from_extension("f.exr"), None);
        assert_eq!(Format::from_extension("noext"), None);
        for fmt in Format::ALL {
            assert_eq!(Format::from_extension(format!("x.{}", fmt.extension())), Some(fmt));
        }
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(
            Format::from_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some(Format::Png)
        );
        assert_eq!(Format::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(Format::Jpeg));
        assert_eq!(Format::from_bytes(b"GIF89a.."), Some(Format::Gif));
        assert_eq!(Format::from_bytes(b"RIFF\0\0\0\0WEBPVP8L"), Some(Format::WebP));
        assert_eq!(Format::from_bytes(b"BM\0\0"), Some(Format::Bmp));
        assert_eq!(Format::from_bytes(b"nope"), None);
        assert_eq!(Format::from_bytes(&[]), None);
    }

    #[test]
    fn test_alpha_support() {
        assert!(Format::Png.supports_alpha());
        assert!(Format::WebP.supports_alpha());
        assert!(!Format::Jpeg.supports_alpha());
        assert!(Format::Bmp.supports_alpha());
    }
}
