//! # glaze-io
//!
//! Reads and writes [`Raster`]s through the `image` crate.
//!
//! | Format | Read | Write | Alpha |
//! |--------|------|-------|-------|
//! | PNG    | Yes  | Yes   | Yes   |
//! | JPEG   | Yes  | Yes   | No    |
//! | BMP    | Yes  | Yes   | Yes   |
//! | GIF    | Yes  | Yes   | Yes   |
//! | TIFF   | Yes  | Yes   | Yes   |
//! | WebP   | Yes  | Yes (lossless) | Yes |
//!
//! Writing an RGBA raster to a format without alpha fails with
//! [`IoError::AlphaUnsupported`]; call [`Raster::flatten`] first.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use glaze_io::{read, write};
//!
//! let img = read("photo.jpg")?;
//! write("copy.png", &img)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod codec;
pub mod detect;
mod error;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glaze_core::Raster;
use image::ImageReader;
use tracing::debug;

pub use detect::Format;
pub use error::{IoError, IoResult};

/// JPEG quality used by [`write`].
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// JPEG quality, 1-100. Ignored by other formats.
    pub jpeg_quality: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Reads a raster, detecting the format from the file contents.
///
/// # Errors
///
/// [`IoError::Io`] if the file cannot be read, [`IoError::UnsupportedFormat`]
/// for unknown files, [`IoError::Decode`] if the codec rejects the data.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    let reader = BufReader::new(File::open(path)?);

    let img = ImageReader::with_format(reader, format.image_format())
        .decode()
        .map_err(|e| IoError::Decode(format!("{}: {e}", path.display())))?;
    let raster = codec::from_dynamic(img)?;

    debug!(
        path = %path.display(),
        %format,
        width = raster.width(),
        height = raster.height(),
        layout = %raster.format(),
        "read"
    );
    Ok(raster)
}

/// Writes a raster, choosing the format from the extension.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for an unknown extension,
/// [`IoError::AlphaUnsupported`] for RGBA into JPEG,
/// [`IoError::Encode`] / [`IoError::Io`] on codec or file failures.
pub fn write<P: AsRef<Path>>(path: P, raster: &Raster) -> IoResult<()> {
    write_with_options(path, raster, &WriteOptions::default())
}

/// Like [`write`] with explicit encoder settings.
pub fn write_with_options<P: AsRef<Path>>(
    path: P,
    raster: &Raster,
    options: &WriteOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path)
        .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))?;

    // Reject before creating the file.
    if raster.has_alpha() && !format.supports_alpha() {
        return Err(IoError::AlphaUnsupported(format));
    }

    let file = File::create(path)?;
    codec::encode(file, raster, format, options.jpeg_quality)?;

    debug!(
        path = %path.display(),
        %format,
        width = raster.width(),
        height = raster.height(),
        "wrote"
    );
    Ok(())
}
