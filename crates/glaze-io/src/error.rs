//! Error types for raster I/O.

use std::io;
use thiserror::Error;

use crate::Format;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Extension or file contents name no supported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Codec failed to decode the file.
    #[error("decode error: {0}")]
    Decode(String),

    /// Codec failed to encode the raster.
    #[error("encode error: {0}")]
    Encode(String),

    /// RGBA raster written to a format without alpha; flatten it first.
    #[error("{0} cannot store alpha; flatten the raster first")]
    AlphaUnsupported(Format),

    /// Decoded samples did not form a valid raster.
    #[error(transparent)]
    Raster(#[from] glaze_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
