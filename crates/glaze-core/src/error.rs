//! Error types for glaze-core operations.
//!
//! Every failure in this crate is a construction-time validation failure:
//! a buffer that does not match its declared shape, a coordinate outside the
//! raster, or two rasters that disagree on size or channel layout. None of
//! them are retryable; they are surfaced to the caller immediately.
//!
//! # Usage
//!
//! ```rust
//! use glaze_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(3, 3, 2, 2).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing or accessing a [`crate::Raster`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Sample buffer length disagrees with `width * height * channels`.
    #[error("buffer size mismatch: expected {expected} samples, got {got}")]
    BufferSizeMismatch {
        /// Expected sample count
        expected: usize,
        /// Actual sample count
        got: usize,
    },

    /// Pixel coordinates are outside the raster.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was accessed
        x: u32,
        /// Y coordinate that was accessed
        y: u32,
        /// Raster width
        width: u32,
        /// Raster height
        height: u32,
    },

    /// Channel count does not fit the operation.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Expected channel count
        expected: u8,
        /// Actual channel count
        got: u8,
    },

    /// Two rasters that must share a size do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First raster width
        a_width: u32,
        /// First raster height
        a_height: u32,
        /// Second raster width
        b_width: u32,
        /// Second raster height
        b_height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::BufferSizeMismatch`] error.
    #[inline]
    pub fn buffer_size_mismatch(expected: usize, got: usize) -> Self {
        Self::BufferSizeMismatch { expected, got }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(expected: u8, got: u8) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if the error describes a malformed buffer or size.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. } | Self::BufferSizeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
        assert!(!err.is_shape_error());
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let err = Error::buffer_size_mismatch(300, 299);
        assert_eq!(
            err.to_string(),
            "buffer size mismatch: expected 300 samples, got 299"
        );
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 100), (200, 200));
        let msg = err.to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("200x200"));
    }
}
