//! Error types for pipeline stages.

use thiserror::Error;

/// Error type for pipeline stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// A raster was malformed or two rasters disagreed on shape.
    #[error(transparent)]
    Core(#[from] glaze_core::Error),

    /// Resize target has a zero side.
    #[error("invalid target size: {width}x{height}")]
    InvalidTargetSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A background render thread could not be started.
    #[error("render worker: {0}")]
    Worker(String),
}

/// Result type for pipeline stages.
pub type OpsResult<T> = Result<T, OpsError>;
