//! # glaze-core
//!
//! Core types for the glaze compositing pipeline.
//!
//! - [`Raster`] - 8-bit row-major image buffer with copy-on-write storage
//! - [`PixelFormat`] - Gray, RGB or RGBA channel layout
//! - [`pixel`] - luma and quantization helpers
//! - [`Error`] - construction and access failures
//!
//! ## Crate Structure
//!
//! ```text
//! glaze-core (this crate)
//!    ^
//!    |
//!    +-- glaze-ops (color ops, blend, composite, resize, pipeline)
//!    +-- glaze-io  (decode/encode)
//!    +-- glaze-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod pixel;
pub mod raster;

pub use error::{Error, Result};
pub use format::PixelFormat;
pub use pixel::{luma_rec601, REC601_LUMA};
pub use raster::Raster;

/// Prelude module for convenient imports.
///
/// ```
/// use glaze_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::PixelFormat;
    pub use crate::raster::Raster;
}
