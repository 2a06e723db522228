//! # glaze-ops
//!
//! The compositing stages of glaze and the pipeline that chains them.
//!
//! # Modules
//!
//! - [`color`] - luminance scale, alpha-preserving invert, highlight mask
//! - [`blend`] - gradient-map blend modes
//! - [`composite`] - source-over alpha compositing
//! - [`resize`] - separable Lanczos resampling and preview fitting
//! - [`pipeline`] - [`Params`] and the fixed-order [`apply`]
//! - [`session`] - latest-wins background rendering
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{PixelFormat, Raster};
//! use glaze_ops::{apply, BlendMode, Params};
//!
//! let base = Raster::filled(16, 16, PixelFormat::Rgb, &[40, 80, 120]).unwrap();
//! let map = Raster::filled(4, 4, PixelFormat::Rgb, &[255, 0, 0]).unwrap();
//!
//! let params = Params::default()
//!     .with_luminance(1.2)
//!     .with_gradient(map, BlendMode::Screen);
//! let out = apply(&base, &params).unwrap();
//! assert_eq!(out.dimensions(), (16, 16));
//! ```
//!
//! Per-pixel loops run over rows with rayon; results do not depend on the
//! thread count.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blend;
pub mod color;
pub mod composite;
pub mod pipeline;
pub mod resize;
pub mod session;

pub use blend::{blend, BlendMode};
pub use composite::composite_over;
pub use error::{OpsError, OpsResult};
pub use pipeline::{apply, Params};
pub use resize::{resize, Filter};
pub use session::{RenderOutcome, RenderSession};
