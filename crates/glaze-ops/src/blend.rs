//! Gradient-map blend modes.
//!
//! Both inputs are read as RGB (alpha is dropped) and combined channel by
//! channel on samples normalized to `[0, 1]`:
//!
//! | mode     | result |
//! |----------|--------|
//! | Normal   | `0.5 * b + 0.5 * t` |
//! | Multiply | `b * t` |
//! | Screen   | `1 - (1 - b) * (1 - t)` |
//! | Overlay  | `2 * b * t` if `b <= 0.5`, else `1 - 2 * (1 - b) * (1 - t)` |
//!
//! Normal is an equal-weight cross-fade, not a source-over composite.
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{PixelFormat, Raster};
//! use glaze_ops::blend::{blend, BlendMode};
//!
//! let base = Raster::filled(2, 2, PixelFormat::Rgb, &[255, 128, 0]).unwrap();
//! let top = Raster::filled(2, 2, PixelFormat::Rgba, &[128, 255, 255, 0]).unwrap();
//!
//! let out = blend(&base, &top, BlendMode::Multiply).unwrap();
//! assert_eq!(out.pixel(0, 0).unwrap(), &[128, 128, 0]);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use glaze_core::pixel::{normalize, quantize};
use glaze_core::{PixelFormat, Raster};
use tracing::trace;

use crate::OpsResult;

/// How a gradient map combines with the image beneath it.
///
/// Parsing never fails: names outside the known set become
/// [`BlendMode::Unrecognized`], which passes the base through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Equal-weight average.
    #[default]
    Normal,
    /// Darken by multiplication.
    Multiply,
    /// Lighten (inverse multiply).
    Screen,
    /// Multiply or screen depending on the base channel.
    Overlay,
    /// Unknown mode name; the base is returned as RGB.
    Unrecognized,
}

impl BlendMode {
    /// The modes that change the image.
    pub const ALL: [BlendMode; 4] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
    ];

    /// Parses a mode name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Self::Normal,
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            _ => Self::Unrecognized,
        }
    }

    /// Lowercase name of the mode.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Blends two normalized samples.
    ///
    /// [`BlendMode::Unrecognized`] returns `base`.
    #[inline]
    pub fn apply(&self, base: f32, top: f32) -> f32 {
        match self {
            Self::Normal => 0.5 * base + 0.5 * top,
            Self::Multiply => base * top,
            Self::Screen => 1.0 - (1.0 - base) * (1.0 - top),
            Self::Overlay => {
                if base <= 0.5 {
                    2.0 * base * top
                } else {
                    1.0 - 2.0 * (1.0 - base) * (1.0 - top)
                }
            }
            Self::Unrecognized => base,
        }
    }
}

impl From<&str> for BlendMode {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl FromStr for BlendMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Blends `top` into `base` under `mode`. The result is RGB.
///
/// # Errors
///
/// `DimensionMismatch` if the rasters differ in size. Resizing `top` is the
/// caller's job.
pub fn blend(base: &Raster, top: &Raster, mode: BlendMode) -> OpsResult<Raster> {
    if mode == BlendMode::Unrecognized {
        trace!("unrecognized blend mode, passing base through");
        return Ok(base.to_rgb());
    }

    let base = base.to_rgb();
    let top = top.to_rgb();
    let out = base.combine(&top, PixelFormat::Rgb, |b, t, out| {
        for ((o, &b), &t) in out.iter_mut().zip(b).zip(t) {
            *o = quantize(mode.apply(normalize(b), normalize(t)));
        }
    })?;
    Ok(out)
}
