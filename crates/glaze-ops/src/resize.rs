//! Raster resampling.
//!
//! Resizing is separable: a horizontal pass into an `f32` scratch buffer,
//! then a vertical pass that rounds back to 8 bits. When shrinking, the
//! kernel is stretched by the scale factor so every source pixel contributes
//! (area-aware anti-aliasing). RGBA rasters are filtered with premultiplied
//! alpha and returned straight.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - no interpolation (blocky)
//! - [`Filter::Bilinear`] - triangle filter
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic
//! - [`Filter::Lanczos3`] - windowed sinc, the default
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{PixelFormat, Raster};
//! use glaze_ops::resize::resize;
//!
//! let src = Raster::filled(64, 48, PixelFormat::Rgba, &[10, 20, 30, 255]).unwrap();
//! let dst = resize(&src, 17, 5).unwrap();
//! assert_eq!(dst.dimensions(), (17, 5));
//! assert_eq!(dst.pixel(16, 4).unwrap(), &[10, 20, 30, 255]);
//! ```

use glaze_core::Raster;
use rayon::prelude::*;
use tracing::debug;

use crate::{OpsError, OpsResult};

/// Longest side of an interactive preview.
pub const PREVIEW_MAX_SIZE: u32 = 512;

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor.
    Nearest,
    /// Bilinear (triangle).
    Bilinear,
    /// Bicubic (Mitchell-Netravali).
    Bicubic,
    /// Lanczos-3.
    #[default]
    Lanczos3,
}

impl Filter {
    /// Every filter, sharpest last.
    pub const ALL: [Filter; 4] = [
        Filter::Nearest,
        Filter::Bilinear,
        Filter::Bicubic,
        Filter::Lanczos3,
    ];

    /// Parses a filter name (case-insensitive). `linear`, `cubic` and
    /// `lanczos` are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Filter> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nearest" => Some(Filter::Nearest),
            "bilinear" | "linear" => Some(Filter::Bilinear),
            "bicubic" | "cubic" => Some(Filter::Bicubic),
            "lanczos3" | "lanczos" => Some(Filter::Lanczos3),
            _ => None,
        }
    }

    /// Lowercase name, as accepted by [`Filter::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Bilinear => "bilinear",
            Filter::Bicubic => "bicubic",
            Filter::Lanczos3 => "lanczos3",
        }
    }

    /// Support radius at scale 1.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Kernel value at distance `x`.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        let d = x.abs();
        if d >= self.support() {
            return 0.0;
        }
        match self {
            Filter::Nearest => 1.0,
            Filter::Bilinear => 1.0 - d,
            Filter::Bicubic => mitchell(d),
            Filter::Lanczos3 => sinc(d) * sinc(d / 3.0),
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::from_name(s).ok_or_else(|| {
            format!("unknown filter '{s}' (expected nearest, bilinear, bicubic or lanczos3)")
        })
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Mitchell-Netravali cubic with B = C = 1/3, for `0 <= d < 2`.
#[inline]
fn mitchell(d: f32) -> f32 {
    let (d2, d3) = (d * d, d * d * d);
    if d < 1.0 {
        (7.0 * d3 - 12.0 * d2 + 16.0 / 3.0) / 6.0
    } else {
        (-7.0 / 3.0 * d3 + 12.0 * d2 - 20.0 * d + 32.0 / 3.0) / 6.0
    }
}

/// Normalized sinc, `sin(pi x) / (pi x)`.
#[inline]
fn sinc(x: f32) -> f32 {
    if x < 1e-8 {
        return 1.0;
    }
    let px = std::f32::consts::PI * x;
    px.sin() / px
}

/// Normalized source taps for one destination coordinate.
struct Taps {
    first: usize,
    weights: Vec<f32>,
}

/// Precomputes the taps of every destination index along one axis.
fn taps(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let first = ((center - support).floor().max(0.0)) as usize;
            let last = ((center + support).ceil().max(0.0) as usize).min(src_len - 1);

            let mut weights: Vec<f32> = (first..=last)
                .map(|s| filter.weight((s as f32 - center) / stretch))
                .collect();
            let sum: f32 = weights.iter().sum();

            if sum.abs() > 1e-8 {
                weights.iter_mut().for_each(|w| *w /= sum);
                Taps { first, weights }
            } else {
                // Kernel missed every sample; take the closest one.
                let nearest = (center.round().max(0.0) as usize).min(src_len - 1);
                Taps {
                    first: nearest,
                    weights: vec![1.0],
                }
            }
        })
        .collect()
}

/// Resizes with [`Filter::Lanczos3`] to exactly `width` x `height`.
///
/// Aspect ratio is not preserved; the target is taken as given.
///
/// # Errors
///
/// [`OpsError::InvalidTargetSize`] if either side is zero.
pub fn resize(img: &Raster, width: u32, height: u32) -> OpsResult<Raster> {
    resize_with_filter(img, width, height, Filter::Lanczos3)
}

/// Resizes to exactly `width` x `height` with the given filter.
///
/// Same-size requests return a clone of `img`.
///
/// # Errors
///
/// [`OpsError::InvalidTargetSize`] if either side is zero.
pub fn resize_with_filter(
    img: &Raster,
    width: u32,
    height: u32,
    filter: Filter,
) -> OpsResult<Raster> {
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidTargetSize { width, height });
    }
    if img.dimensions() == (width, height) {
        return Ok(img.clone());
    }
    debug!(
        src_width = img.width(),
        src_height = img.height(),
        width,
        height,
        ?filter,
        "resize"
    );

    let channels = img.channels();
    let (src_w, src_h) = (img.width() as usize, img.height() as usize);
    let (dst_w, dst_h) = (width as usize, height as usize);
    // RGBA is filtered premultiplied.
    let alpha = img.has_alpha().then_some(channels - 1);

    // Horizontal pass: src_w x src_h -> dst_w x src_h
    let h_taps = taps(src_w, dst_w, filter);
    let mut temp = vec![0.0f32; dst_w * src_h * channels];
    temp.par_chunks_mut(dst_w * channels)
        .zip(img.data().par_chunks(src_w * channels))
        .for_each(|(dst_row, src_row)| {
            for (dst, tap) in dst_row.chunks_exact_mut(channels).zip(&h_taps) {
                for (k, w) in tap.weights.iter().enumerate() {
                    let s = (tap.first + k) * channels;
                    let px = &src_row[s..s + channels];
                    let coverage = alpha.map_or(1.0, |a| px[a] as f32 / 255.0);
                    for (c, (d, &v)) in dst.iter_mut().zip(px).enumerate() {
                        let v = if Some(c) == alpha { v as f32 } else { v as f32 * coverage };
                        *d += v * w;
                    }
                }
            }
        });

    // Vertical pass: dst_w x src_h -> dst_w x dst_h
    let v_taps = taps(src_h, dst_h, filter);
    let row_len = dst_w * channels;
    let mut data = vec![0u8; dst_w * dst_h * channels];
    data.par_chunks_mut(row_len)
        .zip(v_taps.par_iter())
        .for_each(|(dst_row, tap)| {
            let mut acc = vec![0.0f32; row_len];
            for (k, w) in tap.weights.iter().enumerate() {
                let src_row = &temp[(tap.first + k) * row_len..(tap.first + k + 1) * row_len];
                for (a, s) in acc.iter_mut().zip(src_row) {
                    *a += s * w;
                }
            }
            match alpha {
                Some(a) => {
                    for (dst, px) in dst_row.chunks_exact_mut(channels).zip(acc.chunks_exact(channels)) {
                        unpremultiply(px, a, dst);
                    }
                }
                None => {
                    for (d, a) in dst_row.iter_mut().zip(acc) {
                        *d = to_u8(a);
                    }
                }
            }
        });

    Ok(Raster::new(width, height, img.format(), data)?)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Writes one straight-alpha pixel from premultiplied `px`. Color is 0 where
/// the filtered alpha rounds to 0.
#[inline]
fn unpremultiply(px: &[f32], alpha: usize, dst: &mut [u8]) {
    let a = to_u8(px[alpha]);
    for (c, (d, &v)) in dst.iter_mut().zip(px).enumerate() {
        *d = if c == alpha {
            a
        } else if a == 0 {
            0
        } else {
            to_u8(v * 255.0 / px[alpha])
        };
    }
}

/// Largest size with the aspect ratio of `src_w` x `src_h` that fits inside
/// `max_w` x `max_h`. Never upscales; the scaled side is truncated and each
/// side stays at least 1.
///
/// # Example
///
/// ```rust
/// use glaze_ops::resize::fit_dimensions;
///
/// assert_eq!(fit_dimensions(1920, 1080, 640, 640), (640, 360));
/// assert_eq!(fit_dimensions(320, 240, 640, 480), (320, 240));
/// ```
pub fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }
    let (w, h) = (src_w as u64, src_h as u64);
    let (mw, mh) = (max_w as u64, max_h as u64);

    // Integer cross-multiplication keeps exact ratios exact.
    let (new_w, new_h) = if mw * h <= mh * w {
        (mw, h * mw / w)
    } else {
        (w * mh / h, mh)
    };
    (new_w.max(1) as u32, new_h.max(1) as u32)
}

/// Downscales `img` to fit inside `max_w` x `max_h`, keeping its aspect
/// ratio. Images that already fit come back unchanged.
///
/// # Errors
///
/// [`OpsError::InvalidTargetSize`] if either bound is zero.
pub fn fit_within(img: &Raster, max_w: u32, max_h: u32) -> OpsResult<Raster> {
    fit_within_with_filter(img, max_w, max_h, Filter::Lanczos3)
}

/// [`fit_within`] with an explicit filter.
pub fn fit_within_with_filter(
    img: &Raster,
    max_w: u32,
    max_h: u32,
    filter: Filter,
) -> OpsResult<Raster> {
    if max_w == 0 || max_h == 0 {
        return Err(OpsError::InvalidTargetSize {
            width: max_w,
            height: max_h,
        });
    }
    let (w, h) = fit_dimensions(img.width(), img.height(), max_w, max_h);
    resize_with_filter(img, w, h, filter)
}
