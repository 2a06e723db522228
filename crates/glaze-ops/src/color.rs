//! Per-pixel color stages.
//!
//! All functions here leave alpha alone and never change the raster size.
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{PixelFormat, Raster};
//! use glaze_ops::color::{invert_preserve_alpha, scale_luminance};
//!
//! let img = Raster::filled(2, 2, PixelFormat::Rgba, &[100, 50, 200, 77]).unwrap();
//! let out = invert_preserve_alpha(&scale_luminance(&img, 0.5));
//! assert_eq!(out.pixel(0, 0).unwrap(), &[205, 230, 155, 77]);
//! ```

use glaze_core::pixel::luma_of;
use glaze_core::{PixelFormat, Raster};

/// Luma level above which the highlight overlay starts to show.
pub const HIGHLIGHT_THRESHOLD: u8 = 128;

/// Multiplies every color channel by `factor`, rounding and clamping to
/// `[0, 255]`.
///
/// `0.0` yields black, `1.0` returns the input unchanged. Negative factors
/// clamp to black.
pub fn scale_luminance(img: &Raster, factor: f32) -> Raster {
    if factor == 1.0 {
        return img.clone();
    }

    let color = img.format().color_channels();
    let mut out = img.clone();
    out.map_pixels(|px| {
        for c in &mut px[..color] {
            *c = (*c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        }
    });
    out
}

/// Replaces each color channel `c` with `255 - c`. Applying it twice gives
/// back the input.
pub fn invert_preserve_alpha(img: &Raster) -> Raster {
    let color = img.format().color_channels();
    let mut out = img.clone();
    out.map_pixels(|px| {
        for c in &mut px[..color] {
            *c = 255 - *c;
        }
    });
    out
}

/// Coverage value for a single luma sample.
#[inline]
pub fn mask_value(luma: u8, threshold: u8) -> u8 {
    let excess = luma.saturating_sub(threshold) as u16;
    (excess * 2).min(255) as u8
}

/// Gray coverage mask: `clamp(2 * max(0, luma - threshold), 0, 255)`.
///
/// Luma is the integer BT.601 value of each pixel; alpha does not
/// contribute.
pub fn luminance_mask(img: &Raster, threshold: u8) -> Raster {
    img.map_into(PixelFormat::Gray, |px, out| {
        out[0] = mask_value(luma_of(px), threshold);
    })
}

/// Solid `color` overlay at the size of `img` whose alpha is the
/// [`luminance_mask`] of `img`.
pub fn highlight_overlay(img: &Raster, color: [u8; 3], threshold: u8) -> Raster {
    luminance_mask(img, threshold).map_into(PixelFormat::Rgba, |m, out| {
        out[..3].copy_from_slice(&color);
        out[3] = m[0];
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(px: [u8; 4]) -> Raster {
        Raster::filled(3, 2, PixelFormat::Rgba, &px).unwrap()
    }

    #[test]
    fn test_scale_identity_is_exact() {
        let mut img = rgba([0, 0, 0, 0]);
        for (i, s) in img.data_mut().iter_mut().enumerate() {
            *s = (i * 37 % 256) as u8;
        }
        assert_eq!(scale_luminance(&img, 1.0), img);
    }

    #[test]
    fn test_scale_rounds_and_clamps() {
        let img = rgba([100, 200, 3, 42]);
        assert_eq!(scale_luminance(&img, 0.5).pixel(0, 0).unwrap(), &[50, 100, 2, 42]);
        assert_eq!(scale_luminance(&img, 2.0).pixel(1, 1).unwrap(), &[200, 255, 6, 42]);
        assert_eq!(scale_luminance(&img, 0.0).pixel(2, 0).unwrap(), &[0, 0, 0, 42]);
        assert_eq!(scale_luminance(&img, -1.0).pixel(2, 0).unwrap(), &[0, 0, 0, 42]);
    }

    #[test]
    fn test_scale_gray() {
        let img = Raster::filled(1, 1, PixelFormat::Gray, &[90]).unwrap();
        assert_eq!(scale_luminance(&img, 1.5).pixel(0, 0).unwrap(), &[135]);
    }

    #[test]
    fn test_invert_is_involution() {
        let img = rgba([12, 128, 255, 9]);
        let once = invert_preserve_alpha(&img);
        assert_eq!(once.pixel(0, 0).unwrap(), &[243, 127, 0, 9]);
        assert_eq!(invert_preserve_alpha(&once), img);
    }

    #[test]
    fn test_invert_does_not_touch_source() {
        let img = rgba([1, 2, 3, 4]);
        let _ = invert_preserve_alpha(&img);
        assert_eq!(img.pixel(0, 0).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_mask_values() {
        assert_eq!(mask_value(128, HIGHLIGHT_THRESHOLD), 0);
        assert_eq!(mask_value(100, HIGHLIGHT_THRESHOLD), 0);
        assert_eq!(mask_value(129, HIGHLIGHT_THRESHOLD), 2);
        assert_eq!(mask_value(200, HIGHLIGHT_THRESHOLD), 144);
        assert_eq!(mask_value(255, HIGHLIGHT_THRESHOLD), 254);
        assert_eq!(mask_value(255, 0), 255);
    }

    #[test]
    fn test_mask_of_neutral_gray_is_empty() {
        let img = Raster::filled(4, 4, PixelFormat::Rgb, &[128, 128, 128]).unwrap();
        let mask = luminance_mask(&img, HIGHLIGHT_THRESHOLD);
        assert_eq!(mask.format(), PixelFormat::Gray);
        assert!(mask.data().iter().all(|&m| m == 0));
    }

    #[test]
    fn test_mask_ignores_alpha() {
        let a = luminance_mask(&rgba([255, 255, 255, 0]), HIGHLIGHT_THRESHOLD);
        let b = luminance_mask(&rgba([255, 255, 255, 255]), HIGHLIGHT_THRESHOLD);
        assert_eq!(a, b);
    }

    #[test]
    fn test_highlight_overlay() {
        let img = Raster::filled(2, 2, PixelFormat::Rgb, &[200, 200, 200]).unwrap();
        let overlay = highlight_overlay(&img, [10, 20, 30], HIGHLIGHT_THRESHOLD);
        assert_eq!(overlay.format(), PixelFormat::Rgba);
        assert_eq!(overlay.dimensions(), (2, 2));
        assert_eq!(overlay.pixel(1, 1).unwrap(), &[10, 20, 30, 144]);
    }
}
