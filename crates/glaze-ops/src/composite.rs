//! Source-over alpha compositing.
//!
//! Colors are straight (not premultiplied). Per pixel, on normalized samples:
//!
//! ```text
//! out_c = o_c * o_a + b_c * (1 - o_a)
//! out_a = o_a + b_a * (1 - o_a)
//! ```
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{PixelFormat, Raster};
//! use glaze_ops::composite::composite_over;
//!
//! let base = Raster::filled(2, 2, PixelFormat::Rgb, &[0, 0, 255]).unwrap();
//! let red = Raster::filled(2, 2, PixelFormat::Rgba, &[255, 0, 0, 255]).unwrap();
//!
//! let out = composite_over(&base, &red).unwrap();
//! assert_eq!(out.pixel(0, 0).unwrap(), &[255, 0, 0, 255]);
//! ```

use glaze_core::pixel::{normalize, quantize};
use glaze_core::{Error, PixelFormat, Raster};
use tracing::trace;

use crate::OpsResult;

/// Composites one normalized RGBA pixel over another.
///
/// # Example
///
/// ```rust
/// use glaze_ops::composite::over_pixel;
///
/// let fg = [1.0, 0.0, 0.0, 0.5]; // half-transparent red
/// let bg = [0.0, 0.0, 1.0, 1.0]; // opaque blue
/// let out = over_pixel(fg, bg);
///
/// assert!((out[0] - 0.5).abs() < 1e-6);
/// assert!((out[2] - 0.5).abs() < 1e-6);
/// assert!((out[3] - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn over_pixel(fg: [f32; 4], bg: [f32; 4]) -> [f32; 4] {
    let a = fg[3];
    let keep = 1.0 - a;
    [
        fg[0] * a + bg[0] * keep,
        fg[1] * a + bg[1] * keep,
        fg[2] * a + bg[2] * keep,
        a + bg[3] * keep,
    ]
}

/// Composites `overlay` over `base`. The result is RGBA.
///
/// `base` may be any format and is promoted to RGBA first.
///
/// # Errors
///
/// - `ChannelMismatch` if `overlay` is not RGBA.
/// - `DimensionMismatch` if the sizes differ.
pub fn composite_over(base: &Raster, overlay: &Raster) -> OpsResult<Raster> {
    if overlay.format() != PixelFormat::Rgba {
        return Err(Error::channel_mismatch(4, overlay.channels() as u8).into());
    }
    trace!(width = base.width(), height = base.height(), "composite over");

    let base = base.to_rgba();
    let out = base.combine(overlay, PixelFormat::Rgba, |b, o, out| {
        let px = over_pixel(
            [normalize(o[0]), normalize(o[1]), normalize(o[2]), normalize(o[3])],
            [normalize(b[0]), normalize(b[1]), normalize(b[2]), normalize(b[3])],
        );
        for (dst, v) in out.iter_mut().zip(px) {
            *dst = quantize(v);
        }
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;

    fn checker(w: u32, h: u32) -> Raster {
        let data = (0..(w * h * 4) as usize)
            .map(|i| ((i * 29 + 7) % 256) as u8)
            .collect();
        Raster::new(w, h, PixelFormat::Rgba, data).unwrap()
    }

    #[test]
    fn test_transparent_overlay_keeps_base() {
        let base = checker(4, 3);
        let overlay = Raster::filled(4, 3, PixelFormat::Rgba, &[255, 0, 255, 0]).unwrap();
        assert_eq!(composite_over(&base, &overlay).unwrap(), base);
    }

    #[test]
    fn test_opaque_overlay_replaces_base() {
        let base = checker(4, 3);
        let mut overlay = checker(4, 3);
        overlay.map_pixels(|px| px[3] = 255);
        let out = composite_over(&base, &overlay).unwrap();
        assert_eq!(out, overlay);
    }

    #[test]
    fn test_rgb_base_is_promoted() {
        let base = Raster::filled(2, 2, PixelFormat::Rgb, &[0, 0, 0]).unwrap();
        let overlay = Raster::filled(2, 2, PixelFormat::Rgba, &[255, 255, 255, 128]).unwrap();
        let out = composite_over(&base, &overlay).unwrap();
        assert_eq!(out.format(), PixelFormat::Rgba);
        assert_eq!(out.pixel(0, 0).unwrap(), &[128, 128, 128, 255]);
    }

    #[test]
    fn test_overlay_must_have_alpha() {
        let base = checker(2, 2);
        let overlay = Raster::blank(2, 2, PixelFormat::Rgb).unwrap();
        let err = composite_over(&base, &overlay).unwrap_err();
        assert_eq!(err, OpsError::Core(Error::channel_mismatch(4, 3)));
    }

    #[test]
    fn test_size_mismatch() {
        let base = checker(2, 2);
        let overlay = checker(2, 3);
        assert!(matches!(
            composite_over(&base, &overlay),
            Err(OpsError::Core(Error::DimensionMismatch { .. }))
        ));
    }
}
