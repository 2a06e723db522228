//! Per-pixel helpers shared by the color operations.
//!
//! # Luma
//!
//! Gray values use the ITU-R BT.601 weights in fixed point,
//! `L = (299*R + 587*G + 114*B + 500) / 1000`, the same conversion common
//! 8-bit imaging libraries apply when turning RGB into a single channel. Integer
//! arithmetic keeps neutral grays exact: `(128, 128, 128)` maps to `128`.

/// BT.601 luma weights, scaled by 1000.
pub const REC601_LUMA: [u32; 3] = [299, 587, 114];

/// Integer BT.601 luma of an RGB triple.
///
/// # Example
/// ```
/// use glaze_core::pixel::luma_rec601;
/// assert_eq!(luma_rec601(128, 128, 128), 128);
/// assert_eq!(luma_rec601(255, 255, 255), 255);
/// assert_eq!(luma_rec601(255, 0, 0), 76);
/// ```
#[inline]
pub fn luma_rec601(r: u8, g: u8, b: u8) -> u8 {
    let sum = r as u32 * REC601_LUMA[0] + g as u32 * REC601_LUMA[1] + b as u32 * REC601_LUMA[2];
    ((sum + 500) / 1000) as u8
}

/// Luma of a pixel in any supported layout. Alpha is ignored.
#[inline]
pub fn luma_of(px: &[u8]) -> u8 {
    match px.len() {
        1 | 2 => px[0],
        _ => luma_rec601(px[0], px[1], px[2]),
    }
}

/// Maps a `[0, 1]` float back to an 8-bit sample, rounding then clamping.
#[inline]
pub fn quantize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Normalizes an 8-bit sample to `[0, 1]`.
#[inline]
pub fn normalize(v: u8) -> f32 {
    v as f32 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_neutral_is_exact() {
        for v in 0..=255u8 {
            assert_eq!(luma_rec601(v, v, v), v);
        }
    }

    #[test]
    fn test_luma_of_ignores_alpha() {
        assert_eq!(luma_of(&[200, 200, 200, 0]), 200);
        assert_eq!(luma_of(&[42]), 42);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(-0.5), 0);
        assert_eq!(quantize(2.0), 255);
        assert_eq!(quantize(normalize(77)), 77);
    }
}
