//! The fixed-order compositing pipeline.
//!
//! [`apply`] runs five stages on a base raster, always in this order:
//!
//! 1. luminance scale
//! 2. invert (when enabled)
//! 3. highlight overlay keyed on the luminance mask
//! 4. gradient-map blend (when a gradient map is set)
//! 5. texture composite (when a texture is set)
//!
//! Auxiliary rasters are resized to the current image first. The output is
//! RGB when the gradient blend was the last stage to run and RGBA otherwise;
//! callers writing to formats without alpha flatten explicitly.
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{PixelFormat, Raster};
//! use glaze_ops::pipeline::{apply, Params};
//!
//! let base = Raster::filled(8, 8, PixelFormat::Rgb, &[128, 128, 128]).unwrap();
//! let out = apply(&base, &Params::default()).unwrap();
//! assert_eq!(out.format(), PixelFormat::Rgba);
//! assert_eq!(out.pixel(3, 3).unwrap(), &[128, 128, 128, 255]);
//! ```

use glaze_core::Raster;
use tracing::{debug, trace};

use crate::blend::{blend, BlendMode};
use crate::color::{highlight_overlay, invert_preserve_alpha, scale_luminance, HIGHLIGHT_THRESHOLD};
use crate::composite::composite_over;
use crate::resize::resize;
use crate::{OpsError, OpsResult};

/// Everything one pipeline run needs besides the base raster.
///
/// Rasters inside are shared by reference count, so cloning a bundle is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Color channel multiplier; 1.0 leaves the image alone.
    pub luminance_factor: f32,
    /// Invert color channels after scaling.
    pub invert: bool,
    /// Color of the highlight overlay.
    pub highlight_color: [u8; 3],
    /// Image blended in under `blend_mode`; read as RGB.
    pub gradient_map: Option<Raster>,
    /// How the gradient map combines with the image.
    pub blend_mode: BlendMode,
    /// Image composited on top; promoted to RGBA.
    pub texture: Option<Raster>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            luminance_factor: 1.0,
            invert: false,
            highlight_color: [255, 255, 255],
            gradient_map: None,
            blend_mode: BlendMode::Normal,
            texture: None,
        }
    }
}

impl Params {
    /// Sets the luminance factor.
    pub fn with_luminance(mut self, factor: f32) -> Self {
        self.luminance_factor = factor;
        self
    }

    /// Enables or disables inversion.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Sets the highlight color.
    pub fn with_highlight(mut self, color: [u8; 3]) -> Self {
        self.highlight_color = color;
        self
    }

    /// Sets the gradient map and its blend mode.
    pub fn with_gradient(mut self, map: Raster, mode: BlendMode) -> Self {
        self.gradient_map = Some(map);
        self.blend_mode = mode;
        self
    }

    /// Sets the texture.
    pub fn with_texture(mut self, texture: Raster) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Checks values a run cannot use.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] for a negative or non-finite
    /// luminance factor.
    pub fn validate(&self) -> OpsResult<()> {
        if !self.luminance_factor.is_finite() || self.luminance_factor < 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "luminance factor must be finite and >= 0, got {}",
                self.luminance_factor
            )));
        }
        Ok(())
    }
}

/// Resizes `aux` to the size of `current` when they differ.
fn match_size(aux: &Raster, current: &Raster) -> OpsResult<Raster> {
    resize(aux, current.width(), current.height())
}

/// Runs the pipeline on `base`.
///
/// `base` is only read; the result is a new raster.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `params` fails [`Params::validate`].
/// Stage errors are propagated but cannot occur for well-formed rasters,
/// since auxiliary images are always resized to match.
pub fn apply(base: &Raster, params: &Params) -> OpsResult<Raster> {
    params.validate()?;
    debug!(
        width = base.width(),
        height = base.height(),
        format = %base.format(),
        factor = params.luminance_factor,
        invert = params.invert,
        gradient = params.gradient_map.is_some(),
        blend = %params.blend_mode,
        texture = params.texture.is_some(),
        "pipeline run"
    );

    let mut current = scale_luminance(base, params.luminance_factor);
    trace!(factor = params.luminance_factor, "luminance scaled");

    if params.invert {
        current = invert_preserve_alpha(&current);
        trace!("inverted");
    }

    let overlay = highlight_overlay(&current, params.highlight_color, HIGHLIGHT_THRESHOLD);
    current = composite_over(&current, &overlay)?;
    trace!(color = ?params.highlight_color, "highlight composited");

    if let Some(map) = &params.gradient_map {
        let map = match_size(map, &current)?;
        current = blend(&current, &map, params.blend_mode)?;
        trace!(mode = %params.blend_mode, "gradient map blended");
    }

    if let Some(texture) = &params.texture {
        let texture = match_size(texture, &current)?.to_rgba();
        current = composite_over(&current, &texture)?;
        trace!("texture composited");
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::PixelFormat;

    #[test]
    fn test_defaults() {
        let p = Params::default();
        assert_eq!(p.luminance_factor, 1.0);
        assert!(!p.invert);
        assert_eq!(p.highlight_color, [255, 255, 255]);
        assert_eq!(p.blend_mode, BlendMode::Normal);
        assert!(p.gradient_map.is_none() && p.texture.is_none());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_factor() {
        let base = Raster::filled(2, 2, PixelFormat::Rgb, &[1, 2, 3]).unwrap();
        for f in [-0.1, f32::NAN, f32::INFINITY] {
            let p = Params::default().with_luminance(f);
            assert!(matches!(apply(&base, &p), Err(OpsError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_dark_image_passes_unchanged() {
        let base = Raster::filled(3, 3, PixelFormat::Rgba, &[40, 90, 10, 200]).unwrap();
        let out = apply(&base, &Params::default()).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn test_highlight_tints_bright_pixels() {
        let base = Raster::filled(2, 2, PixelFormat::Rgb, &[255, 255, 255]).unwrap();
        let p = Params::default().with_highlight([0, 0, 255]);
        let out = apply(&base, &p).unwrap();
        // mask 254: 255 * (1/255) = 1 left of red and green
        assert_eq!(out.pixel(0, 0).unwrap(), &[1, 1, 255, 255]);
    }

    #[test]
    fn test_invert_runs_before_highlight() {
        let base = Raster::filled(2, 2, PixelFormat::Rgb, &[0, 0, 0]).unwrap();
        let p = Params::default().with_invert(true).with_highlight([0, 0, 0]);
        let out = apply(&base, &p).unwrap();
        // inverted to white, then nearly covered by the black highlight
        assert_eq!(out.pixel(1, 1).unwrap(), &[1, 1, 1, 255]);
    }

    #[test]
    fn test_gradient_output_is_rgb() {
        let base = Raster::filled(4, 4, PixelFormat::Rgba, &[100, 100, 100, 255]).unwrap();
        let map = Raster::filled(2, 2, PixelFormat::Rgb, &[255, 255, 255]).unwrap();
        let out = apply(&base, &Params::default().with_gradient(map, BlendMode::Multiply)).unwrap();
        assert_eq!(out.format(), PixelFormat::Rgb);
        assert_eq!(out.dimensions(), (4, 4));
        assert!(out.pixels().all(|px| px == [100, 100, 100]));
    }

    #[test]
    fn test_texture_after_gradient_is_rgba() {
        let base = Raster::filled(4, 4, PixelFormat::Rgb, &[10, 10, 10]).unwrap();
        let map = Raster::filled(4, 4, PixelFormat::Rgb, &[10, 10, 10]).unwrap();
        let texture = Raster::filled(8, 8, PixelFormat::Rgba, &[0, 0, 0, 0]).unwrap();
        let p = Params::default()
            .with_gradient(map, BlendMode::Normal)
            .with_texture(texture);
        let out = apply(&base, &p).unwrap();
        assert_eq!(out.format(), PixelFormat::Rgba);
        assert!(out.pixels().all(|px| px == [10, 10, 10, 255]));
    }

    #[test]
    fn test_rgb_texture_is_promoted() {
        let base = Raster::filled(2, 2, PixelFormat::Rgb, &[0, 0, 0]).unwrap();
        let texture = Raster::filled(2, 2, PixelFormat::Rgb, &[0, 200, 0]).unwrap();
        let out = apply(&base, &Params::default().with_texture(texture)).unwrap();
        assert!(out.pixels().all(|px| px == [0, 200, 0, 255]));
    }

    #[test]
    fn test_base_is_not_modified() {
        let base = Raster::filled(2, 2, PixelFormat::Rgba, &[250, 250, 250, 255]).unwrap();
        let snapshot = base.clone();
        let _ = apply(&base, &Params::default().with_invert(true).with_luminance(0.3)).unwrap();
        assert_eq!(base, snapshot);
    }
}
