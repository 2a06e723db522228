//! CLI command implementations

pub mod info;
pub mod preview;
pub mod render;

use crate::config::ParamsFile;
use crate::AdjustArgs;
use anyhow::{Context, Result};
use glaze_core::Raster;
use glaze_io::{Format, WriteOptions};
use glaze_ops::Params;
use std::path::Path;
use tracing::debug;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Raster> {
    glaze_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path, flattening alpha for formats that cannot store it.
pub fn save_image(path: &Path, image: &Raster, jpeg_quality: u8) -> Result<()> {
    let format = Format::from_extension(path)
        .with_context(|| format!("Unsupported output format: {}", path.display()))?;

    let flat;
    let image = if image.has_alpha() && !format.supports_alpha() {
        debug!(%format, "flattening alpha");
        flat = image.flatten();
        &flat
    } else {
        image
    };

    glaze_io::write_with_options(path, image, &WriteOptions { jpeg_quality })
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Parses `R,G,B` with components in 0-255.
pub fn parse_rgb(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected R,G,B, got '{s}'"));
    }
    let mut rgb = [0u8; 3];
    for (dst, part) in rgb.iter_mut().zip(&parts) {
        *dst = part
            .parse()
            .map_err(|_| format!("'{part}' is not a value in 0-255"))?;
    }
    Ok(rgb)
}

impl AdjustArgs {
    /// Flags as a parameter set; unset flags stay `None`.
    fn to_file(&self) -> ParamsFile {
        ParamsFile {
            luminance: self.luminance,
            invert: self.invert.then_some(true),
            highlight: self.highlight,
            gradient: self.gradient.clone(),
            blend: self.blend.map(|m| m.name().to_string()),
            texture: self.texture.clone(),
        }
    }

    /// The `--params` file, if any, with the flags applied on top.
    pub fn resolve(&self) -> Result<ParamsFile> {
        let base = match &self.params {
            Some(path) => ParamsFile::from_file(path)?,
            None => ParamsFile::default(),
        };
        Ok(base.merge(self.to_file()))
    }

    /// Pipeline parameters with all referenced images loaded.
    pub fn build(&self) -> Result<Params> {
        self.resolve()?.into_params()
    }
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
