//! YAML parameter files.
//!
//! ```yaml
//! luminance: 1.25
//! invert: false
//! highlight: [255, 200, 120]
//! gradient: maps/sunset.png   # relative to this file
//! blend: overlay
//! texture: grain.png
//! ```
//!
//! Every key is optional; missing keys keep the pipeline defaults.

use anyhow::{Context, Result};
use glaze_ops::{BlendMode, Params};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Parameter set as written in a file or given on the command line.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamsFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub luminance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<PathBuf>,
}

impl ParamsFile {
    /// Loads a parameter file. Image paths are resolved against its directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read params: {}", path.display()))?;
        let working_dir = path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_yaml_str(&content, &working_dir)
            .with_context(|| format!("Invalid params file: {}", path.display()))
    }

    /// Parses YAML, resolving relative image paths against `working_dir`.
    pub fn from_yaml_str(yaml: &str, working_dir: &Path) -> Result<Self> {
        let mut file: ParamsFile = if yaml.trim().is_empty() {
            ParamsFile::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        file.gradient = file.gradient.map(|p| working_dir.join(p));
        file.texture = file.texture.map(|p| working_dir.join(p));
        Ok(file)
    }

    /// Serializes the set keys as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Keys set in `overrides` replace the ones in `self`.
    pub fn merge(self, overrides: ParamsFile) -> ParamsFile {
        ParamsFile {
            luminance: overrides.luminance.or(self.luminance),
            invert: overrides.invert.or(self.invert),
            highlight: overrides.highlight.or(self.highlight),
            gradient: overrides.gradient.or(self.gradient),
            blend: overrides.blend.or(self.blend),
            texture: overrides.texture.or(self.texture),
        }
    }

    /// Blend mode named in the file, `Normal` when unset.
    pub fn blend_mode(&self) -> BlendMode {
        match self.blend.as_deref() {
            None => BlendMode::default(),
            Some(name) => {
                let mode = BlendMode::from_name(name);
                if mode == BlendMode::Unrecognized {
                    warn!(name, "unknown blend mode, gradient map will pass the image through");
                }
                mode
            }
        }
    }

    /// Builds pipeline parameters, loading the referenced images.
    pub fn into_params(self) -> Result<Params> {
        let defaults = Params::default();
        let blend_mode = self.blend_mode();

        let gradient_map = match &self.gradient {
            Some(path) => Some(crate::commands::load_image(path)?),
            None => None,
        };
        let texture = match &self.texture {
            Some(path) => Some(crate::commands::load_image(path)?),
            None => None,
        };

        let params = Params {
            luminance_factor: self.luminance.unwrap_or(defaults.luminance_factor),
            invert: self.invert.unwrap_or(defaults.invert),
            highlight_color: self.highlight.unwrap_or(defaults.highlight_color),
            gradient_map,
            blend_mode,
            texture,
        };
        params.validate()?;
        Ok(params)
    }
}
