//! Run settings, loadable from TOML.

use std::path::{Path, PathBuf};

use gradcomp_render::RenderSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GradcompError, Result};

/// Everything a run needs besides the assets themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the STL assets and `text.png`.
    pub assets_dir: PathBuf,
    /// Directory the preview and archive are written to.
    pub output_dir: PathBuf,
    /// Dual contouring grid spacing, in model units.
    pub resolution: f64,
    /// File name of the OBJ archive.
    pub archive_name: String,
    /// File name of the preview image.
    pub rendering_name: String,
    /// Preview layout.
    pub render: RenderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("."),
            resolution: 0.0075,
            archive_name: "computer.zip".into(),
            rendering_name: "rendering.png".into(),
            render: RenderSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| GradcompError::ConfigParse {
            path: origin.to_path_buf(),
            source: e,
        })
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GradcompError::ConfigIo {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings = Self::from_toml_str(&text, path)?;
        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(GradcompError::InvalidSettings(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.archive_name.is_empty() || self.rendering_name.is_empty() {
            return Err(GradcompError::InvalidSettings(
                "output file names must not be empty".into(),
            ));
        }
        if self.archive_name == self.rendering_name {
            return Err(GradcompError::InvalidSettings(format!(
                "archive and rendering would both be written to {}",
                self.archive_name
            )));
        }
        self.render.validate()?;
        Ok(())
    }

    /// Where the OBJ archive goes.
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(&self.archive_name)
    }

    /// Where the preview image goes.
    pub fn rendering_path(&self) -> PathBuf {
        self.output_dir.join(&self.rendering_name)
    }
}
