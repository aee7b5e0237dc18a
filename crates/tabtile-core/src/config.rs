//! Workbench configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gap::MINIMAL_MODE_GAP_SIZE;
use crate::Result;

/// Container padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub top: u16,
    pub right: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingConfig {
    pub minimal: Padding,
    pub normal: Padding,
}

impl PaddingConfig {
    pub fn for_mode(&self, minimal_mode: bool) -> Padding {
        if minimal_mode {
            self.minimal
        } else {
            self.normal
        }
    }
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            minimal: Padding { top: 1, right: 1 },
            normal: Padding { top: 3, right: 3 },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database
    pub database_path: PathBuf,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Tab content container padding
    pub padding: PaddingConfig,
    /// Tile gap in minimal mode when `window:tilegapsize` is unset
    pub minimal_gap_size: f64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("tabtile.db"),
            log_filter: "info".to_string(),
            padding: PaddingConfig::default(),
            minimal_gap_size: MINIMAL_MODE_GAP_SIZE,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("tabtile"))
            .unwrap_or_else(|| PathBuf::from(".tabtile"))
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded config");
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
