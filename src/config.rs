//! Layered configuration
//!
//! Settings come from three layers, weakest first: built-in defaults,
//! a TOML config file (`./framenorm.toml`, then the user config
//! directory), and explicit CLI overrides. The CLI layer only carries
//! values the user actually set, so a config file is not clobbered by
//! clap defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::border::DEFAULT_FRAME_WIDTH;
use crate::recode::DEFAULT_PHOTO_COLOR_THRESHOLD;

/// Local config file name, looked up in the working directory
const LOCAL_CONFIG_NAME: &str = "framenorm.toml";

/// Config file path under the user config directory
const USER_CONFIG_PATH: &str = "framenorm/config.toml";

/// Default JPEG quality for photographic re-encoding
const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target border thickness in pixels
    pub frame_width: u32,

    /// Re-encode photographic results as JPEG
    pub photo_recode: bool,

    /// Distinct-color count at or above which an image counts as photographic
    pub photo_color_threshold: u32,

    /// JPEG quality for photographic re-encoding (1-100)
    pub jpeg_quality: u8,

    /// Worker threads for batch processing (None = all cores)
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            photo_recode: false,
            photo_color_threshold: DEFAULT_PHOTO_COLOR_THRESHOLD,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            threads: None,
        }
    }
}

impl Config {
    /// Load from the first config file found: local directory, then
    /// the user config directory. Missing files are not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let local = PathBuf::from(LOCAL_CONFIG_NAME);
        if local.exists() {
            return Self::load_from_path(&local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join(USER_CONFIG_PATH);
            if user.exists() {
                return Self::load_from_path(&user);
            }
        }

        Ok(Self::default())
    }

    /// Load and parse a specific config file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Apply CLI overrides on top of this config. Only values the user
    /// explicitly set are present in `overrides`.
    pub fn merge_with_cli(&self, overrides: &CliOverrides) -> Self {
        Self {
            frame_width: overrides.frame_width.unwrap_or(self.frame_width),
            photo_recode: overrides.photo_recode.unwrap_or(self.photo_recode),
            photo_color_threshold: overrides
                .photo_color_threshold
                .unwrap_or(self.photo_color_threshold),
            jpeg_quality: overrides.jpeg_quality.unwrap_or(self.jpeg_quality),
            threads: overrides.threads.or(self.threads),
        }
    }
}

/// Values explicitly set on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub frame_width: Option<u32>,
    pub photo_recode: Option<bool>,
    pub photo_color_threshold: Option<u32>,
    pub jpeg_quality: Option<u8>,
    pub threads: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}
