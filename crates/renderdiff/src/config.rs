//! Comparison settings loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::pixel::DEFAULT_PIXEL_THRESHOLD;

/// Settings shared by the suite runner, snapshot assertions and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Include the alpha channel in image comparisons.
    pub alpha: bool,
    /// Per-channel tolerance used by the image comparator.
    pub pixel_threshold: u8,
    /// Differing pixels allowed before an image case fails.
    pub max_image_diff: u64,
    /// Differing cells allowed before a grid case fails.
    pub max_grid_diff: u64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            alpha: true,
            pixel_threshold: DEFAULT_PIXEL_THRESHOLD,
            max_image_diff: 0,
            max_grid_diff: 0,
        }
    }
}

impl CompareConfig {
    /// Default config file name.
    pub const CONFIG_FILE: &'static str = "renderdiff.toml";

    /// Environment variable overriding [`CompareConfig::alpha`].
    pub const ENV_ALPHA: &'static str = "RENDERDIFF_ALPHA";

    /// Environment variable overriding both diff allowances.
    pub const ENV_MAX_DIFF: &'static str = "RENDERDIFF_MAX_DIFF";

    /// Parse a config from a TOML string; `origin` is used in errors.
    pub fn from_toml(toml_str: &str, origin: &Path) -> Result<Self> {
        toml::from_str(toml_str).map_err(|source| CompareError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
        let config = Self::from_toml(&contents, path)?;
        log::debug!("loaded comparison config from {}", path.display());
        Ok(config)
    }

    /// Apply `RENDERDIFF_ALPHA` and `RENDERDIFF_MAX_DIFF` when they are set
    /// and parse; unparseable values are ignored with a warning.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(Self::ENV_ALPHA).ok().as_deref(),
            std::env::var(Self::ENV_MAX_DIFF).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, alpha: Option<&str>, max_diff: Option<&str>) -> Self {
        if let Some(raw) = alpha {
            match parse_bool(raw) {
                Some(v) => self.alpha = v,
                None => log::warn!("ignoring {}={raw:?}", Self::ENV_ALPHA),
            }
        }
        if let Some(raw) = max_diff {
            match raw.trim().parse::<u64>() {
                Ok(v) => {
                    self.max_image_diff = v;
                    self.max_grid_diff = v;
                }
                Err(_) => log::warn!("ignoring {}={raw:?}", Self::ENV_MAX_DIFF),
            }
        }
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
