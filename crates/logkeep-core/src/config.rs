//! Configuration file parsing for logkeep
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::*;
use crate::error::{Error, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// When the console mirror emits ANSI colours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(Error::config(format!("Invalid color mode: {}", s))),
        }
    }
}

fn default_max_file_size() -> u64 {
    DEFAULT_LOG_MAX_SIZE
}

fn default_max_files() -> i64 {
    DEFAULT_LOG_MAX_FILES
}

fn default_console() -> bool {
    true
}

/// Effective logkeep configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogkeepConfig {
    /// Directory holding every category's files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Active file size limit in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Files kept per category, active included. Zero or negative keeps none.
    #[serde(default = "default_max_files")]
    pub max_files: i64,
    /// Mirror each record to stdout
    #[serde(default = "default_console")]
    pub console: bool,
    #[serde(default)]
    pub color: ColorMode,
}

impl Default for LogkeepConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
            console: default_console(),
            color: ColorMode::default(),
        }
    }
}

impl LogkeepConfig {
    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, format)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Find a config file in `dir`, returning defaults when none exists
    pub fn discover(dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, Some(path)));
            }
        }
        debug!("No config file in {}, using defaults", dir.display());
        Ok((Self::default(), None))
    }

    /// Retention limit with non-positive values collapsed to zero
    pub fn retained_files(&self) -> usize {
        usize::try_from(self.max_files.max(0)).unwrap_or(usize::MAX)
    }

    /// Resolve a relative log dir against `base`
    pub fn resolve_log_dir(&self, base: &Path) -> PathBuf {
        if self.log_dir.is_absolute() {
            self.log_dir.clone()
        } else {
            base.join(&self.log_dir)
        }
    }
}
