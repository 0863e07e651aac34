//! Error types for logkeep

use std::path::PathBuf;

/// logkeep error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid category: {0:?} (expected letters, digits, or '_')")]
    InvalidCategory(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for logkeep
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn metadata<S: Into<String>>(msg: S) -> Self {
        Error::InvalidMetadata(msg.into())
    }

    pub fn watch<S: Into<String>>(msg: S) -> Self {
        Error::WatchError(msg.into())
    }
}
