//! Command implementations

pub mod config;
pub mod files;
pub mod log;
pub mod stats;
pub mod tail;

use anyhow::{Context, Result};
use logkeep_core::{Category, LogkeepConfig, Metadata};
use logkeep_logs::{LogPaths, LogReader, Logger, SystemClock};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::cli::{GlobalArgs, MetaArgs};

/// Effective configuration: config file (explicit or discovered), then flags
pub fn load_config(args: &GlobalArgs) -> Result<LogkeepConfig> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    load_config_in(args, &cwd)
}

fn load_config_in(args: &GlobalArgs, cwd: &Path) -> Result<LogkeepConfig> {
    let mut config = match &args.config {
        Some(path) => LogkeepConfig::load(&cwd.join(path))?,
        None => {
            let (config, found) = LogkeepConfig::discover(cwd)?;
            if let Some(found) = found {
                debug!("Using config file {}", found.display());
            }
            config
        }
    };

    if let Some(dir) = &args.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(size) = args.max_size {
        config.max_file_size = size;
    }
    if let Some(files) = args.max_files {
        config.max_files = files;
    }
    if args.quiet {
        config.console = false;
    }
    if let Some(color) = args.color {
        config.color = color;
    }

    config.log_dir = config.resolve_log_dir(cwd);
    Ok(config)
}

/// Writer over the configured log root, created if missing
pub fn open_logger(config: &LogkeepConfig) -> Result<Logger> {
    // log_dir is absolute after load_config, so the base is never used
    Logger::from_config(config, &config.log_dir)
        .with_context(|| format!("Failed to open log directory {}", config.log_dir.display()))
}

/// Read-only view of the configured log root; does not create it
pub fn open_reader(config: &LogkeepConfig) -> LogReader {
    LogReader::new(LogPaths::new(config.log_dir.clone(), Arc::new(SystemClock)))
}

pub fn parse_category(name: &str) -> Result<Category> {
    Ok(Category::new(name)?)
}

/// Merge `--meta-json` and `--meta` entries; `--meta` wins on key clashes
pub fn build_metadata(args: &MetaArgs) -> Result<Metadata> {
    let mut metadata = match &args.meta_json {
        Some(json) => {
            let value: Value =
                serde_json::from_str(json).context("--meta-json is not valid JSON")?;
            Metadata::from_value(value)?
        }
        None => Metadata::new(),
    };

    for (key, raw) in &args.meta {
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()));
        metadata.insert(key.clone(), value);
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logkeep_core::ColorMode;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("logkeep.toml"),
            "log_dir = \"from-file\"\nmax_files = 4\nmax_file_size = 100\n",
        )
        .unwrap();

        let args = GlobalArgs {
            max_files: Some(2),
            quiet: true,
            color: Some(ColorMode::Never),
            ..GlobalArgs::default()
        };
        let config = load_config_in(&args, dir.path()).unwrap();

        assert_eq!(config.log_dir, dir.path().join("from-file"));
        assert_eq!(config.max_files, 2);
        assert_eq!(config.max_file_size, 100);
        assert!(!config.console);
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let args = GlobalArgs {
            config: Some(PathBuf::from("missing.toml")),
            ..GlobalArgs::default()
        };
        assert!(load_config_in(&args, dir.path()).is_err());
    }

    #[test]
    fn test_build_metadata_merges() {
        let args = MetaArgs {
            meta: vec![
                ("attempt".to_string(), "3".to_string()),
                ("step".to_string(), "lint".to_string()),
            ],
            meta_json: Some(r#"{"step": "build", "ok": true}"#.to_string()),
        };
        let metadata = build_metadata(&args).unwrap();

        assert_eq!(metadata.as_map()["attempt"], json!(3));
        assert_eq!(metadata.as_map()["step"], json!("lint"));
        assert_eq!(metadata.as_map()["ok"], json!(true));
    }

    #[test]
    fn test_build_metadata_rejects_non_object_json() {
        let args = MetaArgs {
            meta: vec![],
            meta_json: Some("[1, 2]".to_string()),
        };
        assert!(build_metadata(&args).is_err());
    }

    #[test]
    fn test_parse_category_rejects_paths() {
        assert!(parse_category("general").is_ok());
        assert!(parse_category("../general").is_err());
    }
}
