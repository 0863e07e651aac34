//! Constants and default values for logkeep

use std::path::PathBuf;

/// Default log root, relative to the working directory
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Extension shared by active and rotated log files
pub const LOG_EXTENSION: &str = ".log";

/// Separator between the category and the date/epoch suffix in file names
pub const NAME_SEPARATOR: char = '-';

/// Default log max size in bytes (10MB)
pub const DEFAULT_LOG_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// Default max log files to keep per category (active + rotated)
pub const DEFAULT_LOG_MAX_FILES: i64 = 10;

/// Date format of the active file suffix
pub const ACTIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "logkeep.toml",
    "logkeep.yaml",
    "logkeep.yml",
    "logkeep.json",
];

/// Get the default log root
pub fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

/// File name of a category's active file for a given date suffix
pub fn active_file_name(category: &str, date: &str) -> String {
    format!("{}{}{}{}", category, NAME_SEPARATOR, date, LOG_EXTENSION)
}

/// File name of a category's rotated file for an epoch-millisecond suffix
pub fn rotated_file_name(category: &str, epoch_millis: i64) -> String {
    format!("{}{}{}{}", category, NAME_SEPARATOR, epoch_millis, LOG_EXTENSION)
}
