//! Size-based rotation and count-based retention
//!
//! Both checks run before every append and re-derive their state from the
//! directory listing, so nothing is cached between writes.

use logkeep_core::{constants, Category, LogkeepConfig, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::paths::LogPaths;

/// Log rotation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Maximum active file size in bytes
    pub max_size_bytes: u64,
    /// Maximum number of files (active + rotated) kept per category
    pub max_files: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: constants::DEFAULT_LOG_MAX_SIZE,
            max_files: constants::DEFAULT_LOG_MAX_FILES as usize,
        }
    }
}

impl RotationConfig {
    pub fn new(max_size_bytes: u64, max_files: usize) -> Self {
        Self {
            max_size_bytes,
            max_files,
        }
    }
}

impl From<&LogkeepConfig> for RotationConfig {
    fn from(config: &LogkeepConfig) -> Self {
        Self::new(config.max_file_size, config.retained_files())
    }
}

/// What `before_write` did to a category's files
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RotationOutcome {
    /// Files removed by retention, oldest first
    pub deleted: Vec<PathBuf>,
    /// New name of the former active file, if it was rotated
    pub rotated_to: Option<PathBuf>,
}

/// Decides, before each append, what must be deleted or renamed aside
#[derive(Debug, Clone, Default)]
pub struct RotationPolicy {
    config: RotationConfig,
}

impl RotationPolicy {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Run retention, then size rollover, for a write of `incoming_bytes`.
    ///
    /// Retention sees the file set as it was before this call's rollover, so a
    /// rotation can leave the category one file over the limit until the next
    /// write.
    pub fn before_write(
        &self,
        paths: &LogPaths,
        category: &Category,
        incoming_bytes: u64,
    ) -> Result<RotationOutcome> {
        let deleted = self.enforce_retention(paths, category)?;
        let rotated_to = self.roll_over(paths, category, incoming_bytes)?;
        Ok(RotationOutcome {
            deleted,
            rotated_to,
        })
    }

    /// Delete every file ranked past `max_files` in descending name order.
    /// Individual deletion failures are logged and skipped.
    pub fn enforce_retention(&self, paths: &LogPaths, category: &Category) -> Result<Vec<PathBuf>> {
        // ascending by name == oldest first
        let files = paths.category_entries(category)?;
        if files.len() <= self.config.max_files {
            return Ok(vec![]);
        }

        let excess = files.len() - self.config.max_files;
        let mut deleted = Vec::with_capacity(excess);
        for path in files.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Retention removed {}", path.display());
                    deleted.push(path);
                }
                Err(e) => warn!("Failed to remove old log file {}: {}", path.display(), e),
            }
        }
        Ok(deleted)
    }

    /// Rename the active file aside if appending `incoming_bytes` would push it
    /// past the size limit. An empty or missing active file is never rotated.
    pub fn roll_over(
        &self,
        paths: &LogPaths,
        category: &Category,
        incoming_bytes: u64,
    ) -> Result<Option<PathBuf>> {
        let active = paths.active_path(category);
        let size = match fs::metadata(&active) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if size == 0 || size.saturating_add(incoming_bytes) <= self.config.max_size_bytes {
            return Ok(None);
        }

        let mut millis = paths.clock().now().timestamp_millis();
        let mut target = paths.rotated_path(category, millis);
        while target.exists() {
            millis += 1;
            target = paths.rotated_path(category, millis);
        }

        debug!(
            "Rotating {} ({} bytes) to {}",
            active.display(),
            size,
            target.display()
        );
        fs::rename(&active, &target)?;
        Ok(Some(target))
    }
}
