//! Path resolution for category log files
//!
//! Two file shapes live in the log root:
//! - `{category}-{YYYY-MM-DD}.log`: the active file for the clock's current date
//! - `{category}-{epochMillis}.log`: a rotated file, never appended to again

use logkeep_core::{constants, Category, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::clock::Clock;

/// Resolves file names for categories inside a log root
#[derive(Clone)]
pub struct LogPaths {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl LogPaths {
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    /// Get the log root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Create the log root if it does not exist
    pub fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    /// Active file for `category` on the clock's current date
    pub fn active_path(&self, category: &Category) -> PathBuf {
        let date = self
            .clock
            .today()
            .format(constants::ACTIVE_DATE_FORMAT)
            .to_string();
        self.root
            .join(constants::active_file_name(category.as_str(), &date))
    }

    /// Rotated file name for `category` at the given epoch-millisecond suffix
    pub fn rotated_path(&self, category: &Category, epoch_millis: i64) -> PathBuf {
        self.root
            .join(constants::rotated_file_name(category.as_str(), epoch_millis))
    }

    /// Every `.log` file belonging to `category`, sorted ascending by name
    pub fn category_files(&self, category: &Category) -> Result<Vec<PathBuf>> {
        Ok(with_category(self.scan(true)?, category))
    }

    /// Like [`category_files`](Self::category_files) but also lists entries
    /// that are not regular files. Retention ranks these too, so a stray
    /// directory counts against the limit and surfaces as a failed delete.
    pub fn category_entries(&self, category: &Category) -> Result<Vec<PathBuf>> {
        Ok(with_category(self.scan(false)?, category))
    }

    /// Every `.log` file in the root, sorted ascending by name.
    /// A missing root yields an empty list.
    pub fn log_files(&self) -> Result<Vec<PathBuf>> {
        self.scan(true)
    }

    fn scan(&self, files_only: bool) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if files_only && !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if file_name(&path).is_some_and(|name| name.ends_with(constants::LOG_EXTENSION)) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn with_category(paths: Vec<PathBuf>, category: &Category) -> Vec<PathBuf> {
    let prefix = format!("{}{}", category.as_str(), constants::NAME_SEPARATOR);
    paths
        .into_iter()
        .filter(|path| file_name(path).is_some_and(|name| name.starts_with(&prefix)))
        .collect()
}

impl std::fmt::Debug for LogPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogPaths").field("root", &self.root).finish()
    }
}

/// Category token of a log file name: everything before the first separator
pub fn category_token(name: &str) -> &str {
    name.split(constants::NAME_SEPARATOR).next().unwrap_or(name)
}

pub(crate) fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
