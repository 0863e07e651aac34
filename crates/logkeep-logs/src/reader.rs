//! Log reader for recent lines, directory aggregation, and follow

use logkeep_core::{constants, Category, CategoryStats, Error, Result, StatsMap};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::paths::{category_token, file_name, LogPaths};

const FOLLOW_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Whether a file is being appended to, or is history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Named for today's date
    Active,
    /// Named for an earlier date
    Dated,
    /// Renamed aside by size rotation
    Rotated,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Active => "active",
            FileKind::Dated => "dated",
            FileKind::Rotated => "rotated",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One retained file of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub kind: FileKind,
}

/// Read-only access to a log root. Never triggers rotation.
#[derive(Debug, Clone)]
pub struct LogReader {
    paths: LogPaths,
}

impl LogReader {
    pub fn new(paths: LogPaths) -> Self {
        Self { paths }
    }

    /// Last `count` non-blank lines of the category's active file, oldest first.
    /// Rotated history is not consulted; a missing file yields no lines.
    pub fn recent_lines(&self, category: &Category, count: usize) -> Result<Vec<String>> {
        let path = self.paths.active_path(category);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };
        if count == 0 {
            return Ok(vec![]);
        }

        let reader = BufReader::new(file);
        let mut lines: VecDeque<String> = VecDeque::new();

        for chunk in reader.split(b'\n') {
            let mut bytes = chunk?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            let line = String::from_utf8_lossy(&bytes);
            if line.trim().is_empty() {
                continue;
            }
            lines.push_back(line.into_owned());
            if lines.len() > count {
                lines.pop_front();
            }
        }

        Ok(lines.into_iter().collect())
    }

    /// Scan every `.log` file in the root and total them per category token.
    ///
    /// Line counts follow plain newline splitting: an empty file counts as one
    /// line and a trailing newline adds a trailing empty segment.
    pub fn aggregate_stats(&self) -> Result<StatsMap> {
        let mut stats = StatsMap::new();

        for path in self.paths.log_files()? {
            let Some(name) = file_name(&path) else {
                continue;
            };
            let content = match fs::read(&path) {
                Ok(content) => content,
                // removed between listing and read
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            let entry = stats.entry(category_token(name).to_string()).or_default();
            entry.file_count += 1;
            entry.total_bytes += content.len() as u64;
            entry.total_lines += line_segments(&content);
        }

        Ok(stats)
    }

    /// Statistics for a single category, if it has any files
    pub fn category_stats(&self, category: &Category) -> Result<Option<CategoryStats>> {
        Ok(self.aggregate_stats()?.remove(category.as_str()))
    }

    /// Retained files of a category, newest name first
    pub fn files(&self, category: &Category) -> Result<Vec<LogFileInfo>> {
        let active = self.paths.active_path(category);
        let mut infos = Vec::new();

        for path in self.paths.category_files(category)?.into_iter().rev() {
            let size_bytes = match fs::metadata(&path) {
                Ok(meta) => meta.len(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let kind = if path == active {
                FileKind::Active
            } else if is_dated(&path, category) {
                FileKind::Dated
            } else {
                FileKind::Rotated
            };
            infos.push(LogFileInfo {
                path,
                size_bytes,
                kind,
            });
        }

        Ok(infos)
    }

    /// Stream lines appended to the category's active file from now on.
    /// Requires a tokio runtime; dropping the receiver stops the worker.
    pub fn follow(&self, category: &Category) -> Result<mpsc::Receiver<String>> {
        let (watch_tx, watch_rx) = std_mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                let _ = watch_tx.send(res);
            },
            notify::Config::default(),
        )
        .map_err(|e| Error::watch(format!("Failed to create watcher: {}", e)))?;

        self.paths.ensure_root()?;
        watcher
            .watch(self.paths.root(), RecursiveMode::NonRecursive)
            .map_err(|e| Error::watch(format!("Failed to watch log dir: {}", e)))?;

        let (tx, rx) = mpsc::channel(100);
        let paths = self.paths.clone();
        let category = category.clone();

        tokio::task::spawn_blocking(move || {
            // keep the watcher alive for as long as the loop runs
            let _watcher = watcher;
            if let Err(e) = follow_active(&paths, &category, &watch_rx, &tx) {
                debug!("Follow ended: {}", e);
            }
        });

        Ok(rx)
    }
}

/// Number of segments produced by splitting on `\n`
fn line_segments(content: &[u8]) -> u64 {
    content.iter().filter(|b| **b == b'\n').count() as u64 + 1
}

fn is_dated(path: &Path, category: &Category) -> bool {
    file_name(path)
        .and_then(|name| name.strip_prefix(category.as_str()))
        .and_then(|rest| rest.strip_prefix(constants::NAME_SEPARATOR))
        .and_then(|rest| rest.strip_suffix(constants::LOG_EXTENSION))
        .is_some_and(|date| {
            chrono::NaiveDate::parse_from_str(date, constants::ACTIVE_DATE_FORMAT).is_ok()
        })
}

fn file_len(path: &Path) -> Result<Option<u64>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.len())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn follow_active(
    paths: &LogPaths,
    category: &Category,
    watch_rx: &std_mpsc::Receiver<notify::Result<notify::Event>>,
    tx: &mpsc::Sender<String>,
) -> Result<()> {
    let mut path = paths.active_path(category);
    let mut position = file_len(&path)?.unwrap_or(0);
    let mut partial = String::new();

    loop {
        if tx.is_closed() {
            return Ok(());
        }

        match watch_rx.recv_timeout(FOLLOW_POLL_INTERVAL) {
            Ok(Ok(_event)) => {}
            Ok(Err(e)) => {
                debug!("Watch error: {}", e);
                continue;
            }
            // fall through: date rollover produces no event on the old file
            Err(std_mpsc::RecvTimeoutError::Timeout) => {}
            Err(std_mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }

        let current = paths.active_path(category);
        if current != path {
            path = current;
            position = 0;
            partial.clear();
        }

        let Some(len) = file_len(&path)? else {
            // rotated away, the next append recreates it
            position = 0;
            partial.clear();
            continue;
        };
        if len < position {
            position = 0;
            partial.clear();
        }
        if len == position {
            continue;
        }

        let mut file = File::open(&path)?;
        file.seek(SeekFrom::Start(position))?;
        let mut buffer = Vec::new();
        file.take(len - position).read_to_end(&mut buffer)?;
        position += buffer.len() as u64;
        partial.push_str(&String::from_utf8_lossy(&buffer));

        while let Some(idx) = partial.find('\n') {
            let line: String = partial.drain(..=idx).collect();
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            if tx.blocking_send(line.to_string()).is_err() {
                return Ok(());
            }
        }
    }
}
