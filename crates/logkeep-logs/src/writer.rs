//! Category logger: rotation check, append, console mirror

use logkeep_core::{Category, Level, LogRecord, LogkeepConfig, Metadata, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::console::{ConsoleSink, SilentConsole, StdoutConsole};
use crate::format::format_record;
use crate::paths::LogPaths;
use crate::reader::LogReader;
use crate::rotation::{RotationConfig, RotationPolicy};

/// File-backed logger writing one file family per category.
///
/// Writes to the same category are serialized inside this process; separate
/// processes sharing a log root only get the filesystem's append and rename
/// guarantees.
pub struct Logger {
    paths: LogPaths,
    policy: RotationPolicy,
    console: Arc<dyn ConsoleSink>,
    locks: Mutex<HashMap<Category, Arc<Mutex<()>>>>,
}

impl Logger {
    /// Create a logger rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>, config: RotationConfig) -> Result<Self> {
        Self::builder(root).rotation(config).build()
    }

    pub fn builder(root: impl Into<PathBuf>) -> LoggerBuilder {
        LoggerBuilder::new(root)
    }

    /// Build from an effective configuration, resolving a relative log dir
    /// against `base`
    pub fn from_config(config: &LogkeepConfig, base: &Path) -> Result<Self> {
        let builder = Self::builder(config.resolve_log_dir(base)).rotation(config.into());
        let builder = if config.console {
            builder
        } else {
            builder.console(Arc::new(SilentConsole))
        };
        builder.build()
    }

    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    pub fn paths(&self) -> &LogPaths {
        &self.paths
    }

    pub fn rotation(&self) -> &RotationConfig {
        self.policy.config()
    }

    /// Reader over the same log root and clock
    pub fn reader(&self) -> LogReader {
        LogReader::new(self.paths.clone())
    }

    /// Write one record to `category`.
    ///
    /// Metadata is serialized before any file is touched. Append and rename
    /// failures propagate; retention deletion failures do not.
    pub fn log(&self, level: Level, message: &str, metadata: &Metadata, category: &Category) -> Result<()> {
        let record = LogRecord::new(self.paths.clock().now(), level, message, metadata.clone());
        let line = format_record(&record)?;

        let lock = self.category_lock(category);
        let _guard = lock.lock();

        let outcome = self
            .policy
            .before_write(&self.paths, category, line.len() as u64)?;
        if let Some(rotated) = &outcome.rotated_to {
            debug!("Category {} rotated to {}", category, rotated.display());
        }

        let path = self.paths.active_path(category);
        append_line(&path, &line)?;

        self.console.emit(&record.level, line.trim());
        Ok(())
    }

    /// Log at ERROR to the `error` category
    pub fn error(&self, message: &str, metadata: &Metadata) -> Result<()> {
        self.log(Level::Error, message, metadata, &Category::ERROR)
    }

    /// Log at WARN to the `warning` category
    pub fn warn(&self, message: &str, metadata: &Metadata) -> Result<()> {
        self.log(Level::Warn, message, metadata, &Category::WARNING)
    }

    /// Log at INFO to the `info` category
    pub fn info(&self, message: &str, metadata: &Metadata) -> Result<()> {
        self.log(Level::Info, message, metadata, &Category::INFO)
    }

    /// Log at SUCCESS to the `success` category
    pub fn success(&self, message: &str, metadata: &Metadata) -> Result<()> {
        self.log(Level::success(), message, metadata, &Category::SUCCESS)
    }

    /// Log at DEBUG to the `debug` category
    pub fn debug(&self, message: &str, metadata: &Metadata) -> Result<()> {
        self.log(Level::Debug, message, metadata, &Category::DEBUG)
    }

    fn category_lock(&self, category: &Category) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(category.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("paths", &self.paths)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Builder for [`Logger`]
pub struct LoggerBuilder {
    root: PathBuf,
    rotation: RotationConfig,
    clock: Arc<dyn Clock>,
    console: Arc<dyn ConsoleSink>,
}

impl LoggerBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rotation: RotationConfig::default(),
            clock: Arc::new(SystemClock),
            console: Arc::new(StdoutConsole),
        }
    }

    pub fn rotation(mut self, config: RotationConfig) -> Self {
        self.rotation = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn console(mut self, console: Arc<dyn ConsoleSink>) -> Self {
        self.console = console;
        self
    }

    pub fn build(self) -> Result<Logger> {
        let paths = LogPaths::new(self.root, self.clock);
        paths.ensure_root()?;

        Ok(Logger {
            paths,
            policy: RotationPolicy::new(self.rotation),
            console: self.console,
            locks: Mutex::new(HashMap::new()),
        })
    }
}

/// Append without truncating, creating the file (and a removed root) if needed
fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::console::mock::MemoryConsole;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    struct Harness {
        dir: TempDir,
        clock: Arc<ManualClock>,
        console: Arc<MemoryConsole>,
        logger: Logger,
    }

    fn harness(config: RotationConfig) -> Harness {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let console = Arc::new(MemoryConsole::default());
        let logger = Logger::builder(dir.path().join("logs"))
            .rotation(config)
            .clock(clock.clone())
            .console(console.clone())
            .build()
            .unwrap();
        Harness {
            dir,
            clock,
            console,
            logger,
        }
    }

    fn file_names(root: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_builder_creates_root() {
        let h = harness(RotationConfig::default());
        assert!(h.dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_writes_in_order_to_single_active_file() {
        let h = harness(RotationConfig::default());
        for msg in ["one", "two", "three"] {
            h.logger
                .log(Level::Info, msg, &Metadata::new(), &Category::GENERAL)
                .unwrap();
        }

        let root = h.logger.root();
        assert_eq!(file_names(root), vec!["general-2024-01-01.log"]);
        let content = fs::read_to_string(root.join("general-2024-01-01.log")).unwrap();
        assert_eq!(
            content,
            "[2024-01-01T12:00:00.000Z] [INFO] one\n\
             [2024-01-01T12:00:00.000Z] [INFO] two\n\
             [2024-01-01T12:00:00.000Z] [INFO] three\n"
        );
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let h = harness(RotationConfig::default());
        let active = h.logger.paths().active_path(&Category::GENERAL);
        fs::write(&active, "existing\n").unwrap();

        h.logger
            .log(Level::Info, "new", &Metadata::new(), &Category::GENERAL)
            .unwrap();

        let content = fs::read_to_string(active).unwrap();
        assert!(content.starts_with("existing\n"));
        assert!(content.ends_with("[INFO] new\n"));
    }

    #[test]
    fn test_console_mirror_gets_trimmed_line() {
        let h = harness(RotationConfig::default());
        h.logger
            .error("boom", &Metadata::new().with("code", 2))
            .unwrap();

        let lines = h.console.lines.lock();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Error);
        assert_eq!(
            lines[0].1,
            "[2024-01-01T12:00:00.000Z] [ERROR] boom {\"code\":2}"
        );
    }

    #[test]
    fn test_convenience_wrappers_route_categories() {
        let h = harness(RotationConfig::default());
        let meta = Metadata::new();
        h.logger.error("e", &meta).unwrap();
        h.logger.warn("w", &meta).unwrap();
        h.logger.info("i", &meta).unwrap();
        h.logger.success("s", &meta).unwrap();
        h.logger.debug("d", &meta).unwrap();

        assert_eq!(
            file_names(h.logger.root()),
            vec![
                "debug-2024-01-01.log",
                "error-2024-01-01.log",
                "info-2024-01-01.log",
                "success-2024-01-01.log",
                "warning-2024-01-01.log",
            ]
        );
        let success =
            fs::read_to_string(h.logger.root().join("success-2024-01-01.log")).unwrap();
        assert!(success.contains("[SUCCESS] s"));
        let warning =
            fs::read_to_string(h.logger.root().join("warning-2024-01-01.log")).unwrap();
        assert!(warning.contains("[WARN] w"));
    }

    #[test]
    fn test_overflowing_write_lands_in_fresh_file() {
        // each line is 40 bytes: "[2024-01-01T12:00:00.000Z] [INFO] msg-N\n"
        let h = harness(RotationConfig::new(100, 10));
        for i in 0..3 {
            h.logger
                .log(Level::Info, &format!("msg-{}", i), &Metadata::new(), &Category::GENERAL)
                .unwrap();
        }

        let root = h.logger.root();
        assert_eq!(
            file_names(root),
            vec!["general-1704110400000.log", "general-2024-01-01.log"]
        );
        let rotated = fs::read_to_string(root.join("general-1704110400000.log")).unwrap();
        assert_eq!(rotated.lines().count(), 2);
        assert!(rotated.contains("msg-0") && rotated.contains("msg-1"));
        let active = fs::read_to_string(root.join("general-2024-01-01.log")).unwrap();
        assert_eq!(active, "[2024-01-01T12:00:00.000Z] [INFO] msg-2\n");
    }

    #[test]
    fn test_active_file_never_exceeds_limit() {
        let h = harness(RotationConfig::new(200, 100));
        for i in 0..50 {
            h.clock.advance(chrono::Duration::milliseconds(1));
            h.logger
                .log(Level::Debug, &format!("line {}", i), &Metadata::new(), &Category::DEBUG)
                .unwrap();
            let size = fs::metadata(h.logger.paths().active_path(&Category::DEBUG))
                .unwrap()
                .len();
            assert!(size <= 200);
        }
    }

    #[test]
    fn test_retention_trims_to_max_on_next_write() {
        let h = harness(RotationConfig::new(1024, 3));
        let root = h.logger.root().to_path_buf();
        for millis in 1..=5 {
            fs::write(
                h.logger.paths().rotated_path(&Category::GENERAL, 1000000000000 + millis),
                "old\n",
            )
            .unwrap();
        }

        h.logger
            .log(Level::Info, "fresh", &Metadata::new(), &Category::GENERAL)
            .unwrap();

        // three survivors from retention, then the append creates the active file
        assert_eq!(
            file_names(&root),
            vec![
                "general-1000000000003.log",
                "general-1000000000004.log",
                "general-1000000000005.log",
                "general-2024-01-01.log",
            ]
        );

        h.logger
            .log(Level::Info, "again", &Metadata::new(), &Category::GENERAL)
            .unwrap();
        assert_eq!(h.logger.paths().category_files(&Category::GENERAL).unwrap().len(), 3);
    }

    #[test]
    fn test_failed_retention_delete_still_appends() {
        let h = harness(RotationConfig::new(1024, 1));
        let stuck = h.logger.paths().rotated_path(&Category::GENERAL, 1000000000000);
        fs::create_dir(&stuck).unwrap();
        fs::write(stuck.join("keep"), "x").unwrap();
        let active = h.logger.paths().active_path(&Category::GENERAL);
        fs::write(&active, "old\n").unwrap();

        // two entries against a limit of one: the directory is picked and cannot be removed
        h.logger
            .log(Level::Info, "still here", &Metadata::new(), &Category::GENERAL)
            .unwrap();

        assert!(stuck.is_dir());
        let content = fs::read_to_string(&active).unwrap();
        assert!(content.ends_with("[INFO] still here\n"));
        assert_eq!(h.console.lines.lock().len(), 1);
    }

    #[test]
    fn test_date_rollover_starts_new_active_file() {
        let h = harness(RotationConfig::default());
        h.logger.info("day one", &Metadata::new()).unwrap();
        h.clock.advance(chrono::Duration::days(1));
        h.logger.info("day two", &Metadata::new()).unwrap();

        assert_eq!(
            file_names(h.logger.root()),
            vec!["info-2024-01-01.log", "info-2024-01-02.log"]
        );
    }

    #[test]
    fn test_categories_are_independent() {
        let h = harness(RotationConfig::new(50, 10));
        h.logger.error("first error line here", &Metadata::new()).unwrap();
        h.logger.error("second error line here", &Metadata::new()).unwrap();
        h.logger.info("only info", &Metadata::new()).unwrap();

        let info = h.logger.paths().category_files(&Category::INFO).unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(h.logger.paths().category_files(&Category::ERROR).unwrap().len(), 2);
    }

    #[test]
    fn test_recreates_removed_root() {
        let h = harness(RotationConfig::default());
        fs::remove_dir_all(h.logger.root()).unwrap();

        h.logger.info("back", &Metadata::new()).unwrap();
        assert!(h.logger.paths().active_path(&Category::INFO).exists());
    }

    #[test]
    fn test_append_failure_propagates() {
        let h = harness(RotationConfig::default());
        // a directory squatting on the active name makes the open fail
        fs::create_dir(h.logger.paths().active_path(&Category::INFO)).unwrap();

        let result = h.logger.info("lost?", &Metadata::new());
        assert!(matches!(result, Err(logkeep_core::Error::IoError(_))));
        assert!(h.console.lines.lock().is_empty());
    }

    #[test]
    fn test_concurrent_writers_same_category() {
        let h = harness(RotationConfig::new(2048, 1000));
        let logger = Arc::new(h.logger);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                let clock = Arc::clone(&h.clock);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        clock.advance(chrono::Duration::milliseconds(1));
                        logger
                            .log(
                                Level::Info,
                                &format!("t{}-{}", t, i),
                                &Metadata::new(),
                                &Category::GENERAL,
                            )
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut total = 0;
        for path in logger.paths().category_files(&Category::GENERAL).unwrap() {
            let content = fs::read_to_string(&path).unwrap();
            assert!(content.len() <= 2048);
            total += content.lines().count();
        }
        assert_eq!(total, 100);
    }

    #[test]
    fn test_from_config_without_console() {
        let dir = TempDir::new().unwrap();
        let config = LogkeepConfig {
            log_dir: PathBuf::from("out"),
            max_file_size: 64,
            max_files: 2,
            console: false,
            ..LogkeepConfig::default()
        };

        let logger = Logger::from_config(&config, dir.path()).unwrap();
        assert_eq!(logger.root(), dir.path().join("out"));
        assert_eq!(logger.rotation(), &RotationConfig::new(64, 2));
    }
}
