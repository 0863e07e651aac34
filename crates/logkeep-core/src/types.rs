//! Core types for logkeep

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Regex pattern for valid categories: only alphanumeric and underscore.
/// `-` is the file name separator, so it is excluded along with path characters.
static CATEGORY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid category regex"));

/// Validate a category name to prevent path traversal and name collisions
pub fn validate_category(name: &str) -> bool {
    !name.is_empty() && CATEGORY_REGEX.is_match(name)
}

/// A logical log stream. Each category owns its own family of files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const ERROR: Category = Category(Cow::Borrowed("error"));
    pub const WARNING: Category = Category(Cow::Borrowed("warning"));
    pub const INFO: Category = Category(Cow::Borrowed("info"));
    pub const SUCCESS: Category = Category(Cow::Borrowed("success"));
    pub const DEBUG: Category = Category(Cow::Borrowed("debug"));
    pub const GENERAL: Category = Category(Cow::Borrowed("general"));

    /// Create a category, rejecting anything outside `[A-Za-z0-9_]`
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        if !validate_category(&name) {
            return Err(Error::InvalidCategory(name));
        }
        Ok(Category(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::new(s)
    }
}

impl TryFrom<String> for Category {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Category::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0.into_owned()
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a record. Unknown levels are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Custom(String),
}

impl Level {
    /// Level used by the `success` convenience wrapper
    pub fn success() -> Self {
        Level::Custom("SUCCESS".to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Custom(s) => s,
        }
    }
}

impl FromStr for Level {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
        Ok(match s {
            "ERROR" => Level::Error,
            "WARN" => Level::Warn,
            "INFO" => Level::Info,
            "DEBUG" => Level::Debug,
            other => Level::Custom(other.to_string()),
        })
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured key/value data attached to a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metadata from any serializable value that renders as a JSON object
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        Self::from_value(value)
    }

    /// Accept a JSON object; `null` is treated as empty
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Metadata(map)),
            Value::Null => Ok(Metadata::default()),
            other => Err(Error::metadata(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Metadata(map)
    }
}

/// One log record, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl LogRecord {
    pub fn new(timestamp: DateTime<Utc>, level: Level, message: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            metadata,
        }
    }
}

/// Aggregate figures for one category across its active and rotated files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub file_count: u64,
    pub total_bytes: u64,
    pub total_lines: u64,
}

/// Per-category statistics keyed by category token
pub type StatsMap = BTreeMap<String, CategoryStats>;
