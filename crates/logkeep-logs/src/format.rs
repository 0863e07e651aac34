//! Line format shared by the writer and the readers:
//! `[<UTC ISO-8601>] [<LEVEL>] <message>[ <JSON object>]\n`

use chrono::{DateTime, SecondsFormat, Utc};
use logkeep_core::{Level, LogRecord, Metadata, Result};
use serde_json::Value;

/// Millisecond-precision UTC timestamp with a `Z` suffix
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a record as one newline-terminated line.
/// Empty metadata is omitted entirely.
pub fn format_record(record: &LogRecord) -> Result<String> {
    let mut line = format!(
        "[{}] [{}] {}",
        format_timestamp(&record.timestamp),
        record.level,
        record.message
    );
    if !record.metadata.is_empty() {
        line.push(' ');
        line.push_str(&serde_json::to_string(&record.metadata)?);
    }
    line.push('\n');
    Ok(line)
}

/// Recover a record from a formatted line. Returns `None` for lines that do
/// not carry the timestamp and level prefix.
///
/// A message that itself ends in a JSON object cannot be told apart from
/// metadata; the first ` {` whose suffix parses as an object wins.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let rest = line.strip_prefix('[')?;
    let (timestamp, rest) = rest.split_once("] [")?;
    let (level, rest) = rest.split_once("] ")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .ok()?
        .with_timezone(&Utc);
    let (message, metadata) = split_metadata(rest);

    Some(LogRecord::new(
        timestamp,
        Level::from(level.to_string()),
        message,
        metadata,
    ))
}

fn split_metadata(rest: &str) -> (&str, Metadata) {
    if !rest.ends_with('}') {
        return (rest, Metadata::default());
    }
    for (idx, _) in rest.match_indices(" {") {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&rest[idx + 1..]) {
            return (&rest[..idx], Metadata::from(map));
        }
    }
    (rest, Metadata::default())
}
