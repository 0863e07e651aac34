//! Terminal and JSON output formatting

use colored::Colorize;
use logkeep_core::{Category, LogkeepConfig, StatsMap};
use logkeep_logs::{parse_line, FileKind, LogFileInfo};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

#[derive(Tabled)]
pub struct StatsRow {
    #[tabled(rename = "category")]
    pub category: String,
    #[tabled(rename = "files")]
    pub files: u64,
    #[tabled(rename = "size")]
    pub size: String,
    #[tabled(rename = "lines")]
    pub lines: u64,
}

#[derive(Tabled)]
pub struct FileRow {
    #[tabled(rename = "file")]
    pub file: String,
    #[tabled(rename = "kind")]
    pub kind: String,
    #[tabled(rename = "size")]
    pub size: String,
}

/// JSON-friendly file listing entry
#[derive(Serialize)]
pub struct FileJson {
    pub path: String,
    pub kind: &'static str,
    pub size_bytes: u64,
}

impl From<&LogFileInfo> for FileJson {
    fn from(info: &LogFileInfo) -> Self {
        FileJson {
            path: info.path.display().to_string(),
            kind: info.kind.as_str(),
            size_bytes: info.size_bytes,
        }
    }
}

impl From<&LogFileInfo> for FileRow {
    fn from(info: &LogFileInfo) -> Self {
        let name = info
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = match info.kind {
            FileKind::Active => "active".green().to_string(),
            FileKind::Dated => "dated".yellow().to_string(),
            FileKind::Rotated => "rotated".bright_black().to_string(),
        };
        FileRow {
            file: name,
            kind,
            size: format_bytes(info.size_bytes),
        }
    }
}

pub fn print_stats_table(stats: &StatsMap) {
    if is_json_mode() {
        print_json(stats);
        return;
    }

    if stats.is_empty() {
        print_info("No log files found");
        return;
    }

    let rows: Vec<StatsRow> = stats
        .iter()
        .map(|(category, s)| StatsRow {
            category: category.clone(),
            files: s.file_count,
            size: format_bytes(s.total_bytes),
            lines: s.total_lines,
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

pub fn print_files_table(category: &Category, files: &[LogFileInfo]) {
    if is_json_mode() {
        let json: Vec<FileJson> = files.iter().map(FileJson::from).collect();
        print_json(&json);
        return;
    }

    if files.is_empty() {
        print_info(&format!("No log files for category {}", category));
        return;
    }

    let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(2)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

pub fn print_config(config: &LogkeepConfig) {
    if is_json_mode() {
        print_json(config);
        return;
    }

    println!("{}", "logkeep configuration".bold());
    println!("{}", "─".repeat(40));
    println!("{:<16}{}", "log dir", config.log_dir.display());
    println!(
        "{:<16}{} ({} bytes)",
        "max file size",
        format_bytes(config.max_file_size),
        config.max_file_size
    );
    println!("{:<16}{}", "max files", config.retained_files());
    println!("{:<16}{}", "console", if config.console { "on" } else { "off" });
    println!("{:<16}{:?}", "color", config.color);
    println!("{}", "─".repeat(40));
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1}G", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1}M", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.0}K", bytes as f64 / 1024.0)
    } else if bytes > 0 {
        format!("{}B", bytes)
    } else {
        "0B".to_string()
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Structured form of a line when it parses as a record, else the raw text
fn line_json(line: &str) -> Value {
    parse_line(line)
        .and_then(|record| serde_json::to_value(record).ok())
        .unwrap_or_else(|| Value::String(line.to_string()))
}

/// Print logs in JSON format if enabled
pub fn print_logs(lines: &[String]) {
    if is_json_mode() {
        let json: Vec<Value> = lines.iter().map(|line| line_json(line)).collect();
        print_json(&json);
        return;
    }

    for line in lines {
        println!("{}", line);
    }
}

/// Print one followed line; JSON mode emits one compact object per line
pub fn print_log_line(line: &str) {
    if is_json_mode() {
        println!("{}", line_json(line));
    } else {
        println!("{}", line);
    }
}
