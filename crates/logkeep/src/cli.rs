//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use logkeep_core::ColorMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logkeep")]
#[command(version, about = "Category log files with size rotation and retention")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Overrides applied on top of the config file
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Config file (default: logkeep.{toml,yaml,yml,json} in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log directory
    #[arg(long, env = "LOGKEEP_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Active file size limit (e.g. "10M", "512K", "4096")
    #[arg(long, value_parser = parse_size, global = true)]
    pub max_size: Option<u64>,

    /// Files kept per category; zero or negative keeps none
    #[arg(long, allow_hyphen_values = true, global = true)]
    pub max_files: Option<i64>,

    /// Do not mirror records to the console
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to colour console output: auto, always, never
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a record to any category
    Log(LogArgs),

    /// Write an ERROR record to the "error" category
    Error(MessageArgs),

    /// Write a WARN record to the "warning" category
    Warn(MessageArgs),

    /// Write an INFO record to the "info" category
    Info(MessageArgs),

    /// Write a DEBUG record to the "debug" category
    Debug(MessageArgs),

    /// Write a SUCCESS record to the "success" category
    Success(MessageArgs),

    /// Show the last lines of a category's active file
    Tail(TailArgs),

    /// Per-category file count, size, and line totals
    Stats,

    /// List a category's retained files
    Files {
        /// Category name
        category: String,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Args)]
pub struct MetaArgs {
    /// Metadata entry (KEY=VALUE, repeatable). Values are parsed as JSON when possible.
    #[arg(long = "meta", value_parser = parse_meta)]
    pub meta: Vec<(String, String)>,

    /// Metadata as a JSON object
    #[arg(long = "meta-json")]
    pub meta_json: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    /// Category name
    pub category: String,

    /// Message text
    pub message: String,

    /// Level written into the record (ERROR, WARN, INFO, DEBUG, or any custom tag)
    #[arg(short, long, default_value = "INFO")]
    pub level: String,

    #[command(flatten)]
    pub meta: MetaArgs,
}

#[derive(Args)]
pub struct MessageArgs {
    /// Message text
    pub message: String,

    #[command(flatten)]
    pub meta: MetaArgs,
}

#[derive(Args)]
pub struct TailArgs {
    /// Category name
    pub category: String,

    /// Number of lines to show
    #[arg(short = 'n', long, default_value = "15")]
    pub lines: usize,

    /// Filter lines by regex pattern
    #[arg(long)]
    pub grep: Option<String>,

    /// Only show records at this level
    #[arg(long)]
    pub level: Option<String>,

    /// Keep printing lines as they are appended
    #[arg(short, long)]
    pub follow: bool,
}

fn parse_meta(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or("Expected KEY=VALUE format")?;
    if pos == 0 {
        return Err("Metadata key must not be empty".to_string());
    }
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Parse sizes like "10M", "512K", "1G", or plain bytes
fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty size string".to_string());
    }

    let upper = s.to_uppercase();
    let trimmed = upper.trim_end_matches('B');
    let (digits, multiplier) = match trimmed.chars().last() {
        Some('K') => (&trimmed[..trimmed.len() - 1], 1024),
        Some('M') => (&trimmed[..trimmed.len() - 1], 1024 * 1024),
        Some('G') => (&trimmed[..trimmed.len() - 1], 1024 * 1024 * 1024),
        _ => (trimmed, 1),
    };

    let num: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("Invalid size: {}", s))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("Size too large: {}", s))
}
