//! Log commands - write one record

use anyhow::Result;
use logkeep_core::{Level, LogkeepConfig};

use super::{build_metadata, open_logger, parse_category};
use crate::cli::{LogArgs, MessageArgs};

/// Fixed level/category pairs exposed as their own subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Error,
    Warn,
    Info,
    Debug,
    Success,
}

pub fn execute(config: &LogkeepConfig, args: LogArgs) -> Result<()> {
    let category = parse_category(&args.category)?;
    let metadata = build_metadata(&args.meta)?;
    let level = Level::from(args.level);

    let logger = open_logger(config)?;
    logger.log(level, &args.message, &metadata, &category)?;
    Ok(())
}

pub fn execute_shortcut(config: &LogkeepConfig, shortcut: Shortcut, args: MessageArgs) -> Result<()> {
    let metadata = build_metadata(&args.meta)?;
    let logger = open_logger(config)?;

    match shortcut {
        Shortcut::Error => logger.error(&args.message, &metadata)?,
        Shortcut::Warn => logger.warn(&args.message, &metadata)?,
        Shortcut::Info => logger.info(&args.message, &metadata)?,
        Shortcut::Debug => logger.debug(&args.message, &metadata)?,
        Shortcut::Success => logger.success(&args.message, &metadata)?,
    }
    Ok(())
}
