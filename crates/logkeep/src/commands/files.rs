//! Files command - a category's retained files, newest first

use anyhow::Result;
use logkeep_core::LogkeepConfig;

use super::{open_reader, parse_category};
use crate::output::print_files_table;

pub fn execute(config: &LogkeepConfig, category: &str) -> Result<()> {
    let category = parse_category(category)?;
    let files = open_reader(config).files(&category)?;
    print_files_table(&category, &files);
    Ok(())
}
