//! Stats command - per-category totals across active and rotated files

use anyhow::Result;
use logkeep_core::LogkeepConfig;

use super::open_reader;
use crate::output::print_stats_table;

pub fn execute(config: &LogkeepConfig) -> Result<()> {
    let stats = open_reader(config).aggregate_stats()?;
    print_stats_table(&stats);
    Ok(())
}
