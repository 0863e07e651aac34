//! Config command - print the effective configuration

use anyhow::Result;
use logkeep_core::LogkeepConfig;

use crate::output::print_config;

pub fn execute(config: &LogkeepConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
