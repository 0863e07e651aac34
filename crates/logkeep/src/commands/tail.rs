//! Tail command - recent lines of a category, optionally followed

use anyhow::Result;
use logkeep_core::{Level, LogkeepConfig};
use logkeep_logs::parse_line;
use regex::Regex;

use super::{open_reader, parse_category};
use crate::cli::TailArgs;
use crate::output::{print_log_line, print_logs};

/// Line filters from `--grep` and `--level`
struct LineFilter {
    grep: Option<Regex>,
    level: Option<Level>,
}

impl LineFilter {
    fn new(args: &TailArgs) -> Result<Self> {
        let grep = match &args.grep {
            Some(pattern) => Some(
                Regex::new(pattern).map_err(|e| anyhow::anyhow!("Invalid regex pattern: {}", e))?,
            ),
            None => None,
        };
        Ok(Self {
            grep,
            level: args.level.clone().map(Level::from),
        })
    }

    fn is_empty(&self) -> bool {
        self.grep.is_none() && self.level.is_none()
    }

    fn matches(&self, line: &str) -> bool {
        if let Some(regex) = &self.grep {
            if !regex.is_match(line) {
                return false;
            }
        }
        if let Some(level) = &self.level {
            return parse_line(line).is_some_and(|record| &record.level == level);
        }
        true
    }
}

pub async fn execute(config: &LogkeepConfig, args: TailArgs) -> Result<()> {
    let category = parse_category(&args.category)?;
    let filter = LineFilter::new(&args)?;
    let reader = open_reader(config);

    let lines = if filter.is_empty() {
        reader.recent_lines(&category, args.lines)?
    } else {
        // filter the whole active file, then keep the window
        let mut matched: Vec<String> = reader
            .recent_lines(&category, usize::MAX)?
            .into_iter()
            .filter(|line| filter.matches(line))
            .collect();
        let skip = matched.len().saturating_sub(args.lines);
        matched.drain(..skip);
        matched
    };

    print_logs(&lines);

    if args.follow {
        let mut rx = reader.follow(&category)?;
        while let Some(line) = rx.recv().await {
            if filter.matches(&line) {
                print_log_line(&line);
            }
        }
    }

    Ok(())
}
