//! Interactive console mirror with level-based colouring

use colored::{ColoredString, Colorize};
use logkeep_core::{ColorMode, Level};
use std::io::{self, Write};
use tracing::warn;

/// Receives every successfully written line
pub trait ConsoleSink: Send + Sync {
    fn emit(&self, level: &Level, line: &str);
}

/// Prints coloured lines to stdout.
///
/// The record is already on disk when this runs, so a closed or full stdout
/// is logged and otherwise ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl ConsoleSink for StdoutConsole {
    fn emit(&self, level: &Level, line: &str) {
        let stdout = io::stdout();
        if let Err(e) = write_colored(&mut stdout.lock(), level, line) {
            warn!("Failed to mirror log line to stdout: {}", e);
        }
    }
}

fn write_colored<W: Write>(out: &mut W, level: &Level, line: &str) -> io::Result<()> {
    writeln!(out, "{}", colorize(level, line))?;
    out.flush()
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentConsole;

impl ConsoleSink for SilentConsole {
    fn emit(&self, _level: &Level, _line: &str) {}
}

/// Wrap `line` in the colour for `level`. Unknown levels share INFO's cyan.
pub fn colorize(level: &Level, line: &str) -> ColoredString {
    match level {
        Level::Error => line.red(),
        Level::Warn => line.yellow(),
        Level::Debug => line.bright_black(),
        Level::Info | Level::Custom(_) => line.cyan(),
    }
}

/// Apply a configured colour mode process-wide
pub fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => colored::control::unset_override(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    struct FullWriter;

    impl Write for FullWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "No space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_colored_reports_failure_instead_of_panicking() {
        let result = write_colored(&mut FullWriter, &Level::Info, "hello");
        assert!(result.is_err());
    }

    #[test]
    fn test_write_colored_appends_newline() {
        let mut out = Vec::new();
        write_colored(&mut out, &Level::Warn, "careful").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("careful"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_colorize_codes() {
        colored::control::set_override(true);

        assert_eq!(colorize(&Level::Error, "x").to_string(), "\x1b[31mx\x1b[0m");
        assert_eq!(colorize(&Level::Warn, "x").to_string(), "\x1b[33mx\x1b[0m");
        assert_eq!(colorize(&Level::Info, "x").to_string(), "\x1b[36mx\x1b[0m");
        assert_eq!(colorize(&Level::Debug, "x").to_string(), "\x1b[90mx\x1b[0m");
    }

    #[test]
    fn test_unknown_level_uses_info_colour() {
        colored::control::set_override(true);

        let custom = colorize(&Level::success(), "ok").to_string();
        let info = colorize(&Level::Info, "ok").to_string();
        assert_eq!(custom, info);
    }
}
