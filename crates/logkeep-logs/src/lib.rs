//! logkeep logs - category log files with size rotation, count retention,
//! and directory-wide aggregation

mod clock;
mod console;
mod format;
mod paths;
mod reader;
mod rotation;
mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use console::{apply_color_mode, colorize, ConsoleSink, SilentConsole, StdoutConsole};
pub use format::{format_record, format_timestamp, parse_line};
pub use paths::{category_token, LogPaths};
pub use reader::{FileKind, LogFileInfo, LogReader};
pub use rotation::{RotationConfig, RotationOutcome, RotationPolicy};
pub use writer::{Logger, LoggerBuilder};
