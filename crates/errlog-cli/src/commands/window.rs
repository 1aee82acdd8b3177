//! Window command
//!
//! Usage: errlog window <FILE> <LINE> [--before N] [--after N]

use clap::Args;
use errlog_core::config::{DEFAULT_LINES_AFTER, DEFAULT_LINES_BEFORE};
use errlog_core::format::render_window;
use errlog_core::SourceWindowReader;
use std::path::PathBuf;

use super::CommandError;

#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Source file to read
    pub file: PathBuf,

    /// Line to mark, starting at 1
    pub line: u32,

    /// Lines shown before the marked line
    #[arg(short, long, default_value_t = DEFAULT_LINES_BEFORE)]
    pub before: u32,

    /// Lines shown after the marked line
    #[arg(short, long, default_value_t = DEFAULT_LINES_AFTER)]
    pub after: u32,
}

/// Execute window command
pub fn execute(args: WindowArgs) -> Result<(), CommandError> {
    let window = SourceWindowReader::new().try_read_window(
        &args.file,
        args.line,
        args.before,
        args.after,
    )?;

    for line in render_window(&window) {
        println!("{}", line);
    }
    Ok(())
}
