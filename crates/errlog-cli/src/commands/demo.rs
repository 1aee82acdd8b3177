//! Demo command
//!
//! Usage: errlog demo [--stack] [--exit] [--config <FILE>] [--print-settings]
//!
//! Runs a short call chain whose innermost call fails, and reports the
//! failure the way an application would.

use clap::Args;
use errlog_core::{Config, Logger, Settings, StderrSink};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use super::CommandError;

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Append the full stack trace to the report
    #[arg(long)]
    pub stack: bool,

    /// Exit with status 1 right after the report
    #[arg(long)]
    pub exit: bool,

    /// TOML settings file (default: built-in settings with ERRLOG_* overrides)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the effective settings as TOML instead of running
    #[arg(long)]
    pub print_settings: bool,
}

/// Execute demo command
pub fn execute(args: DemoArgs) -> Result<(), CommandError> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_toml_file(path)?,
        None => Settings::from_env()?,
    };
    settings.print_stack |= args.stack;
    settings.exit_on_success |= args.exit;
    tracing::debug!(settings = ?settings, "demo settings");

    if args.print_settings {
        print!("{}", settings.to_toml_string()?);
        return Ok(());
    }

    let logger = Logger::new(Config::from_settings(settings, Arc::new(StderrSink)));

    println!("Example start");
    wrapping_function(&logger);
    println!("Example end");
    Ok(())
}

#[inline(never)]
fn wrapping_function(logger: &Logger) {
    some_big_function(logger);
}

#[inline(never)]
fn some_big_function(logger: &Logger) {
    some_dumb_function();

    some_small_function();

    some_dumb_function();

    if logger.debugx(some_nasty_function().err().as_ref(), "some information") {
        return;
    }

    some_small_function();

    some_dumb_function();
}

fn some_small_function() {
    let _ = std::hint::black_box(format!("I do things {}!", 1));
}

fn some_nasty_function() -> io::Result<()> {
    Err(io::Error::other("I'm failing for some reason"))
}

fn some_dumb_function() -> bool {
    std::hint::black_box(false)
}
