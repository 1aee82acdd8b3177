//! errlog CLI
//!
//! Command-line front end for errlog

use clap::{Parser, Subcommand};
use errlog_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "errlog")]
#[command(about = "errlog - context-capturing error reports", long_about = None)]
struct Cli {
    /// Print errlog's own diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print errlog's own diagnostics as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the source window around a line of a file
    Window(commands::window::WindowArgs),
    /// Run a failing call chain and report it
    Demo(commands::demo::DemoArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.json_logs {
        init(Profile::Production);
    } else if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Window(args) => commands::window::execute(args),
        Commands::Demo(args) => commands::demo::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
