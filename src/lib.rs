//! renam - bulk image renamer
//!
//! This is the main library entry point that exposes the rename engine
//! (scan, sort, generate, rename, undo) and the command-line front-end.

// Module declarations
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod files;
pub mod session;
pub mod types;
pub mod undo;

// Re-export commonly used types
pub use error::RenameError;
pub use session::RenameSession;
pub use types::*;
pub use undo::UndoLog;

use clap::Parser;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Run the command-line application, returning the process exit code
pub fn run() -> i32 {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let settings = match cli::resolve_config(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return 2;
        }
    };
    if let Err(e) = config::replace(settings) {
        eprintln!("error: {}", e);
        return 2;
    }

    match cli::dispatch(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}
