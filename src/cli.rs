//! Command-line front-end
//!
//! Parses arguments, applies configuration overrides and prints command results.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;
use serde::Serialize;
use std::path::PathBuf;

use crate::commands;
use crate::config::{self, AppConfig};
use crate::types::{FileRecord, OperationResult, SortMode, UndoEntry};

#[derive(Debug, Parser)]
#[command(name = "renam", version, about = "Bulk-rename image files by sort order and pattern")]
pub struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Undo log location, overrides the settings file
    #[arg(long, global = true, value_name = "FILE")]
    pub undo_log: Option<PathBuf>,

    /// Number of undo entries to keep
    #[arg(long, global = true, value_name = "N")]
    pub max_logs: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List image files in a folder
    Scan {
        folder: String,
        #[arg(long)]
        subfolder: Option<String>,
    },
    /// List sub-folders of a folder
    Subfolders { folder: String },
    /// Show the names a rename would produce
    Preview(RenameArgs),
    /// Rename the files and record the batch for undo
    Rename(RenameArgs),
    /// Undo the newest batch, or the newest one for a folder
    Undo {
        #[arg(long)]
        folder: Option<String>,
    },
    /// Show the undo history, oldest first
    History,
    /// Delete the undo history
    ClearHistory,
    /// Show the active settings and pattern syntax
    Settings,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    pub folder: String,

    #[arg(long)]
    pub subfolder: Option<String>,

    /// Name pattern, e.g. "IMG_{000}"; defaults to the configured pattern
    #[arg(short, long)]
    pub pattern: Option<String>,

    #[arg(short, long, value_enum, default_value_t = SortArg::Numeric)]
    pub sort: SortArg,

    /// Pattern for `--sort regex`; defaults to the configured regex
    #[arg(long)]
    pub regex: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Numeric,
    Alphabetic,
    Date,
    Extension,
    Regex,
}

impl RenameArgs {
    fn sort_mode(&self, settings: &AppConfig) -> SortMode {
        match self.sort {
            SortArg::Numeric => SortMode::Numeric,
            SortArg::Alphabetic => SortMode::Alphabetic,
            SortArg::Date => SortMode::Date,
            SortArg::Extension => SortMode::Extension,
            SortArg::Regex => SortMode::Regex(
                self.regex
                    .clone()
                    .unwrap_or_else(|| settings.default_regex.clone()),
            ),
        }
    }

    fn pattern(&self, settings: &AppConfig) -> String {
        self.pattern
            .clone()
            .unwrap_or_else(|| settings.default_pattern.clone())
    }
}

/// Settings from the file named on the command line (or the default one) plus overrides
pub fn resolve_config(cli: &Cli) -> Result<AppConfig, String> {
    let mut settings = match cli.config.clone().or_else(config::default_config_file) {
        Some(path) => config::load_config_file(&path)?,
        None => AppConfig::default(),
    };

    if let Some(path) = &cli.undo_log {
        settings.undo_log_path = path.clone();
    }
    if let Some(max_logs) = cli.max_logs {
        if max_logs == 0 {
            return Err("--max-logs must be at least 1".to_string());
        }
        settings.max_logs = max_logs;
    }

    debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn print_records(records: &[FileRecord], json: bool, with_new_names: bool) -> Result<(), String> {
    if json {
        return print_json(&records);
    }
    for record in records {
        if with_new_names {
            println!("{:>4}. {}", record.order, record);
        } else {
            println!("{}", record.original_name);
        }
    }
    Ok(())
}

fn print_history(entries: &[UndoEntry], json: bool) -> Result<(), String> {
    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No undo history");
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{}. {} | {} | {} files",
            i + 1,
            entry.timestamp,
            entry.folder,
            entry.before.len()
        );
    }
    Ok(())
}

fn finish(result: OperationResult, json: bool) -> Result<(), String> {
    if json {
        print_json(&result)?;
    }
    if result.success {
        if !json {
            println!("{}", result.message);
        }
        Ok(())
    } else {
        Err(result.message)
    }
}

/// Run one parsed command against the current settings
pub fn dispatch(cli: Cli) -> Result<(), String> {
    let settings = config::current()?;
    let json = cli.json;

    match cli.command {
        Command::Scan { folder, subfolder } => {
            let records = commands::scan_folder(folder, subfolder)?;
            print_records(&records, json, false)
        }
        Command::Subfolders { folder } => {
            let names = commands::list_subfolders(folder)?;
            if json {
                return print_json(&names);
            }
            for name in names {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Preview(args) => {
            let mode = args.sort_mode(&settings);
            let pattern = args.pattern(&settings);
            let records = commands::preview_renames(args.folder, args.subfolder, mode, pattern)?;
            print_records(&records, json, true)
        }
        Command::Rename(args) => {
            let mode = args.sort_mode(&settings);
            let pattern = args.pattern(&settings);
            if !commands::check_pattern(pattern.clone()) {
                return Err(format!(
                    "Invalid pattern '{}'. {}",
                    pattern,
                    commands::pattern_help()
                ));
            }
            finish(
                commands::execute_rename(args.folder, args.subfolder, mode, pattern),
                json,
            )
        }
        Command::Undo { folder } => {
            let result = match folder {
                Some(folder) => commands::undo_folder(folder),
                None => commands::undo_last(),
            };
            finish(result, json)
        }
        Command::History => print_history(&commands::get_undo_history()?, json),
        Command::ClearHistory => finish(commands::clear_undo_history(), json),
        Command::Settings => {
            let settings = commands::get_settings()?;
            if json {
                return print_json(&settings);
            }
            println!("undo log:        {}", settings.undo_log_path.display());
            println!("max undo logs:   {}", settings.max_logs);
            println!("default pattern: {}", settings.default_pattern);
            println!("default regex:   {}", settings.default_regex);
            println!("undo available:  {}", if commands::has_undo() { "yes" } else { "no" });
            println!("{}", commands::pattern_help());
            Ok(())
        }
    }
}
