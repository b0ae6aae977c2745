//! File-related commands
//!
//! Entry points for scanning, previewing and executing batch renames. Failures
//! are flattened into messages a front-end can show as-is.

use std::path::{Path, PathBuf};

use crate::config;
use crate::error::RenameError;
use crate::files;
use crate::session::RenameSession;
use crate::types::{FileRecord, OperationResult, SortMode};
use crate::undo::UndoLog;

/// Message shown for a failed engine call
pub fn error_message(err: &RenameError) -> String {
    match err {
        RenameError::PermissionDenied(_) => {
            format!("{} (check that the files are not open or read-only)", err)
        }
        _ => err.to_string(),
    }
}

fn target_folder(folder: &str, subfolder: Option<&str>) -> PathBuf {
    let base = Path::new(folder);
    match subfolder {
        Some(name) => base.join(name),
        None => base.to_path_buf(),
    }
}

fn open_session(
    undo: UndoLog,
    folder: &Path,
    mode: SortMode,
    pattern: &str,
) -> Result<RenameSession, String> {
    let mut session = RenameSession::new(undo, mode, pattern);
    session.open_folder(folder).map_err(|e| error_message(&e))?;
    Ok(session)
}

pub fn validate_folder(folder: String) -> OperationResult {
    let (valid, message) = files::validate_folder(Some(Path::new(&folder)));
    OperationResult {
        success: valid,
        message,
    }
}

pub fn scan_folder(folder: String, subfolder: Option<String>) -> Result<Vec<FileRecord>, String> {
    let target = target_folder(&folder, subfolder.as_deref());
    files::scan(&target).map_err(|e| error_message(&e))
}

pub fn list_subfolders(folder: String) -> Result<Vec<String>, String> {
    files::list_subfolders(Path::new(&folder)).map_err(|e| error_message(&e))
}

/// Sorted records with their generated names, nothing touched on disk
pub fn preview_renames(
    folder: String,
    subfolder: Option<String>,
    mode: SortMode,
    pattern: String,
) -> Result<Vec<FileRecord>, String> {
    if !files::validate_pattern(&pattern) {
        return Err(RenameError::InvalidPattern(pattern).to_string());
    }
    let target = target_folder(&folder, subfolder.as_deref());
    let settings = config::current()?;
    let session = open_session(settings.undo_log(), &target, mode, &pattern)?;
    Ok(session.records().to_vec())
}

/// Sort, generate and rename, recording the batch for undo
pub fn execute_rename(
    folder: String,
    subfolder: Option<String>,
    mode: SortMode,
    pattern: String,
) -> OperationResult {
    let settings = match config::current() {
        Ok(settings) => settings,
        Err(message) => return OperationResult::failed(message),
    };
    let target = target_folder(&folder, subfolder.as_deref());
    execute_with_log(settings.undo_log(), &target, mode, &pattern)
}

fn execute_with_log(
    undo: UndoLog,
    target: &Path,
    mode: SortMode,
    pattern: &str,
) -> OperationResult {
    let mut session = match open_session(undo, target, mode, pattern) {
        Ok(session) => session,
        Err(message) => return OperationResult::failed(message),
    };

    if session.records().is_empty() {
        return OperationResult::failed("No image files in the selected folder");
    }

    match session.execute() {
        Ok(count) => OperationResult::ok(format!("Renamed {} files", count)),
        Err(e) => OperationResult::failed(error_message(&e)),
    }
}
