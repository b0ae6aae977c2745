//! Undo-related commands
//!
//! Reverse logged batches, list the history, clear it.

use std::path::Path;

use super::files::error_message;
use crate::config;
use crate::error::RenameError;
use crate::session::RenameSession;
use crate::types::{OperationResult, SortMode, UndoEntry};
use crate::undo::UndoLog;

fn undo_log() -> Result<UndoLog, String> {
    Ok(config::current()?.undo_log())
}

fn describe(entry: &UndoEntry) -> String {
    format!(
        "Restored {} files in {} (renamed {})",
        entry.before.len(),
        entry.folder,
        entry.timestamp
    )
}

fn undo_with_log(undo: UndoLog, folder: Option<&Path>) -> OperationResult {
    let mut session = RenameSession::new(undo, SortMode::default(), "{n}");
    let result = match folder {
        Some(folder) => session.undo_folder(folder),
        None => session.undo_last(),
    };

    match result {
        Ok(entry) => OperationResult::ok(describe(&entry)),
        Err(RenameError::NothingToUndo) => OperationResult::failed("Nothing to undo"),
        Err(e) => OperationResult::failed(error_message(&e)),
    }
}

/// Undo the newest batch
pub fn undo_last() -> OperationResult {
    match undo_log() {
        Ok(undo) => undo_with_log(undo, None),
        Err(message) => OperationResult::failed(message),
    }
}

/// Undo the newest batch that targeted `folder`
pub fn undo_folder(folder: String) -> OperationResult {
    match undo_log() {
        Ok(undo) => undo_with_log(undo, Some(Path::new(&folder))),
        Err(message) => OperationResult::failed(message),
    }
}

pub fn get_undo_history() -> Result<Vec<UndoEntry>, String> {
    Ok(undo_log()?.list_all())
}

pub fn has_undo() -> bool {
    undo_log().map(|log| log.has_any()).unwrap_or(false)
}

pub fn clear_undo_history() -> OperationResult {
    let result = undo_log().and_then(|log| log.clear().map_err(|e| e.to_string()));
    match result {
        Ok(()) => OperationResult::ok("Undo history cleared"),
        Err(message) => OperationResult::failed(message),
    }
}
