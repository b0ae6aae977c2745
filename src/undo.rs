//! Persistent undo log for batch renames
//!
//! The log is a single JSON array of entries. It is read fully on every query
//! and rewritten fully on every change; only the newest `max_logs` entries are
//! kept. A missing, unreadable or malformed file reads as an empty log.

use chrono::Local;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenameError;
use crate::types::UndoEntry;

/// Default number of entries kept
pub const DEFAULT_MAX_LOGS: usize = 10;

/// Timestamp format written into new entries
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone)]
pub struct UndoLog {
    path: PathBuf,
    max_logs: usize,
}

impl UndoLog {
    pub fn new(path: impl Into<PathBuf>, max_logs: usize) -> Self {
        Self {
            path: path.into(),
            max_logs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_logs(&self) -> usize {
        self.max_logs
    }

    /// Append a completed batch and trim the oldest entries beyond `max_logs`
    pub fn record_operation(
        &self,
        folder: &Path,
        before: Vec<String>,
        after: Vec<String>,
    ) -> Result<UndoEntry, RenameError> {
        if before.len() != after.len() {
            return Err(RenameError::MismatchedNames {
                before: before.len(),
                after: after.len(),
            });
        }

        let entry = UndoEntry {
            folder: folder.to_string_lossy().to_string(),
            before,
            after,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };

        let mut entries = self.load();
        entries.push(entry.clone());
        if entries.len() > self.max_logs {
            let excess = entries.len() - self.max_logs;
            entries.drain(..excess);
            debug!("Dropped {} old undo entries", excess);
        }

        self.save(&entries)?;
        info!(
            "Recorded undo entry for {:?} ({} files)",
            entry.folder,
            entry.before.len()
        );
        Ok(entry)
    }

    /// Most recent entry, left in place
    pub fn peek_last(&self) -> Option<UndoEntry> {
        self.load().pop()
    }

    /// Remove the most recent entry; false when the log is empty
    pub fn pop_last(&self) -> Result<bool, RenameError> {
        let mut entries = self.load();
        if entries.pop().is_none() {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    /// All entries, oldest first
    pub fn list_all(&self) -> Vec<UndoEntry> {
        self.load()
    }

    pub fn has_any(&self) -> bool {
        !self.load().is_empty()
    }

    /// Forget every entry by deleting the backing file
    pub fn clear(&self) -> Result<(), RenameError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                RenameError::UndoLogWrite(format!("{}: {}", self.path.display(), e))
            })?;
        }
        info!("Cleared undo log {:?}", self.path);
        Ok(())
    }

    /// Newest entry whose folder equals `folder` exactly, with its position in the log
    pub fn latest_for_folder(&self, folder: &Path) -> Option<(usize, UndoEntry)> {
        let wanted = folder.to_string_lossy();
        self.load()
            .into_iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| entry.folder == wanted)
    }

    pub fn has_for_folder(&self, folder: &Path) -> bool {
        self.latest_for_folder(folder).is_some()
    }

    /// Remove the newest entry for `folder`, wherever it sits in the log
    pub fn remove_latest_for_folder(&self, folder: &Path) -> Result<bool, RenameError> {
        let Some((index, _)) = self.latest_for_folder(folder) else {
            return Ok(false);
        };
        let mut entries = self.load();
        entries.remove(index);
        self.save(&entries)?;
        Ok(true)
    }

    fn load(&self) -> Vec<UndoEntry> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read undo log {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        let entries: Vec<UndoEntry> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Undo log {:?} is corrupt, treating as empty: {}", self.path, e);
                return Vec::new();
            }
        };

        let total = entries.len();
        let entries: Vec<UndoEntry> = entries.into_iter().filter(UndoEntry::is_aligned).collect();
        if entries.len() != total {
            warn!(
                "Ignored {} undo entries with mismatched name lists",
                total - entries.len()
            );
        }
        entries
    }

    fn save(&self, entries: &[UndoEntry]) -> Result<(), RenameError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    RenameError::UndoLogWrite(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| RenameError::UndoLogWrite(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| RenameError::UndoLogWrite(format!("{}: {}", self.path.display(), e)))?;

        debug!("Saved {} undo entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}
