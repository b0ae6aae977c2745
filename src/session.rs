//! Headless rename session
//!
//! Wires scan → sort → preview → execute/undo for one target folder at a time,
//! the way a front-end drives the engine.

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::error::RenameError;
use crate::files::{self, rename_patterns, sorter};
use crate::types::{FileRecord, SortMode, UndoEntry};
use crate::undo::UndoLog;

pub struct RenameSession {
    folder: Option<PathBuf>,
    records: Vec<FileRecord>,
    sort_mode: SortMode,
    pattern: String,
    undo: UndoLog,
}

impl RenameSession {
    pub fn new(undo: UndoLog, sort_mode: SortMode, pattern: impl Into<String>) -> Self {
        Self {
            folder: None,
            records: Vec::new(),
            sort_mode,
            pattern: pattern.into(),
            undo,
        }
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn sort_mode(&self) -> &SortMode {
        &self.sort_mode
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    /// Scan `folder`, sort it with the current mode and refresh the preview
    pub fn open_folder(&mut self, folder: &Path) -> Result<usize, RenameError> {
        let records = files::scan(folder)?;
        self.folder = Some(folder.to_path_buf());
        self.load(records)
    }

    /// Same as `open_folder` for a sub-folder of `parent`
    pub fn open_subfolder(&mut self, parent: &Path, name: &str) -> Result<usize, RenameError> {
        self.open_folder(&parent.join(name))
    }

    /// Scan the current folder again
    pub fn rescan(&mut self) -> Result<usize, RenameError> {
        let Some(folder) = self.folder.clone() else {
            return Ok(0);
        };
        let records = files::scan(&folder)?;
        self.load(records)
    }

    fn load(&mut self, records: Vec<FileRecord>) -> Result<usize, RenameError> {
        // A bad regex must not leave the session half loaded
        let sorted = sorter::sort(&records, &self.sort_mode)?;
        self.records = sorted;
        self.update_preview();
        Ok(self.records.len())
    }

    /// Switch the sort strategy; on error the current order and preview stay as they were
    pub fn set_sort_mode(&mut self, mode: SortMode) -> Result<(), RenameError> {
        let sorted = sorter::sort(&self.records, &mode)?;
        self.records = sorted;
        self.sort_mode = mode;
        self.update_preview();
        Ok(())
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.update_preview();
    }

    fn update_preview(&mut self) {
        rename_patterns::apply_pattern(&mut self.records, &self.pattern);
    }

    /// Swap the item at `index` with the one above it
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.records.len() {
            return false;
        }
        self.records.swap(index, index - 1);
        self.after_manual_move();
        true
    }

    /// Swap the item at `index` with the one below it
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.records.len() {
            return false;
        }
        self.records.swap(index, index + 1);
        self.after_manual_move();
        true
    }

    fn after_manual_move(&mut self) {
        sorter::update_order(&mut self.records);
        self.update_preview();
    }

    pub fn preview_names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.new_name.clone()).collect()
    }

    /// Rename every previewed file, log the batch and rescan
    ///
    /// Returns the number of files renamed.
    pub fn execute(&mut self) -> Result<usize, RenameError> {
        let folder = self.folder.clone().ok_or(RenameError::NoFolder)?;

        if self.records.is_empty() {
            return Ok(0);
        }
        if !rename_patterns::validate_pattern(&self.pattern) {
            return Err(RenameError::InvalidPattern(self.pattern.clone()));
        }
        if rename_patterns::check_duplicates(&self.preview_names()) {
            return Err(RenameError::DuplicateNames);
        }

        let before: Vec<String> = self.records.iter().map(|r| r.original_name.clone()).collect();
        let after = self.preview_names();

        files::rename_batch(&folder, &mut self.records)?;
        let count = self.records.len();

        if let Err(e) = self.undo.record_operation(&folder, before, after) {
            // The files are already renamed; report the log failure without hiding that
            warn!("Renamed {} files but could not record undo: {}", count, e);
            self.rescan()?;
            return Err(e);
        }

        info!("Executed batch of {} renames in {:?}", count, folder);
        self.rescan()?;
        Ok(count)
    }

    /// Undo the newest batch in the log, whichever folder it targeted
    pub fn undo_last(&mut self) -> Result<UndoEntry, RenameError> {
        let entry = self.undo.peek_last().ok_or(RenameError::NothingToUndo)?;
        self.restore_entry(&entry)?;
        self.undo.pop_last()?;
        self.rescan_if_current(&entry.folder_path())?;
        Ok(entry)
    }

    /// Undo the newest batch recorded for `folder`
    pub fn undo_folder(&mut self, folder: &Path) -> Result<UndoEntry, RenameError> {
        let (_, entry) = self
            .undo
            .latest_for_folder(folder)
            .ok_or(RenameError::NothingToUndo)?;
        self.restore_entry(&entry)?;
        self.undo.remove_latest_for_folder(folder)?;
        self.rescan_if_current(folder)?;
        Ok(entry)
    }

    pub fn can_undo_folder(&self, folder: &Path) -> bool {
        self.undo.has_for_folder(folder)
    }

    fn restore_entry(&self, entry: &UndoEntry) -> Result<(), RenameError> {
        let folder = entry.folder_path();
        files::check_folder(&folder)?;
        files::restore(&folder, &entry.before, &entry.after)
    }

    fn rescan_if_current(&mut self, folder: &Path) -> Result<(), RenameError> {
        if self.folder.as_deref() == Some(folder) {
            self.rescan()?;
        }
        Ok(())
    }
}
