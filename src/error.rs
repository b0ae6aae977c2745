//! Error type shared by the rename engine

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("No folder selected")]
    NoFolder,

    #[error("Folder does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a folder: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Permission error: {0}")]
    PermissionDenied(String),

    #[error("File system error: {0}")]
    Filesystem(String),

    #[error("Invalid sort pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Pattern must contain {{n}} or a {{0...}} placeholder and no path separators: '{0}'")]
    InvalidPattern(String),

    #[error("Generated names contain duplicates, adjust the pattern")]
    DuplicateNames,

    #[error("No new name generated for '{0}'")]
    MissingNewName(String),

    #[error("'{0}' is not a plain file name")]
    InvalidName(String),

    #[error("'{0}' already exists and is not part of this batch")]
    TargetExists(String),

    #[error("Name lists differ in length ({before} before, {after} after)")]
    MismatchedNames { before: usize, after: usize },

    #[error("Failed to save undo log: {0}")]
    UndoLogWrite(String),

    #[error("Nothing to undo")]
    NothingToUndo,
}

impl RenameError {
    /// Classify an I/O failure that happened while touching `path`
    pub fn from_io(err: io::Error, context: impl std::fmt::Display) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => {
                RenameError::PermissionDenied(format!("{}: {}", context, err))
            }
            _ => RenameError::Filesystem(format!("{}: {}", context, err)),
        }
    }

    pub fn is_permission(&self) -> bool {
        matches!(self, RenameError::PermissionDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_permission_maps_to_permission_variant() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let mapped = RenameError::from_io(err, "a.jpg");
        assert!(mapped.is_permission());
        assert!(mapped.to_string().starts_with("Permission error"));
    }

    #[test]
    fn test_io_other_maps_to_filesystem_variant() {
        let err = io::Error::new(io::ErrorKind::Other, "disk on fire");
        let mapped = RenameError::from_io(err, "b.jpg");
        assert!(!mapped.is_permission());
        assert_eq!(mapped.to_string(), "File system error: b.jpg: disk on fire");
    }

    #[test]
    fn test_invalid_pattern_message_keeps_braces() {
        let err = RenameError::InvalidPattern("photo".to_string());
        assert_eq!(
            err.to_string(),
            "Pattern must contain {n} or a {0...} placeholder and no path separators: 'photo'"
        );
    }
}
