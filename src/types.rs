//! Shared types and data structures for renam

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// File System Types
// ============================================================================

/// Recognized image extensions, lower-case with the leading dot
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".tiff", ".tif",
];

/// Lower-cased suffix of a file name including the dot, or an empty string
pub fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Check if a path carries one of the image extensions (case-insensitive)
pub fn is_image_file(path: &Path) -> bool {
    let ext = lowercase_extension(path);
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// One discovered image file
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Current location on disk, updated after a successful rename
    pub original_path: PathBuf,
    /// File name at scan time or after the last successful rename
    pub original_name: String,
    /// Name produced by the last preview pass, empty until then
    pub new_name: String,
    pub extension: String,
    pub creation_time: DateTime<Local>,
    /// 1-based position after the last sort
    pub order: usize,
}

impl FileRecord {
    pub fn new(path: PathBuf, creation_time: DateTime<Local>) -> Self {
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = lowercase_extension(&path);

        Self {
            original_path: path,
            original_name,
            new_name: String::new(),
            extension,
            creation_time,
            order: 0,
        }
    }
}

impl std::fmt::Display for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.original_name, self.new_name)
    }
}

/// Outcome handed to the presentation layer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// ============================================================================
// Undo Types
// ============================================================================

/// One completed batch rename, reversible through positional before/after pairs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UndoEntry {
    pub folder: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
    #[serde(default)]
    pub timestamp: String,
}

impl UndoEntry {
    pub fn folder_path(&self) -> PathBuf {
        PathBuf::from(&self.folder)
    }

    /// Both name lists line up pair by pair
    pub fn is_aligned(&self) -> bool {
        self.before.len() == self.after.len()
    }
}

// ============================================================================
// Sort Types
// ============================================================================

/// Sort strategy applied before names are generated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "pattern")]
pub enum SortMode {
    #[default]
    Numeric,
    Alphabetic,
    Date,
    Extension,
    Regex(String),
}

impl SortMode {
    /// Map the numeric mode codes used by the front-ends (1..=5)
    pub fn from_code(code: u8, pattern: Option<&str>) -> Option<Self> {
        match code {
            1 => Some(SortMode::Numeric),
            2 => Some(SortMode::Alphabetic),
            3 => Some(SortMode::Date),
            4 => Some(SortMode::Extension),
            5 => pattern.map(|p| SortMode::Regex(p.to_string())),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            SortMode::Numeric => 1,
            SortMode::Alphabetic => 2,
            SortMode::Date => 3,
            SortMode::Extension => 4,
            SortMode::Regex(_) => 5,
        }
    }
}
