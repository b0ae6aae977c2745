//! Rename engine file handling
//!
//! This module handles:
//! - Scanning folders and sub-folders for images
//! - Sorting discovered files
//! - Generating names from numbering patterns
//! - Two-phase batch rename and restore

mod operations;
pub mod rename_patterns;
pub mod sorter;

pub use operations::{
    check_folder, list_subfolders, read_record, rename_batch, restore, scan, scan_subfolder,
    validate_folder,
};

pub use rename_patterns::{apply_pattern, check_duplicates, generate, validate_pattern};
pub use sorter::{sort, update_order};
