//! Commands module
//!
//! Entry points for front-ends. Commands are organized by domain:
//! - File operations (validate, scan, sub-folders, preview, rename)
//! - Undo operations (undo last, undo per folder, history, clear)
//! - Settings (current settings, pattern help)

mod files;
mod settings;
mod undo;

pub use files::*;
pub use settings::*;
pub use undo::*;
