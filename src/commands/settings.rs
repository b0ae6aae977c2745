//! Settings commands

use crate::config::{self, AppConfig};
use crate::files::rename_patterns;

pub fn get_settings() -> Result<AppConfig, String> {
    config::current()
}

pub fn pattern_help() -> String {
    rename_patterns::pattern_examples().to_string()
}

pub fn check_pattern(pattern: String) -> bool {
    rename_patterns::validate_pattern(&pattern)
}
