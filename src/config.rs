//! Application configuration
//!
//! Manages user settings including:
//! - Location of the undo log and how many entries it keeps
//! - Default naming pattern and regex sort pattern

use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::undo::{UndoLog, DEFAULT_MAX_LOGS};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding the undo log
    pub undo_log_path: PathBuf,
    /// Number of undo entries kept
    pub max_logs: usize,
    pub default_pattern: String,
    pub default_regex: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Keep the undo log next to other per-user application data
        let undo_log_path = dirs::data_local_dir()
            .map(|p| p.join("renam").join("undo_log.json"))
            .unwrap_or_else(|| PathBuf::from("undo_log.json"));

        Self {
            undo_log_path,
            max_logs: DEFAULT_MAX_LOGS,
            default_pattern: "{n}".to_string(),
            default_regex: r"(\d+)".to_string(),
        }
    }
}

impl AppConfig {
    pub fn undo_log(&self) -> UndoLog {
        UndoLog::new(self.undo_log_path.clone(), self.max_logs)
    }
}

/// Global configuration instance
static CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| RwLock::new(AppConfig::default()));

/// Default settings file location
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("renam").join("config.json"))
}

/// Read settings from a JSON file; a missing file yields defaults
pub fn load_config_file(path: &Path) -> Result<AppConfig, String> {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid config '{}': {}", path.display(), e))?;

    info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Snapshot of the current configuration
pub fn current() -> Result<AppConfig, String> {
    let config = CONFIG.read().map_err(|e| format!("Config lock error: {}", e))?;
    Ok(config.clone())
}

/// Replace the whole configuration
pub fn replace(new_config: AppConfig) -> Result<(), String> {
    let mut config = CONFIG.write().map_err(|e| format!("Config lock error: {}", e))?;
    *config = new_config;
    Ok(())
}
