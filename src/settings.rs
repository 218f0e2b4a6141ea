use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Overrides the configured data directory when set.
pub const DATA_DIR_ENV: &str = "TALLYBOT_DATA_DIR";
pub const DB_FILE: &str = "tallybot.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "\u{20B9}".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tallybot")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("tallybot")
}

/// Settings as written in `settings.json`, without the environment override.
pub fn load_stored_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(&path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
        Settings::default()
    })
}

fn data_dir_override() -> Option<String> {
    std::env::var(DATA_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
}

/// The effective settings for this process.
pub fn load_settings() -> Settings {
    let mut settings = load_stored_settings();
    if let Some(dir) = data_dir_override() {
        settings.data_dir = dir;
    }
    settings
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn db_path(settings: &Settings) -> PathBuf {
    PathBuf::from(&settings.data_dir).join(DB_FILE)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
