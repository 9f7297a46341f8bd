use std::fs;
use std::path::Path;

use super::Settings;
use super::path::settings_path;
use crate::error::{Result, SyncError};

impl Settings {
    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SyncError::Settings(e.to_string()))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }
}

/// How `load_settings` arrived at its result. Logging is not installed yet
/// when settings load, so the caller reports this afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    Defaults,
    File,
    Invalid(String),
}

/// Load settings, falling back to defaults when the file is absent or broken.
pub fn load_settings() -> (Settings, SettingsSource) {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> (Settings, SettingsSource) {
    if !path.exists() {
        return (Settings::default(), SettingsSource::Defaults);
    }
    match Settings::load_from_file(path) {
        Ok(s) => (s, SettingsSource::File),
        Err(e) => (Settings::default(), SettingsSource::Invalid(e.to_string())),
    }
}
