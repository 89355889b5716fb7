//! Configuration module for travel-search
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Load settings from a file, or defaults when there is none
///
/// Environment overrides are merged last and the result is validated.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

/// Locate the settings file to load
///
/// `TRAVEL_SEARCH_SETTINGS_PATH` wins when it names an existing file, then
/// an explicit path, then the default locations.
pub fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TRAVEL_SEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("travel-search/settings.yml"));
    }

    candidates.into_iter().find(|path| path.exists())
}
