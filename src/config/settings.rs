//! Settings structures for travel-search configuration

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with process environment variables
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from a variable lookup
    ///
    /// Unparseable numeric or boolean values leave the current setting alone.
    pub fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("DATABASE_URL") {
            self.database.url = Some(val);
        }
        if let Some(val) = var("TRAVEL_SEARCH_CONNECT_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.database.connect_timeout = secs;
            }
        }
        if let Some(val) = var("TRAVEL_SEARCH_MODE").or_else(|| var("APP_ENV")) {
            self.general.mode = RunMode::parse(&val);
        }
        if let Some(val) = var("TRAVEL_SEARCH_DEBUG") {
            if let Ok(debug) = val.parse() {
                self.general.debug = debug;
            }
        }
        if let Some(val) = var("TRAVEL_SEARCH_PORT").or_else(|| var("PORT")) {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("TRAVEL_SEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("TRAVEL_SEARCH_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.search.timeout = secs;
            }
        }
    }

    /// Reject values that cannot be turned into durations
    pub fn validate(&self) -> Result<()> {
        let connect = self.database.connect_timeout;
        if !connect.is_finite() || connect <= 0.0 {
            return Err(SearchError::configuration(format!(
                "database.connect_timeout must be positive, got {connect}"
            )));
        }

        let search = self.search.timeout;
        if !search.is_finite() || search < 0.0 {
            return Err(SearchError::configuration(format!(
                "search.timeout must not be negative, got {search}"
            )));
        }

        Ok(())
    }
}

/// Execution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Real deployment; the in-memory fallback is disabled
    Production,
    #[default]
    Development,
}

impl RunMode {
    /// Parse a mode name; anything other than "production"/"prod" is development
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Execution mode
    pub mode: RunMode,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3001,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Persistent store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL; unset selects the in-memory store
    pub url: Option<String>,
    /// Connect timeout in seconds
    pub connect_timeout: f64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            connect_timeout: crate::DEFAULT_TIMEOUT as f64,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Limit on the concurrent lookups of one search in seconds, 0 = none
    pub timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout: crate::DEFAULT_TIMEOUT as f64,
        }
    }
}

impl SearchSettings {
    /// The lookup limit, if any
    pub fn lookup_timeout(&self) -> Option<Duration> {
        (self.timeout > 0.0).then(|| Duration::from_secs_f64(self.timeout))
    }
}
