//! Backend selection from configuration

use super::memory::EphemeralStore;
use super::postgres::PostgresStore;
use super::traits::Backend;
use crate::config::{RunMode, Settings};
use crate::error::{Result, SearchError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Which backend a process serves from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// Persistent PostgreSQL store at the given URL
    Postgres(String),
    /// Ephemeral store seeded from the bundled dataset
    Memory,
}

impl BackendKind {
    /// Decide the backend for a process
    ///
    /// A configured database URL always wins. Without one, the seeded
    /// in-memory store is used outside production; in production this is a
    /// configuration error.
    pub fn select(settings: &Settings) -> Result<Self> {
        match settings.database.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(Self::Postgres(url.to_string())),
            _ if settings.general.mode == RunMode::Production => Err(SearchError::configuration(
                "DATABASE_URL is not set and in-memory fallback is disabled in production",
            )),
            _ => Ok(Self::Memory),
        }
    }
}

/// Select and build the backend for a process
///
/// Runs the one-time seed step when the in-memory store is selected.
pub fn load_backend(settings: &Settings) -> Result<Arc<dyn Backend>> {
    let backend: Arc<dyn Backend> = match BackendKind::select(settings)? {
        BackendKind::Postgres(url) => {
            let connect_timeout = Duration::from_secs_f64(settings.database.connect_timeout);
            info!("Using PostgreSQL backend");
            Arc::new(PostgresStore::new(&url, connect_timeout)?)
        }
        BackendKind::Memory => {
            warn!("DATABASE_URL is not set, serving from the seeded in-memory store");
            Arc::new(EphemeralStore::seeded()?)
        }
    };

    Ok(backend)
}
