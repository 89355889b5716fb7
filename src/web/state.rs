//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::search::Search;
use crate::store::Backend;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search dispatcher
    pub search: Arc<Search>,
    /// Metrics collector
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state around a selected backend
    pub fn new(settings: Settings, backend: Arc<dyn Backend>) -> Self {
        let metrics = Arc::new(Metrics::new());

        let mut search = Search::new(backend).with_metrics(metrics.clone());
        if let Some(limit) = settings.search.lookup_timeout() {
            search = search.with_timeout(limit);
        }

        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
            metrics,
        }
    }

    /// Name of the backend serving searches
    pub fn backend_name(&self) -> &str {
        self.search.backend_name()
    }
}
