//! Search execution and orchestration

use crate::error::{Result, SearchError};
use crate::metrics::Metrics;
use crate::query::{build_predicates, Predicate, Predicates};
use crate::records::{Accommodation, City, Country, SearchResults};
use crate::store::{with_store_handle, Backend, StoreHandle};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Search dispatcher that queries every collection concurrently
pub struct Search {
    /// Backend selected at startup
    backend: Arc<dyn Backend>,
    /// Limit on the concurrent lookups of one search
    timeout: Option<Duration>,
    /// Shared metrics collector
    metrics: Arc<Metrics>,
}

impl Search {
    /// Create a new dispatcher over a backend
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            timeout: None,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Set the lookup timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Record into a shared metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Execute a search across all collections
    ///
    /// Surrounding whitespace is trimmed. An empty query returns an empty
    /// payload without touching the backend. Otherwise the three lookups run
    /// concurrently on one store handle and either all succeed or the search
    /// fails. The handle is released on every path; dropping the returned
    /// future releases it in the background.
    pub async fn execute(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Empty query, skipping backend");
            self.metrics.inc_empty_search();
            return Ok(SearchResults::empty());
        }

        self.metrics.inc_search();
        let predicates = build_predicates(query);
        let start = Instant::now();

        let outcome = with_store_handle(self.backend.as_ref(), |handle| {
            self.fan_out(handle, predicates)
        })
        .await;

        match &outcome {
            Ok(results) => info!(
                "Search '{}' on {} returned {} records in {:?}",
                query,
                self.backend.name(),
                results.total(),
                start.elapsed()
            ),
            Err(e) => {
                self.metrics.inc_failed_search();
                warn!("Search '{}' on {} failed: {}", query, self.backend.name(), e);
            }
        }

        outcome
    }

    /// Issue the three lookups concurrently and join on all of them
    async fn fan_out(
        &self,
        handle: Arc<dyn StoreHandle>,
        predicates: Predicates,
    ) -> Result<SearchResults> {
        let handle = &*handle;
        let joined = async {
            futures::try_join!(
                self.lookup::<Accommodation>(handle, &predicates.accommodations),
                self.lookup::<City>(handle, &predicates.cities),
                self.lookup::<Country>(handle, &predicates.countries),
            )
        };

        let (accommodations, cities, countries) = match self.timeout {
            Some(limit) => timeout(limit, joined)
                .await
                .map_err(|_| SearchError::Timeout(limit))??,
            None => joined.await?,
        };

        Ok(SearchResults {
            accommodations,
            cities,
            countries,
        })
    }

    /// Look up one collection and decode its documents
    async fn lookup<T: DeserializeOwned>(
        &self,
        handle: &dyn StoreHandle,
        predicate: &Predicate,
    ) -> Result<Vec<T>> {
        let collection = predicate.collection();
        let start = Instant::now();

        let documents = match handle.find_matching(predicate).await {
            Ok(documents) => documents,
            Err(e) => {
                self.metrics.record_error(collection.name());
                return Err(e);
            }
        };

        let records = documents
            .into_iter()
            .map(|document| {
                serde_json::from_value(serde_json::Value::Object(document)).map_err(|e| {
                    SearchError::query(collection.name(), format!("malformed document: {e}"))
                })
            })
            .collect::<Result<Vec<T>>>();

        match &records {
            Ok(found) => {
                let elapsed = start.elapsed();
                self.metrics
                    .record_success(collection.name(), elapsed.as_millis() as u64);
                debug!(
                    "Collection {} returned {} records in {:?}",
                    collection,
                    found.len(),
                    elapsed
                );
            }
            Err(_) => self.metrics.record_error(collection.name()),
        }

        records
    }
}
