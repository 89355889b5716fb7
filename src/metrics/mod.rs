//! Metrics collection module
//!
//! Tracks search volume, per-collection lookup latency and error rates.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of latency samples kept per collection
const LATENCY_WINDOW: usize = 100;

/// In-process metrics collector shared by all requests
pub struct Metrics {
    /// Searches that reached the store
    total_searches: AtomicU64,
    /// Searches answered by the empty-query fast path
    empty_searches: AtomicU64,
    /// Failed searches
    failed_searches: AtomicU64,
    /// Per-collection lookup statistics
    lookups: RwLock<HashMap<String, LookupStats>>,
}

#[derive(Debug, Default)]
struct LookupStats {
    successes: u64,
    errors: u64,
    /// Recent response times in ms
    response_times: Vec<u64>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            empty_searches: AtomicU64::new(0),
            failed_searches: AtomicU64::new(0),
            lookups: RwLock::new(HashMap::new()),
        }
    }

    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_search(&self) {
        self.empty_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed_search(&self) {
        self.failed_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful lookup and its response time
    pub fn record_success(&self, collection: &str, time_ms: u64) {
        let mut lookups = self.lookups.write().unwrap_or_else(PoisonError::into_inner);
        let stats = lookups.entry(collection.to_string()).or_default();

        stats.successes += 1;
        if stats.response_times.len() >= LATENCY_WINDOW {
            stats.response_times.remove(0);
        }
        stats.response_times.push(time_ms);
    }

    /// Record a failed lookup
    pub fn record_error(&self, collection: &str) {
        let mut lookups = self.lookups.write().unwrap_or_else(PoisonError::into_inner);
        lookups.entry(collection.to_string()).or_default().errors += 1;
    }

    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    pub fn get_empty_searches(&self) -> u64 {
        self.empty_searches.load(Ordering::Relaxed)
    }

    pub fn get_failed_searches(&self) -> u64 {
        self.failed_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a collection
    pub fn get_avg_response_time(&self, collection: &str) -> Option<u64> {
        let lookups = self.lookups.read().unwrap_or_else(PoisonError::into_inner);
        lookups.get(collection).and_then(|stats| average(&stats.response_times))
    }

    /// Get reliability percentage for a collection
    pub fn get_reliability(&self, collection: &str) -> f64 {
        let lookups = self.lookups.read().unwrap_or_else(PoisonError::into_inner);
        lookups.get(collection).map_or(100.0, reliability)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let lookups = self.lookups.read().unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            total_searches: self.get_total_searches(),
            empty_searches: self.get_empty_searches(),
            failed_searches: self.get_failed_searches(),
            collections: lookups
                .iter()
                .map(|(name, stats)| {
                    (
                        name.clone(),
                        CollectionStats {
                            lookups: stats.successes + stats.errors,
                            errors: stats.errors,
                            avg_response_time: average(&stats.response_times),
                            reliability: reliability(stats),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn average(times: &[u64]) -> Option<u64> {
    if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<u64>() / times.len() as u64)
    }
}

fn reliability(stats: &LookupStats) -> f64 {
    let total = stats.successes + stats.errors;
    if total == 0 {
        100.0
    } else {
        (stats.successes as f64 / total as f64) * 100.0
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub empty_searches: u64,
    pub failed_searches: u64,
    pub collections: HashMap<String, CollectionStats>,
}

/// Statistics for a single collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub lookups: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}
