//! travel-search: federated substring search over accommodations, cities
//! and countries
//!
//! A query is matched case-insensitively against a fixed set of fields per
//! collection. The three lookups run concurrently on one scoped store handle
//! and are returned together, backed by PostgreSQL or by an in-memory store
//! seeded from a bundled dataset.

pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod records;
pub mod search;
pub mod store;
pub mod web;

pub use config::Settings;
pub use error::{Result, SearchError};
pub use records::SearchResults;
pub use search::Search;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for connecting and for lookups, in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;
