//! Error taxonomy for search requests and startup

use std::time::Duration;
use thiserror::Error;

/// Errors raised while selecting a backend or serving a search
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Invalid or incomplete configuration, fatal at startup
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A store handle could not be established
    #[error("connection error: {0}")]
    Connection(String),

    /// A lookup against an acquired handle failed
    #[error("query error on {collection}: {message}")]
    Query {
        /// Collection the lookup ran against
        collection: String,
        /// Underlying failure
        message: String,
    },

    /// Lookups did not finish within the configured limit
    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    /// The seed dataset for the in-memory store is unusable
    #[error("seed error: {0}")]
    Seed(String),
}

impl SearchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn query(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            collection: collection.into(),
            message: message.into(),
        }
    }

    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed(message.into())
    }
}

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, SearchError>;
