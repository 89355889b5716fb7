//! Store traits and types

use crate::error::Result;
use crate::query::Predicate;
use async_trait::async_trait;
use std::sync::Arc;

/// A stored record as a JSON object
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Source of store handles
///
/// Selected once at startup and shared by every request.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Backend name, for logs and health output
    fn name(&self) -> &str;

    /// Acquire a handle for the duration of one search
    ///
    /// Fails with `SearchError::Connection` if the store is unreachable.
    async fn acquire(&self) -> Result<Arc<dyn StoreHandle>>;
}

/// An acquired reference to a store
#[async_trait]
pub trait StoreHandle: Send + Sync {
    /// Find every document in the predicate's collection that it matches
    ///
    /// Documents come back in the store's natural order. A match-none
    /// predicate yields an empty sequence without touching storage.
    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Document>>;

    /// Release the handle; calling it more than once is harmless
    async fn close(&self);
}
