//! Ephemeral in-process store seeded from a bundled dataset

use super::traits::{Backend, Document, StoreHandle};
use crate::error::{Result, SearchError};
use crate::query::{Collection, Predicate};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Seed dataset compiled into the binary
const SEED_JSON: &str = include_str!("../../data/seed.json");

/// Process-wide seeded store, built on first use
static SEEDED: OnceCell<Arc<MemoryStore>> = OnceCell::new();

/// Documents to load into a `MemoryStore`, one list per collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedDataset {
    pub hotels: Vec<Document>,
    pub cities: Vec<Document>,
    pub countries: Vec<Document>,
}

impl SeedDataset {
    /// The bundled dataset
    pub fn bundled() -> Result<Self> {
        Self::from_json(SEED_JSON)
    }

    /// Parse a dataset from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SearchError::seed(format!("invalid seed JSON: {e}")))
    }

    fn into_collections(self) -> [(Collection, Vec<Document>); 3] {
        [
            (Collection::Hotels, self.hotels),
            (Collection::Cities, self.cities),
            (Collection::Countries, self.countries),
        ]
    }
}

/// Read-only in-memory document store
///
/// Shared across requests once seeded; it doubles as its own store handle.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<Collection, Vec<Document>>,
}

impl MemoryStore {
    /// Build a store from a dataset, validating document ids
    pub fn from_dataset(dataset: SeedDataset) -> Result<Self> {
        let mut collections = HashMap::new();

        for (collection, documents) in dataset.into_collections() {
            let mut seen = HashSet::with_capacity(documents.len());
            for (index, document) in documents.iter().enumerate() {
                let id = document
                    .get("_id")
                    .and_then(|id| id.as_str())
                    .ok_or_else(|| {
                        SearchError::seed(format!(
                            "{collection} document #{index} has no string _id"
                        ))
                    })?;
                if !seen.insert(id) {
                    return Err(SearchError::seed(format!(
                        "duplicate _id {id:?} in {collection}"
                    )));
                }
            }
            collections.insert(collection, documents);
        }

        Ok(Self { collections })
    }

    /// The process-wide store seeded from the bundled dataset
    ///
    /// Seeding runs at most once per process; later calls return the same
    /// instance.
    pub fn seeded() -> Result<Arc<Self>> {
        SEEDED
            .get_or_try_init(|| {
                let store = Self::from_dataset(SeedDataset::bundled()?)?;
                info!(
                    "Seeded in-memory store: {} hotels, {} cities, {} countries",
                    store.len(Collection::Hotels),
                    store.len(Collection::Cities),
                    store.len(Collection::Countries)
                );
                Ok(Arc::new(store))
            })
            .cloned()
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, Vec::len)
    }

    /// Documents of a collection in seed order
    pub fn documents(&self, collection: Collection) -> &[Document] {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[async_trait]
impl StoreHandle for MemoryStore {
    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Document>> {
        if predicate.is_match_none() {
            return Ok(Vec::new());
        }

        let matches: Vec<Document> = self
            .documents(predicate.collection())
            .iter()
            .filter(|document| predicate.matches(document))
            .cloned()
            .collect();

        debug!(
            "Memory lookup on {} matched {} documents",
            predicate.collection(),
            matches.len()
        );

        Ok(matches)
    }

    async fn close(&self) {}
}

/// Backend serving every request from one shared `MemoryStore`
#[derive(Debug, Clone)]
pub struct EphemeralStore {
    store: Arc<MemoryStore>,
}

impl EphemeralStore {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Backend over the process-wide seeded store
    pub fn seeded() -> Result<Self> {
        Ok(Self::new(MemoryStore::seeded()?))
    }
}

#[async_trait]
impl Backend for EphemeralStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn acquire(&self) -> Result<Arc<dyn StoreHandle>> {
        Ok(self.store.clone())
    }
}
