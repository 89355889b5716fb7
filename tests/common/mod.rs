//! Recording test double for store backends

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use travel_search::query::{Collection, Predicate};
use travel_search::store::{Backend, Document, MemoryStore, SeedDataset, StoreHandle};
use travel_search::{Result, SearchError};

/// Shared record of everything the double observed
#[derive(Default)]
pub struct Recorder {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub find_calls: AtomicUsize,
    pub starts: Mutex<Vec<(Collection, Instant)>>,
    pub finishes: Mutex<Vec<(Collection, Instant)>>,
}

impl Recorder {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> Vec<(Collection, Instant)> {
        self.starts.lock().unwrap().clone()
    }

    pub fn finishes(&self) -> Vec<(Collection, Instant)> {
        self.finishes.lock().unwrap().clone()
    }
}

/// Backend opening a recorded handle per acquire over an in-memory dataset
pub struct RecordingBackend {
    store: Arc<MemoryStore>,
    recorder: Arc<Recorder>,
    delays: HashMap<Collection, Duration>,
    failing: Option<Collection>,
    refuse: bool,
}

impl RecordingBackend {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            recorder: Arc::new(Recorder::default()),
            delays: HashMap::new(),
            failing: None,
            refuse: false,
        }
    }

    /// One hotel in Paris, the city Paris and the country France
    pub fn example() -> Self {
        Self::new(Arc::new(example_store()))
    }

    pub fn with_delay(mut self, collection: Collection, delay: Duration) -> Self {
        self.delays.insert(collection, delay);
        self
    }

    pub fn failing(mut self, collection: Collection) -> Self {
        self.failing = Some(collection);
        self
    }

    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    pub fn recorder(&self) -> Arc<Recorder> {
        self.recorder.clone()
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn acquire(&self) -> Result<Arc<dyn StoreHandle>> {
        if self.refuse {
            return Err(SearchError::connection("connection refused"));
        }

        self.recorder.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(RecordingHandle {
            store: self.store.clone(),
            recorder: self.recorder.clone(),
            delays: self.delays.clone(),
            failing: self.failing,
        }))
    }
}

struct RecordingHandle {
    store: Arc<MemoryStore>,
    recorder: Arc<Recorder>,
    delays: HashMap<Collection, Duration>,
    failing: Option<Collection>,
}

#[async_trait]
impl StoreHandle for RecordingHandle {
    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Document>> {
        let collection = predicate.collection();
        self.recorder.find_calls.fetch_add(1, Ordering::SeqCst);
        self.recorder
            .starts
            .lock()
            .unwrap()
            .push((collection, Instant::now()));

        // Every lookup suspends at least once, like real I/O would
        tokio::task::yield_now().await;
        if let Some(delay) = self.delays.get(&collection) {
            tokio::time::sleep(*delay).await;
        }

        let outcome = if self.failing == Some(collection) {
            Err(SearchError::query(collection.name(), "injected failure"))
        } else {
            self.store.find_matching(predicate).await
        };

        self.recorder
            .finishes
            .lock()
            .unwrap()
            .push((collection, Instant::now()));
        outcome
    }

    async fn close(&self) {
        self.recorder.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// One hotel in Paris, the city Paris and the country France
pub fn example_dataset() -> SeedDataset {
    SeedDataset::from_json(
        r#"{
            "hotels": [
                { "_id": "h1", "chain_name": "Lumen", "hotel_name": "Grand Hotel", "city": "Paris", "country": "France" }
            ],
            "cities": [ { "_id": "c1", "name": "Paris" } ],
            "countries": [ { "_id": "fr", "country": "France", "countryisocode": "FR" } ]
        }"#,
    )
    .unwrap()
}

pub fn example_store() -> MemoryStore {
    MemoryStore::from_dataset(example_dataset()).unwrap()
}

/// Wraps any backend, counting handles opened and closed
pub struct CountedBackend<B> {
    inner: B,
    recorder: Arc<Recorder>,
}

impl<B: Backend> CountedBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            recorder: Arc::new(Recorder::default()),
        }
    }

    pub fn recorder(&self) -> Arc<Recorder> {
        self.recorder.clone()
    }
}

#[async_trait]
impl<B: Backend> Backend for CountedBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn acquire(&self) -> Result<Arc<dyn StoreHandle>> {
        let inner = self.inner.acquire().await?;
        self.recorder.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(CountedHandle {
            inner,
            recorder: self.recorder.clone(),
        }))
    }
}

struct CountedHandle {
    inner: Arc<dyn StoreHandle>,
    recorder: Arc<Recorder>,
}

#[async_trait]
impl StoreHandle for CountedHandle {
    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Document>> {
        self.recorder.find_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_matching(predicate).await
    }

    async fn close(&self) {
        self.inner.close().await;
        self.recorder.closed.fetch_add(1, Ordering::SeqCst);
    }
}
