//! Backend stores
//!
//! A `Backend` hands out scoped `StoreHandle`s that can look up documents
//! matching a predicate. Two variants exist: a persistent PostgreSQL store
//! opened per request, and an in-process store seeded once per process.

mod lease;
mod memory;
mod postgres;
mod selector;
mod traits;

pub use lease::{with_store_handle, Lease};
pub use memory::{EphemeralStore, MemoryStore, SeedDataset};
pub use postgres::PostgresStore;
pub use selector::{load_backend, BackendKind};
pub use traits::*;
