//! Persistent PostgreSQL store
//!
//! Each collection lives in its own table holding one JSONB document per row:
//!
//! ```sql
//! CREATE TABLE hotels    (doc JSONB NOT NULL);
//! CREATE TABLE cities    (doc JSONB NOT NULL);
//! CREATE TABLE countries (doc JSONB NOT NULL);
//! ```
//!
//! Tables are created and loaded outside this service.
//!
//! Case folding must not depend on the server's `LC_CTYPE`, so `lower()` is
//! never used. The statement selects candidates instead: fields that are
//! printable ASCII are folded with `translate` and searched with `strpos`
//! for the Unicode-folded needle, and any field holding other characters is
//! always a candidate. Every candidate is then checked with
//! [`Predicate::matches`], which makes the result identical to the in-memory
//! store.

use super::traits::{Backend, Document, StoreHandle};
use crate::error::{Result, SearchError};
use crate::query::Predicate;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, Postgres};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Connections opened for one search, one per collection lookup
const LOOKUP_CONNECTIONS: u32 = 3;

const ASCII_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ASCII_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Backend opening a private set of PostgreSQL connections per search
#[derive(Debug, Clone)]
pub struct PostgresStore {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PostgresStore {
    /// Create a store for a `postgres://` connection URL
    ///
    /// No connection is made until a handle is acquired.
    pub fn new(url: &str, connect_timeout: Duration) -> Result<Self> {
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(SearchError::configuration(
                "database URL must start with postgres:// or postgresql://",
            ));
        }

        let options = PgConnectOptions::from_str(url)
            .map_err(|e| SearchError::configuration(format!("invalid database URL: {e}")))?;

        Ok(Self {
            options,
            connect_timeout,
        })
    }
}

#[async_trait]
impl Backend for PostgresStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn acquire(&self) -> Result<Arc<dyn StoreHandle>> {
        debug!("Connecting to PostgreSQL");

        let connect = PgPoolOptions::new()
            .max_connections(LOOKUP_CONNECTIONS)
            .acquire_timeout(self.connect_timeout)
            .test_before_acquire(false)
            .connect_with(self.options.clone());

        let pool = timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| {
                SearchError::connection(format!(
                    "timed out after {:?} connecting to database",
                    self.connect_timeout
                ))
            })?
            .map_err(|e| SearchError::connection(format!("failed to connect: {e}")))?;

        Ok(Arc::new(PostgresHandle { pool }))
    }
}

/// Connections owned by a single search
///
/// Concurrent lookups each run on their own connection. The pool is never
/// shared with another search and is closed with the handle.
struct PostgresHandle {
    pool: PgPool,
}

#[async_trait]
impl StoreHandle for PostgresHandle {
    async fn find_matching(&self, predicate: &Predicate) -> Result<Vec<Document>> {
        let collection = predicate.collection();
        if predicate.is_match_none() {
            return Ok(Vec::new());
        }

        let rows = select_candidates(predicate)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| lookup_error(collection.name(), e))?;

        let mut documents = Vec::new();
        for row in rows {
            let Json(document) = row
                .try_get::<Json<Document>, _>("doc")
                .map_err(|e| SearchError::query(collection.name(), format!("bad row: {e}")))?;
            if predicate.matches(&document) {
                documents.push(document);
            }
        }

        Ok(documents)
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("PostgreSQL connections closed");
    }
}

/// Classify a lookup failure
fn lookup_error(collection: &str, error: sqlx::Error) -> SearchError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            SearchError::connection(format!("lookup on {collection} lost its connection: {error}"))
        }
        other => SearchError::query(collection, other.to_string()),
    }
}

/// Build the candidate statement for a predicate
///
/// Table and field names come from the fixed collection table; only the
/// folded needle is user input and it is always bound.
fn select_candidates(predicate: &Predicate) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new("SELECT doc FROM ");
    builder.push(predicate.collection().name());
    builder.push(" WHERE ");

    for (i, field) in predicate.fields().iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(format!(
            "(strpos(translate(doc->>'{field}', '{ASCII_UPPER}', '{ASCII_LOWER}'), "
        ));
        builder.push_bind(predicate.folded());
        builder.push(format!(") > 0 OR (doc->>'{field}') !~ '^[ -~]*$')"));
    }

    builder
}
