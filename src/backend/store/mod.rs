//! Content Store
//!
//! Persists snippets and users in SQLite through a `sqlx` connection pool.
//! The pool is a private field: callers only see the operations below, and
//! every one of them is bounded by the configured store timeout.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs       - ContentStore, connection and migrations
//! ├── clock.rs     - Clock trait, system and manual clocks
//! ├── snippets.rs  - snippet queries (expiry-windowed visibility)
//! └── users.rs     - user insert and credential lookup
//! ```
//!
//! # Visibility
//!
//! Expired snippet rows are never deleted. They are filtered out at read
//! time with `expires > now`, where `now` comes from the store's [`Clock`].
//!
//! # Failures
//!
//! Every fault is returned as a [`StorageError`]; nothing is retried here.

pub mod clock;
pub mod snippets;
pub mod users;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::backend::error::StorageError;
use crate::shared::AppConfig;

pub use clock::{Clock, ManualClock, SystemClock};

/// Snippet and user storage
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl ContentStore {
    /// Open the pool described by `config` and bring the schema up to date.
    ///
    /// In-memory SQLite URLs get a single long-lived connection so that all
    /// requests see the same database.
    pub async fn connect(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        let url = config.database_url.as_str();
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        // Longer than the per-call bound, so a starved pool surfaces as
        // `StorageError::Timeout` rather than a pool error.
        let mut options = SqlitePoolOptions::new().acquire_timeout(config.store_timeout.saturating_mul(2));
        options = if in_memory {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options.max_connections(config.max_db_connections)
        };

        tracing::info!(in_memory, "Connecting to database...");
        let pool = options.connect(url).await?;
        tracing::info!("Database connection pool created successfully");

        let store = Self {
            pool,
            clock,
            timeout: config.store_timeout,
        };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    /// The store's view of the current time
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StorageError::from),
            Err(_) => {
                tracing::warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                Err(StorageError::Timeout { operation })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use sqlx::{pool::PoolConnection, Sqlite};

    /// An in-memory store driven by a manual clock.
    pub async fn memory_store() -> (ContentStore, Arc<ManualClock>) {
        memory_store_with_timeout(crate::shared::config::DEFAULT_STORE_TIMEOUT).await
    }

    pub async fn memory_store_with_timeout(timeout: Duration) -> (ContentStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let config = AppConfig::builder()
            .database_url("sqlite::memory:")
            .store_timeout(timeout)
            .build()
            .unwrap();
        let store = ContentStore::connect(&config, clock.clone()).await.unwrap();
        (store, clock)
    }

    /// Check out the store's only connection so every other call has to wait.
    pub async fn hold_connection(store: &ContentStore) -> PoolConnection<Sqlite> {
        store.pool.acquire().await.unwrap()
    }
}
