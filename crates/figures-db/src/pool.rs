//! # Database Handle
//!
//! Opens the SQLite file, brings the schema up to date and hands out
//! repositories that share one pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DbConfig { path, max_connections, busy_timeout, acquire_timeout }      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new ── open (WAL, foreign keys, busy_timeout)                │
//! │       │        └─ migrate                                               │
//! │       ▼                                                                 │
//! │  SqlitePool ──┬──► db.inventory()  InventoryRepository                  │
//! │               └──► db.orders()     OrderRepository                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Writers
//! SQLite admits one writer at a time. A reservation that finds the write
//! lock taken waits up to `busy_timeout` before failing with
//! `SQLITE_BUSY`, which surfaces as a storage error.

use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::inventory::InventoryRepository;
use crate::repository::order::OrderRepository;

const MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives and how many connections it may hold.
///
/// ```rust,ignore
/// let config = DbConfig::new("./figures.db").busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,

    /// Default: 5. Forced to 1 for in-memory databases.
    pub max_connections: u32,

    /// Wait for the SQLite write lock. Default: 5 seconds.
    pub busy_timeout: Duration,

    /// Wait for a free pool connection. Default: 10 seconds.
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(10),
        }
    }

    /// A private database that disappears with the pool. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig::new(MEMORY).max_connections(1)
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = if self.is_memory() {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the store. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) and migrates the database.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout);

        // Each in-memory connection sees its own database, and recycling
        // the only connection would wipe it.
        let max_connections = if config.is_memory() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
            1
        } else {
            config.max_connections.max(1)
        };

        let pool = pool_options
            .max_connections(max_connections)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Unavailable(format!("{}: {e}", config.path.display())))?;

        info!(
            path = %config.path.display(),
            max_connections,
            "Opened figures database"
        );

        migrations::run_migrations(&pool).await?;

        Ok(Database { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed figures database");
    }

    /// True while the pool can still run a query.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
