//! # figures-db: Database Layer for the Figures Store
//!
//! SQLite-backed implementations of the `figures-core` ports, using sqlx
//! for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Figures Store Data Flow                            │
//! │                                                                         │
//! │  OrderService::place_order                                             │
//! │       │                                                                 │
//! │       ▼  (via InventoryStore / OrderStorage traits)                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   figures-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ InventoryRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo      │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Port implementations (inventory, orders)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use figures_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("figures.db")).await?;
//!
//! db.inventory().restock(&FigureKind::circle(), 10).await?;
//! let service = OrderService::new(factory, pricing, Arc::new(db.inventory()), Arc::new(db.orders()))?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::inventory::InventoryRepository;
pub use repository::order::{OrderRepository, StoredOrder};
