//! # Ports
//!
//! The two collaborators the order workflow depends on. figures-core only
//! defines the contracts; figures-db and figures-service provide the
//! implementations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderService                                                           │
//! │     │                                                                   │
//! │     ├──► InventoryStore                                                 │
//! │     │      ├── InventoryState      (in-process, Mutex<HashMap>)         │
//! │     │      └── InventoryRepository (SQLite, one transaction per batch)  │
//! │     │                                                                   │
//! │     └──► OrderStorage                                                   │
//! │            └── OrderRepository     (SQLite)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::figure::FigureKind;
use crate::money::Money;
use crate::order::{Order, ReservationItem};

/// Shared per-kind stock levels.
///
/// ## Contract
/// - `check_and_reserve` is all-or-nothing for the whole batch and
///   indivisible with respect to every other mutating call
/// - On shortfall it returns `CoreError::InsufficientStock` for the first
///   failing item in input order and changes nothing
/// - Levels never go below zero; a would-be negative level is
///   `CoreError::InternalInvariant`
/// - Kinds without a record read as zero
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Atomically verifies and decrements every item of the batch.
    async fn check_and_reserve(&self, items: &[ReservationItem]) -> CoreResult<()>;

    /// Adds counts back after a reservation must be undone.
    async fn release(&self, items: &[ReservationItem]) -> CoreResult<()>;

    /// Adds new stock for a kind.
    async fn restock(&self, kind: &FigureKind, count: u32) -> CoreResult<()>;

    /// Current available count for a kind.
    async fn available(&self, kind: &FigureKind) -> CoreResult<u32>;
}

/// Durable home for finalized orders.
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Saves the order and returns the total the store confirmed.
    ///
    /// Failures are reported as `CoreError::Storage`.
    async fn save(&self, order: &Order) -> CoreResult<Money>;
}
