//! # Inventory State
//!
//! In-process implementation of [`InventoryStore`].
//!
//! ## Reservation Under One Lock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_and_reserve(items)                                               │
//! │     lock ─────────────────────────────────────────────┐                 │
//! │       plan_reservation(levels, items)                  │ no other batch  │
//! │         ├── Err(InsufficientStock) → nothing written   │ can run here    │
//! │         └── Ok(plan) → write every planned level       │                 │
//! │     unlock ───────────────────────────────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guard lives inside a synchronous closure, so it can never be held
//! across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, warn};

use figures_core::inventory::{plan_release, plan_reservation};
use figures_core::{CoreError, CoreResult, FigureKind, InventoryStore, ReservationItem};

/// Shared per-kind stock levels.
///
/// Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    levels: Arc<Mutex<HashMap<FigureKind, u32>>>,
}

impl InventoryState {
    /// Creates an empty inventory (every kind reads as zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory with the given levels.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let inventory = InventoryState::with_levels([(FigureKind::circle(), 5)]);
    /// ```
    pub fn with_levels(levels: impl IntoIterator<Item = (FigureKind, u32)>) -> Self {
        InventoryState {
            levels: Arc::new(Mutex::new(levels.into_iter().collect())),
        }
    }

    /// Copy of every stored level.
    pub fn snapshot(&self) -> CoreResult<HashMap<FigureKind, u32>> {
        self.with_levels_mut(|levels| Ok(levels.clone()))
    }

    /// Executes a function with exclusive access to the levels.
    fn with_levels_mut<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut HashMap<FigureKind, u32>) -> CoreResult<R>,
    {
        let mut levels = self
            .levels
            .lock()
            .map_err(|_| CoreError::InternalInvariant("inventory lock poisoned".into()))?;
        f(&mut levels)
    }
}

#[async_trait]
impl InventoryStore for InventoryState {
    async fn check_and_reserve(&self, items: &[ReservationItem]) -> CoreResult<()> {
        self.with_levels_mut(|levels| {
            let plan = plan_reservation(levels, items).inspect_err(|err| {
                warn!(error = %err, "Reservation rejected");
            })?;
            for (kind, level) in plan {
                levels.insert(kind, level);
            }
            Ok(())
        })?;

        debug!(items = items.len(), "Reservation applied");
        Ok(())
    }

    async fn release(&self, items: &[ReservationItem]) -> CoreResult<()> {
        self.with_levels_mut(|levels| {
            let plan = plan_release(levels, items)?;
            for (kind, level) in plan {
                levels.insert(kind, level);
            }
            Ok(())
        })?;

        debug!(items = items.len(), "Reservation released");
        Ok(())
    }

    async fn restock(&self, kind: &FigureKind, count: u32) -> CoreResult<()> {
        self.release(&[ReservationItem::new(kind.clone(), count)])
            .await
    }

    async fn available(&self, kind: &FigureKind) -> CoreResult<u32> {
        self.with_levels_mut(|levels| Ok(levels.get(kind).copied().unwrap_or(0)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
