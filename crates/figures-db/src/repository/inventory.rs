//! # Inventory Repository
//!
//! Per-kind stock levels persisted in the `inventory` table.
//!
//! ## Atomic Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    for item in batch (input order):                                     │
//! │      UPDATE inventory SET available = available - :count               │
//! │       WHERE kind = :kind AND available >= :count                       │
//! │      │                                                                  │
//! │      ├── 1 row  → next item                                             │
//! │      └── 0 rows → read current level, ROLLBACK, InsufficientStock      │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first UPDATE takes SQLite's write lock, so no other reservation
//! can interleave between the check and the decrement. Repeated kinds in
//! one batch see the decrements of earlier items because they run inside
//! the same transaction.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use figures_core::{CoreError, CoreResult, FigureKind, InventoryStore, ReservationItem};

/// Repository for stock levels.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Overwrites the level for a kind, creating the row if needed.
    ///
    /// Used by the seed tool and startup configuration; not part of the
    /// order workflow.
    pub async fn set_level(&self, kind: &FigureKind, count: u32) -> DbResult<()> {
        debug!(kind = %kind, count, "Setting inventory level");

        sqlx::query(
            r#"
            INSERT INTO inventory (kind, available, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (kind) DO UPDATE SET
                available = excluded.available,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(kind.as_str())
        .bind(i64::from(count))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists every stored level, ordered by kind.
    pub async fn levels(&self) -> DbResult<Vec<(FigureKind, u32)>> {
        let rows = sqlx::query("SELECT kind, available FROM inventory ORDER BY kind")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> DbResult<(FigureKind, u32)> {
                let kind: String = row.try_get("kind")?;
                let available: i64 = row.try_get("available")?;
                let available = u32::try_from(available).map_err(|_| {
                    DbError::Corrupt(format!("{kind} has out-of-range level {available}"))
                })?;
                Ok((FigureKind::new(kind), available))
            })
            .collect()
    }

    /// Adds `count` to a kind inside an open transaction.
    ///
    /// Returns `false` when the new level would exceed `u32::MAX`.
    async fn add_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        kind: &FigureKind,
        count: u32,
        now: &str,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO inventory (kind, available, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (kind) DO UPDATE SET
                available = inventory.available + excluded.available,
                updated_at = excluded.updated_at
            WHERE inventory.available + excluded.available <= ?4
            "#,
        )
        .bind(kind.as_str())
        .bind(i64::from(count))
        .bind(now)
        .bind(i64::from(u32::MAX))
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reads a level inside an open transaction; missing kinds are zero.
    async fn level_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        kind: &FigureKind,
    ) -> DbResult<u32> {
        let level: Option<i64> = sqlx::query_scalar("SELECT available FROM inventory WHERE kind = ?1")
            .bind(kind.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        let level = level.unwrap_or(0);
        u32::try_from(level)
            .map_err(|_| DbError::Corrupt(format!("{kind} has out-of-range level {level}")))
    }
}

// =============================================================================
// InventoryStore Port
// =============================================================================

#[async_trait]
impl InventoryStore for InventoryRepository {
    async fn check_and_reserve(&self, items: &[ReservationItem]) -> CoreResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        for item in items {
            let result = sqlx::query(
                r#"
                UPDATE inventory
                SET available = available - ?2,
                    updated_at = ?3
                WHERE kind = ?1 AND available >= ?2
                "#,
            )
            .bind(item.kind.as_str())
            .bind(i64::from(item.count))
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                let available = Self::level_in_tx(&mut tx, &item.kind).await?;
                tx.rollback().await.map_err(DbError::transaction)?;

                warn!(
                    kind = %item.kind,
                    available,
                    requested = item.count,
                    "Reservation rejected"
                );
                return Err(CoreError::InsufficientStock {
                    kind: item.kind.clone(),
                    available,
                    requested: item.count,
                });
            }
        }

        tx.commit().await.map_err(DbError::transaction)?;

        debug!(items = items.len(), "Reservation committed");
        Ok(())
    }

    async fn release(&self, items: &[ReservationItem]) -> CoreResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        for item in items {
            if !Self::add_in_tx(&mut tx, &item.kind, item.count, &now).await? {
                tx.rollback().await.map_err(DbError::transaction)?;
                return Err(CoreError::InternalInvariant(format!(
                    "{} stock level overflow",
                    item.kind
                )));
            }
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(items = items.len(), "Reservation released");
        Ok(())
    }

    async fn restock(&self, kind: &FigureKind, count: u32) -> CoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        if !Self::add_in_tx(&mut tx, kind, count, &now).await? {
            tx.rollback().await.map_err(DbError::transaction)?;
            return Err(CoreError::InternalInvariant(format!(
                "{kind} stock level overflow"
            )));
        }

        tx.commit().await.map_err(DbError::transaction)?;

        debug!(kind = %kind, count, "Restocked");
        Ok(())
    }

    async fn available(&self, kind: &FigureKind) -> CoreResult<u32> {
        let level: Option<i64> = sqlx::query_scalar("SELECT available FROM inventory WHERE kind = ?1")
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        let level = level.unwrap_or(0);
        let level = u32::try_from(level)
            .map_err(|_| DbError::Corrupt(format!("{kind} has out-of-range level {level}")))?;
        Ok(level)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use std::sync::Arc;

    async fn setup(levels: &[(&str, u32)]) -> (Database, InventoryRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();
        for (kind, count) in levels {
            repo.set_level(&FigureKind::new(*kind), *count).await.unwrap();
        }
        (db, repo)
    }

    #[tokio::test]
    async fn test_reserve_decrements_every_item() {
        let (_db, repo) = setup(&[("Circle", 5), ("Square", 2)]).await;

        repo.check_and_reserve(&[
            ReservationItem::new("Circle", 3),
            ReservationItem::new("Square", 2),
        ])
        .await
        .unwrap();

        assert_eq!(repo.available(&FigureKind::circle()).await.unwrap(), 2);
        assert_eq!(repo.available(&FigureKind::square()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shortfall_changes_nothing() {
        let (_db, repo) = setup(&[("Circle", 5), ("Square", 1)]).await;

        let err = repo
            .check_and_reserve(&[
                ReservationItem::new("Circle", 3),
                ReservationItem::new("Square", 2),
            ])
            .await
            .unwrap_err();

        match err {
            CoreError::InsufficientStock {
                kind,
                available,
                requested,
            } => {
                assert_eq!(kind, FigureKind::square());
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("unexpected {other:?}"),
        }

        // Circle decrement was rolled back
        assert_eq!(repo.available(&FigureKind::circle()).await.unwrap(), 5);
        assert_eq!(repo.available(&FigureKind::square()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_kind_reads_as_zero() {
        let (_db, repo) = setup(&[]).await;

        assert_eq!(repo.available(&FigureKind::new("Hexagon")).await.unwrap(), 0);

        let err = repo
            .check_and_reserve(&[ReservationItem::new("Hexagon", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 0, .. }));
    }

    #[tokio::test]
    async fn test_repeated_kind_shares_level() {
        let (_db, repo) = setup(&[("Triangle", 3)]).await;

        let err = repo
            .check_and_reserve(&[
                ReservationItem::new("Triangle", 2),
                ReservationItem::new("Triangle", 2),
            ])
            .await
            .unwrap_err();

        // Second item sees the first one's decrement
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 1, requested: 2, .. }
        ));
        assert_eq!(repo.available(&FigureKind::triangle()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_release_restores_levels() {
        let (_db, repo) = setup(&[("Circle", 4)]).await;
        let items = vec![ReservationItem::new("Circle", 4)];

        repo.check_and_reserve(&items).await.unwrap();
        assert_eq!(repo.available(&FigureKind::circle()).await.unwrap(), 0);

        repo.release(&items).await.unwrap();
        assert_eq!(repo.available(&FigureKind::circle()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_release_overflow_is_invariant_violation() {
        let (_db, repo) = setup(&[("Circle", u32::MAX)]).await;

        let err = repo
            .release(&[ReservationItem::new("Circle", 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::InternalInvariant(_)));
        assert_eq!(repo.available(&FigureKind::circle()).await.unwrap(), u32::MAX);
    }

    #[tokio::test]
    async fn test_restock_creates_and_adds() {
        let (_db, repo) = setup(&[]).await;

        repo.restock(&FigureKind::square(), 2).await.unwrap();
        repo.restock(&FigureKind::square(), 3).await.unwrap();

        assert_eq!(repo.available(&FigureKind::square()).await.unwrap(), 5);
        assert_eq!(
            repo.levels().await.unwrap(),
            vec![(FigureKind::square(), 5)]
        );
    }

    #[tokio::test]
    async fn test_concurrent_reservations_never_oversell() {
        let (_db, repo) = setup(&[("Circle", 10)]).await;
        let repo = Arc::new(repo);

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.check_and_reserve(&[ReservationItem::new("Circle", 1)])
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 10);
        assert_eq!(repo.available(&FigureKind::circle()).await.unwrap(), 0);
    }
}
