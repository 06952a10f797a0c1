//! # Order Repository
//!
//! Durable storage for finalized orders.
//!
//! ## Save Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    INSERT orders (id, total_cents, created_at) RETURNING total_cents   │
//! │    INSERT order_lines × N  (position 0..N, measurements as JSON)       │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Either the order and all of its lines exist, or none of them do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use figures_core::{CoreResult, FigureKind, Money, Order, OrderStorage};

// =============================================================================
// Read Models
// =============================================================================

/// A persisted order as read back from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    pub id: Uuid,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<StoredOrderLine>,
}

/// One persisted order line.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrderLine {
    pub position: u32,
    pub kind: FigureKind,
    pub measurements: Vec<f64>,
    pub count: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts the order and its lines in one transaction.
    ///
    /// ## Returns
    /// The total as stored in the `orders` row.
    pub async fn insert(&self, order: &Order) -> DbResult<Money> {
        debug!(id = %order.id(), lines = order.lines().len(), "Inserting order");

        let order_id = order.id().to_string();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let total_cents: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (id, total_cents, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING total_cents
            "#,
        )
        .bind(&order_id)
        .bind(order.total().cents())
        .bind(order.created_at().to_rfc3339())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::Duplicate { .. } => DbError::Duplicate {
                target: format!("order {order_id}"),
            },
            other => other,
        })?;

        for (position, line) in order.lines().iter().enumerate() {
            let measurements = serde_json::to_string(&line.figure().measurements())?;

            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, position, kind, measurements,
                    count, unit_price_cents, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(position as i64)
            .bind(line.kind().as_str())
            .bind(measurements)
            .bind(i64::from(line.count()))
            .bind(line.unit_price().cents())
            .bind(line.line_total().cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(id = %order_id, total_cents, "Order saved");
        Ok(Money::from_cents(total_cents))
    }

    /// Gets an order with its lines by ID.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<StoredOrder>> {
        let row = sqlx::query("SELECT id, total_cents, created_at FROM orders WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let total_cents: i64 = row.try_get("total_cents")?;
        let created_at: String = row.try_get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| DbError::Corrupt(format!("bad created_at for order {id}: {e}")))?
            .with_timezone(&Utc);

        let line_rows = sqlx::query(
            r#"
            SELECT position, kind, measurements, count, unit_price_cents, line_total_cents
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let lines = line_rows
            .into_iter()
            .map(|row| -> DbResult<StoredOrderLine> {
                let position: i64 = row.try_get("position")?;
                let kind: String = row.try_get("kind")?;
                let measurements: String = row.try_get("measurements")?;
                let count: i64 = row.try_get("count")?;

                Ok(StoredOrderLine {
                    position: u32::try_from(position)
                        .map_err(|_| DbError::Corrupt(format!("bad line position {position}")))?,
                    kind: FigureKind::new(kind),
                    measurements: serde_json::from_str(&measurements)?,
                    count: u32::try_from(count)
                        .map_err(|_| DbError::Corrupt(format!("bad line count {count}")))?,
                    unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
                    line_total: Money::from_cents(row.try_get("line_total_cents")?),
                })
            })
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Some(StoredOrder {
            id,
            total: Money::from_cents(total_cents),
            created_at,
            lines,
        }))
    }

    /// Number of stored orders.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

// =============================================================================
// OrderStorage Port
// =============================================================================

#[async_trait]
impl OrderStorage for OrderRepository {
    async fn save(&self, order: &Order) -> CoreResult<Money> {
        Ok(self.insert(order).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use figures_core::{CoreError, FigureFactory, PricingPolicy, ValidatedLine};

    fn sample_order() -> Order {
        let factory = FigureFactory::standard();
        let lines = vec![
            ValidatedLine {
                figure: factory
                    .create(&FigureKind::triangle(), &[3.0, 4.0, 5.0])
                    .unwrap(),
                count: 2,
            },
            ValidatedLine {
                figure: factory.create(&FigureKind::square(), &[2.0]).unwrap(),
                count: 1,
            },
        ];
        Order::price(lines, &PricingPolicy::standard()).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();
        let order = sample_order();

        let confirmed = repo.save(&order).await.unwrap();
        assert_eq!(confirmed, order.total());

        let stored = repo.get_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.total, order.total());
        assert_eq!(stored.lines.len(), 2);

        let first = &stored.lines[0];
        assert_eq!(first.position, 0);
        assert_eq!(first.kind, FigureKind::triangle());
        assert_eq!(first.measurements, vec![3.0, 4.0, 5.0]);
        assert_eq!(first.count, 2);
        assert_eq!(first.unit_price.cents(), 720);
        assert_eq!(first.line_total.cents(), 1440);

        assert_eq!(stored.lines[1].kind, FigureKind::square());
    }

    #[tokio::test]
    async fn test_missing_order_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let found = db.orders().get_by_id(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_save_is_storage_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();
        let order = sample_order();

        repo.save(&order).await.unwrap();
        let err = repo.save(&order).await.unwrap_err();

        match err {
            CoreError::Storage(msg) => assert!(msg.contains("already stored")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
