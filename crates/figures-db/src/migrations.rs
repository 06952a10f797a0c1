//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the crate and
//! applied by [`Database::new`](crate::Database::new) on every open.
//!
//! ```text
//! 001_initial_schema.sql
//!   inventory    (kind PK, available >= 0)
//!   orders       (id PK, total_cents)
//!   order_lines  (order_id FK ON DELETE CASCADE, position, kind, ...)
//! ```
//!
//! Applied files are recorded in `_sqlx_migrations` and must never be
//! edited; schema changes go in a new `NNN_name.sql`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. A no-op on an up-to-date database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    debug!(embedded = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts, as printed by `seed`.
///
/// A database nothing was applied to yet has no `_sqlx_migrations` table
/// and reports zero applied. Any other failure is returned.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok((embedded, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;
    let applied = usize::try_from(applied)
        .map_err(|_| DbError::Corrupt(format!("negative migration count {applied}")))?;

    Ok((embedded, applied))
}
