//! # Database Migrations
//!
//! Embedded SQL migrations for Pangkas POS.
//!
//! The `sqlx::migrate!()` macro embeds all SQL files from the migrations
//! directory into the binary at compile time; no runtime file access is
//! needed. Applied migrations are tracked in `_sqlx_migrations`.
//!
//! ## Adding New Migrations
//! 1. Create a new file in `migrations/mysql/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. NEVER modify existing migrations, always add new ones

use sqlx::MySqlPool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the `migrations/mysql` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/mysql");

/// Runs all pending database migrations in order.
///
/// Idempotent and transactional per migration.
pub async fn run_migrations(pool: &MySqlPool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns (total_migrations, applied_migrations) for diagnostics.
pub async fn migration_status(pool: &MySqlPool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
