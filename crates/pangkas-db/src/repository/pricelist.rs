//! # Pricelist Repository
//!
//! The catalog of billable services (cukur dewasa, cukur anak, creambath,
//! ...) and their prices.

use chrono::Utc;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::PricelistItem;

#[derive(Debug, Clone)]
pub struct PricelistInput {
    pub code: String,
    pub name: String,
    pub price: i64,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct PricelistRepository {
    pool: MySqlPool,
}

impl PricelistRepository {
    pub fn new(pool: MySqlPool) -> Self {
        PricelistRepository { pool }
    }

    pub async fn create(&self, input: &PricelistInput) -> DbResult<PricelistItem> {
        let now = Utc::now();
        let item = PricelistItem {
            id: Uuid::new_v4().to_string(),
            code: input.code.clone(),
            name: input.name.clone(),
            price: input.price,
            duration_minutes: input.duration_minutes,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO pricelist (id, code, name, price, duration_minutes, is_active,
                                   created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.code)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.duration_minutes)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PricelistItem>> {
        let item = sqlx::query_as::<_, PricelistItem>(
            "SELECT id, code, name, price, duration_minutes, is_active, created_at, updated_at \
             FROM pricelist WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<PricelistItem>> {
        let items = sqlx::query_as::<_, PricelistItem>(
            r#"
            SELECT id, code, name, price, duration_minutes, is_active, created_at, updated_at
            FROM pricelist
            WHERE is_active = TRUE OR ? = TRUE
            ORDER BY name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn update(&self, id: &str, input: &PricelistInput) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE pricelist
            SET code = ?, name = ?, price = ?, duration_minutes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.duration_minutes)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Pricelist item", id));
        }

        Ok(())
    }

    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE pricelist SET is_active = FALSE, updated_at = ? \
             WHERE id = ? AND is_active = TRUE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Pricelist item", id));
        }

        Ok(())
    }
}
