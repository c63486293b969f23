//! # Stock Repository
//!
//! Per-store quantity on hand. Two writers exist: the sale path (always a
//! decrement, handled inside the transaction repository) and the admin
//! adjustment below. Both take the row lock first, and both leave a
//! stock_movements audit row.

use chrono::Utc;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::{Stock, StockMovement};

/// Stock-movement reason for administrative adjustments.
const MOVEMENT_REASON_ADJUSTMENT: &str = "adjustment";

/// A stock row joined with its product's name and SKU.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockWithProduct {
    pub store_id: String,
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub quantity: i64,
}

/// Repository for stock levels.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: MySqlPool,
}

impl StockRepository {
    pub fn new(pool: MySqlPool) -> Self {
        StockRepository { pool }
    }

    /// Lists stock levels at one store, joined with product names.
    pub async fn list_for_store(&self, store_id: &str) -> DbResult<Vec<StockWithProduct>> {
        let rows = sqlx::query_as::<_, StockWithProduct>(
            r#"
            SELECT st.store_id, st.product_id, p.sku, p.name AS product_name, st.quantity
            FROM stocks st
            JOIN products p ON p.id = st.product_id
            WHERE st.store_id = ? AND p.is_active = TRUE
            ORDER BY p.name
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetches one stock row. Missing row means zero on hand.
    pub async fn get(&self, store_id: &str, product_id: &str) -> DbResult<Option<Stock>> {
        let stock = sqlx::query_as::<_, Stock>(
            "SELECT store_id, product_id, quantity, updated_at FROM stocks \
             WHERE store_id = ? AND product_id = ?",
        )
        .bind(store_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stock)
    }

    /// Applies an administrative adjustment (positive or negative delta).
    ///
    /// Runs in its own transaction: locks the stock row, rejects any delta
    /// that would take the quantity negative, creates the row on first
    /// stock-in, and records the movement. Returns the new quantity.
    pub async fn adjust(
        &self,
        store_id: &str,
        product_id: &str,
        delta: i64,
        note: Option<&str>,
    ) -> DbResult<i64> {
        debug!(store_id, product_id, delta, "Adjusting stock");

        let mut tx = self.pool.begin().await?;

        let sku: Option<String> =
            sqlx::query_scalar("SELECT sku FROM products WHERE id = ? AND is_active = TRUE")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        let sku = sku.ok_or_else(|| DbError::not_found("Product", product_id))?;

        let current: Option<i64> = sqlx::query_scalar(
            "SELECT quantity FROM stocks WHERE store_id = ? AND product_id = ? FOR UPDATE",
        )
        .bind(store_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let now = Utc::now();
        let new_quantity = current.unwrap_or(0) + delta;
        if new_quantity < 0 {
            return Err(DbError::InsufficientStock {
                sku,
                available: current.unwrap_or(0),
                requested: -delta,
            });
        }

        match current {
            Some(_) => {
                sqlx::query(
                    "UPDATE stocks SET quantity = ?, updated_at = ? \
                     WHERE store_id = ? AND product_id = ?",
                )
                .bind(new_quantity)
                .bind(now)
                .bind(store_id)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO stocks (store_id, product_id, quantity, updated_at) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(store_id)
                .bind(product_id)
                .bind(new_quantity)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(
            "INSERT INTO stock_movements (id, store_id, product_id, delta, reason, \
             reference_id, note, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(store_id)
        .bind(product_id)
        .bind(delta)
        .bind(MOVEMENT_REASON_ADJUSTMENT)
        .bind(Option::<String>::None)
        .bind(note)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(new_quantity)
    }

    /// Lists the movement ledger for one product at one store, newest first.
    pub async fn movements(
        &self,
        store_id: &str,
        product_id: &str,
        limit: i64,
    ) -> DbResult<Vec<StockMovement>> {
        let limit = if limit <= 0 { 50 } else { limit };

        let rows = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, store_id, product_id, delta, reason, reference_id, note, created_at
            FROM stock_movements
            WHERE store_id = ? AND product_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(store_id)
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
