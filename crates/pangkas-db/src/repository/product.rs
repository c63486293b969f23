//! # Product Repository
//!
//! CRUD for the retail product catalog. Stock levels live in the stock
//! repository; this one only owns master data.

use chrono::Utc;
use sqlx::MySqlPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::Product;

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    pub cost_price: i64,
    pub sale_price: i64,
}

/// Repository for product master data.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: MySqlPool,
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        ProductRepository { pool }
    }

    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku: input.sku.clone(),
            name: input.name.clone(),
            cost_price: input.cost_price,
            sale_price: input.sale_price,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, sku = %product.sku, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, cost_price, sale_price, is_active,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.cost_price)
        .bind(product.sale_price)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, cost_price, sale_price, is_active, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products, active only unless `include_inactive`.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, cost_price, sale_price, is_active, created_at, updated_at
            FROM products
            WHERE is_active = TRUE OR ? = TRUE
            ORDER BY name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn update(&self, id: &str, input: &ProductInput) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET sku = ?, name = ?, cost_price = ?, sale_price = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.sku)
        .bind(&input.name)
        .bind(input.cost_price)
        .bind(input.sale_price)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft delete. Historical sale lines keep their snapshots.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = ? WHERE id = ? AND is_active = TRUE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
