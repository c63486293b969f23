//! # Store Repository
//!
//! Barbershop branches. The 2-digit `code` prefixes every receipt number,
//! so it is unique and immutable after creation.

use chrono::Utc;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::Store;

#[derive(Debug, Clone)]
pub struct StoreInput {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: MySqlPool,
}

impl StoreRepository {
    pub fn new(pool: MySqlPool) -> Self {
        StoreRepository { pool }
    }

    pub async fn create(&self, input: &StoreInput) -> DbResult<Store> {
        let now = Utc::now();
        let store = Store {
            id: Uuid::new_v4().to_string(),
            code: input.code.clone(),
            name: input.name.clone(),
            address: input.address.clone(),
            phone: input.phone.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO stores (id, code, name, address, phone, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&store.id)
        .bind(&store.code)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.phone)
        .bind(store.is_active)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(store)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            "SELECT id, code, name, address, phone, is_active, created_at, updated_at \
             FROM stores WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, code, name, address, phone, is_active, created_at, updated_at
            FROM stores
            WHERE is_active = TRUE OR ? = TRUE
            ORDER BY code
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Updates the mutable fields. `code` stays fixed; historical receipt
    /// numbers must keep pointing at the same store.
    pub async fn update(&self, id: &str, input: &StoreInput) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE stores SET name = ?, address = ?, phone = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }

    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE stores SET is_active = FALSE, updated_at = ? WHERE id = ? AND is_active = TRUE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }
}
