//! # Profile Repository
//!
//! The shop profile singleton (row id 1), printed on every receipt.

use chrono::Utc;
use sqlx::MySqlPool;

use crate::error::{DbError, DbResult};
use pangkas_core::ShopProfile;

#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub receipt_footer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: MySqlPool,
}

impl ProfileRepository {
    pub fn new(pool: MySqlPool) -> Self {
        ProfileRepository { pool }
    }

    /// The migration seeds the singleton, so a missing row is a broken
    /// deployment rather than a user error.
    pub async fn get(&self) -> DbResult<ShopProfile> {
        let profile = sqlx::query_as::<_, ShopProfile>(
            "SELECT id, name, address, phone, logo_path, receipt_footer, updated_at \
             FROM profile WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| DbError::Internal("profile singleton row is missing".to_string()))
    }

    pub async fn update(&self, input: &ProfileInput) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE profile
            SET name = ?, address = ?, phone = ?, receipt_footer = ?, updated_at = ?
            WHERE id = 1
            "#,
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.receipt_footer)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_logo(&self, path: &str) -> DbResult<()> {
        sqlx::query("UPDATE profile SET logo_path = ?, updated_at = ? WHERE id = 1")
            .bind(path)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
