//! # Staff Repository
//!
//! Capster and kasir records share one table, discriminated by `kind`.
//! The `/capster` and `/kasir` routes are both served from here.

use chrono::{NaiveDate, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::{Staff, StaffKind};

#[derive(Debug, Clone)]
pub struct StaffInput {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub store_id: Option<String>,
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: MySqlPool,
}

impl StaffRepository {
    pub fn new(pool: MySqlPool) -> Self {
        StaffRepository { pool }
    }

    pub async fn create(&self, kind: StaffKind, input: &StaffInput) -> DbResult<Staff> {
        let now = Utc::now();
        let staff = Staff {
            id: Uuid::new_v4().to_string(),
            kind,
            name: input.name.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            store_id: input.store_id.clone(),
            joined_on: input.joined_on,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO staff (id, kind, name, phone, address, store_id, joined_on,
                               is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&staff.id)
        .bind(staff.kind)
        .bind(&staff.name)
        .bind(&staff.phone)
        .bind(&staff.address)
        .bind(&staff.store_id)
        .bind(staff.joined_on)
        .bind(staff.is_active)
        .bind(staff.created_at)
        .bind(staff.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            SELECT id, kind, name, phone, address, store_id, joined_on, is_active,
                   created_at, updated_at
            FROM staff
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn list(&self, kind: StaffKind, include_inactive: bool) -> DbResult<Vec<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            SELECT id, kind, name, phone, address, store_id, joined_on, is_active,
                   created_at, updated_at
            FROM staff
            WHERE kind = ? AND (is_active = TRUE OR ? = TRUE)
            ORDER BY name
            "#,
        )
        .bind(kind)
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn update(&self, id: &str, input: &StaffInput) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE staff
            SET name = ?, phone = ?, address = ?, store_id = ?, joined_on = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.store_id)
        .bind(input.joined_on)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Staff", id));
        }

        Ok(())
    }

    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE staff SET is_active = FALSE, updated_at = ? WHERE id = ? AND is_active = TRUE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Staff", id));
        }

        Ok(())
    }
}
