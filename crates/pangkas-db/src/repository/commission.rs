//! # Commission Repository
//!
//! Per-capster commission percentages. The sale path snapshots the
//! percentage onto each service line, so edits here only affect future
//! sales.

use chrono::Utc;
use serde::Serialize;
use sqlx::MySqlPool;

use crate::error::{DbError, DbResult};
use pangkas_core::CommissionSetting;

/// A commission setting joined with the capster's name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommissionWithStaff {
    pub staff_id: String,
    pub staff_name: String,
    pub percentage: i64,
}

#[derive(Debug, Clone)]
pub struct CommissionRepository {
    pool: MySqlPool,
}

impl CommissionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        CommissionRepository { pool }
    }

    /// Creates or replaces a capster's commission percentage.
    pub async fn upsert(&self, staff_id: &str, percentage: i64) -> DbResult<()> {
        // The FK rejects unknown staff ids.
        sqlx::query(
            r#"
            INSERT INTO commission_settings (staff_id, percentage, updated_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE percentage = VALUES(percentage), updated_at = VALUES(updated_at)
            "#,
        )
        .bind(staff_id)
        .bind(percentage)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, staff_id: &str) -> DbResult<Option<CommissionSetting>> {
        let setting = sqlx::query_as::<_, CommissionSetting>(
            "SELECT staff_id, percentage, updated_at FROM commission_settings WHERE staff_id = ?",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Lists all active capsters with their percentage (0 when unset).
    pub async fn list(&self) -> DbResult<Vec<CommissionWithStaff>> {
        let rows = sqlx::query_as::<_, CommissionWithStaff>(
            r#"
            SELECT s.id AS staff_id, s.name AS staff_name,
                   COALESCE(cs.percentage, 0) AS percentage
            FROM staff s
            LEFT JOIN commission_settings cs ON cs.staff_id = s.id
            WHERE s.kind = 'capster' AND s.is_active = TRUE
            ORDER BY s.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete(&self, staff_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM commission_settings WHERE staff_id = ?")
            .bind(staff_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Commission setting", staff_id));
        }

        Ok(())
    }
}
