//! # Payroll Repository
//!
//! Salary settings, bonuses and general deductions. Kasbon installments
//! are generated by the kasbon repository; this one reads them back as
//! plain deduction rows when summing a period.

use chrono::Utc;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::{Bonus, Deduction, DeductionKind, SalarySetting};

#[derive(Debug, Clone)]
pub struct PayrollRepository {
    pool: MySqlPool,
}

impl PayrollRepository {
    pub fn new(pool: MySqlPool) -> Self {
        PayrollRepository { pool }
    }

    // =========================================================================
    // Salary settings
    // =========================================================================

    pub async fn upsert_salary(&self, staff_id: &str, base_salary: i64) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO salary_settings (staff_id, base_salary, updated_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE base_salary = VALUES(base_salary),
                                    updated_at = VALUES(updated_at)
            "#,
        )
        .bind(staff_id)
        .bind(base_salary)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_salary(&self, staff_id: &str) -> DbResult<Option<SalarySetting>> {
        let setting = sqlx::query_as::<_, SalarySetting>(
            "SELECT staff_id, base_salary, updated_at FROM salary_settings WHERE staff_id = ?",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    // =========================================================================
    // Bonuses
    // =========================================================================

    pub async fn create_bonus(
        &self,
        staff_id: &str,
        amount: i64,
        note: Option<String>,
        period: &str,
    ) -> DbResult<Bonus> {
        let bonus = Bonus {
            id: Uuid::new_v4().to_string(),
            staff_id: staff_id.to_string(),
            amount,
            note,
            period: period.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO bonuses (id, staff_id, amount, note, period, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&bonus.id)
        .bind(&bonus.staff_id)
        .bind(bonus.amount)
        .bind(&bonus.note)
        .bind(&bonus.period)
        .bind(bonus.created_at)
        .execute(&self.pool)
        .await?;

        Ok(bonus)
    }

    pub async fn list_bonuses(
        &self,
        period: &str,
        staff_id: Option<&str>,
    ) -> DbResult<Vec<Bonus>> {
        let bonuses = sqlx::query_as::<_, Bonus>(
            r#"
            SELECT id, staff_id, amount, note, period, created_at
            FROM bonuses
            WHERE period = ? AND (? IS NULL OR staff_id = ?)
            ORDER BY created_at
            "#,
        )
        .bind(period)
        .bind(staff_id)
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bonuses)
    }

    pub async fn delete_bonus(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM bonuses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Bonus", id));
        }

        Ok(())
    }

    // =========================================================================
    // Deductions (potongan)
    // =========================================================================

    pub async fn create_deduction(
        &self,
        staff_id: &str,
        amount: i64,
        note: Option<String>,
        period: &str,
    ) -> DbResult<Deduction> {
        let deduction = Deduction {
            id: Uuid::new_v4().to_string(),
            staff_id: staff_id.to_string(),
            amount,
            kind: DeductionKind::General,
            note,
            period: period.to_string(),
            cash_advance_id: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO deductions (id, staff_id, amount, kind, note, period,
                                    cash_advance_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&deduction.id)
        .bind(&deduction.staff_id)
        .bind(deduction.amount)
        .bind(deduction.kind)
        .bind(&deduction.note)
        .bind(&deduction.period)
        .bind(&deduction.cash_advance_id)
        .bind(deduction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(deduction)
    }

    pub async fn list_deductions(
        &self,
        period: &str,
        staff_id: Option<&str>,
    ) -> DbResult<Vec<Deduction>> {
        let deductions = sqlx::query_as::<_, Deduction>(
            r#"
            SELECT id, staff_id, amount, kind, note, period, cash_advance_id, created_at
            FROM deductions
            WHERE period = ? AND (? IS NULL OR staff_id = ?)
            ORDER BY created_at
            "#,
        )
        .bind(period)
        .bind(staff_id)
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deductions)
    }

    /// Deletes a general deduction. Kasbon installments are owned by their
    /// schedule and cannot be removed here.
    pub async fn delete_deduction(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM deductions WHERE id = ? AND kind = 'general'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Deduction", id));
        }

        Ok(())
    }
}
