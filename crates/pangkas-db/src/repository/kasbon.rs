//! # Kasbon Repository
//!
//! Employee cash advances and their installment schedule.
//!
//! Two payroll rules live here rather than in a scheduler, matching how
//! the back office actually uses them:
//!
//! - `ensure_installments(period)` inserts the installment deduction for
//!   every active kasbon that has one due in `period`. The unique key on
//!   (cash_advance_id, period) makes it idempotent; the potongan listing
//!   and the payroll report call it before reading.
//! - `apply_lapse(current)` flips active advances whose repayment window
//!   has fully elapsed to `lapsed`. The kasbon listing calls it first, so
//!   the flip is a side effect of the read path, not a background job.

use chrono::Utc;
use sqlx::MySqlPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::payroll::{has_lapsed, installment_for, installment_index, Period};
use pangkas_core::{CashAdvance, DeductionKind, KasbonStatus};

#[derive(Debug, Clone)]
pub struct KasbonInput {
    pub staff_id: String,
    pub principal: i64,
    pub tenor: i32,
    pub start_period: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KasbonRepository {
    pool: MySqlPool,
}

impl KasbonRepository {
    pub fn new(pool: MySqlPool) -> Self {
        KasbonRepository { pool }
    }

    pub async fn create(&self, input: &KasbonInput) -> DbResult<CashAdvance> {
        let now = Utc::now();
        let kasbon = CashAdvance {
            id: Uuid::new_v4().to_string(),
            staff_id: input.staff_id.clone(),
            principal: input.principal,
            tenor: input.tenor,
            start_period: input.start_period.clone(),
            status: KasbonStatus::Active,
            note: input.note.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO cash_advances (id, staff_id, principal, tenor, start_period,
                                       status, note, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&kasbon.id)
        .bind(&kasbon.staff_id)
        .bind(kasbon.principal)
        .bind(kasbon.tenor)
        .bind(&kasbon.start_period)
        .bind(kasbon.status)
        .bind(&kasbon.note)
        .bind(kasbon.created_at)
        .bind(kasbon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(kasbon)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CashAdvance>> {
        let kasbon = sqlx::query_as::<_, CashAdvance>(
            r#"
            SELECT id, staff_id, principal, tenor, start_period, status, note,
                   created_at, updated_at
            FROM cash_advances
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(kasbon)
    }

    /// Lists cash advances after applying the lapse patch for `current`.
    pub async fn list(&self, current: Period, staff_id: Option<&str>) -> DbResult<Vec<CashAdvance>> {
        self.apply_lapse(current).await?;

        let rows = sqlx::query_as::<_, CashAdvance>(
            r#"
            SELECT id, staff_id, principal, tenor, start_period, status, note,
                   created_at, updated_at
            FROM cash_advances
            WHERE ? IS NULL OR staff_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(staff_id)
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Marks an advance settled (fully repaid or written off by an admin).
    pub async fn settle(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE cash_advances SET status = 'settled', updated_at = ? \
             WHERE id = ? AND status = 'active'",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cash advance (active)", id));
        }

        Ok(())
    }

    /// Flips active advances whose repayment window elapsed to `lapsed`.
    /// Idempotent; the row set shrinks to empty once everything is flipped.
    pub async fn apply_lapse(&self, current: Period) -> DbResult<u64> {
        let active = sqlx::query_as::<_, CashAdvance>(
            r#"
            SELECT id, staff_id, principal, tenor, start_period, status, note,
                   created_at, updated_at
            FROM cash_advances
            WHERE status = 'active'
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut flipped = 0u64;
        for kasbon in active {
            let start = match Period::parse(&kasbon.start_period) {
                Ok(p) => p,
                // A malformed stored period never lapses by itself;
                // leave it for an admin to correct.
                Err(_) => continue,
            };

            if has_lapsed(start, kasbon.tenor, current) {
                let result = sqlx::query(
                    "UPDATE cash_advances SET status = 'lapsed', updated_at = ? \
                     WHERE id = ? AND status = 'active'",
                )
                .bind(Utc::now())
                .bind(&kasbon.id)
                .execute(&self.pool)
                .await?;
                flipped += result.rows_affected();
            }
        }

        if flipped > 0 {
            debug!(flipped, period = %current, "Lapsed cash advances");
        }

        Ok(flipped)
    }

    /// Inserts the installment deduction for every active kasbon with one
    /// due in `period`. Safe to call repeatedly: the unique key on
    /// (cash_advance_id, period) turns re-runs into no-ops.
    pub async fn ensure_installments(&self, period: Period) -> DbResult<u64> {
        let period_str = period.to_string_form();

        let active = sqlx::query_as::<_, CashAdvance>(
            r#"
            SELECT id, staff_id, principal, tenor, start_period, status, note,
                   created_at, updated_at
            FROM cash_advances
            WHERE status = 'active'
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut inserted = 0u64;
        for kasbon in active {
            let start = match Period::parse(&kasbon.start_period) {
                Ok(p) => p,
                Err(_) => continue,
            };

            let Some(index) = installment_index(start, kasbon.tenor, period) else {
                continue;
            };
            let amount = installment_for(kasbon.principal, kasbon.tenor, index);

            let result = sqlx::query(
                r#"
                INSERT IGNORE INTO deductions (id, staff_id, amount, kind, note, period,
                                               cash_advance_id, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&kasbon.staff_id)
            .bind(amount)
            .bind(DeductionKind::CashAdvanceInstallment)
            .bind(format!("Angsuran kasbon {}/{}", index + 1, kasbon.tenor))
            .bind(&period_str)
            .bind(&kasbon.id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }

        if inserted > 0 {
            debug!(inserted, period = %period_str, "Generated kasbon installments");
        }

        Ok(inserted)
    }
}
