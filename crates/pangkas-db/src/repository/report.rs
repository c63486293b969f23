//! # Report Repository
//!
//! Read-only aggregations for the back office. No mutation happens here;
//! the payroll report expects the caller to have generated the period's
//! kasbon installments first (see the kasbon repository).
//!
//! MySQL returns SUM() as DECIMAL, so every sum is CAST back to SIGNED
//! before it reaches an i64.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use sqlx::MySqlPool;

use crate::error::{DbError, DbResult};
use pangkas_core::payroll::{compute_payslip, Period};

// =============================================================================
// Report rows
// =============================================================================

/// Sales summary over a date range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesSummary {
    pub transaction_count: i64,
    pub revenue: i64,
    pub product_profit: i64,
    pub service_revenue: i64,
}

/// One capster's commission earnings over a period.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommissionReportRow {
    pub staff_id: String,
    pub staff_name: String,
    pub service_count: i64,
    pub total_commission: i64,
}

/// One staff member's payslip for a period.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipRow {
    pub staff_id: String,
    pub staff_name: String,
    pub period: String,
    pub base_salary: i64,
    pub total_bonuses: i64,
    pub total_deductions: i64,
    pub net_pay: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct PayslipComponents {
    staff_id: String,
    staff_name: String,
    base_salary: i64,
    total_bonuses: i64,
    total_deductions: i64,
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: MySqlPool,
}

impl ReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        ReportRepository { pool }
    }

    /// Sales summary: transaction count, revenue and product profit,
    /// optionally restricted to one store. The date range is inclusive.
    pub async fn sales_summary(
        &self,
        store_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<SalesSummary> {
        let (start, end) = date_bounds(from, to);

        let (transaction_count, revenue): (i64, i64) = sqlx::query_as(
            r#"
            SELECT CAST(COUNT(*) AS SIGNED),
                   CAST(COALESCE(SUM(subtotal), 0) AS SIGNED)
            FROM transactions
            WHERE created_at >= ? AND created_at < ?
              AND (? IS NULL OR store_id = ?)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(store_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        let product_profit: i64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(SUM(tp.profit), 0) AS SIGNED)
            FROM transaction_products tp
            JOIN transactions t ON t.id = tp.transaction_id
            WHERE t.created_at >= ? AND t.created_at < ?
              AND (? IS NULL OR t.store_id = ?)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(store_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        let service_revenue: i64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(SUM(ts.price), 0) AS SIGNED)
            FROM transaction_services ts
            JOIN transactions t ON t.id = ts.transaction_id
            WHERE t.created_at >= ? AND t.created_at < ?
              AND (? IS NULL OR t.store_id = ?)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(store_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesSummary {
            transaction_count,
            revenue,
            product_profit,
            service_revenue,
        })
    }

    /// Commission earned per capster over a payroll period, from the
    /// amounts snapshotted on the service lines.
    pub async fn commission_report(
        &self,
        period: Period,
        staff_id: Option<&str>,
    ) -> DbResult<Vec<CommissionReportRow>> {
        let (start, end) = period_bounds(period)?;

        let rows = sqlx::query_as::<_, CommissionReportRow>(
            r#"
            SELECT ts.capster_id AS staff_id, s.name AS staff_name,
                   CAST(COUNT(*) AS SIGNED) AS service_count,
                   CAST(COALESCE(SUM(ts.commission_amount), 0) AS SIGNED) AS total_commission
            FROM transaction_services ts
            JOIN staff s ON s.id = ts.capster_id
            JOIN transactions t ON t.id = ts.transaction_id
            WHERE t.created_at >= ? AND t.created_at < ?
              AND (? IS NULL OR ts.capster_id = ?)
            GROUP BY ts.capster_id, s.name
            ORDER BY total_commission DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(staff_id)
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Payslips for a period: base salary + bonuses - deductions, per
    /// active staff member (or just one).
    pub async fn payroll_summary(
        &self,
        period: Period,
        staff_id: Option<&str>,
    ) -> DbResult<Vec<PayslipRow>> {
        let period_str = period.to_string_form();

        let components = sqlx::query_as::<_, PayslipComponents>(
            r#"
            SELECT s.id AS staff_id, s.name AS staff_name,
                   CAST(COALESCE(ss.base_salary, 0) AS SIGNED) AS base_salary,
                   CAST(COALESCE((
                       SELECT SUM(b.amount) FROM bonuses b
                       WHERE b.staff_id = s.id AND b.period = ?
                   ), 0) AS SIGNED) AS total_bonuses,
                   CAST(COALESCE((
                       SELECT SUM(d.amount) FROM deductions d
                       WHERE d.staff_id = s.id AND d.period = ?
                   ), 0) AS SIGNED) AS total_deductions
            FROM staff s
            LEFT JOIN salary_settings ss ON ss.staff_id = s.id
            WHERE s.is_active = TRUE AND (? IS NULL OR s.id = ?)
            ORDER BY s.name
            "#,
        )
        .bind(&period_str)
        .bind(&period_str)
        .bind(staff_id)
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        let rows = components
            .into_iter()
            .map(|c| {
                let slip = compute_payslip(c.base_salary, c.total_bonuses, c.total_deductions);
                PayslipRow {
                    staff_id: c.staff_id,
                    staff_name: c.staff_name,
                    period: period_str.clone(),
                    base_salary: slip.base_salary,
                    total_bonuses: slip.total_bonuses,
                    total_deductions: slip.total_deductions,
                    net_pay: slip.net_pay,
                }
            })
            .collect();

        Ok(rows)
    }

    /// Total expenses over an inclusive date range.
    pub async fn expense_total(
        &self,
        store_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(SUM(amount), 0) AS SIGNED)
            FROM expenses
            WHERE spent_on >= ? AND spent_on <= ?
              AND (? IS NULL OR store_id = ?)
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(store_id)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

// =============================================================================
// Date helpers
// =============================================================================

/// Inclusive date range to half-open datetime bounds.
fn date_bounds(from: NaiveDate, to: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let end = to.succ_opt().unwrap_or(to);
    (
        NaiveDateTime::new(from, NaiveTime::MIN),
        NaiveDateTime::new(end, NaiveTime::MIN),
    )
}

/// A payroll period's half-open datetime bounds.
fn period_bounds(period: Period) -> DbResult<(NaiveDateTime, NaiveDateTime)> {
    let next = period.add_months(1);
    let start = NaiveDate::from_ymd_opt(period.year, period.month, 1);
    let end = NaiveDate::from_ymd_opt(next.year, next.month, 1);
    match (start, end) {
        (Some(start), Some(end)) => Ok((
            NaiveDateTime::new(start, NaiveTime::MIN),
            NaiveDateTime::new(end, NaiveTime::MIN),
        )),
        _ => Err(DbError::Internal(format!("invalid period {}", period))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_bounds_are_half_open() {
        let from = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let (start, end) = date_bounds(from, to);
        assert_eq!(start.date(), from);
        // Inclusive end date: the bound is the next midnight.
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
    }

    #[test]
    fn test_period_bounds_cover_the_month() {
        let period = Period::new(2026, 12).unwrap();
        let (start, end) = period_bounds(period).unwrap();
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }
}
