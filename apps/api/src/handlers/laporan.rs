//! Reporting handlers: read-only aggregations over committed data.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::state::AppState;
use pangkas_core::payroll::Period;
use pangkas_core::Role;
use pangkas_db::repository::report::{CommissionReportRow, PayslipRow, SalesSummary};

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub store_id: Option<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub periode: String,
    pub staff_id: Option<String>,
}

fn check_range(from: NaiveDate, to: NaiveDate) -> Result<(), ApiError> {
    if from > to {
        return Err(ApiError::validation("from must not be after to"));
    }
    Ok(())
}

pub async fn sales_summary(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<SalesSummary>, ApiError> {
    check_range(params.from, params.to)?;

    let summary = state
        .db
        .reports()
        .sales_summary(params.store_id.as_deref(), params.from, params.to)
        .await?;

    Ok(Json(summary))
}

/// Commission report. Admin sees everyone; a capster sees only their own
/// earnings, regardless of the staff_id they ask for.
pub async fn commission_report(
    State(state): State<AppState>,
    session: AuthSession,
    Query(params): Query<PeriodParams>,
) -> Result<Json<Vec<CommissionReportRow>>, ApiError> {
    let period = Period::parse(&params.periode)?;

    let staff_id = match session.role {
        Role::Admin => params.staff_id,
        Role::Capster => match &session.staff_id {
            Some(own) => Some(own.clone()),
            None => return Err(ApiError::forbidden()),
        },
        Role::Kasir => return Err(ApiError::forbidden()),
    };

    let rows = state
        .db
        .reports()
        .commission_report(period, staff_id.as_deref())
        .await?;

    Ok(Json(rows))
}

pub async fn payroll_summary(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<PeriodParams>,
) -> Result<Json<Vec<PayslipRow>>, ApiError> {
    let period = Period::parse(&params.periode)?;

    // Make sure the period's kasbon installments exist before summing.
    state.db.kasbon().ensure_installments(period).await?;

    let rows = state
        .db
        .reports()
        .payroll_summary(period, params.staff_id.as_deref())
        .await?;

    Ok(Json(rows))
}

pub async fn expense_total(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_range(params.from, params.to)?;

    let total = state
        .db
        .reports()
        .expense_total(params.store_id.as_deref(), params.from, params.to)
        .await?;

    Ok(Json(serde_json::json!({
        "from": params.from,
        "to": params.to,
        "total": total,
    })))
}
