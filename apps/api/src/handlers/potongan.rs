//! Deduction (potongan) handlers (admin only).
//!
//! Listing a period first generates any kasbon installments due in it, so
//! the payroll admin always sees the complete deduction set without a
//! separate generation step.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::state::AppState;
use pangkas_core::payroll::Period;
use pangkas_core::validation::validate_uuid;
use pangkas_core::Deduction;

#[derive(Debug, Deserialize)]
pub struct DeductionBody {
    pub staff_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub period: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub periode: String,
    pub staff_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Deduction>>, ApiError> {
    let period = Period::parse(&params.periode)?;

    // Installment generation is idempotent; re-listing a period is safe.
    state.db.kasbon().ensure_installments(period).await?;

    let rows = state
        .db
        .payroll()
        .list_deductions(&period.to_string_form(), params.staff_id.as_deref())
        .await?;

    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<DeductionBody>,
) -> Result<Json<Deduction>, ApiError> {
    validate_uuid("staff_id", &body.staff_id)?;
    if body.amount <= 0 {
        return Err(ApiError::validation("amount must be positive"));
    }
    let period = Period::parse(&body.period)?;

    let deduction = state
        .db
        .payroll()
        .create_deduction(
            &body.staff_id,
            body.amount,
            body.note,
            &period.to_string_form(),
        )
        .await?;

    Ok(Json(deduction))
}

/// Deletes a general deduction; installments are refused by the repository.
pub async fn delete(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.payroll().delete_deduction(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
