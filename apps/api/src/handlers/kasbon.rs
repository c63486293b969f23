//! Cash-advance (kasbon) handlers (admin only).
//!
//! Listing applies the auto-lapse patch for the current calendar month
//! before returning rows, matching how the back office expects stale
//! advances to disappear from the active set.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::state::AppState;
use pangkas_core::payroll::{installment_amount, Period};
use pangkas_core::validation::validate_uuid;
use pangkas_core::CashAdvance;
use pangkas_db::repository::kasbon::KasbonInput;

#[derive(Debug, Deserialize)]
pub struct KasbonBody {
    pub staff_id: String,
    pub principal: i64,
    pub tenor: i32,
    pub start_period: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub staff_id: Option<String>,
}

/// The current payroll period from the server clock.
fn current_period() -> Result<Period, ApiError> {
    let today = Utc::now().date_naive();
    Period::new(today.year(), today.month())
        .ok_or_else(|| ApiError::internal("Invalid current date"))
}

pub async fn create(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<KasbonBody>,
) -> Result<Json<CashAdvance>, ApiError> {
    validate_uuid("staff_id", &body.staff_id)?;
    if body.principal <= 0 {
        return Err(ApiError::validation("principal must be positive"));
    }
    if body.tenor <= 0 || body.tenor > 24 {
        return Err(ApiError::validation("tenor must be between 1 and 24 months"));
    }
    let start = Period::parse(&body.start_period)?;

    let input = KasbonInput {
        staff_id: body.staff_id,
        principal: body.principal,
        tenor: body.tenor,
        start_period: start.to_string_form(),
        note: body.note,
    };

    let kasbon = state.db.kasbon().create(&input).await?;

    tracing::info!(
        kasbon_id = %kasbon.id,
        staff_id = %kasbon.staff_id,
        principal = kasbon.principal,
        tenor = kasbon.tenor,
        installment = installment_amount(kasbon.principal, kasbon.tenor),
        "Cash advance created"
    );

    Ok(Json(kasbon))
}

pub async fn list(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CashAdvance>>, ApiError> {
    let rows = state
        .db
        .kasbon()
        .list(current_period()?, params.staff_id.as_deref())
        .await?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<CashAdvance>, ApiError> {
    let kasbon = state
        .db
        .kasbon()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cash advance", &id))?;
    Ok(Json(kasbon))
}

pub async fn settle(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.kasbon().settle(&id).await?;
    Ok(Json(serde_json::json!({ "settled": id })))
}
