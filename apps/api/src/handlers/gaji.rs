//! Salary-setting and bonus handlers (admin only).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::state::AppState;
use pangkas_core::payroll::Period;
use pangkas_core::validation::validate_amount;
use pangkas_core::Bonus;

#[derive(Debug, Deserialize)]
pub struct SalaryBody {
    pub base_salary: i64,
}

#[derive(Debug, Serialize)]
pub struct SalaryResponse {
    pub staff_id: String,
    pub base_salary: i64,
}

#[derive(Debug, Deserialize)]
pub struct BonusBody {
    pub staff_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub period: String,
}

#[derive(Debug, Deserialize)]
pub struct BonusListParams {
    pub periode: String,
    pub staff_id: Option<String>,
}

pub async fn get_salary(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(staff_id): Path<String>,
) -> Result<Json<SalaryResponse>, ApiError> {
    let base_salary = state
        .db
        .payroll()
        .get_salary(&staff_id)
        .await?
        .map(|s| s.base_salary)
        .unwrap_or(0);

    Ok(Json(SalaryResponse {
        staff_id,
        base_salary,
    }))
}

pub async fn set_salary(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(staff_id): Path<String>,
    Json(body): Json<SalaryBody>,
) -> Result<Json<SalaryResponse>, ApiError> {
    validate_amount(body.base_salary)?;

    state
        .db
        .payroll()
        .upsert_salary(&staff_id, body.base_salary)
        .await?;

    Ok(Json(SalaryResponse {
        staff_id,
        base_salary: body.base_salary,
    }))
}

pub async fn create_bonus(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<BonusBody>,
) -> Result<Json<Bonus>, ApiError> {
    if body.amount <= 0 {
        return Err(ApiError::validation("amount must be positive"));
    }
    let period = Period::parse(&body.period)?;

    let bonus = state
        .db
        .payroll()
        .create_bonus(
            &body.staff_id,
            body.amount,
            body.note,
            &period.to_string_form(),
        )
        .await?;

    Ok(Json(bonus))
}

pub async fn list_bonuses(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<BonusListParams>,
) -> Result<Json<Vec<Bonus>>, ApiError> {
    let period = Period::parse(&params.periode)?;

    let bonuses = state
        .db
        .payroll()
        .list_bonuses(&period.to_string_form(), params.staff_id.as_deref())
        .await?;

    Ok(Json(bonuses))
}

pub async fn delete_bonus(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.payroll().delete_bonus(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
