//! Commission-setting handlers.
//!
//! Admin manages percentages; a capster may read their own setting.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::state::AppState;
use pangkas_core::validation::validate_percentage;
use pangkas_db::repository::commission::CommissionWithStaff;

#[derive(Debug, Deserialize)]
pub struct CommissionBody {
    pub percentage: i64,
}

#[derive(Debug, Serialize)]
pub struct CommissionResponse {
    pub staff_id: String,
    pub percentage: i64,
}

pub async fn list(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<CommissionWithStaff>>, ApiError> {
    let rows = state.db.commissions().list().await?;
    Ok(Json(rows))
}

/// Admin, or the capster reading their own percentage.
pub async fn get(
    State(state): State<AppState>,
    session: AuthSession,
    Path(staff_id): Path<String>,
) -> Result<Json<CommissionResponse>, ApiError> {
    if !session.can_access_staff(&staff_id) {
        return Err(ApiError::forbidden());
    }

    let percentage = state
        .db
        .commissions()
        .get(&staff_id)
        .await?
        .map(|s| s.percentage)
        .unwrap_or(0);

    Ok(Json(CommissionResponse {
        staff_id,
        percentage,
    }))
}

pub async fn upsert(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(staff_id): Path<String>,
    Json(body): Json<CommissionBody>,
) -> Result<Json<CommissionResponse>, ApiError> {
    validate_percentage(body.percentage)?;

    state
        .db
        .commissions()
        .upsert(&staff_id, body.percentage)
        .await?;

    Ok(Json(CommissionResponse {
        staff_id,
        percentage: body.percentage,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(staff_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.commissions().delete(&staff_id).await?;
    Ok(Json(serde_json::json!({ "deleted": staff_id })))
}
