//! Expense (pengeluaran) handlers (admin only).

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::state::AppState;
use crate::upload::{save_image, MAX_PROOF_BYTES};
use pangkas_core::validation::validate_uuid;
use pangkas_core::Expense;
use pangkas_db::repository::expense::ExpenseInput;

#[derive(Debug, Deserialize)]
pub struct ExpenseBody {
    pub store_id: String,
    pub description: String,
    pub amount: i64,
    pub spent_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub store_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn create(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<ExpenseBody>,
) -> Result<Json<Expense>, ApiError> {
    validate_uuid("store_id", &body.store_id)?;
    if body.description.trim().is_empty() {
        return Err(ApiError::validation("description is required"));
    }
    if body.amount <= 0 {
        return Err(ApiError::validation("amount must be positive"));
    }

    let input = ExpenseInput {
        store_id: body.store_id,
        description: body.description.trim().to_string(),
        amount: body.amount,
        spent_on: body.spent_on,
    };

    let expense = state.db.expenses().create(&input).await?;
    Ok(Json(expense))
}

pub async fn list(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = state
        .db
        .expenses()
        .list(params.store_id.as_deref(), params.from, params.to)
        .await?;
    Ok(Json(expenses))
}

pub async fn delete(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.expenses().delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Attaches a proof image to an expense.
pub async fn upload_proof(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .expenses()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense", &id))?;

    let path = save_image(
        &mut multipart,
        &state.config.upload_dir,
        "bukti-pengeluaran",
        MAX_PROOF_BYTES,
    )
    .await?;

    state.db.expenses().set_proof(&id, &path).await?;

    Ok(Json(serde_json::json!({ "proof_path": path })))
}
