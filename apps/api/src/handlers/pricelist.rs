//! Service pricelist handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{AdminSession, KasirSession};
use crate::state::AppState;
use pangkas_core::validation::{validate_amount, validate_name};
use pangkas_core::PricelistItem;
use pangkas_db::repository::pricelist::PricelistInput;

#[derive(Debug, Deserialize)]
pub struct PricelistBody {
    pub code: String,
    pub name: String,
    pub price: i64,
    pub duration_minutes: Option<i32>,
}

impl PricelistBody {
    fn validate(&self) -> Result<PricelistInput, ApiError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(ApiError::validation("code is required"));
        }
        validate_name(&self.name)?;
        validate_amount(self.price)?;
        if matches!(self.duration_minutes, Some(d) if d <= 0) {
            return Err(ApiError::validation("duration_minutes must be positive"));
        }

        Ok(PricelistInput {
            code: code.to_string(),
            name: self.name.trim().to_string(),
            price: self.price,
            duration_minutes: self.duration_minutes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub all: bool,
}

pub async fn list(
    State(state): State<AppState>,
    _session: KasirSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PricelistItem>>, ApiError> {
    let items = state.db.pricelist().list(params.all).await?;
    Ok(Json(items))
}

pub async fn get(
    State(state): State<AppState>,
    _session: KasirSession,
    Path(id): Path<String>,
) -> Result<Json<PricelistItem>, ApiError> {
    let item = state
        .db
        .pricelist()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pricelist item", &id))?;
    Ok(Json(item))
}

pub async fn create(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<PricelistBody>,
) -> Result<Json<PricelistItem>, ApiError> {
    let input = body.validate()?;
    let item = state.db.pricelist().create(&input).await?;
    Ok(Json(item))
}

pub async fn update(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<PricelistBody>,
) -> Result<Json<PricelistItem>, ApiError> {
    let input = body.validate()?;
    state.db.pricelist().update(&id, &input).await?;
    let item = state
        .db
        .pricelist()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pricelist item", &id))?;
    Ok(Json(item))
}

pub async fn deactivate(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.pricelist().deactivate(&id).await?;
    Ok(Json(serde_json::json!({ "deactivated": id })))
}
