//! Store (branch) handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{AdminSession, KasirSession};
use crate::state::AppState;
use pangkas_core::validation::{validate_name, validate_store_code};
use pangkas_core::Store;
use pangkas_db::repository::store::StoreInput;

#[derive(Debug, Deserialize)]
pub struct StoreBody {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl StoreBody {
    fn validate(&self) -> Result<StoreInput, ApiError> {
        validate_store_code(&self.code)?;
        validate_name(&self.name)?;

        Ok(StoreInput {
            code: self.code.clone(),
            name: self.name.trim().to_string(),
            address: self.address.clone(),
            phone: self.phone.clone(),
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
) -> Result<Json<Vec<Store>>, ApiError> {
    let stores = state.db.stores().list(params.all).await?;
    Ok(Json(stores))
}

pub async fn get(
    State(state): State<AppState>,
    _session: KasirSession,
    Path(id): Path<String>,
) -> Result<Json<Store>, ApiError> {
    let store = state
        .db
        .stores()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", &id))?;
    Ok(Json(store))
}

pub async fn create(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<StoreBody>,
) -> Result<Json<Store>, ApiError> {
    let input = body.validate()?;
    let store = state.db.stores().create(&input).await?;
    Ok(Json(store))
}

pub async fn update(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<StoreBody>,
) -> Result<Json<Store>, ApiError> {
    let input = body.validate()?;
    state.db.stores().update(&id, &input).await?;
    let store = state
        .db
        .stores()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", &id))?;
    Ok(Json(store))
}

pub async fn deactivate(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.stores().deactivate(&id).await?;
    Ok(Json(serde_json::json!({ "deactivated": id })))
}
