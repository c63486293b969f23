//! Staff handlers, serving both `/capster` and `/kasir`.
//!
//! The two route families share one table and one handler set; the router
//! fixes the [`StaffKind`] per path so a kasir record can never be edited
//! through the capster routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{AdminSession, KasirSession};
use crate::state::AppState;
use pangkas_core::validation::validate_name;
use pangkas_core::{Staff, StaffKind};
use pangkas_db::repository::staff::StaffInput;

#[derive(Debug, Deserialize)]
pub struct StaffBody {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub store_id: Option<String>,
    pub joined_on: Option<chrono::NaiveDate>,
}

impl StaffBody {
    fn validate(&self) -> Result<StaffInput, ApiError> {
        validate_name(&self.name)?;

        Ok(StaffInput {
            name: self.name.trim().to_string(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            store_id: self.store_id.clone(),
            joined_on: self.joined_on,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub all: bool,
}

/// Capster listing is open to kasir accounts: the till needs it to assign
/// service lines.
pub async fn list_capster(
    State(state): State<AppState>,
    _session: KasirSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Staff>>, ApiError> {
    let staff = state.db.staff().list(StaffKind::Capster, params.all).await?;
    Ok(Json(staff))
}

pub async fn list_kasir(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Staff>>, ApiError> {
    let staff = state.db.staff().list(StaffKind::Kasir, params.all).await?;
    Ok(Json(staff))
}

async fn get_of_kind(state: &AppState, kind: StaffKind, id: &str) -> Result<Staff, ApiError> {
    let staff = state
        .db
        .staff()
        .get_by_id(id)
        .await?
        .filter(|s| s.kind == kind)
        .ok_or_else(|| ApiError::not_found("Staff", id))?;
    Ok(staff)
}

pub async fn get_capster(
    State(state): State<AppState>,
    _session: KasirSession,
    Path(id): Path<String>,
) -> Result<Json<Staff>, ApiError> {
    Ok(Json(get_of_kind(&state, StaffKind::Capster, &id).await?))
}

pub async fn get_kasir(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Staff>, ApiError> {
    Ok(Json(get_of_kind(&state, StaffKind::Kasir, &id).await?))
}

pub async fn create_capster(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<StaffBody>,
) -> Result<Json<Staff>, ApiError> {
    let input = body.validate()?;
    let staff = state.db.staff().create(StaffKind::Capster, &input).await?;
    Ok(Json(staff))
}

pub async fn create_kasir(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<StaffBody>,
) -> Result<Json<Staff>, ApiError> {
    let input = body.validate()?;
    let staff = state.db.staff().create(StaffKind::Kasir, &input).await?;
    Ok(Json(staff))
}

async fn update_of_kind(
    state: &AppState,
    kind: StaffKind,
    id: &str,
    body: StaffBody,
) -> Result<Staff, ApiError> {
    get_of_kind(state, kind, id).await?;
    let input = body.validate()?;
    state.db.staff().update(id, &input).await?;
    get_of_kind(state, kind, id).await
}

pub async fn update_capster(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<StaffBody>,
) -> Result<Json<Staff>, ApiError> {
    Ok(Json(update_of_kind(&state, StaffKind::Capster, &id, body).await?))
}

pub async fn update_kasir(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<StaffBody>,
) -> Result<Json<Staff>, ApiError> {
    Ok(Json(update_of_kind(&state, StaffKind::Kasir, &id, body).await?))
}

async fn deactivate_of_kind(
    state: &AppState,
    kind: StaffKind,
    id: &str,
) -> Result<serde_json::Value, ApiError> {
    get_of_kind(state, kind, id).await?;
    state.db.staff().deactivate(id).await?;
    Ok(serde_json::json!({ "deactivated": id }))
}

pub async fn deactivate_capster(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(deactivate_of_kind(&state, StaffKind::Capster, &id).await?))
}

pub async fn deactivate_kasir(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(deactivate_of_kind(&state, StaffKind::Kasir, &id).await?))
}
