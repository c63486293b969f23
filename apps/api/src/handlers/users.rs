//! User-account management (admin only).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::auth::{hash_password, UserInfo};
use crate::middleware::AdminSession;
use crate::state::AppState;
use pangkas_core::validation::{validate_name, validate_username};
use pangkas_core::Role;
use pangkas_db::repository::user::UserInput;

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub staff_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    pub name: String,
    pub role: Role,
    pub staff_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordBody {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub all: bool,
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation("password must be at least 8 characters"));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserInfo>>, ApiError> {
    let users = state.db.users().list(params.all).await?;
    Ok(Json(users.iter().map(UserInfo::from).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<CreateUserBody>,
) -> Result<Json<UserInfo>, ApiError> {
    validate_username(body.username.trim())?;
    validate_name(&body.name)?;
    validate_password(&body.password)?;

    let input = UserInput {
        username: body.username.trim().to_string(),
        password_hash: hash_password(&body.password)?,
        name: body.name.trim().to_string(),
        role: body.role,
        staff_id: body.staff_id,
    };

    let user = state.db.users().create(&input).await?;
    Ok(Json(UserInfo::from(&user)))
}

pub async fn update(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<UserInfo>, ApiError> {
    validate_name(&body.name)?;

    state
        .db
        .users()
        .update(&id, body.name.trim(), body.role, body.staff_id.as_deref())
        .await?;

    let user = state
        .db
        .users()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &id))?;
    Ok(Json(UserInfo::from(&user)))
}

pub async fn set_password(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<SetPasswordBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_password(&body.password)?;

    let hash = hash_password(&body.password)?;
    state.db.users().set_password_hash(&id, &hash).await?;

    Ok(Json(serde_json::json!({ "updated": id })))
}

pub async fn deactivate(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // An admin locking out their own account is always a mistake.
    if session.0.user_id == id {
        return Err(ApiError::validation("Cannot deactivate your own account"));
    }

    state.db.users().deactivate(&id).await?;
    Ok(Json(serde_json::json!({ "deactivated": id })))
}
