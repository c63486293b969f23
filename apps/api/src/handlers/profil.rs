//! Shop-profile handlers. Any authenticated role may read it (the till
//! shows it on screen); editing is admin only.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::state::AppState;
use crate::upload::{save_image, MAX_PAYMENT_PROOF_BYTES};
use pangkas_core::validation::validate_name;
use pangkas_core::ShopProfile;
use pangkas_db::repository::profile::ProfileInput;

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub receipt_footer: Option<String>,
}

pub async fn get(
    State(state): State<AppState>,
    _session: AuthSession,
) -> Result<Json<ShopProfile>, ApiError> {
    let profile = state.db.profile().get().await?;
    Ok(Json(profile))
}

pub async fn update(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(body): Json<ProfileBody>,
) -> Result<Json<ShopProfile>, ApiError> {
    validate_name(&body.name)?;

    let input = ProfileInput {
        name: body.name.trim().to_string(),
        address: body.address,
        phone: body.phone,
        receipt_footer: body.receipt_footer,
    };

    state.db.profile().update(&input).await?;
    let profile = state.db.profile().get().await?;
    Ok(Json(profile))
}

pub async fn upload_logo(
    State(state): State<AppState>,
    _session: AdminSession,
    mut multipart: Multipart,
) -> Result<Json<ShopProfile>, ApiError> {
    let path = save_image(
        &mut multipart,
        &state.config.upload_dir,
        "logo",
        MAX_PAYMENT_PROOF_BYTES,
    )
    .await?;

    state.db.profile().set_logo(&path).await?;
    let profile = state.db.profile().get().await?;
    Ok(Json(profile))
}
