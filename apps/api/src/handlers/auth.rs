//! Authentication handlers: login and session introspection.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::AuthSession;
use crate::error::ApiError;
use crate::state::AppState;
use pangkas_core::{Role, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub staff_id: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            staff_id: user.staff_id.clone(),
        }
    }
}

/// Exchange username/password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = req.username.trim();

    let user = state
        .db
        .users()
        .find_by_username(username)
        .await?
        .ok_or_else(|| {
            warn!(username = %username, "Login attempt for unknown or inactive user");
            ApiError::unauthorized("Invalid username or password")
        })?;

    verify_password(&req.password, &user.password_hash)?;

    let token = state.jwt.generate_token(&user)?;

    info!(user_id = %user.id, username = %user.username, role = ?user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&user),
    }))
}

/// Returns the authenticated user's account.
pub async fn me(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(&session.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", &session.user_id))?;

    Ok(Json(UserInfo::from(&user)))
}

/// Verifies a password against its argon2 hash. A mismatch and an unknown
/// username answer identically.
fn verify_password(password: &str, hash: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        tracing::error!("Corrupt password hash: {}", e);
        ApiError::internal("Authentication failed")
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::unauthorized("Invalid username or password"))
}

/// Hashes a password for storage (argon2id with a random salt).
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("rahasia123").unwrap();
        assert!(verify_password("rahasia123", &hash).is_ok());
        assert!(verify_password("salah", &hash).is_err());
    }
}
