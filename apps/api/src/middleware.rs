//! # Authentication Middleware & Role Extractors
//!
//! One capability-resolution step at the boundary: the `authenticate`
//! layer validates the bearer token and stores a typed [`AuthSession`] in
//! request extensions. Handlers then declare what they need through the
//! extractors below; a role mismatch rejects the request before the
//! handler body runs.
//!
//! ```text
//! request ──► authenticate (JWT -> AuthSession extension)
//!                 │
//!                 ▼
//! handler(admin: AdminSession, ...)     admin only
//! handler(kasir: KasirSession, ...)     kasir or admin
//! handler(session: AuthSession, ...)    any authenticated role
//! ```

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{extract_bearer_token, AuthSession};
use crate::error::ApiError;
use crate::state::AppState;
use pangkas_core::Role;

/// Validates the bearer token and attaches the session to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let token = extract_bearer_token(header)
        .ok_or_else(|| ApiError::unauthorized("Expected bearer token"))?;

    let claims = state.jwt.validate_token(token)?;
    let session = AuthSession::from_claims(&claims)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthSession>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

/// Admin-only access.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AuthSession);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state).await?;
        if session.role != Role::Admin {
            return Err(ApiError::forbidden());
        }
        Ok(AdminSession(session))
    }
}

/// Point-of-sale access: kasir or admin.
#[derive(Debug, Clone)]
pub struct KasirSession(pub AuthSession);

impl<S> FromRequestParts<S> for KasirSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state).await?;
        match session.role {
            Role::Admin | Role::Kasir => Ok(KasirSession(session)),
            Role::Capster => Err(ApiError::forbidden()),
        }
    }
}
