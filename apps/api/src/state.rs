//! Shared application state handed to every handler.

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use pangkas_db::Database;

/// Cloned per request by axum; both members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: ApiConfig,
}
