//! JWT authentication module.
//!
//! Token generation and validation, plus the typed [`AuthSession`] that is
//! resolved once at the API boundary and handed to handlers. Role checks
//! go through the session's typed extractors (see `middleware.rs`) instead
//! of ad hoc string comparisons per route.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use pangkas_core::{Role, User};

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Login username
    pub username: String,

    /// Access role ("admin" | "kasir" | "capster")
    pub role: String,

    /// Linked staff record, when the account belongs to a capster/kasir
    pub staff_id: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// The authenticated caller, resolved once per request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub staff_id: Option<String>,
}

impl AuthSession {
    /// Builds the typed session from validated claims. An unknown role
    /// string means the token was minted by a different system.
    pub fn from_claims(claims: &Claims) -> Result<AuthSession, ApiError> {
        let role = Role::parse(&claims.role)
            .ok_or_else(|| ApiError::unauthorized("Unknown role in token"))?;

        Ok(AuthSession {
            user_id: claims.sub.clone(),
            username: claims.username.clone(),
            role,
            staff_id: claims.staff_id.clone(),
        })
    }

    /// True when the session may act on `staff_id`'s behalf: admins
    /// always, staff members only on their own record.
    pub fn can_access_staff(&self, staff_id: &str) -> bool {
        self.role == Role::Admin || self.staff_id.as_deref() == Some(staff_id)
    }
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a token for a user.
    pub fn generate_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            staff_id: user.staff_id.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(role: Role, staff_id: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: "user-001".to_string(),
            username: "kasir.pusat".to_string(),
            password_hash: "unused".to_string(),
            name: "Kasir Pusat".to_string(),
            role,
            staff_id: staff_id.map(str::to_string),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager
            .generate_token(&test_user(Role::Kasir, Some("staff-001")))
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.username, "kasir.pusat");
        assert_eq!(claims.role, "kasir");
        assert_eq!(claims.staff_id.as_deref(), Some("staff-001"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);
        let other = JwtManager::new("other-secret".to_string(), 3600);

        let token = manager.generate_token(&test_user(Role::Admin, None)).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_session_from_claims() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);
        let token = manager
            .generate_token(&test_user(Role::Capster, Some("staff-007")))
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        let session = AuthSession::from_claims(&claims).unwrap();
        assert_eq!(session.role, Role::Capster);
        assert!(session.can_access_staff("staff-007"));
        assert!(!session.can_access_staff("staff-008"));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }
}
