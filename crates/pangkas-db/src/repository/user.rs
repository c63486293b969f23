//! # User Repository
//!
//! Login accounts. Password hashing happens in the API layer; this crate
//! only ever sees the finished argon2 hash.

use chrono::Utc;
use sqlx::MySqlPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pangkas_core::{Role, User};

#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        UserRepository { pool }
    }

    pub async fn create(&self, input: &UserInput) -> DbResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            name: input.name.clone(),
            role: input.role,
            staff_id: input.staff_id.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %user.id, username = %user.username, "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, name, role, staff_id,
                               is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(&user.staff_id)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lookup for login. Inactive accounts cannot authenticate.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, name, role, staff_id, is_active,
                   created_at, updated_at
            FROM users
            WHERE username = ? AND is_active = TRUE
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, name, role, staff_id, is_active,
                   created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, name, role, staff_id, is_active,
                   created_at, updated_at
            FROM users
            WHERE is_active = TRUE OR ? = TRUE
            ORDER BY username
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Updates display name, role and staff link. Username is fixed.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        role: Role,
        staff_id: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users SET name = ?, role = ?, staff_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(role)
        .bind(staff_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    pub async fn set_password_hash(&self, id: &str, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users SET is_active = FALSE, updated_at = ? WHERE id = ? AND is_active = TRUE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}
