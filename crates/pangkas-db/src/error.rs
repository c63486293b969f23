//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! MySQL error (sqlx::Error)
//!      |
//!      v
//! DbError (this module)  adds context and categorization
//!      |
//!      v
//! ApiError (apps/api)    mapped to an HTTP status
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These wrap sqlx errors and provide additional context for debugging
/// and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate SKU, username, ...).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Stock row had less than the requested quantity at lock time.
    ///
    /// Detected inside the sale transaction while the row lock is held,
    /// so `available` is exactly what the sale saw. Raising it rolls the
    /// whole sale back.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound     -> DbError::NotFound
/// sqlx::Error::Database        -> inspect MySQL error number
///   1062 (ER_DUP_ENTRY)        -> UniqueViolation
///   1451/1452 (FK)             -> ForeignKeyViolation
/// sqlx::Error::PoolTimedOut    -> DbError::PoolExhausted
/// other                        -> DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let Some(mysql_err) = db_err.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
                else {
                    return DbError::QueryFailed(db_err.message().to_string());
                };
                match mysql_err.number() {
                    // ER_DUP_ENTRY: "Duplicate entry 'x' for key 'table.key'"
                    1062 => {
                        let message = mysql_err.message();
                        let value = message
                            .split('\'')
                            .nth(1)
                            .unwrap_or("unknown")
                            .to_string();
                        let field = message
                            .split('\'')
                            .nth(3)
                            .unwrap_or("unknown")
                            .to_string();
                        DbError::UniqueViolation { field, value }
                    }
                    // ER_ROW_IS_REFERENCED_2 / ER_NO_REFERENCED_ROW_2
                    1451 | 1452 => DbError::ForeignKeyViolation {
                        message: mysql_err.message().to_string(),
                    },
                    // ER_CHECK_CONSTRAINT_VIOLATED (e.g. stocks quantity >= 0)
                    3819 => DbError::QueryFailed(mysql_err.message().to_string()),
                    _ => DbError::QueryFailed(mysql_err.message().to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
