//! # Database Error Types
//!
//! What can go wrong between the terminal and its SQLite file.
//!
//! ```text
//! sqlx::Error ──► DbError ──► SessionError::Store ──► error notification
//!                 (here)      (cashdrop-session)      (form stays as typed)
//! ```
//!
//! The session treats every variant as transient: the operator can retry the
//! save or submit without losing the counted drawer.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No drawer or drop row with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A drop entry pointed at a drawer entry that is not on file.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A CHECK or UNIQUE constraint rejected the row (negative count,
    /// unknown status, reused id).
    #[error("Constraint failed: {0}")]
    ConstraintFailed(String),

    /// The database file could not be opened, or the pool is closed or busy.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored count or status no longer decodes.
    #[error("Corrupt {column} value: {value}")]
    CorruptValue { column: String, value: String },

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(column: impl Into<String>, value: impl ToString) -> Self {
        DbError::CorruptValue {
            column: column.into(),
            value: value.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Entry", "unknown"),

            // SQLite reports constraints only through the message text
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("constraint failed") {
                    DbError::ConstraintFailed(msg.to_string())
                } else {
                    DbError::Internal(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::Unavailable("connection pool timed out".into()),
            sqlx::Error::PoolClosed => DbError::Unavailable("connection pool is closed".into()),

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
