//! # Session Error Types
//!
//! Error types for the reconciliation workflow.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Validation    │  │   Transient I/O │  │     Business Rules      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotEligible    │  │  Store          │  │  DailyLimitReached      │ │
//! │  │  InvalidInput   │  │  Cache          │  │  DateRejected           │ │
//! │  │                 │  │  Auth           │  │  SessionClosed          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Configuration: ConfigLoadFailed, ConfigSaveFailed, InvalidConfig│   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these end the process. After any failure the session is back
//! in `Ready` and the operator can edit and retry.

use cashdrop_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Everything a session operation can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// The transaction is not ready to submit; every failing rule is listed.
    #[error("Cash drop is not ready to submit: {}", summarize(.0))]
    NotEligible(Vec<ValidationError>),

    /// A field edit was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    // =========================================================================
    // Transient I/O Errors
    // =========================================================================
    /// Entry store failure (create, list or delete).
    #[error("Storage error: {0}")]
    Store(String),

    /// Offline draft cache failure.
    #[error("Draft cache error: {0}")]
    Cache(String),

    /// The current operator could not be identified.
    #[error("Authentication error: {0}")]
    Auth(String),

    // =========================================================================
    // Business Rule Errors
    // =========================================================================
    /// Today's submitted, non-ignored drops already reach the cap.
    #[error("Maximum cash drops per day ({max}) reached. Please ignore any incorrect entries first.")]
    DailyLimitReached { max: u32 },

    /// A date before the current business date was selected.
    #[error("{0}")]
    DateRejected(ValidationError),

    /// The session already submitted; start a new one.
    #[error("Cash drop session is closed")]
    SessionClosed,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid terminal configuration.
    #[error("Invalid terminal configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<cashdrop_db::DbError> for SessionError {
    fn from(err: cashdrop_db::DbError) -> Self {
        SessionError::Store(err.to_string())
    }
}

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => SessionError::InvalidInput(v),
            CoreError::InvalidAmount { input, reason } => SessionError::InvalidInput(
                ValidationError::invalid_format(input, reason),
            ),
            CoreError::UnknownField(field) => {
                SessionError::InvalidInput(ValidationError::invalid_format(field, "unknown field"))
            }
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Cache(err.to_string())
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SessionError {
    /// Returns true for I/O failures the operator can simply retry.
    ///
    /// ## Transient
    /// - Entry store failures
    /// - Cache failures
    /// - Auth lookups
    ///
    /// ## Not Transient
    /// - Validation and date rejections (edit first)
    /// - Daily limit (ignore an entry first)
    /// - Closed session, configuration problems
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SessionError::Store(_) | SessionError::Cache(_) | SessionError::Auth(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidConfig(_)
                | SessionError::ConfigLoadFailed(_)
                | SessionError::ConfigSaveFailed(_)
        )
    }

    /// Field-level problems, when the error carries any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SessionError::NotEligible(errors) => errors,
            SessionError::InvalidInput(e) | SessionError::DateRejected(e) => {
                std::slice::from_ref(e)
            }
            _ => &[],
        }
    }
}
