//! # Error Types
//!
//! Domain-specific error types for cashdrop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashdrop-core errors (this file)                                      │
//! │  ├── CoreError        - Amount parsing and domain failures             │
//! │  └── ValidationError  - Field-level input/eligibility failures         │
//! │                                                                         │
//! │  cashdrop-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  cashdrop-session errors (separate crate)                              │
//! │  └── SessionError     - What the terminal surfaces to the operator     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → Notification       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in every validation error
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Decimal text could not be turned into an amount of cents.
    ///
    /// ## When This Occurs
    /// ```text
    /// Operator types "12.3x" into "Cash received on receipt"
    ///      │
    ///      ▼
    /// Money::parse("12.3x")
    ///      │
    ///      ▼
    /// InvalidAmount { input: "12.3x", reason: "not a decimal number" }
    /// ```
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Unknown denomination or roll field name.
    #[error("Unknown denomination field: {0}")]
    UnknownField(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidAmount error.
    pub fn invalid_amount(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// Submit eligibility reports a `Vec<ValidationError>` so the terminal can
/// show every missing field at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a count with a decimal point).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Selected date lies before the current business date.
    #[error("Cannot select prior dates. Cash drop is for immediate shift/day closure.")]
    DateInPast { selected: NaiveDate, today: NaiveDate },

    /// Held totals no longer match a fresh recomputation.
    #[error("{field} is out of date: held {held_cents} cents, recomputed {fresh_cents} cents")]
    StaleTotals {
        field: String,
        held_cents: i64,
        fresh_cents: i64,
    },
}

impl ValidationError {
    /// Creates a Required error for the named field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::StaleTotals { field, .. } => field,
            ValidationError::DateInPast { .. } => "date",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_amount("12.3x", "not a decimal number");
        assert_eq!(err.to_string(), "Invalid amount '12.3x': not a decimal number");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("workstation").to_string(),
            "workstation is required"
        );

        let err = ValidationError::MustBePositive {
            field: "drop_amount".to_string(),
        };
        assert_eq!(err.to_string(), "drop_amount must be positive");
    }

    #[test]
    fn test_date_in_past_message_is_user_facing() {
        let err = ValidationError::DateInPast {
            selected: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            today: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot select prior dates. Cash drop is for immediate shift/day closure."
        );
        assert_eq!(err.field(), "date");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("shift_number").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
