//! # Validation Module
//!
//! Business rules that decide whether a cash drop may be submitted.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Point of input                                               │
//! │  ├── Count fields: whole numbers only (Quantity::parse)                │
//! │  ├── Amounts: decimal text (Money::parse)                              │
//! │  └── Date: never before today (validate_business_date)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit eligibility (THIS MODULE)                             │
//! │  └── Every failing rule is reported, not just the first                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key drop → drawer                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashdrop_core::money::Money;
//! use cashdrop_core::types::ReconciliationTransaction;
//! use cashdrop_core::validation::check_submit_eligibility;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
//! let tx = ReconciliationTransaction::new("Avery", date, Money::from_cents(20_000));
//! let errors = check_submit_eligibility(&tx, &tx.totals());
//!
//! // Nothing counted yet, no shift, no workstation, no receipt amount.
//! assert_eq!(errors.len(), 4);
//! ```

use chrono::NaiveDate;

use crate::calculator::DerivedTotals;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ReconciliationTransaction;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest drift tolerated between held and recomputed drop amounts.
pub const STALE_TOLERANCE: Money = Money::from_cents(1);

// =============================================================================
// Point-of-input Validators
// =============================================================================

/// Cash drops close the current shift; past dates are not selectable.
///
/// ```rust
/// use cashdrop_core::validation::validate_business_date;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// assert!(validate_business_date(today, today).is_ok());
/// assert!(validate_business_date(today.pred_opt().unwrap(), today).is_err());
/// ```
pub fn validate_business_date(selected: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if selected < today {
        return Err(ValidationError::DateInPast { selected, today });
    }
    Ok(())
}

/// A non-empty, non-blank text field.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// An amount between `min` and [`Money::MAX`], both inclusive.
///
/// ```rust
/// use cashdrop_core::money::Money;
/// use cashdrop_core::validation::validate_amount_range;
///
/// assert!(validate_amount_range("starting_cash", Money::zero(), Money::zero()).is_ok());
/// assert!(validate_amount_range("starting_cash", Money::from_cents(-1), Money::zero()).is_err());
/// ```
pub fn validate_amount_range(field: &str, amount: Money, min: Money) -> ValidationResult<()> {
    if amount < min || amount > Money::MAX {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: min.cents(),
            max: Money::MAX.cents(),
        });
    }
    Ok(())
}

/// The starting float may be zero but never negative.
pub fn validate_starting_amount(amount: Money) -> ValidationResult<()> {
    validate_amount_range("starting_amount", amount, Money::zero())
}

/// The daily cap must allow at least one drop.
pub fn validate_daily_limit(max_cash_drops_per_day: u32) -> ValidationResult<()> {
    if max_cash_drops_per_day == 0 {
        return Err(ValidationError::MustBePositive {
            field: "max_cash_drops_per_day".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Submit Eligibility
// =============================================================================

/// Every rule the transaction currently fails.
///
/// `held` is the totals the terminal is displaying; they are re-checked
/// against a fresh recomputation so a stale screen cannot be submitted.
///
/// ## Rules
/// - drop amount > 0
/// - workstation and shift chosen
/// - starting cash and cash received on receipt entered
/// - held drop amount within one cent of `total − starting cash`
pub fn check_submit_eligibility(
    tx: &ReconciliationTransaction,
    held: &DerivedTotals,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !held.drop_amount.is_positive() {
        errors.push(ValidationError::MustBePositive {
            field: "drop_amount".to_string(),
        });
    }

    if let Err(e) = validate_required("work_station", &tx.work_station) {
        errors.push(e);
    }
    if let Err(e) = validate_required("shift_number", &tx.shift_number) {
        errors.push(e);
    }

    if tx.starting_cash.is_none() {
        errors.push(ValidationError::required("starting_cash"));
    }
    if tx.cash_received_on_receipt.is_none() {
        errors.push(ValidationError::required("cash_received_on_receipt"));
    }

    // Without a starting float there is nothing to re-derive the drop from.
    if let Some(starting_cash) = tx.starting_cash {
        let fresh = tx.drawer.total() - starting_cash;
        if (held.drop_amount - fresh).abs() > STALE_TOLERANCE {
            errors.push(ValidationError::StaleTotals {
                field: "drop_amount".to_string(),
                held_cents: held.drop_amount.cents(),
                fresh_cents: fresh.cents(),
            });
        }
    }

    errors
}

/// `true` when [`check_submit_eligibility`] finds nothing.
pub fn is_submit_eligible(tx: &ReconciliationTransaction, held: &DerivedTotals) -> bool {
    check_submit_eligibility(tx, held).is_empty()
}

// =============================================================================
// Unit Tests
// =============================================================================
