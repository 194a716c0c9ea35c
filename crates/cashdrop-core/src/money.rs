//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Counting a drawer in floating point:                                  │
//! │    37 dimes × 0.10 = 3.7000000000000002  ❌ WRONG!                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    37 dimes × 10 cents = 370 cents       ✅ exact                       │
//! │                                                                         │
//! │  Text typed by the operator ("123.455") is parsed as an exact decimal  │
//! │  and rounded once, half away from zero, into cents.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashdrop_core::money::Money;
//!
//! let float = Money::from_cents(20_000);      // $200.00
//! let counted = Money::parse("410.00").unwrap();
//! let drop = counted - float;
//! assert_eq!(drop.to_decimal_string(), "210.00");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: drop amounts and variances can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: serializes as the raw cent count
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Denomination.value × quantity ──┐                                      │
/// │  CoinRoll.value × roll count ────┼──► total drawer cash                 │
/// │                                  │          │                           │
/// │  starting cash (admin config) ───┼──────────┴──► drop amount            │
/// │                                  │                    │                 │
/// │  cash received on receipt ───────┴────────────────────┴──► variance     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from text or the wire: one trillion dollars.
    ///
    /// Keeps every sum and difference of entered amounts and drawer counts
    /// far inside `i64`.
    pub const MAX: Money = Money(100_000_000_000_000);

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use cashdrop_core::money::Money;
    ///
    /// let roll = Money::from_cents(1000); // one quarter roll
    /// assert_eq!(roll.cents(), 1000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts an exact decimal into cents, rounding half away from zero.
    ///
    /// ```rust
    /// use cashdrop_core::money::Money;
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let d = Decimal::from_str("0.125").unwrap();
    /// assert_eq!(Money::from_decimal(d).unwrap().cents(), 13);
    ///
    /// let d = Decimal::from_str("-0.125").unwrap();
    /// assert_eq!(Money::from_decimal(d).unwrap().cents(), -13);
    /// ```
    pub fn from_decimal(value: Decimal) -> CoreResult<Self> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .filter(|cents| cents.unsigned_abs() <= Money::MAX.0.unsigned_abs())
            .map(Money)
            .ok_or_else(|| CoreError::invalid_amount(value.to_string(), "amount is out of range"))
    }

    /// Parses operator-entered decimal text ("12", "12.5", "-3.05").
    ///
    /// Surrounding whitespace and a leading `$` are ignored.
    ///
    /// ```rust
    /// use cashdrop_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10").unwrap().cents(), 1000);
    /// assert_eq!(Money::parse(" $7.5 ").unwrap().cents(), 750);
    /// assert!(Money::parse("").is_err());
    /// assert!(Money::parse("ten").is_err());
    /// ```
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();

        if trimmed.is_empty() {
            return Err(CoreError::invalid_amount(input, "amount is empty"));
        }

        let value = Decimal::from_str(trimmed)
            .map_err(|_| CoreError::invalid_amount(input, "not a decimal number"))?;

        Money::from_decimal(value)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the exact decimal value (scale 2).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Formats as a plain 2-decimal string, e.g. `"210.00"` or `"-76.50"`.
    ///
    /// This is the presentation/wire form; arithmetic never goes through it.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies money by a count (bills in the drawer, rolls on the shelf).
    ///
    /// ```rust
    /// use cashdrop_core::money::Money;
    ///
    /// let dime = Money::from_cents(10);
    /// assert_eq!(dime.multiply_quantity(37).cents(), 370);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money with a dollar sign, e.g. `$10.99` / `-$5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Serde: decimal representation
// =============================================================================

/// Serde adapter that reads and writes `Money` as a decimal amount.
///
/// Used where collaborators speak dollars rather than cents, e.g. the admin
/// `starting_amount` or the TOML config:
///
/// ```rust
/// use cashdrop_core::money::{self, Money};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Settings {
///     #[serde(with = "money::decimal")]
///     starting_amount: Money,
/// }
///
/// let s: Settings = serde_json::from_str(r#"{"starting_amount": "200.00"}"#).unwrap();
/// assert_eq!(s.starting_amount.cents(), 20_000);
/// ```
pub mod decimal {
    use super::Money;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&value.to_decimal(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(value).map_err(serde::de::Error::custom)
    }

    /// Same as the parent module for `Option<Money>` (absent or null → None).
    pub mod option {
        use super::super::Money;
        use rust_decimal::Decimal;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.map(|m| m.to_decimal()).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            Option::<Decimal>::deserialize(deserializer)?
                .map(Money::from_decimal)
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
