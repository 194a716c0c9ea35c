//! # Denomination Catalog
//!
//! The fixed set of currency units a drawer can hold.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Bills                          Coins                 Rolls             │
//! │  ─────────────────────────      ──────────────────    ────────────────  │
//! │  Hundreds     $100.00           Half Dollars $0.50                      │
//! │  Fifties       $50.00           Quarters     $0.25 ──► 40/roll  $10.00  │
//! │  Twenties      $20.00           Dimes        $0.10 ──► 50/roll   $5.00  │
//! │  Tens          $10.00           Nickels      $0.05 ──► 40/roll   $2.00  │
//! │  Fives          $5.00           Pennies      $0.01 ──► 50/roll   $0.50  │
//! │  Twos           $2.00                                                   │
//! │  Ones           $1.00                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is expressed as enums so that every lookup is a `match` and
//! can never go out of date with a table somewhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

/// Number of loose denominations in the catalog.
pub const DENOMINATION_COUNT: usize = 12;

/// Number of roll variants.
pub const ROLL_COUNT: usize = 4;

// =============================================================================
// Denomination
// =============================================================================

/// A single bill or loose coin unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Denomination {
    Hundreds,
    Fifties,
    Twenties,
    Tens,
    Fives,
    Twos,
    Ones,
    HalfDollars,
    Quarters,
    Dimes,
    Nickels,
    Pennies,
}

impl Denomination {
    /// Every unit, descending by value. The greedy allocator relies on this order.
    pub const ALL: [Denomination; DENOMINATION_COUNT] = [
        Denomination::Hundreds,
        Denomination::Fifties,
        Denomination::Twenties,
        Denomination::Tens,
        Denomination::Fives,
        Denomination::Twos,
        Denomination::Ones,
        Denomination::HalfDollars,
        Denomination::Quarters,
        Denomination::Dimes,
        Denomination::Nickels,
        Denomination::Pennies,
    ];

    /// Face value in cents.
    pub const fn value_cents(self) -> i64 {
        match self {
            Denomination::Hundreds => 10_000,
            Denomination::Fifties => 5_000,
            Denomination::Twenties => 2_000,
            Denomination::Tens => 1_000,
            Denomination::Fives => 500,
            Denomination::Twos => 200,
            Denomination::Ones => 100,
            Denomination::HalfDollars => 50,
            Denomination::Quarters => 25,
            Denomination::Dimes => 10,
            Denomination::Nickels => 5,
            Denomination::Pennies => 1,
        }
    }

    /// Face value as money.
    #[inline]
    pub const fn value(self) -> Money {
        Money::from_cents(self.value_cents())
    }

    /// Human name, e.g. "Half Dollars".
    pub const fn name(self) -> &'static str {
        match self {
            Denomination::Hundreds => "Hundreds",
            Denomination::Fifties => "Fifties",
            Denomination::Twenties => "Twenties",
            Denomination::Tens => "Tens",
            Denomination::Fives => "Fives",
            Denomination::Twos => "Twos",
            Denomination::Ones => "Ones",
            Denomination::HalfDollars => "Half Dollars",
            Denomination::Quarters => "Quarters",
            Denomination::Dimes => "Dimes",
            Denomination::Nickels => "Nickels",
            Denomination::Pennies => "Pennies",
        }
    }

    /// Display label used by the count sheet, e.g. "Hundreds ($100)".
    pub fn label(self) -> String {
        let value = self.value();
        if value.cents_part() == 0 {
            format!("{} (${})", self.name(), value.dollars())
        } else {
            format!("{} (${})", self.name(), value.to_decimal_string())
        }
    }

    /// Wire/column field name, e.g. `half_dollars`.
    pub const fn field(self) -> &'static str {
        match self {
            Denomination::Hundreds => "hundreds",
            Denomination::Fifties => "fifties",
            Denomination::Twenties => "twenties",
            Denomination::Tens => "tens",
            Denomination::Fives => "fives",
            Denomination::Twos => "twos",
            Denomination::Ones => "ones",
            Denomination::HalfDollars => "half_dollars",
            Denomination::Quarters => "quarters",
            Denomination::Dimes => "dimes",
            Denomination::Nickels => "nickels",
            Denomination::Pennies => "pennies",
        }
    }

    /// Position in [`Denomination::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Coins per roll, or 0 when the unit is not sold in rolls.
    pub const fn roll_size(self) -> u32 {
        match self.roll() {
            Some(roll) => roll.roll_size(),
            None => 0,
        }
    }

    /// The roll variant of this coin, if there is one.
    pub const fn roll(self) -> Option<CoinRoll> {
        match self {
            Denomination::Quarters => Some(CoinRoll::Quarter),
            Denomination::Dimes => Some(CoinRoll::Dime),
            Denomination::Nickels => Some(CoinRoll::Nickel),
            Denomination::Pennies => Some(CoinRoll::Penny),
            _ => None,
        }
    }

    /// Returns true for paper bills.
    pub const fn is_bill(self) -> bool {
        self.value_cents() >= 100
    }

    /// Looks up a unit by its field name.
    pub fn from_field(field: &str) -> Option<Denomination> {
        Denomination::ALL.into_iter().find(|d| d.field() == field)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Denomination {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Denomination::from_field(s).ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

// =============================================================================
// Coin Roll
// =============================================================================

/// A wrapped roll of a single coin. Rolls are counted, never broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CoinRoll {
    Quarter,
    Dime,
    Nickel,
    Penny,
}

impl CoinRoll {
    pub const ALL: [CoinRoll; ROLL_COUNT] = [
        CoinRoll::Quarter,
        CoinRoll::Dime,
        CoinRoll::Nickel,
        CoinRoll::Penny,
    ];

    /// The loose coin this roll wraps.
    pub const fn coin(self) -> Denomination {
        match self {
            CoinRoll::Quarter => Denomination::Quarters,
            CoinRoll::Dime => Denomination::Dimes,
            CoinRoll::Nickel => Denomination::Nickels,
            CoinRoll::Penny => Denomination::Pennies,
        }
    }

    /// Coins per roll.
    pub const fn roll_size(self) -> u32 {
        match self {
            CoinRoll::Quarter => 40,
            CoinRoll::Dime => 50,
            CoinRoll::Nickel => 40,
            CoinRoll::Penny => 50,
        }
    }

    /// Value of one full roll.
    pub const fn value(self) -> Money {
        Money::from_cents(self.coin().value_cents() * self.roll_size() as i64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            CoinRoll::Quarter => "Quarter Rolls",
            CoinRoll::Dime => "Dime Rolls",
            CoinRoll::Nickel => "Nickel Rolls",
            CoinRoll::Penny => "Penny Rolls",
        }
    }

    pub const fn field(self) -> &'static str {
        match self {
            CoinRoll::Quarter => "quarter_rolls",
            CoinRoll::Dime => "dime_rolls",
            CoinRoll::Nickel => "nickel_rolls",
            CoinRoll::Penny => "penny_rolls",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// "Quarter Rolls ($10.00)"
    pub fn label(self) -> String {
        format!("{} (${})", self.name(), self.value().to_decimal_string())
    }

    pub fn from_field(field: &str) -> Option<CoinRoll> {
        CoinRoll::ALL.into_iter().find(|r| r.field() == field)
    }
}

impl fmt::Display for CoinRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoinRoll {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoinRoll::from_field(s).ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}
