//! # Denomination Ledger
//!
//! Per-session counts of what is physically in the drawer.
//!
//! ## Unset vs Zero
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Count sheet field      Quantity            Arithmetic                  │
//! │  ─────────────────      ───────────────     ──────────                  │
//! │  ""   (never typed)     Quantity::unset()   contributes 0               │
//! │  "0"  (typed zero)      Quantity::of(0)     contributes 0               │
//! │  "12"                   Quantity::of(12)    contributes 12 × value      │
//! │                                                                         │
//! │  Unset and zero only differ for display. Persisted records store 0     │
//! │  for both, and a persisted 0 restores as unset.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::denomination::{CoinRoll, Denomination, DENOMINATION_COUNT, ROLL_COUNT};
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Quantity
// =============================================================================

/// A non-negative count that may be left blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Option<u32>);

impl Quantity {
    #[inline]
    pub const fn unset() -> Self {
        Quantity(None)
    }

    #[inline]
    pub const fn of(count: u32) -> Self {
        Quantity(Some(count))
    }

    /// The count used in arithmetic (unset counts as zero).
    #[inline]
    pub const fn value(&self) -> u32 {
        match self.0 {
            Some(n) => n,
            None => 0,
        }
    }

    #[inline]
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }

    #[inline]
    pub const fn get(&self) -> Option<u32> {
        self.0
    }

    /// Restore rule for persisted columns: 0 comes back blank.
    #[inline]
    pub const fn from_persisted(count: u32) -> Self {
        if count == 0 {
            Quantity(None)
        } else {
            Quantity(Some(count))
        }
    }

    /// Parses what the operator typed into a count field.
    ///
    /// ```rust
    /// use cashdrop_core::ledger::Quantity;
    ///
    /// assert_eq!(Quantity::parse("quarters", "").unwrap(), Quantity::unset());
    /// assert_eq!(Quantity::parse("quarters", " 7 ").unwrap(), Quantity::of(7));
    /// assert!(Quantity::parse("quarters", "-1").is_err());
    /// assert!(Quantity::parse("quarters", "1.5").is_err());
    /// ```
    pub fn parse(field: &str, input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Quantity::unset());
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                field,
                "must be a whole number of zero or more",
            ));
        }
        trimmed
            .parse::<u32>()
            .map(Quantity::of)
            .map_err(|_| ValidationError::OutOfRange {
                field: field.to_string(),
                min: 0,
                max: i64::from(u32::MAX),
            })
    }
}

impl From<u32> for Quantity {
    fn from(count: u32) -> Self {
        Quantity::of(count)
    }
}

impl From<Option<u32>> for Quantity {
    fn from(count: Option<u32>) -> Self {
        Quantity(count)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{}", n),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Persisted Count Columns
// =============================================================================

/// The 12 denomination columns as stored on drawer and drop records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenominationCounts {
    pub hundreds: u32,
    pub fifties: u32,
    pub twenties: u32,
    pub tens: u32,
    pub fives: u32,
    pub twos: u32,
    pub ones: u32,
    pub half_dollars: u32,
    pub quarters: u32,
    pub dimes: u32,
    pub nickels: u32,
    pub pennies: u32,
}

impl DenominationCounts {
    pub fn get(&self, denomination: Denomination) -> u32 {
        match denomination {
            Denomination::Hundreds => self.hundreds,
            Denomination::Fifties => self.fifties,
            Denomination::Twenties => self.twenties,
            Denomination::Tens => self.tens,
            Denomination::Fives => self.fives,
            Denomination::Twos => self.twos,
            Denomination::Ones => self.ones,
            Denomination::HalfDollars => self.half_dollars,
            Denomination::Quarters => self.quarters,
            Denomination::Dimes => self.dimes,
            Denomination::Nickels => self.nickels,
            Denomination::Pennies => self.pennies,
        }
    }

    pub fn set(&mut self, denomination: Denomination, count: u32) {
        let slot = match denomination {
            Denomination::Hundreds => &mut self.hundreds,
            Denomination::Fifties => &mut self.fifties,
            Denomination::Twenties => &mut self.twenties,
            Denomination::Tens => &mut self.tens,
            Denomination::Fives => &mut self.fives,
            Denomination::Twos => &mut self.twos,
            Denomination::Ones => &mut self.ones,
            Denomination::HalfDollars => &mut self.half_dollars,
            Denomination::Quarters => &mut self.quarters,
            Denomination::Dimes => &mut self.dimes,
            Denomination::Nickels => &mut self.nickels,
            Denomination::Pennies => &mut self.pennies,
        };
        *slot = count;
    }

    /// Builds counts from (unit, count) pairs; unnamed units stay 0.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Denomination, u32)>,
    {
        let mut counts = DenominationCounts::default();
        for (denomination, count) in pairs {
            counts.set(denomination, count);
        }
        counts
    }

    /// Value of these counts.
    pub fn total(&self) -> Money {
        Denomination::ALL
            .iter()
            .map(|d| d.value().multiply_quantity(i64::from(self.get(*d))))
            .sum()
    }
}

/// The 4 roll columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollCounts {
    pub quarter_rolls: u32,
    pub dime_rolls: u32,
    pub nickel_rolls: u32,
    pub penny_rolls: u32,
}

impl RollCounts {
    pub fn get(&self, roll: CoinRoll) -> u32 {
        match roll {
            CoinRoll::Quarter => self.quarter_rolls,
            CoinRoll::Dime => self.dime_rolls,
            CoinRoll::Nickel => self.nickel_rolls,
            CoinRoll::Penny => self.penny_rolls,
        }
    }

    pub fn set(&mut self, roll: CoinRoll, count: u32) {
        match roll {
            CoinRoll::Quarter => self.quarter_rolls = count,
            CoinRoll::Dime => self.dime_rolls = count,
            CoinRoll::Nickel => self.nickel_rolls = count,
            CoinRoll::Penny => self.penny_rolls = count,
        }
    }
}

// =============================================================================
// Drawer Count
// =============================================================================

/// Counted bills, coins and rolls for one drawer.
///
/// Serialized as two maps keyed by field name; unset entries are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DrawerCountRepr", into = "DrawerCountRepr")]
pub struct DrawerCount {
    counts: [Quantity; DENOMINATION_COUNT],
    rolls: [Quantity; ROLL_COUNT],
}

impl DrawerCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, denomination: Denomination) -> Quantity {
        self.counts[denomination.index()]
    }

    pub fn set_quantity(&mut self, denomination: Denomination, quantity: impl Into<Quantity>) {
        self.counts[denomination.index()] = quantity.into();
    }

    /// How many of this unit are available to drop.
    pub fn available(&self, denomination: Denomination) -> u32 {
        self.quantity(denomination).value()
    }

    pub fn roll_count(&self, roll: CoinRoll) -> Quantity {
        self.rolls[roll.index()]
    }

    pub fn set_roll_count(&mut self, roll: CoinRoll, quantity: impl Into<Quantity>) {
        self.rolls[roll.index()] = quantity.into();
    }

    /// `value × quantity` for one unit.
    pub fn contribution(&self, denomination: Denomination) -> Money {
        denomination
            .value()
            .multiply_quantity(i64::from(self.available(denomination)))
    }

    /// `roll value × roll count` for one roll kind.
    pub fn roll_subtotal(&self, roll: CoinRoll) -> Money {
        roll.value()
            .multiply_quantity(i64::from(self.roll_count(roll).value()))
    }

    /// Value of all rolls.
    pub fn rolls_total(&self) -> Money {
        CoinRoll::ALL.iter().map(|r| self.roll_subtotal(*r)).sum()
    }

    /// Loose bills and coins plus rolls.
    pub fn total(&self) -> Money {
        let loose: Money = Denomination::ALL
            .iter()
            .map(|d| self.contribution(*d))
            .sum();
        loose + self.rolls_total()
    }

    /// True when nothing has been entered.
    pub fn is_blank(&self) -> bool {
        self.counts.iter().chain(self.rolls.iter()).all(|q| !q.is_set())
    }

    /// Columns for a persisted record; unset becomes 0.
    pub fn to_persisted(&self) -> (DenominationCounts, RollCounts) {
        let counts = DenominationCounts::from_pairs(
            Denomination::ALL.iter().map(|d| (*d, self.available(*d))),
        );
        let mut rolls = RollCounts::default();
        for roll in CoinRoll::ALL {
            rolls.set(roll, self.roll_count(roll).value());
        }
        (counts, rolls)
    }

    /// Rebuilds a count from persisted columns; 0 restores as unset.
    pub fn from_persisted(counts: &DenominationCounts, rolls: &RollCounts) -> Self {
        let mut drawer = DrawerCount::new();
        for denomination in Denomination::ALL {
            drawer.set_quantity(
                denomination,
                Quantity::from_persisted(counts.get(denomination)),
            );
        }
        for roll in CoinRoll::ALL {
            drawer.set_roll_count(roll, Quantity::from_persisted(rolls.get(roll)));
        }
        drawer
    }
}

#[derive(Serialize, Deserialize, Default)]
struct DrawerCountRepr {
    #[serde(default)]
    denominations: BTreeMap<Denomination, u32>,
    #[serde(default)]
    rolls: BTreeMap<CoinRoll, u32>,
}

impl From<DrawerCountRepr> for DrawerCount {
    fn from(repr: DrawerCountRepr) -> Self {
        let mut drawer = DrawerCount::new();
        for (denomination, count) in repr.denominations {
            drawer.set_quantity(denomination, count);
        }
        for (roll, count) in repr.rolls {
            drawer.set_roll_count(roll, count);
        }
        drawer
    }
}

impl From<DrawerCount> for DrawerCountRepr {
    fn from(drawer: DrawerCount) -> Self {
        DrawerCountRepr {
            denominations: Denomination::ALL
                .into_iter()
                .filter_map(|d| drawer.quantity(d).get().map(|n| (d, n)))
                .collect(),
            rolls: CoinRoll::ALL
                .into_iter()
                .filter_map(|r| drawer.roll_count(r).get().map(|n| (r, n)))
                .collect(),
        }
    }
}
