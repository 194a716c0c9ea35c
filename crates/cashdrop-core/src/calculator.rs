//! # Drop Calculator
//!
//! Derives everything the count sheet shows from the counted drawer.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DrawerCount ──► total_drawer_cash                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │        drop_amount = total − starting cash                              │
//! │                        │                                                │
//! │          ┌─────────────┴──────────────┐                                 │
//! │          │ ≤ 0                        │ > 0                             │
//! │          ▼                            ▼                                 │
//! │    no allocation              greedy allocation                         │
//! │                               (largest unit first, bounded by           │
//! │                                what is in the drawer, rolls stay)       │
//! │                                                                         │
//! │        variance = drop_amount − cash received on receipt                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shortfall
//! The greedy pass does not guarantee exact change. Whatever cannot be
//! covered by the available loose units is reported as `unallocated`; it is
//! data for the operator, never an error.
//!
//! Every function here is pure: the same drawer and amounts always give the
//! same result.

use serde::{Deserialize, Serialize};

use crate::denomination::Denomination;
use crate::ledger::{DenominationCounts, DrawerCount};
use crate::money::Money;

/// Breakdown of a positive drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropAllocation {
    /// How many of each unit go into the drop bag.
    pub breakdown: DenominationCounts,
    /// How many of each unit stay behind (rolls are not listed; they always stay).
    pub remaining: DenominationCounts,
    /// Cents the available units could not cover.
    pub unallocated: Money,
}

impl DropAllocation {
    /// True when the breakdown covers the drop to the cent.
    pub fn is_exact(&self) -> bool {
        self.unallocated.is_zero()
    }

    /// Value actually placed in the drop.
    pub fn allocated(&self) -> Money {
        self.breakdown.total()
    }
}

/// Everything derived from one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTotals {
    pub total_drawer_cash: Money,
    pub drop_amount: Money,
    pub variance: Money,
    /// Present only when `drop_amount > 0`.
    pub allocation: Option<DropAllocation>,
}

impl DerivedTotals {
    /// A drop is due only when there is more cash than the float.
    pub fn has_drop(&self) -> bool {
        self.drop_amount.is_positive()
    }

    pub fn breakdown(&self) -> Option<&DenominationCounts> {
        self.allocation.as_ref().map(|a| &a.breakdown)
    }

    pub fn remaining(&self) -> Option<&DenominationCounts> {
        self.allocation.as_ref().map(|a| &a.remaining)
    }
}

/// Sum of every loose unit and every roll.
#[inline]
pub fn total_drawer_cash(drawer: &DrawerCount) -> Money {
    drawer.total()
}

/// Cash above the float. Negative or zero means nothing is due.
#[inline]
pub fn drop_amount(total_drawer_cash: Money, starting_cash: Money) -> Money {
    total_drawer_cash - starting_cash
}

/// Drop minus what the workstation receipt says was taken in.
#[inline]
pub fn variance(drop_amount: Money, cash_received_on_receipt: Money) -> Money {
    drop_amount - cash_received_on_receipt
}

/// Greedy, availability-bounded allocation of `drop_amount` over loose units.
///
/// Returns `None` when `drop_amount` is not positive.
///
/// ```rust
/// use cashdrop_core::calculator::allocate_drop;
/// use cashdrop_core::denomination::Denomination;
/// use cashdrop_core::ledger::DrawerCount;
/// use cashdrop_core::money::Money;
///
/// let mut drawer = DrawerCount::new();
/// drawer.set_quantity(Denomination::Hundreds, 3);
/// drawer.set_quantity(Denomination::Fifties, 2);
/// drawer.set_quantity(Denomination::Tens, 1);
///
/// let allocation = allocate_drop(&drawer, Money::from_cents(21_000)).unwrap();
/// assert_eq!(allocation.breakdown.hundreds, 2);
/// assert_eq!(allocation.breakdown.fifties, 0);
/// assert_eq!(allocation.breakdown.tens, 1);
/// assert_eq!(allocation.remaining.hundreds, 1);
/// assert_eq!(allocation.remaining.fifties, 2);
/// ```
pub fn allocate_drop(drawer: &DrawerCount, drop_amount: Money) -> Option<DropAllocation> {
    if !drop_amount.is_positive() {
        return None;
    }

    let mut remaining_cents = drop_amount.cents();
    let mut breakdown = DenominationCounts::default();
    let mut remaining = DenominationCounts::default();

    for denomination in Denomination::ALL {
        let unit = denomination.value_cents();
        let available = drawer.available(denomination);

        let taken = if unit > 0 && remaining_cents >= unit {
            let wanted = remaining_cents / unit;
            let taken = wanted.min(i64::from(available)) as u32;
            remaining_cents -= i64::from(taken) * unit;
            taken
        } else {
            0
        };

        breakdown.set(denomination, taken);
        remaining.set(denomination, available - taken);
    }

    Some(DropAllocation {
        breakdown,
        remaining,
        unallocated: Money::from_cents(remaining_cents),
    })
}

/// Full recomputation: `(drawer, starting cash, receipt amount) → totals`.
///
/// Unset starting cash or receipt amounts are passed as zero by the caller.
pub fn recompute(
    drawer: &DrawerCount,
    starting_cash: Money,
    cash_received_on_receipt: Money,
) -> DerivedTotals {
    let total = total_drawer_cash(drawer);
    let drop = drop_amount(total, starting_cash);

    DerivedTotals {
        total_drawer_cash: total,
        drop_amount: drop,
        variance: variance(drop, cash_received_on_receipt),
        allocation: allocate_drop(drawer, drop),
    }
}
