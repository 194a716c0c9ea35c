//! # cashdrop-core: Pure Business Logic for Cash Drops
//!
//! This crate is the **heart** of the cash drop engine. It contains all
//! counting, allocation and eligibility logic as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cash Drop Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Terminal UI (count sheet)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            cashdrop-session (ReconciliationSession)             │   │
//! │  │      load draft, save draft, delete draft, submit               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ cashdrop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌────────────┐ ┌──────────┐ ┌────────────┐       │   │
//! │  │  │  money   │ │denomination│ │  ledger  │ │ calculator │       │   │
//! │  │  │  Money   │ │ catalog,   │ │ Quantity │ │ greedy     │       │   │
//! │  │  │  parse   │ │ coin rolls │ │ Drawer-  │ │ allocation │       │   │
//! │  │  └──────────┘ └────────────┘ │ Count    │ └────────────┘       │   │
//! │  │  ┌──────────┐ ┌────────────┐ └──────────┘ ┌────────────┐       │   │
//! │  │  │  types   │ │ validation │              │  calendar  │       │   │
//! │  │  └──────────┘ └────────────┘              └────────────┘       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cashdrop-db (Database Layer)                    │   │
//! │  │          drawer_entries / drop_entries, migrations              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`denomination`] - The fixed bill/coin/roll catalog
//! - [`ledger`] - Drawer counts with unset-vs-zero tracking
//! - [`calculator`] - Drop amount, variance and greedy breakdown
//! - [`calendar`] - Business date in a named timezone
//! - [`types`] - Transaction, persisted records, collaborator data
//! - [`validation`] - Submit eligibility and the date guard
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cashdrop_core::{recompute, Denomination, DrawerCount, Money};
//!
//! let mut drawer = DrawerCount::new();
//! drawer.set_quantity(Denomination::Hundreds, 3);
//! drawer.set_quantity(Denomination::Fifties, 2);
//! drawer.set_quantity(Denomination::Tens, 1);
//!
//! let totals = recompute(&drawer, Money::from_cents(20_000), Money::zero());
//! assert_eq!(totals.drop_amount.to_decimal_string(), "210.00");
//! assert_eq!(totals.breakdown().unwrap().hundreds, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod calendar;
pub mod denomination;
pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{allocate_drop, recompute, DerivedTotals, DropAllocation};
pub use calendar::{BusinessCalendar, Clock, FixedClock, SystemClock};
pub use denomination::{CoinRoll, Denomination};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{DenominationCounts, DrawerCount, Quantity, RollCounts};
pub use money::Money;
pub use types::*;
