//! # Repository Module
//!
//! Database repository implementations for drawer and drop entries.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReconciliationSession (via SqliteEntryStore)                          │
//! │       │                                                                 │
//! │       │  db.drawer_entries().insert(&new_entry)                        │
//! │       ▼                                                                 │
//! │  DrawerEntryRepository          DropEntryRepository                    │
//! │  ├── insert                     ├── insert                             │
//! │  ├── get_by_id                  ├── get_by_id / label_image            │
//! │  ├── list                       ├── list                               │
//! │  └── delete                     ├── delete                             │
//! │                                 ├── count_submitted_on                 │
//! │                                 └── set_ignored                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: drawer_entries ◄── FK ── drop_entries                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both tables carry the same 16 count columns; the mapping for them lives
//! here so the two repositories stay in step.

pub mod drawer_entry;
pub mod drop_entry;

use cashdrop_core::{DenominationCounts, RollCounts};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

use crate::error::{DbError, DbResult};

/// Count columns in insert order.
pub(crate) const COUNT_COLUMNS: &str = "hundreds, fifties, twenties, tens, fives, twos, ones, \
     half_dollars, quarters, dimes, nickels, pennies, \
     quarter_rolls, dime_rolls, nickel_rolls, penny_rolls";

/// One `?` per entry in [`COUNT_COLUMNS`].
pub(crate) const COUNT_PLACEHOLDERS: &str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

/// The count columns as read back from SQLite.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CountColumns {
    hundreds: i64,
    fifties: i64,
    twenties: i64,
    tens: i64,
    fives: i64,
    twos: i64,
    ones: i64,
    half_dollars: i64,
    quarters: i64,
    dimes: i64,
    nickels: i64,
    pennies: i64,
    quarter_rolls: i64,
    dime_rolls: i64,
    nickel_rolls: i64,
    penny_rolls: i64,
}

fn column(name: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value).map_err(|_| DbError::corrupt(name, value))
}

impl CountColumns {
    pub(crate) fn into_counts(self) -> DbResult<(DenominationCounts, RollCounts)> {
        let counts = DenominationCounts {
            hundreds: column("hundreds", self.hundreds)?,
            fifties: column("fifties", self.fifties)?,
            twenties: column("twenties", self.twenties)?,
            tens: column("tens", self.tens)?,
            fives: column("fives", self.fives)?,
            twos: column("twos", self.twos)?,
            ones: column("ones", self.ones)?,
            half_dollars: column("half_dollars", self.half_dollars)?,
            quarters: column("quarters", self.quarters)?,
            dimes: column("dimes", self.dimes)?,
            nickels: column("nickels", self.nickels)?,
            pennies: column("pennies", self.pennies)?,
        };
        let rolls = RollCounts {
            quarter_rolls: column("quarter_rolls", self.quarter_rolls)?,
            dime_rolls: column("dime_rolls", self.dime_rolls)?,
            nickel_rolls: column("nickel_rolls", self.nickel_rolls)?,
            penny_rolls: column("penny_rolls", self.penny_rolls)?,
        };
        Ok((counts, rolls))
    }
}

/// Binds the 16 count values in [`COUNT_COLUMNS`] order.
pub(crate) fn bind_counts<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    counts: &DenominationCounts,
    rolls: &RollCounts,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(i64::from(counts.hundreds))
        .bind(i64::from(counts.fifties))
        .bind(i64::from(counts.twenties))
        .bind(i64::from(counts.tens))
        .bind(i64::from(counts.fives))
        .bind(i64::from(counts.twos))
        .bind(i64::from(counts.ones))
        .bind(i64::from(counts.half_dollars))
        .bind(i64::from(counts.quarters))
        .bind(i64::from(counts.dimes))
        .bind(i64::from(counts.nickels))
        .bind(i64::from(counts.pennies))
        .bind(i64::from(rolls.quarter_rolls))
        .bind(i64::from(rolls.dime_rolls))
        .bind(i64::from(rolls.nickel_rolls))
        .bind(i64::from(rolls.penny_rolls))
}
