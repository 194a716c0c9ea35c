//! # Business Calendar
//!
//! "Today" for a terminal is the civil date in its configured IANA zone,
//! never the host's local offset. All date math (draft lookup, daily limit,
//! the date guard) goes through one [`BusinessCalendar`].
//!
//! ```text
//!   Clock::now() (UTC) ──► with_timezone(America/Los_Angeles) ──► NaiveDate
//!
//!   2026-03-08T09:59Z  →  2026-03-08 01:59 PST  →  2026-03-08
//!   2026-03-08T10:00Z  →  2026-03-08 03:00 PDT  →  2026-03-08   (DST jump)
//!   2026-03-09T07:30Z  →  2026-03-09 00:30 PDT  →  2026-03-09
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::validation::validate_business_date;

/// Default zone when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// Source of the current instant. Injected so tests can pin "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an IANA zone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz, ValidationError> {
    name.trim().parse::<Tz>().map_err(|_| {
        ValidationError::invalid_format(
            "business_timezone",
            format!("unknown IANA timezone '{}'", name),
        )
    })
}

#[derive(Clone)]
pub struct BusinessCalendar {
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl BusinessCalendar {
    pub fn new(tz: Tz, clock: Arc<dyn Clock>) -> Self {
        Self { tz, clock }
    }

    /// Calendar in `tz` driven by the wall clock.
    pub fn system(tz: Tz) -> Self {
        Self::new(tz, Arc::new(SystemClock))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The current business date.
    pub fn today(&self) -> NaiveDate {
        self.date_of(self.clock.now())
    }

    /// Business date of an arbitrary instant.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Rejects dates before today.
    pub fn check_selectable(&self, selected: NaiveDate) -> Result<(), ValidationError> {
        validate_business_date(selected, self.today())
    }
}

impl std::fmt::Debug for BusinessCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessCalendar")
            .field("tz", &self.tz)
            .finish_non_exhaustive()
    }
}
