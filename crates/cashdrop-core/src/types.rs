//! # Domain Types
//!
//! Records and value objects for one cash drop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐       │
//! │  │ ReconciliationTransaction│        │      AdminSettings       │       │
//! │  │  ──────────────────────  │        │  ──────────────────────  │       │
//! │  │  employee / shift / ws   │        │  shifts, workstations    │       │
//! │  │  date (business date)    │        │  starting_amount         │       │
//! │  │  starting cash, receipt  │        │  max_cash_drops_per_day  │       │
//! │  │  drawer: DrawerCount     │        └──────────────────────────┘       │
//! │  │  status                  │                                           │
//! │  └────────────┬─────────────┘                                           │
//! │               │ save / submit                                           │
//! │      ┌────────┴─────────┐                                               │
//! │      ▼                  ▼                                               │
//! │  ┌──────────────┐   ┌──────────────┐                                    │
//! │  │ DrawerEntry  │◄──│  DropEntry   │  drawer_entry_id (FK)              │
//! │  │ counts+rolls │   │ breakdown,   │                                    │
//! │  │ total cash   │   │ variance,    │                                    │
//! │  └──────────────┘   │ ignored flag │                                    │
//! │                     └──────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::calculator::{recompute, DerivedTotals};
use crate::ledger::{DenominationCounts, DrawerCount, RollCounts};
use crate::money::{self, Money};

/// Default float left in the drawer when admin settings are unavailable.
pub const DEFAULT_STARTING_AMOUNT: Money = Money::from_cents(20_000);

/// Default daily cap on submitted drops.
pub const DEFAULT_MAX_CASH_DROPS_PER_DAY: u32 = 10;

// =============================================================================
// Entry Status
// =============================================================================

/// Lifecycle of a persisted drawer or drop record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EntryStatus {
    /// Saved for later, still editable.
    #[default]
    Drafted,
    /// Final.
    Submitted,
}

impl EntryStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Drafted => "drafted",
            EntryStatus::Submitted => "submitted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "drafted" => Some(EntryStatus::Drafted),
            "submitted" => Some(EntryStatus::Submitted),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Receipt Image
// =============================================================================

/// Photo of the workstation receipt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReceiptImage {
    /// Picked on this terminal; bytes are available for upload.
    Attached {
        file_name: String,
        content_type: Option<String>,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    /// Only the name survived (restored from the offline cache).
    NameOnly { file_name: String },
}

impl ReceiptImage {
    pub fn attached(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        ReceiptImage::Attached {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            ReceiptImage::Attached { file_name, .. } | ReceiptImage::NameOnly { file_name } => {
                file_name
            }
        }
    }

    /// Bytes to upload, if this image can be uploaded.
    pub fn upload(&self) -> Option<(&str, &[u8])> {
        match self {
            ReceiptImage::Attached { file_name, bytes, .. } => Some((file_name, bytes)),
            ReceiptImage::NameOnly { .. } => None,
        }
    }
}

impl fmt::Debug for ReceiptImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptImage::Attached {
                file_name,
                content_type,
                bytes,
            } => f
                .debug_struct("Attached")
                .field("file_name", file_name)
                .field("content_type", content_type)
                .field("bytes", &bytes.len())
                .finish(),
            ReceiptImage::NameOnly { file_name } => {
                f.debug_struct("NameOnly").field("file_name", file_name).finish()
            }
        }
    }
}

// =============================================================================
// Reconciliation Transaction
// =============================================================================

/// One cash-drop event as edited on the terminal.
///
/// Derived totals are never stored here; call [`ReconciliationTransaction::totals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationTransaction {
    pub employee_name: String,
    pub shift_number: String,
    pub work_station: String,
    /// Business date (no time component).
    pub date: NaiveDate,
    pub starting_cash: Option<Money>,
    pub cash_received_on_receipt: Option<Money>,
    pub notes: String,
    pub receipt_image: Option<ReceiptImage>,
    pub status: EntryStatus,
    pub drawer: DrawerCount,
}

impl ReconciliationTransaction {
    /// Blank transaction for `date`, seeded with the admin float.
    pub fn new(employee_name: impl Into<String>, date: NaiveDate, starting_cash: Money) -> Self {
        Self {
            employee_name: employee_name.into(),
            shift_number: String::new(),
            work_station: String::new(),
            date,
            starting_cash: Some(starting_cash),
            cash_received_on_receipt: None,
            notes: String::new(),
            receipt_image: None,
            status: EntryStatus::Drafted,
            drawer: DrawerCount::new(),
        }
    }

    /// Recomputes totals from the current fields.
    pub fn totals(&self) -> DerivedTotals {
        recompute(
            &self.drawer,
            self.starting_cash.unwrap_or_default(),
            self.cash_received_on_receipt.unwrap_or_default(),
        )
    }

    /// Drawer record payload for this transaction.
    pub fn drawer_entry(&self, totals: &DerivedTotals, status: EntryStatus) -> NewDrawerEntry {
        let (counts, rolls) = self.drawer.to_persisted();
        NewDrawerEntry {
            employee_name: self.employee_name.clone(),
            work_station: self.work_station.clone(),
            shift_number: self.shift_number.clone(),
            date: self.date,
            starting_cash: self.starting_cash.unwrap_or_default(),
            total_cash: totals.total_drawer_cash,
            counts,
            rolls,
            status,
        }
    }

    /// Drop record payload linked to `drawer_entry_id`.
    ///
    /// Denomination columns carry the drop breakdown (all zero when no drop
    /// is due); roll columns carry the drawer's rolls.
    pub fn drop_entry(
        &self,
        drawer_entry_id: impl Into<String>,
        totals: &DerivedTotals,
        status: EntryStatus,
    ) -> NewDropEntry {
        let (_, rolls) = self.drawer.to_persisted();
        NewDropEntry {
            drawer_entry_id: drawer_entry_id.into(),
            employee_name: self.employee_name.clone(),
            work_station: self.work_station.clone(),
            shift_number: self.shift_number.clone(),
            date: self.date,
            drop_amount: totals.drop_amount,
            ws_label_amount: self.cash_received_on_receipt.unwrap_or_default(),
            variance: totals.variance,
            status,
            notes: if self.notes.trim().is_empty() {
                None
            } else {
                Some(self.notes.clone())
            },
            label_image: self
                .receipt_image
                .as_ref()
                .and_then(|img| img.upload())
                .map(|(name, bytes)| LabelImage {
                    file_name: name.to_string(),
                    bytes: bytes.to_vec(),
                }),
            counts: totals.breakdown().copied().unwrap_or_default(),
            rolls,
        }
    }
}

// =============================================================================
// Collaborator Data
// =============================================================================

/// Operator identity supplied by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Admin-maintained terminal settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(default)]
    pub shifts: Vec<String>,
    #[serde(default)]
    pub workstations: Vec<String>,
    #[serde(with = "money::decimal", default = "default_starting_amount")]
    pub starting_amount: Money,
    #[serde(default = "default_max_cash_drops_per_day")]
    pub max_cash_drops_per_day: u32,
}

fn default_starting_amount() -> Money {
    DEFAULT_STARTING_AMOUNT
}

fn default_max_cash_drops_per_day() -> u32 {
    DEFAULT_MAX_CASH_DROPS_PER_DAY
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            shifts: Vec::new(),
            workstations: Vec::new(),
            starting_amount: DEFAULT_STARTING_AMOUNT,
            max_cash_drops_per_day: DEFAULT_MAX_CASH_DROPS_PER_DAY,
        }
    }
}

// =============================================================================
// Persisted Records
// =============================================================================

/// Receipt photo stored with a drop record.
#[derive(Clone, PartialEq, Eq)]
pub struct LabelImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for LabelImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelImage")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// A stored drawer count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawerEntry {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub employee_name: String,
    pub work_station: String,
    pub shift_number: String,
    pub date: NaiveDate,
    pub starting_cash_cents: i64,
    pub total_cash_cents: i64,
    pub counts: DenominationCounts,
    pub rolls: RollCounts,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

impl DrawerEntry {
    pub fn starting_cash(&self) -> Money {
        Money::from_cents(self.starting_cash_cents)
    }

    pub fn total_cash(&self) -> Money {
        Money::from_cents(self.total_cash_cents)
    }
}

/// A stored drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropEntry {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Drawer count this drop was computed from.
    pub drawer_entry_id: String,
    pub employee_name: String,
    pub work_station: String,
    pub shift_number: String,
    pub date: NaiveDate,
    pub drop_amount_cents: i64,
    pub ws_label_amount_cents: i64,
    pub variance_cents: i64,
    pub status: EntryStatus,
    /// Set by administrators to exclude an entry from the daily limit.
    pub ignored: bool,
    pub notes: Option<String>,
    pub label_image_name: Option<String>,
    pub counts: DenominationCounts,
    pub rolls: RollCounts,
    pub created_at: DateTime<Utc>,
}

impl DropEntry {
    pub fn drop_amount(&self) -> Money {
        Money::from_cents(self.drop_amount_cents)
    }

    pub fn ws_label_amount(&self) -> Money {
        Money::from_cents(self.ws_label_amount_cents)
    }

    pub fn variance(&self) -> Money {
        Money::from_cents(self.variance_cents)
    }

    /// Counts toward the daily drop limit.
    pub fn counts_toward_limit(&self) -> bool {
        !self.ignored && self.status != EntryStatus::Drafted
    }
}

/// Create payload for a drawer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrawerEntry {
    pub employee_name: String,
    pub work_station: String,
    pub shift_number: String,
    pub date: NaiveDate,
    pub starting_cash: Money,
    pub total_cash: Money,
    pub counts: DenominationCounts,
    pub rolls: RollCounts,
    pub status: EntryStatus,
}

/// Create payload for a drop record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDropEntry {
    pub drawer_entry_id: String,
    pub employee_name: String,
    pub work_station: String,
    pub shift_number: String,
    pub date: NaiveDate,
    pub drop_amount: Money,
    pub ws_label_amount: Money,
    pub variance: Money,
    pub status: EntryStatus,
    pub notes: Option<String>,
    pub label_image: Option<LabelImage>,
    pub counts: DenominationCounts,
    pub rolls: RollCounts,
}

/// Filter for list queries (inclusive date range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub employee: Option<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl EntryQuery {
    /// Every entry on one business date.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            employee: None,
            date_from: date,
            date_to: date,
        }
    }

    /// One employee's entries on one business date.
    pub fn for_employee_on(employee: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee: Some(employee.into()),
            date_from: date,
            date_to: date,
        }
    }

    pub fn matches(&self, employee_name: &str, date: NaiveDate) -> bool {
        let employee_ok = self
            .employee
            .as_deref()
            .map_or(true, |wanted| wanted == employee_name);
        employee_ok && date >= self.date_from && date <= self.date_to
    }
}
