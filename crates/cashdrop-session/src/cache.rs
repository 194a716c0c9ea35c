//! # Offline Draft Cache
//!
//! A local copy of the form, kept so an unsaved count survives a restart
//! even when the entry store is unreachable.
//!
//! ```text
//! save_draft ──► EntryStore (drawer + drop, drafted)
//!      │
//!      └───────► DraftCache.store("cashDropDraft", snapshot)
//!
//! open ──► EntryStore drafted pair? ──yes──► restore from backend
//!                 │ no
//!                 ▼
//!          DraftCache.load("cashDropDraft") restorable? ──yes──► restore
//!                 │ no
//!                 ▼
//!          blank form, admin starting cash
//! ```
//!
//! Only the image file name is cached, never the image bytes.

use async_trait::async_trait;
use cashdrop_core::money;
use cashdrop_core::{DrawerCount, Money, ReceiptImage, ReconciliationTransaction};
use cashdrop_core::validation::validate_starting_amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Draft Snapshot
// =============================================================================

/// Serialized form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    #[serde(default)]
    pub shift_number: String,
    #[serde(default)]
    pub work_station: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(with = "money::decimal::option", default)]
    pub starting_cash: Option<Money>,
    #[serde(with = "money::decimal::option", default)]
    pub cash_received_on_receipt: Option<Money>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub receipt_image_name: Option<String>,
    #[serde(default)]
    pub drawer: DrawerCount,
}

impl DraftSnapshot {
    /// Captures the current form.
    pub fn capture(tx: &ReconciliationTransaction) -> Self {
        DraftSnapshot {
            shift_number: tx.shift_number.clone(),
            work_station: tx.work_station.clone(),
            date: Some(tx.date),
            starting_cash: tx.starting_cash,
            cash_received_on_receipt: tx.cash_received_on_receipt,
            notes: tx.notes.clone(),
            receipt_image_name: tx.receipt_image.as_ref().map(|img| img.file_name().to_string()),
            drawer: tx.drawer.clone(),
        }
    }

    /// A snapshot is worth restoring once the operator picked a workstation
    /// or shift, or typed the receipt total.
    pub fn is_restorable(&self) -> bool {
        !self.work_station.trim().is_empty()
            || !self.shift_number.trim().is_empty()
            || self.cash_received_on_receipt.is_some()
    }

    /// Writes the snapshot into `tx`.
    ///
    /// A cached date before `today` is not restored.
    pub fn apply_to(&self, tx: &mut ReconciliationTransaction, today: NaiveDate) {
        tx.shift_number = self.shift_number.clone();
        tx.work_station = self.work_station.clone();
        if let Some(date) = self.date.filter(|d| *d >= today) {
            tx.date = date;
        }
        if let Some(amount) = self.starting_cash {
            if validate_starting_amount(amount).is_ok() {
                tx.starting_cash = Some(amount);
            }
        }
        tx.cash_received_on_receipt = self.cash_received_on_receipt;
        tx.notes = self.notes.clone();
        tx.receipt_image = self
            .receipt_image_name
            .as_ref()
            .map(|name| ReceiptImage::NameOnly {
                file_name: name.clone(),
            });
        tx.drawer = self.drawer.clone();
    }
}

// =============================================================================
// Draft Cache
// =============================================================================

/// Key-value storage for draft snapshots. Last writer wins.
#[async_trait]
pub trait DraftCache: Send + Sync {
    async fn load(&self, key: &str) -> SessionResult<Option<DraftSnapshot>>;

    async fn store(&self, key: &str, snapshot: &DraftSnapshot) -> SessionResult<()>;

    /// Removes the snapshot; clearing a missing key is not an error.
    async fn clear(&self, key: &str) -> SessionResult<()>;
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileDraftCache {
    dir: PathBuf,
}

impl FileDraftCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileDraftCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

fn cache_error(path: &Path, err: std::io::Error) -> SessionError {
    SessionError::Cache(format!("{}: {}", path.display(), err))
}

#[async_trait]
impl DraftCache for FileDraftCache {
    async fn load(&self, key: &str) -> SessionResult<Option<DraftSnapshot>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(cache_error(&path, e)),
        };

        let snapshot = serde_json::from_slice(&bytes)?;
        debug!(?path, "Loaded draft snapshot");
        Ok(Some(snapshot))
    }

    async fn store(&self, key: &str, snapshot: &DraftSnapshot) -> SessionResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| cache_error(&self.dir, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| cache_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| cache_error(&path, e))?;

        debug!(?path, "Stored draft snapshot");
        Ok(())
    }

    async fn clear(&self, key: &str) -> SessionResult<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(?path, "Cleared draft snapshot");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(cache_error(&path, e)),
        }
    }
}
