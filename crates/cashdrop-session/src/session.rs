//! # Reconciliation Session
//!
//! One operator's cash drop, from first count to submission.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   open() ──► Loading ──► Ready ◄─────────────────────┐                 │
//! │                            │  edits (recompute)       │                 │
//! │                            │  save_draft/delete_draft │ failure         │
//! │                            ▼                          │                 │
//! │                        Submitting ────────────────────┘                 │
//! │                            │ success                                    │
//! │                            ▼                                            │
//! │                        Submitted  (every operation → SessionClosed)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submit
//! ```text
//! eligibility ──► daily limit ──► create drawer ──► create drop ──► cleanup
//!   (no I/O)      (list drops     (submitted)       (submitted,     old draft pair,
//!                  for the date)                      FK, image)     offline cache
//! ```
//!
//! The drawer and drop rows are two writes with nothing spanning them. If the
//! drop write fails the drawer row stays behind unless
//! `[submission] compensate_orphan_drawer` is on.

use cashdrop_core::validation::{
    check_submit_eligibility, validate_amount_range, validate_starting_amount,
};
use cashdrop_core::{
    AdminSettings, BusinessCalendar, Clock, CoinRoll, CurrentUser, Denomination, DerivedTotals,
    DrawerCount, DrawerEntry, DropEntry, EntryQuery, EntryStatus, Money, Quantity, ReceiptImage,
    ReconciliationTransaction, SystemClock, ValidationError,
};
use cashdrop_db::{Database, DbConfig};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::cache::{DraftCache, DraftSnapshot, FileDraftCache};
use crate::config::TerminalConfig;
use crate::error::{SessionError, SessionResult};
use crate::notification::{self, NotificationKind, StatusNotification};
use crate::store::{AuthProvider, ConfigAuthProvider, EntryStore, SqliteEntryStore};

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Submitting,
    Submitted,
}

/// Backend ids of the drafted pair this session knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftIds {
    pub drawer_entry_id: Option<String>,
    pub drop_entry_id: Option<String>,
}

impl DraftIds {
    pub fn is_empty(&self) -> bool {
        self.drawer_entry_id.is_none() && self.drop_entry_id.is_none()
    }
}

/// The two records written by a successful submit.
#[derive(Debug, Clone)]
pub struct SubmittedDrop {
    pub drawer_entry: DrawerEntry,
    pub drop_entry: DropEntry,
}

// =============================================================================
// Builder
// =============================================================================

/// Wires collaborators into a session.
pub struct SessionBuilder {
    config: TerminalConfig,
    store: Option<Arc<dyn EntryStore>>,
    cache: Option<Arc<dyn DraftCache>>,
    auth: Option<Arc<dyn AuthProvider>>,
    clock: Arc<dyn Clock>,
}

impl SessionBuilder {
    pub fn new(config: TerminalConfig) -> Self {
        SessionBuilder {
            config,
            store: None,
            cache: None,
            auth: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Local terminal wiring: SQLite store, file cache, config-backed auth.
    pub async fn local(config: TerminalConfig) -> SessionResult<Self> {
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionError::Store(format!("{}: {}", parent.display(), e)))?;
        }

        let db = Database::new(DbConfig::new(db_path)).await?;
        let cache = FileDraftCache::new(config.cache_dir());
        let auth = ConfigAuthProvider::new(&config);

        Ok(SessionBuilder::new(config)
            .with_store(Arc::new(SqliteEntryStore::new(db)))
            .with_cache(Arc::new(cache))
            .with_auth(Arc::new(auth)))
    }

    pub fn with_store(mut self, store: Arc<dyn EntryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn DraftCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the session and loads any draft for today.
    pub async fn open(self) -> SessionResult<ReconciliationSession> {
        let store = self
            .store
            .ok_or_else(|| SessionError::InvalidConfig("Entry store required".into()))?;
        let cache = self
            .cache
            .ok_or_else(|| SessionError::InvalidConfig("Draft cache required".into()))?;
        let auth = self
            .auth
            .ok_or_else(|| SessionError::InvalidConfig("Auth provider required".into()))?;
        let calendar = self.config.calendar_with_clock(self.clock)?;

        ReconciliationSession::open(self.config, store, cache, auth, calendar).await
    }
}

// =============================================================================
// Session
// =============================================================================

/// A cash drop in progress.
pub struct ReconciliationSession {
    store: Arc<dyn EntryStore>,
    cache: Arc<dyn DraftCache>,
    calendar: BusinessCalendar,
    draft_cache_key: String,
    notification_ttl: Duration,
    compensate_orphan_drawer: bool,

    user: CurrentUser,
    admin: AdminSettings,
    tx: ReconciliationTransaction,
    totals: DerivedTotals,
    draft_ids: DraftIds,
    state: SessionState,
    notification: Option<StatusNotification>,
}

impl std::fmt::Debug for ReconciliationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationSession")
            .field("state", &self.state)
            .field("user", &self.user.name)
            .field("date", &self.tx.date)
            .field("draft_ids", &self.draft_ids)
            .finish_non_exhaustive()
    }
}

impl ReconciliationSession {
    pub fn builder(config: TerminalConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    // =========================================================================
    // Load
    // =========================================================================

    async fn open(
        config: TerminalConfig,
        store: Arc<dyn EntryStore>,
        cache: Arc<dyn DraftCache>,
        auth: Arc<dyn AuthProvider>,
        calendar: BusinessCalendar,
    ) -> SessionResult<Self> {
        let user = auth.current_user().await.map_err(|e| match e {
            SessionError::Auth(_) => e,
            other => SessionError::Auth(other.to_string()),
        })?;

        let admin = match auth.admin_settings().await {
            Ok(admin) => match validate_starting_amount(admin.starting_amount) {
                Ok(()) => admin,
                Err(e) => {
                    warn!(error = %e, "Admin starting amount rejected, using configured default");
                    AdminSettings {
                        starting_amount: config.admin.starting_amount,
                        ..admin
                    }
                }
            },
            Err(e) => {
                warn!(error = %e, "Admin settings unavailable, using configured defaults");
                config.admin.clone()
            }
        };

        let today = calendar.today();
        let tx = ReconciliationTransaction::new(user.name.clone(), today, admin.starting_amount);
        let totals = tx.totals();

        let mut session = ReconciliationSession {
            store,
            cache,
            calendar,
            draft_cache_key: config.draft_cache_key().to_string(),
            notification_ttl: config.notification_ttl(),
            compensate_orphan_drawer: config.submission.compensate_orphan_drawer,
            user,
            admin,
            tx,
            totals,
            draft_ids: DraftIds::default(),
            state: SessionState::Loading,
            notification: None,
        };

        info!(employee = %session.user.name, date = %today, "Opening cash drop session");

        let restored = session.restore_from_backend().await || session.restore_from_cache().await;
        if restored {
            session.notify(notification::DRAFT_RESTORED, NotificationKind::Info);
        }

        session.recompute();
        session.state = SessionState::Ready;
        Ok(session)
    }

    async fn restore_from_backend(&mut self) -> bool {
        let query = EntryQuery::for_employee_on(self.user.name.clone(), self.tx.date);
        let (drawers, drops) = tokio::join!(
            self.store.list_drawer_entries(&query),
            self.store.list_drop_entries(&query)
        );

        let drawers = drawers.unwrap_or_else(|e| {
            warn!(error = %e, "Could not look up drafted drawer entries");
            Vec::new()
        });
        let drops = drops.unwrap_or_else(|e| {
            warn!(error = %e, "Could not look up drafted drop entries");
            Vec::new()
        });

        let (drawer, drop) = pick_drafted_pair(drawers, drops);
        if drawer.is_none() && drop.is_none() {
            debug!("No drafted entries on file");
            return false;
        }

        let tx = &mut self.tx;
        if let Some(drawer) = &drawer {
            tx.drawer = DrawerCount::from_persisted(&drawer.counts, &drawer.rolls);
            tx.starting_cash = Some(drawer.starting_cash());
            tx.shift_number = drawer.shift_number.clone();
            tx.work_station = drawer.work_station.clone();
            tx.date = drawer.date;
            self.draft_ids.drawer_entry_id = Some(drawer.id.clone());
        }
        if let Some(drop) = &drop {
            tx.cash_received_on_receipt = Some(drop.ws_label_amount());
            tx.notes = drop.notes.clone().unwrap_or_default();
            tx.receipt_image = drop
                .label_image_name
                .as_ref()
                .map(|name| ReceiptImage::NameOnly {
                    file_name: name.clone(),
                });
            if tx.shift_number.is_empty() {
                tx.shift_number = drop.shift_number.clone();
            }
            if tx.work_station.is_empty() {
                tx.work_station = drop.work_station.clone();
            }
            if drawer.is_none() {
                tx.date = drop.date;
            }
            self.draft_ids.drawer_entry_id = Some(drop.drawer_entry_id.clone());
            self.draft_ids.drop_entry_id = Some(drop.id.clone());
        }

        info!(draft = ?self.draft_ids, "Restored draft from entry store");
        true
    }

    async fn restore_from_cache(&mut self) -> bool {
        let snapshot = match self.cache.load(&self.draft_cache_key).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "Could not read offline draft");
                return false;
            }
        };

        if !snapshot.is_restorable() {
            debug!("Offline draft has nothing worth restoring");
            return false;
        }

        snapshot.apply_to(&mut self.tx, self.calendar.today());
        info!("Restored draft from offline cache");
        true
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    pub fn admin_settings(&self) -> &AdminSettings {
        &self.admin
    }

    pub fn transaction(&self) -> &ReconciliationTransaction {
        &self.tx
    }

    pub fn totals(&self) -> &DerivedTotals {
        &self.totals
    }

    pub fn draft_ids(&self) -> &DraftIds {
        &self.draft_ids
    }

    pub fn business_date(&self) -> NaiveDate {
        self.calendar.today()
    }

    /// The current notification, if it has not expired yet.
    pub fn notification(&self) -> Option<&StatusNotification> {
        let now = self.calendar.now();
        self.notification.as_ref().filter(|n| n.is_active(now))
    }

    /// Every rule that currently blocks submission.
    pub fn eligibility(&self) -> Vec<ValidationError> {
        check_submit_eligibility(&self.tx, &self.totals)
    }

    pub fn is_submit_eligible(&self) -> bool {
        self.eligibility().is_empty()
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub fn set_quantity(
        &mut self,
        denomination: Denomination,
        quantity: impl Into<Quantity>,
    ) -> SessionResult<()> {
        self.ensure_open()?;
        self.tx.drawer.set_quantity(denomination, quantity);
        self.recompute();
        Ok(())
    }

    /// Quantity as typed; blank clears the field.
    pub fn enter_quantity(&mut self, denomination: Denomination, input: &str) -> SessionResult<()> {
        let quantity = Quantity::parse(denomination.field(), input)?;
        self.set_quantity(denomination, quantity)
    }

    pub fn set_roll_count(&mut self, roll: CoinRoll, quantity: impl Into<Quantity>) -> SessionResult<()> {
        self.ensure_open()?;
        self.tx.drawer.set_roll_count(roll, quantity);
        self.recompute();
        Ok(())
    }

    pub fn enter_roll_count(&mut self, roll: CoinRoll, input: &str) -> SessionResult<()> {
        let quantity = Quantity::parse(roll.field(), input)?;
        self.set_roll_count(roll, quantity)
    }

    /// Applies the coin-roll dialog in one go.
    pub fn apply_rolls<I>(&mut self, rolls: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = (CoinRoll, Quantity)>,
    {
        self.ensure_open()?;
        for (roll, quantity) in rolls {
            self.tx.drawer.set_roll_count(roll, quantity);
        }
        self.recompute();
        self.notify(notification::ROLLS_SAVED, NotificationKind::Success);
        Ok(())
    }

    pub fn set_shift(&mut self, shift_number: impl Into<String>) -> SessionResult<()> {
        self.ensure_open()?;
        self.tx.shift_number = shift_number.into();
        self.recompute();
        Ok(())
    }

    pub fn set_work_station(&mut self, work_station: impl Into<String>) -> SessionResult<()> {
        self.ensure_open()?;
        self.tx.work_station = work_station.into();
        self.recompute();
        Ok(())
    }

    /// Sets the starting float. Negative amounts are rejected and the
    /// previous value is kept.
    pub fn set_starting_cash(&mut self, amount: Option<Money>) -> SessionResult<()> {
        self.ensure_open()?;
        if let Some(amount) = amount {
            self.check_amount("starting_cash", amount, Money::zero())?;
        }
        self.tx.starting_cash = amount;
        self.recompute();
        Ok(())
    }

    /// Starting cash as typed; blank clears it.
    pub fn enter_starting_cash(&mut self, input: &str) -> SessionResult<()> {
        let amount = parse_optional_amount(input)?;
        self.set_starting_cash(amount)
    }

    pub fn set_cash_received(&mut self, amount: Option<Money>) -> SessionResult<()> {
        self.ensure_open()?;
        if let Some(amount) = amount {
            self.check_amount("cash_received_on_receipt", amount, -Money::MAX)?;
        }
        self.tx.cash_received_on_receipt = amount;
        self.recompute();
        Ok(())
    }

    /// Receipt total as typed; blank clears it.
    pub fn enter_cash_received(&mut self, input: &str) -> SessionResult<()> {
        let amount = parse_optional_amount(input)?;
        self.set_cash_received(amount)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> SessionResult<()> {
        self.ensure_open()?;
        self.tx.notes = notes.into();
        self.recompute();
        Ok(())
    }

    pub fn set_receipt_image(&mut self, image: Option<ReceiptImage>) -> SessionResult<()> {
        self.ensure_open()?;
        self.tx.receipt_image = image;
        self.recompute();
        Ok(())
    }

    fn check_amount(&mut self, field: &str, amount: Money, min: Money) -> SessionResult<()> {
        if let Err(e) = validate_amount_range(field, amount, min) {
            warn!(field, amount = %amount, "Rejected amount");
            let err = SessionError::InvalidInput(e);
            self.notify(err.to_string(), NotificationKind::Error);
            return Err(err);
        }
        Ok(())
    }

    /// Changes the business date. Dates before today are rejected and the
    /// held date is kept.
    pub fn set_date(&mut self, date: NaiveDate) -> SessionResult<()> {
        self.ensure_open()?;
        if let Err(e) = self.calendar.check_selectable(date) {
            warn!(selected = %date, today = %self.calendar.today(), "Rejected prior date");
            let err = SessionError::DateRejected(e);
            self.notify(err.to_string(), NotificationKind::Error);
            return Err(err);
        }
        self.tx.date = date;
        self.recompute();
        Ok(())
    }

    // =========================================================================
    // Save Draft
    // =========================================================================

    /// Saves the form as a drafted drawer/drop pair and mirrors it offline.
    ///
    /// The pair saved earlier in this session is replaced, so at most one
    /// drafted pair exists per session. The daily limit does not apply.
    pub async fn save_draft(&mut self) -> SessionResult<()> {
        self.ensure_open()?;
        let result = self.write_draft().await;
        self.settle(result, notification::DRAFT_SAVED)
    }

    async fn write_draft(&mut self) -> SessionResult<()> {
        let snapshot = DraftSnapshot::capture(&self.tx);
        if let Err(e) = self.cache.store(&self.draft_cache_key, &snapshot).await {
            warn!(error = %e, "Could not mirror draft to offline cache");
        }

        self.remove_known_draft().await;

        let totals = self.recompute();
        let drawer = self
            .store
            .create_drawer_entry(&self.tx.drawer_entry(&totals, EntryStatus::Drafted))
            .await?;
        self.draft_ids.drawer_entry_id = Some(drawer.id.clone());

        let drop = self
            .store
            .create_drop_entry(&self.tx.drop_entry(&drawer.id, &totals, EntryStatus::Drafted))
            .await?;
        self.draft_ids.drop_entry_id = Some(drop.id.clone());

        info!(drawer_id = %drawer.id, drop_id = %drop.id, "Draft saved");
        Ok(())
    }

    // =========================================================================
    // Delete Draft
    // =========================================================================

    /// Deletes the drafted pair and the offline copy, then starts over.
    ///
    /// The two deletes run concurrently. When either fails the form is kept
    /// and the failed id stays known so the delete can be retried.
    pub async fn delete_draft(&mut self) -> SessionResult<()> {
        self.ensure_open()?;
        let result = self.discard_draft().await;
        self.settle(result, notification::DRAFT_DELETED)
    }

    async fn discard_draft(&mut self) -> SessionResult<()> {
        let ids = self.draft_ids.clone();
        let (drop_result, drawer_result) = self.delete_pair(&ids).await;

        let mut first_error = None;
        match drop_result {
            Ok(()) => self.draft_ids.drop_entry_id = None,
            Err(e) => {
                warn!(id = ?ids.drop_entry_id, error = %e, "Could not delete drafted drop entry");
                first_error = Some(e);
            }
        }
        match drawer_result {
            Ok(()) => self.draft_ids.drawer_entry_id = None,
            Err(e) => {
                warn!(id = ?ids.drawer_entry_id, error = %e, "Could not delete drafted drawer entry");
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        self.cache.clear(&self.draft_cache_key).await?;

        self.tx = ReconciliationTransaction::new(
            self.user.name.clone(),
            self.calendar.today(),
            self.admin.starting_amount,
        );
        self.recompute();

        info!(deleted = ?ids, "Draft deleted");
        Ok(())
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Submits the drop.
    ///
    /// Ineligible transactions are rejected before any I/O with every failing
    /// rule listed. On success the session is closed.
    pub async fn submit(&mut self) -> SessionResult<SubmittedDrop> {
        self.ensure_open()?;

        self.recompute();
        let problems = self.eligibility();
        if !problems.is_empty() {
            debug!(count = problems.len(), "Submit blocked by validation");
            return Err(SessionError::NotEligible(problems));
        }

        self.state = SessionState::Submitting;
        let result = self.write_submission().await;

        match result {
            Ok(submitted) => {
                self.state = SessionState::Submitted;
                self.tx.status = EntryStatus::Submitted;
                self.notify(notification::DROP_SUBMITTED, NotificationKind::Success);
                Ok(submitted)
            }
            Err(e) => {
                self.state = SessionState::Ready;
                self.settle(Err(e), notification::DROP_SUBMITTED)
            }
        }
    }

    async fn write_submission(&mut self) -> SessionResult<SubmittedDrop> {
        self.check_daily_limit().await?;

        let totals = self.totals;
        let drawer_entry = self
            .store
            .create_drawer_entry(&self.tx.drawer_entry(&totals, EntryStatus::Submitted))
            .await?;

        let drop_entry = match self
            .store
            .create_drop_entry(&self.tx.drop_entry(&drawer_entry.id, &totals, EntryStatus::Submitted))
            .await
        {
            Ok(drop) => drop,
            Err(e) => {
                error!(drawer_id = %drawer_entry.id, error = %e, "Drop entry failed after drawer entry was created");
                if self.compensate_orphan_drawer {
                    match self.store.delete_drawer_entry(&drawer_entry.id).await {
                        Ok(()) => info!(drawer_id = %drawer_entry.id, "Removed orphaned drawer entry"),
                        Err(del) => warn!(drawer_id = %drawer_entry.id, error = %del, "Could not remove orphaned drawer entry"),
                    }
                }
                return Err(e);
            }
        };

        info!(
            drawer_id = %drawer_entry.id,
            drop_id = %drop_entry.id,
            drop_amount = %totals.drop_amount,
            variance = %totals.variance,
            "Cash drop submitted"
        );

        self.remove_known_draft().await;
        if let Err(e) = self.cache.clear(&self.draft_cache_key).await {
            warn!(error = %e, "Could not clear offline draft after submit");
        }

        Ok(SubmittedDrop {
            drawer_entry,
            drop_entry,
        })
    }

    async fn check_daily_limit(&self) -> SessionResult<()> {
        let max = self.admin.max_cash_drops_per_day;
        match self.store.list_drop_entries(&EntryQuery::on(self.tx.date)).await {
            Ok(drops) => {
                let submitted = drops.iter().filter(|d| d.counts_toward_limit()).count();
                debug!(submitted, max, date = %self.tx.date, "Daily drop count");
                if submitted >= max as usize {
                    warn!(submitted, max, "Daily cash drop limit reached");
                    return Err(SessionError::DailyLimitReached { max });
                }
            }
            Err(e) => warn!(error = %e, "Could not check daily drop count, continuing"),
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_open(&self) -> SessionResult<()> {
        if self.state == SessionState::Submitted {
            return Err(SessionError::SessionClosed);
        }
        Ok(())
    }

    fn recompute(&mut self) -> DerivedTotals {
        self.totals = self.tx.totals();
        debug!(
            total = %self.totals.total_drawer_cash,
            drop_amount = %self.totals.drop_amount,
            variance = %self.totals.variance,
            "Recomputed totals"
        );
        self.totals
    }

    fn notify(&mut self, text: impl Into<String>, kind: NotificationKind) {
        self.notification = Some(StatusNotification::new(
            text,
            kind,
            self.calendar.now(),
            self.notification_ttl,
        ));
    }

    /// Posts the outcome of a persistence operation.
    fn settle<T>(&mut self, result: SessionResult<T>, success: &str) -> SessionResult<T> {
        match result {
            Ok(value) => {
                self.notify(success, NotificationKind::Success);
                Ok(value)
            }
            Err(e) => {
                error!(error = %e, transient = e.is_transient(), "Cash drop operation failed");
                self.notify(e.to_string(), NotificationKind::Error);
                Err(e)
            }
        }
    }

    async fn delete_pair(&self, ids: &DraftIds) -> (SessionResult<()>, SessionResult<()>) {
        let store = &self.store;
        let drop = async {
            match ids.drop_entry_id.as_deref() {
                Some(id) => store.delete_drop_entry(id).await,
                None => Ok(()),
            }
        };
        let drawer = async {
            match ids.drawer_entry_id.as_deref() {
                Some(id) => store.delete_drawer_entry(id).await,
                None => Ok(()),
            }
        };
        tokio::join!(drop, drawer)
    }

    /// Best-effort removal of the drafted pair; forgets the ids either way.
    async fn remove_known_draft(&mut self) {
        let ids = std::mem::take(&mut self.draft_ids);
        if ids.is_empty() {
            return;
        }
        let (drop_result, drawer_result) = self.delete_pair(&ids).await;
        if let Err(e) = drop_result {
            warn!(id = ?ids.drop_entry_id, error = %e, "Could not remove previous drafted drop entry");
        }
        if let Err(e) = drawer_result {
            warn!(id = ?ids.drawer_entry_id, error = %e, "Could not remove previous drafted drawer entry");
        }
    }
}

/// Newest drafted drop and the drafted drawer it points at (else the newest
/// drafted drawer). Lists arrive oldest first.
fn pick_drafted_pair(
    drawers: Vec<DrawerEntry>,
    drops: Vec<DropEntry>,
) -> (Option<DrawerEntry>, Option<DropEntry>) {
    let drop = drops
        .into_iter()
        .filter(|d| d.status == EntryStatus::Drafted)
        .last();
    let mut drafted: Vec<DrawerEntry> = drawers
        .into_iter()
        .filter(|d| d.status == EntryStatus::Drafted)
        .collect();

    let linked = drop
        .as_ref()
        .and_then(|drop| drafted.iter().position(|d| d.id == drop.drawer_entry_id));
    let drawer = match linked {
        Some(i) => Some(drafted.swap_remove(i)),
        None => drafted.pop(),
    };
    (drawer, drop)
}

fn parse_optional_amount(input: &str) -> SessionResult<Option<Money>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Money::parse(input)?))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_submitted, ManualClock, MemoryDraftCache, MemoryEntryStore, StaticAuth};
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::Ordering;

    const KEY: &str = "cashDropDraft";

    /// 2026-05-14 10:00 in Los Angeles.
    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 14, 17, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 14).unwrap()
    }

    fn admin() -> AdminSettings {
        AdminSettings {
            shifts: vec!["1".into(), "2".into()],
            workstations: vec!["WS-1".into(), "WS-2".into()],
            starting_amount: Money::from_cents(20_000),
            max_cash_drops_per_day: 3,
        }
    }

    struct Harness {
        store: Arc<MemoryEntryStore>,
        cache: Arc<MemoryDraftCache>,
        clock: Arc<ManualClock>,
        config: TerminalConfig,
        auth: Arc<StaticAuth>,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                store: Arc::new(MemoryEntryStore::new()),
                cache: Arc::new(MemoryDraftCache::new()),
                clock: Arc::new(ManualClock::at(now())),
                config: TerminalConfig::default(),
                auth: Arc::new(StaticAuth::operator("Avery", admin())),
            }
        }

        async fn open(&self) -> SessionResult<ReconciliationSession> {
            ReconciliationSession::builder(self.config.clone())
                .with_store(self.store.clone())
                .with_cache(self.cache.clone())
                .with_auth(self.auth.clone())
                .with_clock(self.clock.clone())
                .open()
                .await
        }
    }

    /// Scenario B plus the fields submission needs.
    fn fill_eligible(session: &mut ReconciliationSession) {
        session.set_quantity(Denomination::Hundreds, 3).unwrap();
        session.set_quantity(Denomination::Fifties, 2).unwrap();
        session.set_quantity(Denomination::Tens, 1).unwrap();
        session.set_work_station("WS-1").unwrap();
        session.set_shift("2").unwrap();
        session.enter_cash_received("205.50").unwrap();
    }

    // -------------------------------------------------------------------------
    // Load
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_open_blank_session() {
        let h = Harness::new();
        let session = h.open().await.unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.user().name, "Avery");
        assert_eq!(session.transaction().date, today());
        assert_eq!(session.transaction().starting_cash, Some(Money::from_cents(20_000)));
        assert!(session.transaction().drawer.is_blank());
        assert!(session.notification().is_none());
        assert!(session.draft_ids().is_empty());
    }

    #[tokio::test]
    async fn test_business_date_follows_configured_timezone() {
        let mut h = Harness::new();
        // 03:30 UTC on the 15th is still the 14th in Los Angeles.
        h.clock = Arc::new(ManualClock::at(Utc.with_ymd_and_hms(2026, 5, 15, 3, 30, 0).unwrap()));
        let session = h.open().await.unwrap();
        assert_eq!(session.transaction().date, today());

        h.config.terminal.business_timezone = "Europe/Berlin".to_string();
        let session = h.open().await.unwrap();
        assert_eq!(session.transaction().date, today().succ_opt().unwrap());
    }

    #[tokio::test]
    async fn test_open_fails_without_user() {
        let mut h = Harness::new();
        h.auth = Arc::new(StaticAuth {
            user: None,
            admin: Some(admin()),
        });
        let err = h.open().await.unwrap_err();
        assert!(matches!(err, SessionError::Auth(_)));
    }

    #[tokio::test]
    async fn test_open_admin_failure_uses_configured_defaults() {
        let mut h = Harness::new();
        h.auth = Arc::new(StaticAuth {
            user: Some(CurrentUser {
                name: "Avery".into(),
                is_admin: false,
            }),
            admin: None,
        });
        let session = h.open().await.unwrap();
        assert_eq!(session.admin_settings().starting_amount, Money::from_cents(20_000));
        assert_eq!(session.admin_settings().max_cash_drops_per_day, 10);
        assert!(session.admin_settings().shifts.is_empty());
    }

    #[tokio::test]
    async fn test_negative_admin_starting_amount_uses_configured_default() {
        let mut h = Harness::new();
        let mut settings = admin();
        settings.starting_amount = Money::from_cents(-100);
        h.auth = Arc::new(StaticAuth::operator("Avery", settings));
        h.config.admin.starting_amount = Money::from_cents(15_000);

        let session = h.open().await.unwrap();
        assert_eq!(session.admin_settings().starting_amount, Money::from_cents(15_000));
        assert_eq!(session.admin_settings().max_cash_drops_per_day, 3);
        assert_eq!(session.transaction().starting_cash, Some(Money::from_cents(15_000)));
    }

    #[tokio::test]
    async fn test_open_restores_backend_before_cache() {
        let h = Harness::new();
        let mut first = h.open().await.unwrap();
        fill_eligible(&mut first);
        first.set_notes("two rolls short").unwrap();
        first.save_draft().await.unwrap();

        let mut other = DraftSnapshot::capture(first.transaction());
        other.work_station = "WS-CACHE".to_string();
        h.cache.put(KEY, other);

        let second = h.open().await.unwrap();
        let tx = second.transaction();
        assert_eq!(tx.work_station, "WS-1");
        assert_eq!(tx.shift_number, "2");
        assert_eq!(tx.cash_received_on_receipt, Some(Money::parse("205.50").unwrap()));
        assert_eq!(tx.notes, "two rolls short");
        assert_eq!(tx.drawer.quantity(Denomination::Hundreds), Quantity::of(3));
        // zero-count columns come back blank
        assert_eq!(tx.drawer.quantity(Denomination::Ones), Quantity::unset());
        assert_eq!(second.totals().drop_amount, Money::from_cents(21_000));
        assert_eq!(second.draft_ids(), first.draft_ids());
        assert_eq!(
            second.notification().map(|n| n.text.as_str()),
            Some(notification::DRAFT_RESTORED)
        );
    }

    #[tokio::test]
    async fn test_open_restores_from_cache_when_backend_has_nothing() {
        let h = Harness::new();
        let mut tx = ReconciliationTransaction::new("Avery", today(), Money::from_cents(15_000));
        tx.shift_number = "1".to_string();
        tx.drawer.set_quantity(Denomination::Twenties, 10);
        h.cache.put(KEY, DraftSnapshot::capture(&tx));

        let session = h.open().await.unwrap();
        assert_eq!(session.transaction().shift_number, "1");
        assert_eq!(session.transaction().starting_cash, Some(Money::from_cents(15_000)));
        assert_eq!(session.totals().total_drawer_cash, Money::from_cents(20_000));
        assert_eq!(session.totals().drop_amount, Money::from_cents(5_000));
        assert!(session.draft_ids().is_empty());
        assert_eq!(
            session.notification().map(|n| n.kind),
            Some(NotificationKind::Info)
        );
    }

    #[tokio::test]
    async fn test_unrestorable_cache_is_ignored() {
        let h = Harness::new();
        let mut snapshot = DraftSnapshot::default();
        snapshot.drawer.set_quantity(Denomination::Ones, 4);
        h.cache.put(KEY, snapshot);

        let session = h.open().await.unwrap();
        assert!(session.transaction().drawer.is_blank());
        assert!(session.notification().is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_during_load_falls_back_to_cache() {
        let h = Harness::new();
        h.store.fail_list.store(true, Ordering::SeqCst);
        h.cache.put(
            KEY,
            DraftSnapshot {
                work_station: "WS-2".into(),
                ..Default::default()
            },
        );

        let session = h.open().await.unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.transaction().work_station, "WS-2");
    }

    #[tokio::test]
    async fn test_drop_draft_alone_is_enough_to_restore() {
        let h = Harness::new();
        let mut tx = ReconciliationTransaction::new("Avery", today(), Money::from_cents(20_000));
        tx.work_station = "WS-2".to_string();
        tx.shift_number = "1".to_string();
        tx.cash_received_on_receipt = Some(Money::from_cents(9_900));
        tx.notes = "recount".to_string();
        let totals = tx.totals();

        // the drawer row is no longer a draft, only the drop row is
        let drawer = h
            .store
            .create_drawer_entry(&tx.drawer_entry(&totals, EntryStatus::Submitted))
            .await
            .unwrap();
        let drop = h
            .store
            .create_drop_entry(&tx.drop_entry(&drawer.id, &totals, EntryStatus::Drafted))
            .await
            .unwrap();

        let session = h.open().await.unwrap();
        let restored = session.transaction();
        assert_eq!(restored.work_station, "WS-2");
        assert_eq!(restored.shift_number, "1");
        assert_eq!(restored.cash_received_on_receipt, Some(Money::from_cents(9_900)));
        assert_eq!(restored.notes, "recount");
        assert!(restored.drawer.is_blank());
        assert_eq!(session.draft_ids().drawer_entry_id.as_deref(), Some(drawer.id.as_str()));
        assert_eq!(session.draft_ids().drop_entry_id.as_deref(), Some(drop.id.as_str()));
    }

    #[test]
    fn test_pick_drafted_pair_follows_drop_link() {
        let stamp = now();
        let drawer = |id: &str, status| DrawerEntry {
            id: id.to_string(),
            employee_name: "Avery".into(),
            work_station: "WS-1".into(),
            shift_number: "1".into(),
            date: today(),
            starting_cash_cents: 0,
            total_cash_cents: 0,
            counts: Default::default(),
            rolls: Default::default(),
            status,
            created_at: stamp,
        };
        let drop = |id: &str, drawer_id: &str, status| DropEntry {
            id: id.to_string(),
            drawer_entry_id: drawer_id.to_string(),
            employee_name: "Avery".into(),
            work_station: "WS-1".into(),
            shift_number: "1".into(),
            date: today(),
            drop_amount_cents: 0,
            ws_label_amount_cents: 0,
            variance_cents: 0,
            status,
            ignored: false,
            notes: None,
            label_image_name: None,
            counts: Default::default(),
            rolls: Default::default(),
            created_at: stamp,
        };

        let (d, p) = pick_drafted_pair(
            vec![
                drawer("a", EntryStatus::Drafted),
                drawer("b", EntryStatus::Drafted),
                drawer("c", EntryStatus::Submitted),
            ],
            vec![
                drop("x", "a", EntryStatus::Drafted),
                drop("y", "c", EntryStatus::Submitted),
            ],
        );
        assert_eq!(d.unwrap().id, "a");
        assert_eq!(p.unwrap().id, "x");

        let (d, p) = pick_drafted_pair(vec![drawer("b", EntryStatus::Drafted)], Vec::new());
        assert_eq!(d.unwrap().id, "b");
        assert!(p.is_none());

        let (d, p) = pick_drafted_pair(Vec::new(), vec![drop("y", "c", EntryStatus::Submitted)]);
        assert!(d.is_none() && p.is_none());
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_every_edit_recomputes() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();

        session.set_quantity(Denomination::Hundreds, 3).unwrap();
        session.set_quantity(Denomination::Fifties, 2).unwrap();
        session.enter_quantity(Denomination::Tens, "1").unwrap();

        let totals = session.totals();
        assert_eq!(totals.total_drawer_cash, Money::from_cents(41_000));
        assert_eq!(totals.drop_amount, Money::from_cents(21_000));
        let breakdown = totals.breakdown().unwrap();
        assert_eq!(breakdown.hundreds, 2);
        assert_eq!(breakdown.tens, 1);
        let remaining = totals.remaining().unwrap();
        assert_eq!(remaining.hundreds, 1);
        assert_eq!(remaining.fifties, 2);

        session.enter_cash_received("200").unwrap();
        assert_eq!(session.totals().variance, Money::from_cents(1_000));

        session.enter_starting_cash("410").unwrap();
        assert!(!session.totals().has_drop());
        assert!(session.totals().breakdown().is_none());
    }

    #[tokio::test]
    async fn test_invalid_quantity_input_is_rejected() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        session.set_quantity(Denomination::Dimes, 7).unwrap();

        let err = session.enter_quantity(Denomination::Dimes, "2.5").unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert_eq!(session.transaction().drawer.quantity(Denomination::Dimes), Quantity::of(7));

        session.enter_quantity(Denomination::Dimes, "").unwrap();
        assert_eq!(session.transaction().drawer.quantity(Denomination::Dimes), Quantity::unset());

        assert!(session.enter_cash_received("abc").is_err());
    }

    #[tokio::test]
    async fn test_apply_rolls_batch() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        session.set_starting_cash(Some(Money::zero())).unwrap();

        session
            .apply_rolls([
                (CoinRoll::Quarter, Quantity::of(4)),
                (CoinRoll::Penny, Quantity::of(2)),
            ])
            .unwrap();

        // 4 × $10.00 + 2 × $0.50
        assert_eq!(session.totals().total_drawer_cash, Money::from_cents(4_100));
        // rolls are never dropped
        let breakdown = session.totals().breakdown().unwrap();
        assert_eq!(breakdown.total(), Money::zero());
        assert_eq!(
            session.notification().map(|n| n.text.as_str()),
            Some(notification::ROLLS_SAVED)
        );
    }

    #[tokio::test]
    async fn test_date_guard_keeps_previous_value() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        let tomorrow = today().succ_opt().unwrap();
        session.set_date(tomorrow).unwrap();

        let err = session.set_date(today().pred_opt().unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::DateRejected(_)));
        assert_eq!(
            err.to_string(),
            "Cannot select prior dates. Cash drop is for immediate shift/day closure."
        );
        assert_eq!(session.transaction().date, tomorrow);
        assert!(session.notification().unwrap().is_error());

        session.set_date(today()).unwrap();
        assert_eq!(session.transaction().date, today());
    }

    #[tokio::test]
    async fn test_negative_starting_cash_keeps_previous_value() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();

        let err = session.enter_starting_cash("-50").unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert_eq!(session.transaction().starting_cash, Some(Money::from_cents(20_000)));
        assert!(session.notification().unwrap().is_error());

        session.enter_starting_cash("0").unwrap();
        assert_eq!(session.transaction().starting_cash, Some(Money::zero()));
    }

    #[tokio::test]
    async fn test_huge_amounts_are_rejected_without_panicking() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        session.set_quantity(Denomination::Hundreds, 3).unwrap();

        assert!(session.enter_cash_received("-92233720368547758.08").is_err());
        assert!(session.enter_starting_cash("92233720368547758.07").is_err());
        assert!(session
            .set_cash_received(Some(Money::from_cents(i64::MIN)))
            .is_err());
        assert_eq!(session.transaction().cash_received_on_receipt, None);

        // negative receipts are still accepted
        session.enter_cash_received("-12.50").unwrap();
        assert_eq!(session.totals().drop_amount, Money::from_cents(10_000));
        assert_eq!(session.totals().variance, Money::from_cents(11_250));
    }

    #[tokio::test]
    async fn test_notifications_expire_after_ttl() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        session.save_draft().await.unwrap();
        assert_eq!(
            session.notification().map(|n| n.text.as_str()),
            Some(notification::DRAFT_SAVED)
        );

        h.clock.advance(Duration::seconds(4));
        assert!(session.notification().is_some());
        h.clock.advance(Duration::seconds(1));
        assert!(session.notification().is_none());
    }

    // -------------------------------------------------------------------------
    // Save / Delete
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_save_draft_writes_linked_pair_and_cache() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        session.save_draft().await.unwrap();

        let drawers = h.store.drawers().await;
        let drops = h.store.drops().await;
        assert_eq!(drawers.len(), 1);
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].drawer_entry_id, drawers[0].id);
        assert_eq!(drawers[0].status, EntryStatus::Drafted);
        assert_eq!(drops[0].status, EntryStatus::Drafted);
        assert_eq!(drawers[0].total_cash(), Money::from_cents(41_000));
        assert_eq!(drops[0].drop_amount(), Money::from_cents(21_000));
        assert_eq!(drops[0].counts.hundreds, 2);

        let cached = h.cache.get(KEY).unwrap();
        assert_eq!(cached.work_station, "WS-1");
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_second_save_leaves_one_drafted_pair() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        session.save_draft().await.unwrap();
        session.set_quantity(Denomination::Twenties, 4).unwrap();
        session.save_draft().await.unwrap();

        let drawers = h.store.drawers().await;
        let drops = h.store.drops().await;
        assert_eq!(drawers.len(), 1);
        assert_eq!(drops.len(), 1);
        assert_eq!(drawers[0].counts.twenties, 4);
        assert_eq!(session.draft_ids().drop_entry_id.as_deref(), Some(drops[0].id.as_str()));
    }

    #[tokio::test]
    async fn test_save_draft_ignores_daily_limit() {
        let h = Harness::new();
        seed_submitted(&h.store, "Blake", today(), 3).await;
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        assert!(session.save_draft().await.is_ok());
    }

    #[tokio::test]
    async fn test_save_failure_posts_error_and_stays_ready() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        h.store.fail_create_drawer.store(true, Ordering::SeqCst);

        let err = session.save_draft().await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.notification().unwrap().is_error());
        // the offline copy is still written
        assert!(h.cache.get(KEY).is_some());
    }

    #[tokio::test]
    async fn test_delete_draft_clears_records_and_cache() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        session.set_starting_cash(Some(Money::from_cents(5_000))).unwrap();
        session.save_draft().await.unwrap();

        session.delete_draft().await.unwrap();

        assert!(h.store.drawers().await.is_empty());
        assert!(h.store.drops().await.is_empty());
        assert!(h.cache.get(KEY).is_none());
        assert!(session.draft_ids().is_empty());

        let tx = session.transaction();
        assert_eq!(tx.employee_name, "Avery");
        assert_eq!(tx.starting_cash, Some(Money::from_cents(20_000)));
        assert!(tx.work_station.is_empty());
        assert!(tx.drawer.is_blank());
        assert_eq!(
            session.notification().map(|n| n.text.as_str()),
            Some(notification::DRAFT_DELETED)
        );
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_form_for_retry() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        session.save_draft().await.unwrap();
        h.store.fail_delete.store(true, Ordering::SeqCst);

        assert!(session.delete_draft().await.is_err());
        assert_eq!(session.transaction().work_station, "WS-1");
        assert!(!session.draft_ids().is_empty());
        assert!(h.cache.get(KEY).is_some());

        h.store.fail_delete.store(false, Ordering::SeqCst);
        session.delete_draft().await.unwrap();
        assert!(h.store.drawers().await.is_empty());
    }

    // -------------------------------------------------------------------------
    // Submit
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_submit_ineligible_makes_no_writes() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        // Scenario A: $123.00 against a $200.00 float
        session.set_quantity(Denomination::Twenties, 5).unwrap();
        session.set_quantity(Denomination::Tens, 2).unwrap();
        session.set_quantity(Denomination::Ones, 3).unwrap();

        let err = session.submit().await.unwrap_err();
        let SessionError::NotEligible(problems) = &err else {
            panic!("expected NotEligible, got {err:?}");
        };
        let fields: Vec<&str> = problems.iter().map(|p| p.field()).collect();
        assert!(fields.contains(&"drop_amount"));
        assert!(fields.contains(&"work_station"));
        assert!(fields.contains(&"shift_number"));
        assert!(fields.contains(&"cash_received_on_receipt"));
        assert_eq!(h.store.create_count(), 0);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_submit_at_daily_limit_makes_no_writes() {
        let h = Harness::new();
        seed_submitted(&h.store, "Blake", today(), 3).await;
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);

        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, SessionError::DailyLimitReached { max: 3 }));
        assert_eq!(h.store.create_count(), 0);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(
            session.notification().unwrap().text,
            "Maximum cash drops per day (3) reached. Please ignore any incorrect entries first."
        );
    }

    #[tokio::test]
    async fn test_ignored_and_drafted_drops_do_not_count() {
        let h = Harness::new();
        seed_submitted(&h.store, "Blake", today(), 3).await;
        let first = h.store.drops().await[0].id.clone();
        h.store.set_ignored(&first).await;
        // another day's drops never count
        seed_submitted(&h.store, "Blake", today().pred_opt().unwrap(), 3).await;

        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        session.save_draft().await.unwrap();

        assert!(session.submit().await.is_ok());
    }

    #[tokio::test]
    async fn test_limit_lookup_failure_does_not_block() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        h.store.fail_list.store(true, Ordering::SeqCst);

        assert!(session.submit().await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_success_clears_cache_and_closes_session() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        session.set_receipt_image(Some(ReceiptImage::attached("label.jpg", None, vec![9; 16]))).unwrap();
        session.save_draft().await.unwrap();

        let submitted = session.submit().await.unwrap();
        assert_eq!(submitted.drop_entry.drawer_entry_id, submitted.drawer_entry.id);
        assert_eq!(submitted.drop_entry.status, EntryStatus::Submitted);
        assert_eq!(submitted.drawer_entry.status, EntryStatus::Submitted);
        assert_eq!(submitted.drop_entry.label_image_name.as_deref(), Some("label.jpg"));
        assert_eq!(submitted.drop_entry.variance(), Money::from_cents(450));

        // the draft pair is gone, only the submitted pair remains
        assert_eq!(h.store.drawers().await.len(), 1);
        assert_eq!(h.store.drops().await.len(), 1);
        assert!(h.cache.get(KEY).is_none());
        assert_eq!(session.state(), SessionState::Submitted);
        assert_eq!(session.transaction().status, EntryStatus::Submitted);

        assert!(matches!(session.set_notes("late"), Err(SessionError::SessionClosed)));
        assert!(matches!(session.save_draft().await, Err(SessionError::SessionClosed)));
        assert!(matches!(session.submit().await, Err(SessionError::SessionClosed)));
    }

    #[tokio::test]
    async fn test_drop_failure_leaves_orphan_drawer() {
        let h = Harness::new();
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        h.store.fail_create_drop.store(true, Ordering::SeqCst);

        let err = session.submit().await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(session.state(), SessionState::Ready);

        let drawers = h.store.drawers().await;
        assert_eq!(drawers.len(), 1);
        assert_eq!(drawers[0].status, EntryStatus::Submitted);
        assert!(h.store.drops().await.is_empty());
    }

    #[tokio::test]
    async fn test_drop_failure_with_compensation_removes_drawer() {
        let mut h = Harness::new();
        h.config.submission.compensate_orphan_drawer = true;
        let mut session = h.open().await.unwrap();
        fill_eligible(&mut session);
        h.store.fail_create_drop.store(true, Ordering::SeqCst);

        assert!(session.submit().await.is_err());
        assert!(h.store.drawers().await.is_empty());

        // retry succeeds once the store recovers
        h.store.fail_create_drop.store(false, Ordering::SeqCst);
        assert!(session.submit().await.is_ok());
        assert_eq!(h.store.drawers().await.len(), 1);
    }

    // -------------------------------------------------------------------------
    // Local wiring
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_local_session_round_trip() {
        let dir = std::env::temp_dir().join(format!("cashdrop-session-{}", uuid::Uuid::new_v4()));
        let mut config = TerminalConfig::default();
        config.storage.database_path = Some(dir.join("cashdrop.db"));
        config.storage.cache_dir = Some(dir.join("cache"));
        config.operator.name = "Avery".to_string();

        let clock: Arc<dyn Clock> = Arc::new(ManualClock::at(now()));
        let mut session = SessionBuilder::local(config.clone())
            .await
            .unwrap()
            .with_clock(clock.clone())
            .open()
            .await
            .unwrap();
        fill_eligible(&mut session);
        session.save_draft().await.unwrap();
        assert!(dir.join("cache").join("cashDropDraft.json").exists());

        let mut reopened = SessionBuilder::local(config)
            .await
            .unwrap()
            .with_clock(clock)
            .open()
            .await
            .unwrap();
        assert_eq!(reopened.transaction().work_station, "WS-1");
        assert_eq!(reopened.totals().drop_amount, Money::from_cents(21_000));

        reopened.submit().await.unwrap();
        assert!(!dir.join("cache").join("cashDropDraft.json").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
