//! In-memory collaborators for session tests.

use async_trait::async_trait;
use cashdrop_core::{
    AdminSettings, Clock, CurrentUser, DrawerEntry, DropEntry, EntryQuery, EntryStatus,
    NewDrawerEntry, NewDropEntry,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::cache::{DraftCache, DraftSnapshot};
use crate::error::{SessionError, SessionResult};
use crate::store::{AuthProvider, EntryStore};

// =============================================================================
// Entry Store
// =============================================================================

#[derive(Default)]
struct Tables {
    drawers: Vec<DrawerEntry>,
    drops: Vec<DropEntry>,
    next_id: u64,
}

/// Entry store backed by vectors, with switchable failures.
#[derive(Default)]
pub struct MemoryEntryStore {
    tables: AsyncMutex<Tables>,
    pub fail_create_drawer: AtomicBool,
    pub fail_create_drop: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_delete: AtomicBool,
    pub creates: AtomicUsize,
}

fn injected(what: &str) -> SessionError {
    SessionError::Store(format!("injected {what} failure"))
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn drawers(&self) -> Vec<DrawerEntry> {
        self.tables.lock().await.drawers.clone()
    }

    pub async fn drops(&self) -> Vec<DropEntry> {
        self.tables.lock().await.drops.clone()
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub async fn set_ignored(&self, id: &str) {
        let mut tables = self.tables.lock().await;
        if let Some(drop) = tables.drops.iter_mut().find(|d| d.id == id) {
            drop.ignored = true;
        }
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn create_drawer_entry(&self, entry: &NewDrawerEntry) -> SessionResult<DrawerEntry> {
        if self.fail_create_drawer.load(Ordering::SeqCst) {
            return Err(injected("create drawer"));
        }
        self.creates.fetch_add(1, Ordering::SeqCst);

        let mut tables = self.tables.lock().await;
        tables.next_id += 1;
        let created = DrawerEntry {
            id: format!("drawer-{}", tables.next_id),
            employee_name: entry.employee_name.clone(),
            work_station: entry.work_station.clone(),
            shift_number: entry.shift_number.clone(),
            date: entry.date,
            starting_cash_cents: entry.starting_cash.cents(),
            total_cash_cents: entry.total_cash.cents(),
            counts: entry.counts,
            rolls: entry.rolls,
            status: entry.status,
            created_at: Utc::now(),
        };
        tables.drawers.push(created.clone());
        Ok(created)
    }

    async fn create_drop_entry(&self, entry: &NewDropEntry) -> SessionResult<DropEntry> {
        if self.fail_create_drop.load(Ordering::SeqCst) {
            return Err(injected("create drop"));
        }
        self.creates.fetch_add(1, Ordering::SeqCst);

        let mut tables = self.tables.lock().await;
        if !tables.drawers.iter().any(|d| d.id == entry.drawer_entry_id) {
            return Err(SessionError::Store("drawer entry does not exist".into()));
        }
        tables.next_id += 1;
        let created = DropEntry {
            id: format!("drop-{}", tables.next_id),
            drawer_entry_id: entry.drawer_entry_id.clone(),
            employee_name: entry.employee_name.clone(),
            work_station: entry.work_station.clone(),
            shift_number: entry.shift_number.clone(),
            date: entry.date,
            drop_amount_cents: entry.drop_amount.cents(),
            ws_label_amount_cents: entry.ws_label_amount.cents(),
            variance_cents: entry.variance.cents(),
            status: entry.status,
            ignored: false,
            notes: entry.notes.clone(),
            label_image_name: entry.label_image.as_ref().map(|img| img.file_name.clone()),
            counts: entry.counts,
            rolls: entry.rolls,
            created_at: Utc::now(),
        };
        tables.drops.push(created.clone());
        Ok(created)
    }

    async fn list_drawer_entries(&self, query: &EntryQuery) -> SessionResult<Vec<DrawerEntry>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("list"));
        }
        let tables = self.tables.lock().await;
        Ok(tables
            .drawers
            .iter()
            .filter(|d| query.matches(&d.employee_name, d.date))
            .cloned()
            .collect())
    }

    async fn list_drop_entries(&self, query: &EntryQuery) -> SessionResult<Vec<DropEntry>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("list"));
        }
        let tables = self.tables.lock().await;
        Ok(tables
            .drops
            .iter()
            .filter(|d| query.matches(&d.employee_name, d.date))
            .cloned()
            .collect())
    }

    async fn delete_drawer_entry(&self, id: &str) -> SessionResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(injected("delete"));
        }
        let mut tables = self.tables.lock().await;
        tables.drawers.retain(|d| d.id != id);
        tables.drops.retain(|d| d.drawer_entry_id != id);
        Ok(())
    }

    async fn delete_drop_entry(&self, id: &str) -> SessionResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(injected("delete"));
        }
        self.tables.lock().await.drops.retain(|d| d.id != id);
        Ok(())
    }
}

/// Submitted drops already on file for `employee` on `date`.
pub async fn seed_submitted(store: &MemoryEntryStore, employee: &str, date: chrono::NaiveDate, n: usize) {
    for _ in 0..n {
        let drawer = store
            .create_drawer_entry(&NewDrawerEntry {
                employee_name: employee.to_string(),
                work_station: "WS-9".to_string(),
                shift_number: "1".to_string(),
                date,
                starting_cash: Default::default(),
                total_cash: Default::default(),
                counts: Default::default(),
                rolls: Default::default(),
                status: EntryStatus::Submitted,
            })
            .await
            .unwrap();
        store
            .create_drop_entry(&NewDropEntry {
                drawer_entry_id: drawer.id,
                employee_name: employee.to_string(),
                work_station: "WS-9".to_string(),
                shift_number: "1".to_string(),
                date,
                drop_amount: Default::default(),
                ws_label_amount: Default::default(),
                variance: Default::default(),
                status: EntryStatus::Submitted,
                notes: None,
                label_image: None,
                counts: Default::default(),
                rolls: Default::default(),
            })
            .await
            .unwrap();
    }
    store.creates.store(0, Ordering::SeqCst);
}

// =============================================================================
// Draft Cache
// =============================================================================

#[derive(Default)]
pub struct MemoryDraftCache {
    entries: Mutex<HashMap<String, DraftSnapshot>>,
    pub fail: AtomicBool,
}

impl MemoryDraftCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<DraftSnapshot> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: &str, snapshot: DraftSnapshot) {
        self.entries.lock().unwrap().insert(key.to_string(), snapshot);
    }
}

#[async_trait]
impl DraftCache for MemoryDraftCache {
    async fn load(&self, key: &str) -> SessionResult<Option<DraftSnapshot>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SessionError::Cache("injected load failure".into()));
        }
        Ok(self.get(key))
    }

    async fn store(&self, key: &str, snapshot: &DraftSnapshot) -> SessionResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SessionError::Cache("injected store failure".into()));
        }
        self.put(key, snapshot.clone());
        Ok(())
    }

    async fn clear(&self, key: &str) -> SessionResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SessionError::Cache("injected clear failure".into()));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Auth answering with fixed values; `None` makes the call fail.
pub struct StaticAuth {
    pub user: Option<CurrentUser>,
    pub admin: Option<AdminSettings>,
}

impl StaticAuth {
    pub fn operator(name: &str, admin: AdminSettings) -> Self {
        StaticAuth {
            user: Some(CurrentUser {
                name: name.to_string(),
                is_admin: false,
            }),
            admin: Some(admin),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user(&self) -> SessionResult<CurrentUser> {
        self.user
            .clone()
            .ok_or_else(|| SessionError::Auth("not signed in".into()))
    }

    async fn admin_settings(&self) -> SessionResult<AdminSettings> {
        self.admin
            .clone()
            .ok_or_else(|| SessionError::Store("admin settings unavailable".into()))
    }
}

// =============================================================================
// Clock
// =============================================================================

/// A clock tests can move forward.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        ManualClock(Mutex::new(instant))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
