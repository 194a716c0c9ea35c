//! # Collaborator Traits
//!
//! The session never talks to a database or an identity service directly.
//! It goes through these traits, held as `Arc<dyn Trait>`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ReconciliationSession                                │
//! │                                                                         │
//! │      AuthProvider               EntryStore              DraftCache      │
//! │   current_user()          create / list / delete      load / store /   │
//! │   admin_settings()        drawer + drop entries       clear            │
//! │         │                          │                       │           │
//! └─────────┼──────────────────────────┼───────────────────────┼───────────┘
//!           ▼                          ▼                       ▼
//!   ConfigAuthProvider          SqliteEntryStore         FileDraftCache
//!   ([operator], [admin])       (cashdrop-db)            (cache.rs)
//! ```

use async_trait::async_trait;
use cashdrop_core::{
    AdminSettings, CurrentUser, DrawerEntry, DropEntry, EntryQuery, NewDrawerEntry, NewDropEntry,
};
use cashdrop_db::Database;
use tracing::debug;

use crate::config::TerminalConfig;
use crate::error::SessionResult;

// =============================================================================
// Entry Store
// =============================================================================

/// Persistence for the two linked records of a cash drop.
///
/// Drawer entries hold the full count; drop entries reference a drawer entry
/// and hold what was pulled from it. There is no transaction spanning the two.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Creates a drawer entry and returns it with its identifier.
    async fn create_drawer_entry(&self, entry: &NewDrawerEntry) -> SessionResult<DrawerEntry>;

    /// Creates a drop entry, including the label image when one is attached.
    async fn create_drop_entry(&self, entry: &NewDropEntry) -> SessionResult<DropEntry>;

    async fn list_drawer_entries(&self, query: &EntryQuery) -> SessionResult<Vec<DrawerEntry>>;

    async fn list_drop_entries(&self, query: &EntryQuery) -> SessionResult<Vec<DropEntry>>;

    /// Deletes a drawer entry. Deleting an unknown id is not an error.
    async fn delete_drawer_entry(&self, id: &str) -> SessionResult<()>;

    /// Deletes a drop entry. Deleting an unknown id is not an error.
    async fn delete_drop_entry(&self, id: &str) -> SessionResult<()>;
}

/// `EntryStore` over the local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteEntryStore {
    db: Database,
}

impl SqliteEntryStore {
    pub fn new(db: Database) -> Self {
        SqliteEntryStore { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    async fn create_drawer_entry(&self, entry: &NewDrawerEntry) -> SessionResult<DrawerEntry> {
        Ok(self.db.drawer_entries().insert(entry).await?)
    }

    async fn create_drop_entry(&self, entry: &NewDropEntry) -> SessionResult<DropEntry> {
        Ok(self.db.drop_entries().insert(entry).await?)
    }

    async fn list_drawer_entries(&self, query: &EntryQuery) -> SessionResult<Vec<DrawerEntry>> {
        Ok(self.db.drawer_entries().list(query).await?)
    }

    async fn list_drop_entries(&self, query: &EntryQuery) -> SessionResult<Vec<DropEntry>> {
        Ok(self.db.drop_entries().list(query).await?)
    }

    async fn delete_drawer_entry(&self, id: &str) -> SessionResult<()> {
        if !self.db.drawer_entries().delete(id).await? {
            debug!(id = %id, "Drawer entry already gone");
        }
        Ok(())
    }

    async fn delete_drop_entry(&self, id: &str) -> SessionResult<()> {
        if !self.db.drop_entries().delete(id).await? {
            debug!(id = %id, "Drop entry already gone");
        }
        Ok(())
    }
}

// =============================================================================
// Auth Provider
// =============================================================================

/// Identity of the operator and the store's admin settings.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self) -> SessionResult<CurrentUser>;

    async fn admin_settings(&self) -> SessionResult<AdminSettings>;
}

/// `AuthProvider` answering from the terminal config.
#[derive(Debug, Clone)]
pub struct ConfigAuthProvider {
    user: CurrentUser,
    admin: AdminSettings,
}

impl ConfigAuthProvider {
    pub fn new(config: &TerminalConfig) -> Self {
        ConfigAuthProvider {
            user: config.current_user(),
            admin: config.admin.clone(),
        }
    }
}

#[async_trait]
impl AuthProvider for ConfigAuthProvider {
    async fn current_user(&self) -> SessionResult<CurrentUser> {
        Ok(self.user.clone())
    }

    async fn admin_settings(&self) -> SessionResult<AdminSettings> {
        Ok(self.admin.clone())
    }
}
