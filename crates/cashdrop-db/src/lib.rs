//! # cashdrop-db: Database Layer for Cash Drop
//!
//! Local SQLite storage for drawer counts and drops, using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cash Drop Data Flow                              │
//! │                                                                         │
//! │  ReconciliationSession::save_draft / submit                            │
//! │       │  (through the EntryStore trait)                                │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   cashdrop-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────────┐  ┌───────────┐  │   │
//! │  │   │   Database    │    │    Repositories     │  │Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ DrawerEntryRepo     │  │ embedded  │  │   │
//! │  │   │  SqlitePool   │    │ DropEntryRepo       │  │ 001_*.sql │  │   │
//! │  │   └───────────────┘    └─────────────────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL)                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashdrop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cashdrop.db")).await?;
//! let drawer = db.drawer_entries().insert(&new_drawer).await?;
//! let today_count = db.drop_entries().count_submitted_on(today).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::drawer_entry::DrawerEntryRepository;
pub use repository::drop_entry::DropEntryRepository;
