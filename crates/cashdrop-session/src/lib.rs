//! # cashdrop-session: Reconciliation Workflow for Cash Drop
//!
//! Drives one operator's cash drop: load any draft for today, recompute on
//! every edit, save or delete the draft, and submit under the daily limit.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ReconciliationSession                              │
//! │                                                                         │
//! │  ReconciliationTransaction ──► recompute() ──► DerivedTotals            │
//! │  (cashdrop-core)                               total / drop / variance  │
//! │                                                breakdown / remaining    │
//! │                                                                         │
//! │  open ─ save_draft ─ delete_draft ─ submit                             │
//! │    │         │             │           │                               │
//! └────┼─────────┼─────────────┼───────────┼───────────────────────────────┘
//!      ▼         ▼             ▼           ▼
//!  AuthProvider  EntryStore (drawer + drop entries)   DraftCache
//!  (store.rs)    (store.rs)                           (cache.rs)
//! ```
//!
//! ## Module Organization
//! - [`config`] - `terminal.toml` loading (timezone, admin defaults, paths)
//! - [`error`] - Session error types
//! - [`store`] - `EntryStore` / `AuthProvider` traits and local adapters
//! - [`cache`] - Offline draft snapshot and `FileDraftCache`
//! - [`notification`] - Auto-expiring status messages
//! - [`session`] - The `ReconciliationSession` state machine
//!
//! ## Usage
//! ```rust,ignore
//! use cashdrop_session::{SessionBuilder, TerminalConfig};
//! use cashdrop_core::Denomination;
//!
//! let config = TerminalConfig::load_or_default(None);
//! let mut session = SessionBuilder::local(config).await?.open().await?;
//!
//! session.set_quantity(Denomination::Hundreds, 3)?;
//! session.set_work_station("WS-1")?;
//! session.set_shift("2")?;
//! session.enter_cash_received("205.50")?;
//!
//! session.save_draft().await?;
//! let submitted = session.submit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod config;
pub mod error;
pub mod notification;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{DraftCache, DraftSnapshot, FileDraftCache};
pub use config::TerminalConfig;
pub use error::{SessionError, SessionResult};
pub use notification::{NotificationKind, StatusNotification};
pub use session::{DraftIds, ReconciliationSession, SessionBuilder, SessionState, SubmittedDrop};
pub use store::{AuthProvider, ConfigAuthProvider, EntryStore, SqliteEntryStore};
