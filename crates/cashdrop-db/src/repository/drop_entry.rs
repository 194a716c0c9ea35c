//! # Drop Entry Repository
//!
//! Database operations for drops.
//!
//! ## Daily Limit Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  count_submitted_on(date)                                               │
//! │                                                                         │
//! │  drop_entries WHERE date = ? AND status = 'submitted' AND ignored = 0  │
//! │                                                                         │
//! │  drafted rows ............ never counted                                │
//! │  ignored rows ............ never counted (set by an administrator)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashdrop_core::{DropEntry, EntryQuery, EntryStatus, LabelImage, NewDropEntry};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{bind_counts, CountColumns, COUNT_COLUMNS, COUNT_PLACEHOLDERS};
use crate::error::{DbError, DbResult};

/// Repository for drop entry operations.
#[derive(Debug, Clone)]
pub struct DropEntryRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct DropEntryRecord {
    id: String,
    drawer_entry_id: String,
    employee_name: String,
    work_station: String,
    shift_number: String,
    date: NaiveDate,
    drop_amount_cents: i64,
    ws_label_amount_cents: i64,
    variance_cents: i64,
    status: EntryStatus,
    ignored: bool,
    notes: Option<String>,
    label_image_name: Option<String>,
    created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    columns: CountColumns,
}

impl DropEntryRecord {
    fn into_entry(self) -> DbResult<DropEntry> {
        let (counts, rolls) = self.columns.into_counts()?;
        Ok(DropEntry {
            id: self.id,
            drawer_entry_id: self.drawer_entry_id,
            employee_name: self.employee_name,
            work_station: self.work_station,
            shift_number: self.shift_number,
            date: self.date,
            drop_amount_cents: self.drop_amount_cents,
            ws_label_amount_cents: self.ws_label_amount_cents,
            variance_cents: self.variance_cents,
            status: self.status,
            ignored: self.ignored,
            notes: self.notes,
            label_image_name: self.label_image_name,
            counts,
            rolls,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LabelImageRecord {
    label_image_name: Option<String>,
    label_image: Option<Vec<u8>>,
}

impl DropEntryRepository {
    /// Creates a new DropEntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DropEntryRepository { pool }
    }

    /// Inserts a drop entry. The referenced drawer entry must exist.
    pub async fn insert(&self, new: &NewDropEntry) -> DbResult<DropEntry> {
        let entry = DropEntry {
            id: Uuid::new_v4().to_string(),
            drawer_entry_id: new.drawer_entry_id.clone(),
            employee_name: new.employee_name.clone(),
            work_station: new.work_station.clone(),
            shift_number: new.shift_number.clone(),
            date: new.date,
            drop_amount_cents: new.drop_amount.cents(),
            ws_label_amount_cents: new.ws_label_amount.cents(),
            variance_cents: new.variance.cents(),
            status: new.status,
            ignored: false,
            notes: new.notes.clone(),
            label_image_name: new.label_image.as_ref().map(|img| img.file_name.clone()),
            counts: new.counts,
            rolls: new.rolls,
            created_at: Utc::now(),
        };

        debug!(
            id = %entry.id,
            drawer_entry_id = %entry.drawer_entry_id,
            status = %entry.status,
            drop_amount_cents = entry.drop_amount_cents,
            "Inserting drop entry"
        );

        let sql = format!(
            "INSERT INTO drop_entries (
                id, drawer_entry_id, employee_name, work_station, shift_number, date,
                drop_amount_cents, ws_label_amount_cents, variance_cents,
                status, ignored, notes, label_image_name, label_image, created_at,
                {COUNT_COLUMNS}
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, {COUNT_PLACEHOLDERS})"
        );

        let query = sqlx::query(&sql)
            .bind(&entry.id)
            .bind(&entry.drawer_entry_id)
            .bind(&entry.employee_name)
            .bind(&entry.work_station)
            .bind(&entry.shift_number)
            .bind(entry.date)
            .bind(entry.drop_amount_cents)
            .bind(entry.ws_label_amount_cents)
            .bind(entry.variance_cents)
            .bind(entry.status)
            .bind(entry.ignored)
            .bind(entry.notes.as_deref())
            .bind(entry.label_image_name.as_deref())
            .bind(new.label_image.as_ref().map(|img| img.bytes.as_slice()))
            .bind(entry.created_at);

        bind_counts(query, &entry.counts, &entry.rolls)
            .execute(&self.pool)
            .await?;

        Ok(entry)
    }

    /// Gets a drop entry by ID (without image bytes).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DropEntry>> {
        let record = sqlx::query_as::<_, DropEntryRecord>("SELECT * FROM drop_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(DropEntryRecord::into_entry).transpose()
    }

    /// The stored receipt photo, if one was uploaded.
    pub async fn label_image(&self, id: &str) -> DbResult<Option<LabelImage>> {
        let record = sqlx::query_as::<_, LabelImageRecord>(
            "SELECT label_image_name, label_image FROM drop_entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("DropEntry", id))?;

        Ok(match (record.label_image_name, record.label_image) {
            (Some(file_name), Some(bytes)) => Some(LabelImage { file_name, bytes }),
            _ => None,
        })
    }

    /// Lists entries in the query's date range, oldest first.
    pub async fn list(&self, query: &EntryQuery) -> DbResult<Vec<DropEntry>> {
        let records = sqlx::query_as::<_, DropEntryRecord>(
            r#"
            SELECT * FROM drop_entries
            WHERE date >= ? AND date <= ?
              AND (? IS NULL OR employee_name = ?)
            ORDER BY created_at, rowid
            "#,
        )
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(query.employee.as_deref())
        .bind(query.employee.as_deref())
        .fetch_all(&self.pool)
        .await?;

        debug!(count = records.len(), "Listed drop entries");

        records.into_iter().map(DropEntryRecord::into_entry).collect()
    }

    /// Deletes a drop entry. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM drop_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, removed = result.rows_affected(), "Deleted drop entry");
        Ok(result.rows_affected() > 0)
    }

    /// Submitted, non-ignored drops on `date` (all employees).
    pub async fn count_submitted_on(&self, date: NaiveDate) -> DbResult<u32> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM drop_entries
            WHERE date = ? AND status = 'submitted' AND ignored = 0
            "#,
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        u32::try_from(count).map_err(|_| DbError::corrupt("count", count))
    }

    /// Marks a drop as ignored (or restores it) for the daily limit.
    pub async fn set_ignored(&self, id: &str, ignored: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE drop_entries SET ignored = ? WHERE id = ?")
            .bind(ignored)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DropEntry", id));
        }

        info!(id = %id, ignored, "Drop entry ignore flag updated");
        Ok(())
    }
}
