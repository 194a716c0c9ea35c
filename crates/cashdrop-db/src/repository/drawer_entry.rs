//! # Drawer Entry Repository
//!
//! Database operations for counted drawers.

use cashdrop_core::{DrawerEntry, EntryQuery, EntryStatus, NewDrawerEntry};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::{bind_counts, CountColumns, COUNT_COLUMNS, COUNT_PLACEHOLDERS};
use crate::error::DbResult;

/// Repository for drawer entry operations.
#[derive(Debug, Clone)]
pub struct DrawerEntryRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct DrawerEntryRecord {
    id: String,
    employee_name: String,
    work_station: String,
    shift_number: String,
    date: NaiveDate,
    starting_cash_cents: i64,
    total_cash_cents: i64,
    status: EntryStatus,
    created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    columns: CountColumns,
}

impl DrawerEntryRecord {
    fn into_entry(self) -> DbResult<DrawerEntry> {
        let (counts, rolls) = self.columns.into_counts()?;
        Ok(DrawerEntry {
            id: self.id,
            employee_name: self.employee_name,
            work_station: self.work_station,
            shift_number: self.shift_number,
            date: self.date,
            starting_cash_cents: self.starting_cash_cents,
            total_cash_cents: self.total_cash_cents,
            counts,
            rolls,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

impl DrawerEntryRepository {
    /// Creates a new DrawerEntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DrawerEntryRepository { pool }
    }

    /// Inserts a drawer entry and returns it with its generated id.
    pub async fn insert(&self, new: &NewDrawerEntry) -> DbResult<DrawerEntry> {
        let entry = DrawerEntry {
            id: Uuid::new_v4().to_string(),
            employee_name: new.employee_name.clone(),
            work_station: new.work_station.clone(),
            shift_number: new.shift_number.clone(),
            date: new.date,
            starting_cash_cents: new.starting_cash.cents(),
            total_cash_cents: new.total_cash.cents(),
            counts: new.counts,
            rolls: new.rolls,
            status: new.status,
            created_at: Utc::now(),
        };

        debug!(id = %entry.id, date = %entry.date, status = %entry.status, "Inserting drawer entry");

        let sql = format!(
            "INSERT INTO drawer_entries (
                id, employee_name, work_station, shift_number, date,
                starting_cash_cents, total_cash_cents, status, created_at,
                {COUNT_COLUMNS}
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, {COUNT_PLACEHOLDERS})"
        );

        let query = sqlx::query(&sql)
            .bind(&entry.id)
            .bind(&entry.employee_name)
            .bind(&entry.work_station)
            .bind(&entry.shift_number)
            .bind(entry.date)
            .bind(entry.starting_cash_cents)
            .bind(entry.total_cash_cents)
            .bind(entry.status)
            .bind(entry.created_at);

        bind_counts(query, &entry.counts, &entry.rolls)
            .execute(&self.pool)
            .await?;

        Ok(entry)
    }

    /// Gets a drawer entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DrawerEntry>> {
        let record = sqlx::query_as::<_, DrawerEntryRecord>(
            "SELECT * FROM drawer_entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(DrawerEntryRecord::into_entry).transpose()
    }

    /// Lists entries in the query's date range, oldest first.
    pub async fn list(&self, query: &EntryQuery) -> DbResult<Vec<DrawerEntry>> {
        let records = sqlx::query_as::<_, DrawerEntryRecord>(
            r#"
            SELECT * FROM drawer_entries
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

        debug!(count = records.len(), "Listed drawer entries");

        records.into_iter().map(DrawerEntryRecord::into_entry).collect()
    }

    /// Deletes a drawer entry (and, by cascade, drops that reference it).
    ///
    /// Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM drawer_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, removed = result.rows_affected(), "Deleted drawer entry");
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cashdrop_core::{DenominationCounts, Denomination, Money, RollCounts};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn new_entry(employee: &str, date: NaiveDate, status: EntryStatus) -> NewDrawerEntry {
        NewDrawerEntry {
            employee_name: employee.to_string(),
            work_station: "WS-1".to_string(),
            shift_number: "1".to_string(),
            date,
            starting_cash: Money::from_cents(20_000),
            total_cash: Money::from_cents(41_000),
            counts: DenominationCounts::from_pairs([
                (Denomination::Hundreds, 3),
                (Denomination::Fifties, 2),
                (Denomination::Tens, 1),
            ]),
            rolls: RollCounts {
                quarter_rolls: 2,
                ..Default::default()
            },
            status,
        }
    }

    async fn repo() -> DrawerEntryRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.drawer_entries()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let created = repo
            .insert(&new_entry("Avery", day(3), EntryStatus::Drafted))
            .await
            .unwrap();

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.date, day(3));
        assert_eq!(fetched.counts.hundreds, 3);
        assert_eq!(fetched.rolls.quarter_rolls, 2);
        assert_eq!(fetched.status, EntryStatus::Drafted);
        assert_eq!(fetched.total_cash(), Money::from_cents(41_000));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = repo().await;
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_employee_and_date() {
        let repo = repo().await;
        repo.insert(&new_entry("Avery", day(3), EntryStatus::Drafted)).await.unwrap();
        repo.insert(&new_entry("Avery", day(4), EntryStatus::Submitted)).await.unwrap();
        repo.insert(&new_entry("Blake", day(3), EntryStatus::Drafted)).await.unwrap();

        let avery_today = repo
            .list(&EntryQuery::for_employee_on("Avery", day(3)))
            .await
            .unwrap();
        assert_eq!(avery_today.len(), 1);
        assert_eq!(avery_today[0].employee_name, "Avery");

        let everyone_today = repo.list(&EntryQuery::on(day(3))).await.unwrap();
        assert_eq!(everyone_today.len(), 2);

        let range = EntryQuery {
            employee: Some("Avery".to_string()),
            date_from: day(1),
            date_to: day(30),
        };
        assert_eq!(repo.list(&range).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let created = repo
            .insert(&new_entry("Avery", day(3), EntryStatus::Drafted))
            .await
            .unwrap();

        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    }
}
