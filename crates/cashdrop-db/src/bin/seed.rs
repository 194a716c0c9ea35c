//! # Seed Data Generator
//!
//! Populates the database with sample drawer/drop pairs for development.
//!
//! ## Usage
//! ```bash
//! # Three submitted drops plus one draft for today (business timezone)
//! cargo run -p cashdrop-db --bin seed
//!
//! # Custom amount, date and operator
//! cargo run -p cashdrop-db --bin seed -- --drops 9 --date 2026-05-04 --employee "Avery"
//!
//! # Specify database path
//! cargo run -p cashdrop-db --bin seed -- --db ./data/cashdrop.db
//! ```
//!
//! Nine submitted drops against the default daily limit of ten is a quick
//! way to exercise the limit check from a terminal.

use cashdrop_core::calendar::{BusinessCalendar, DEFAULT_TIMEZONE};
use cashdrop_core::{CoinRoll, Denomination, EntryStatus, Money, ReconciliationTransaction};
use cashdrop_db::{Database, DbConfig};
use chrono::NaiveDate;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SHIFTS: &[&str] = &["1", "2", "3"];
const WORKSTATIONS: &[&str] = &["WS-1", "WS-2", "WS-3"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cashdrop=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut drops: usize = 3;
    let mut db_path = String::from("./cashdrop_dev.db");
    let mut employee = String::from("Sample Operator");
    let mut date: Option<NaiveDate> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--drops" | "-n" => {
                if i + 1 < args.len() {
                    drops = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--employee" | "-e" => {
                if i + 1 < args.len() {
                    employee = args[i + 1].clone();
                    i += 1;
                }
            }
            "--date" => {
                if i + 1 < args.len() {
                    date = Some(NaiveDate::parse_from_str(&args[i + 1], "%Y-%m-%d")?);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cash Drop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --drops <N>        Submitted drops to create (default: 3)");
                println!("      --date <YYYY-MM-DD> Business date (default: today, {})", DEFAULT_TIMEZONE);
                println!("  -e, --employee <NAME>  Operator name (default: Sample Operator)");
                println!("  -d, --db <PATH>        Database file path (default: ./cashdrop_dev.db)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let date = date.unwrap_or_else(|| BusinessCalendar::system(DEFAULT_TIMEZONE).today());

    info!(db = %db_path, %date, %employee, drops, "Seeding cash drop entries");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.drop_entries().count_submitted_on(date).await?;
    if existing > 0 {
        warn!(existing, %date, "Submitted drops already exist for this date; adding more");
    }

    for n in 0..drops {
        let tx = sample_transaction(&employee, date, n);
        let totals = tx.totals();

        let drawer = db
            .drawer_entries()
            .insert(&tx.drawer_entry(&totals, EntryStatus::Submitted))
            .await?;
        let drop = db
            .drop_entries()
            .insert(&tx.drop_entry(&drawer.id, &totals, EntryStatus::Submitted))
            .await?;

        info!(
            drawer_id = %drawer.id,
            drop_id = %drop.id,
            drop_amount = %totals.drop_amount,
            variance = %totals.variance,
            "Submitted sample drop"
        );
    }

    let draft = sample_transaction(&employee, date, drops);
    let totals = draft.totals();
    let drawer = db
        .drawer_entries()
        .insert(&draft.drawer_entry(&totals, EntryStatus::Drafted))
        .await?;
    db.drop_entries()
        .insert(&draft.drop_entry(&drawer.id, &totals, EntryStatus::Drafted))
        .await?;

    info!(drawer_id = %drawer.id, "Saved sample draft");

    let submitted = db.drop_entries().count_submitted_on(date).await?;
    info!(submitted, %date, "Seed complete");

    db.close().await;
    Ok(())
}

/// A plausible end-of-shift drawer; `n` varies the counts.
fn sample_transaction(employee: &str, date: NaiveDate, n: usize) -> ReconciliationTransaction {
    let mut tx = ReconciliationTransaction::new(employee, date, Money::from_cents(20_000));
    tx.shift_number = SHIFTS[n % SHIFTS.len()].to_string();
    tx.work_station = WORKSTATIONS[n % WORKSTATIONS.len()].to_string();

    let k = n as u32;
    tx.drawer.set_quantity(Denomination::Hundreds, 1 + k % 3);
    tx.drawer.set_quantity(Denomination::Fifties, 2);
    tx.drawer.set_quantity(Denomination::Twenties, 5 + k);
    tx.drawer.set_quantity(Denomination::Tens, 4);
    tx.drawer.set_quantity(Denomination::Fives, 6);
    tx.drawer.set_quantity(Denomination::Ones, 23 + k);
    tx.drawer.set_quantity(Denomination::Quarters, 17);
    tx.drawer.set_quantity(Denomination::Dimes, 12);
    tx.drawer.set_quantity(Denomination::Pennies, 41);
    tx.drawer.set_roll_count(CoinRoll::Quarter, 2);
    tx.drawer.set_roll_count(CoinRoll::Penny, 1);

    let totals = tx.totals();
    // Receipt totals within a few dollars of the count.
    let offset = Money::from_cents((k as i64 % 5 - 2) * 100);
    tx.cash_received_on_receipt = Some(totals.drop_amount + offset);
    tx
}
