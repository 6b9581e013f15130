//! SQLite-backed reservation store.
//!
//! One table, `reservations`, with the equipment list stored as a JSON text
//! column. The `sqlite` crate is synchronous, so the connection sits behind a
//! tokio mutex and each call holds it for the duration of its statement.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use sqlite::{Connection, State};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Reservation, ReservationItem, ReservationStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS reservations (
    id TEXT PRIMARY KEY,
    resource_name TEXT NOT NULL,
    date TEXT NOT NULL,
    time_range TEXT NOT NULL,
    recipient TEXT NOT NULL,
    items TEXT NOT NULL,
    notified INTEGER NOT NULL DEFAULT 0
);
";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reservation store backed by a single SQLite database file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (and if necessary creates) the database at `path`.
    ///
    /// `":memory:"` is accepted for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = sqlite::open(path)
            .with_context(|| format!("failed to open reservation database at '{path}'"))?;
        conn.execute(SCHEMA)
            .context("failed to create reservations table")?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts a new reservation on behalf of the booking flow.
    ///
    /// The booking flow owns item validation, so the empty-list and
    /// zero-quantity checks live here rather than in the scheduler.
    /// Returns the generated reservation id.
    pub async fn add_reservation(
        &self,
        resource_name: &str,
        date: NaiveDate,
        time_range: &str,
        recipient: &str,
        items: &[ReservationItem],
    ) -> Result<String> {
        if items.is_empty() {
            bail!("a reservation needs at least one equipment item");
        }
        if let Some(item) = items.iter().find(|i| i.quantity < 1) {
            bail!("item '{}' has quantity {}, expected >= 1", item.name, item.quantity);
        }

        let id = Uuid::new_v4().to_string();
        let items_json = serde_json::to_string(items).context("failed to encode item list")?;

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "INSERT INTO reservations (id, resource_name, date, time_range, recipient, items, notified)
             VALUES (?, ?, ?, ?, ?, ?, 0)",
        )?;
        stmt.bind((1, id.as_str()))?;
        stmt.bind((2, resource_name))?;
        stmt.bind((3, date.format(DATE_FORMAT).to_string().as_str()))?;
        stmt.bind((4, time_range))?;
        stmt.bind((5, recipient))?;
        stmt.bind((6, items_json.as_str()))?;
        while stmt.next()? != State::Done {}

        Ok(id)
    }

    /// Total reservations in the store, notified or not.
    pub async fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM reservations")?;
        match stmt.next()? {
            State::Row => Ok(stmt.read::<i64, _>(0)?),
            State::Done => Ok(0),
        }
    }
}

#[async_trait]
impl ReservationStore for SqliteStore {
    async fn find_pending(&self) -> Result<Vec<Reservation>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, resource_name, date, time_range, recipient, items
             FROM reservations WHERE notified = 0",
        )?;

        let mut pending = Vec::new();
        while stmt.next()? == State::Row {
            let id = stmt.read::<String, _>("id")?;
            // A row that fails to decode is that row's problem, not the
            // batch's: skip it with a diagnostic and keep reading. Only
            // SQLite itself failing aborts the read.
            let raw_date = stmt.read::<String, _>("date")?;
            let Ok(date) = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT) else {
                warn!("Skipping reservation {id}: malformed date '{raw_date}'");
                continue;
            };
            let raw_items = stmt.read::<String, _>("items")?;
            let Ok(items) = serde_json::from_str::<Vec<ReservationItem>>(&raw_items) else {
                warn!("Skipping reservation {id}: malformed item list");
                continue;
            };

            pending.push(Reservation {
                resource_name: stmt.read::<String, _>("resource_name")?,
                date,
                time_range: stmt.read::<String, _>("time_range")?,
                recipient: stmt.read::<String, _>("recipient")?,
                items,
                notified: false,
                id,
            });
        }

        Ok(pending)
    }

    async fn mark_notified(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("UPDATE reservations SET notified = 1 WHERE id = ?")?;
        stmt.bind((1, id))?;
        while stmt.next()? != State::Done {}

        if conn.change_count() == 0 {
            bail!("reservation {id} not found while marking it notified");
        }
        Ok(())
    }
}
