//! # Reservation Store
//!
//! Reservation records and the read/write contract the scheduler depends on.
//! The booking flow that creates reservations lives outside this process;
//! this module carries the record shape, the store trait, and the SQLite
//! backing used by the daemon.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod sqlite;

pub use self::sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One piece of equipment attached to a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationItem {
    pub name: String,
    pub quantity: i64,
}

/// A court/equipment reservation as stored by the booking flow.
///
/// `time_range` is kept as the display string the booking flow wrote
/// (e.g. `"10:00 AM - 12:00 PM"`); the start instant is derived from it
/// when the scheduler evaluates the reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: String,
    /// Court or sport label, e.g. "Tennis Court 2"
    pub resource_name: String,
    /// Calendar date of the reservation; no time zone attached
    pub date: NaiveDate,
    /// Display string encoding the start and end clock times
    pub time_range: String,
    /// Email address the pickup reminder goes to
    pub recipient: String,
    pub items: Vec<ReservationItem>,
    /// Flips false -> true exactly once, after a confirmed send
    pub notified: bool,
}

/// Read/write access to reservation records.
///
/// The scheduler is the sole caller of `mark_notified`; it only marks a
/// reservation after the transport confirmed the send, so `notified` never
/// goes back to false.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// All reservations that have not been notified yet, in storage order.
    async fn find_pending(&self) -> Result<Vec<Reservation>>;

    /// Records that the pickup reminder for `id` went out.
    async fn mark_notified(&self, id: &str) -> Result<()>;
}
