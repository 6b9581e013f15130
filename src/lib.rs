// Core layer - configuration shared by the binaries
pub mod core;

// Persistence layer - reservation records
pub mod store;

// Outbound layer - pickup notification transport
pub mod notify;

// Scheduler layer - the reminder tick loop
pub mod scheduler;

// Re-export core config for convenience
pub use crate::core::Config;

pub use notify::{HttpMailer, NotificationSender};
pub use scheduler::{ReminderScheduler, ReminderState, TickOutcome};
pub use store::{Reservation, ReservationItem, ReservationStore, SqliteStore};
