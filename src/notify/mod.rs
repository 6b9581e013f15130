//! # Pickup Notifications
//!
//! Outbound transport for equipment-pickup reminders plus the message
//! rendering. The scheduler owns dedup via the reservation's `notified`
//! flag, so a transport may be called repeatedly for the same reservation
//! and must simply attempt the send each time.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod mailer;

pub use mailer::HttpMailer;

use anyhow::Result;
use async_trait::async_trait;

use crate::store::Reservation;

/// Outbound message transport the scheduler calls once per due reservation.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Delivers the pickup reminder for `reservation` to its recipient.
    async fn send(&self, reservation: &Reservation) -> Result<()>;
}

/// Subject line for a pickup reminder.
pub fn render_subject(reservation: &Reservation) -> String {
    format!(
        "Equipment pickup reminder: {} on {}",
        reservation.resource_name, reservation.date
    )
}

/// Plain-text body for a pickup reminder.
///
/// The equipment list is rendered one item per line as "name × quantity".
pub fn render_body(reservation: &Reservation) -> String {
    let mut body = format!(
        "Your reservation for {} on {} ({}) starts soon.\n\n\
         Please pick up your equipment at the front desk:\n",
        reservation.resource_name, reservation.date, reservation.time_range
    );

    for item in &reservation.items {
        body.push_str(&format!("  - {} × {}\n", item.name, item.quantity));
    }

    body.push_str("\nSee you on the court!\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ReservationItem;
    use chrono::NaiveDate;

    fn sample_reservation() -> Reservation {
        Reservation {
            id: "res-1".to_string(),
            resource_name: "Tennis Court 2".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap(),
            time_range: "10:00 AM - 12:00 PM".to_string(),
            recipient: "student@uni.edu".to_string(),
            items: vec![
                ReservationItem {
                    name: "Ball Pump".to_string(),
                    quantity: 1,
                },
                ReservationItem {
                    name: "Tennis Ball".to_string(),
                    quantity: 6,
                },
            ],
            notified: false,
        }
    }

    #[test]
    fn test_subject_names_resource_and_date() {
        let subject = render_subject(&sample_reservation());
        assert!(subject.contains("Tennis Court 2"));
        assert!(subject.contains("2025-10-20"));
    }

    #[test]
    fn test_body_lists_items_with_quantities() {
        let body = render_body(&sample_reservation());
        assert!(body.contains("Ball Pump × 1"));
        assert!(body.contains("Tennis Ball × 6"));
        assert!(body.contains("10:00 AM - 12:00 PM"));
    }
}
