//! # Reminder Scheduler
//!
//! Polls pending reservations on a fixed interval and fires a one-time
//! pickup reminder shortly before each reservation starts. Delivery is
//! at-most-once per recorded notification: a reservation is only marked
//! notified after the transport confirmed the send, and nothing ever marks
//! it back.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Fire window configurable independently of the tick interval
//! - 1.0.0: Initial 60s polling loop with 5 minute lead time

pub mod timeparse;

use anyhow::{Context, Result};
use chrono::{Duration as TimeDelta, Local, NaiveDateTime};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::core::Config;
use crate::notify::NotificationSender;
use crate::store::ReservationStore;

/// Where a not-yet-notified reservation sits relative to its fire window.
///
/// Notified reservations never reach classification; the store's `notified`
/// flag is their terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    /// Target instant still ahead; nothing to do this tick
    Pending,
    /// Inside the fire window; send now
    Due,
    /// Window closed without a successful send; observable in logs only
    Missed,
}

/// Per-tick counters, mostly for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub sent: usize,
    pub send_failures: usize,
    pub unparseable: usize,
    pub pending: usize,
    pub missed: usize,
}

/// Periodic scanner that turns due reservations into pickup reminders.
pub struct ReminderScheduler {
    store: Arc<dyn ReservationStore>,
    sender: Arc<dyn NotificationSender>,
    tick_interval: Duration,
    lead_time: TimeDelta,
    fire_window: TimeDelta,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        sender: Arc<dyn NotificationSender>,
        config: &Config,
    ) -> Self {
        Self::with_timing(
            store,
            sender,
            Duration::from_secs(config.tick_interval_secs),
            TimeDelta::minutes(config.lead_time_minutes),
            TimeDelta::seconds(config.fire_window_secs),
        )
    }

    /// Constructor with explicit timing, used directly by tests.
    pub fn with_timing(
        store: Arc<dyn ReservationStore>,
        sender: Arc<dyn NotificationSender>,
        tick_interval: Duration,
        lead_time: TimeDelta,
        fire_window: TimeDelta,
    ) -> Self {
        ReminderScheduler {
            store,
            sender,
            tick_interval,
            lead_time,
            fire_window,
        }
    }

    /// Classifies a reservation against the fire window.
    ///
    /// The window opens at `start_at - lead_time` (inclusive) and closes
    /// `fire_window` later (exclusive).
    pub fn classify(&self, start_at: NaiveDateTime, now: NaiveDateTime) -> ReminderState {
        let target = start_at - self.lead_time;
        let delta = now - target;

        if delta < TimeDelta::zero() {
            ReminderState::Pending
        } else if delta < self.fire_window {
            ReminderState::Due
        } else {
            ReminderState::Missed
        }
    }

    /// Runs one scan of the pending reservations at wall-clock time `now`.
    ///
    /// Send failures are isolated per reservation and retried while the
    /// window lasts. Store failures (the read, or marking a reservation
    /// notified) abort the rest of the batch; the whole tick is retried on
    /// the next timer fire.
    pub async fn tick(&self, now: NaiveDateTime) -> Result<TickOutcome> {
        let pending = self
            .store
            .find_pending()
            .await
            .context("failed to read pending reservations")?;

        let mut outcome = TickOutcome::default();

        for reservation in &pending {
            let Some(start_at) = timeparse::reservation_start(reservation.date, &reservation.time_range)
            else {
                warn!(
                    "Skipping reservation {}: unparseable time range '{}' (date {})",
                    reservation.id, reservation.time_range, reservation.date
                );
                outcome.unparseable += 1;
                continue;
            };

            match self.classify(start_at, now) {
                ReminderState::Pending => outcome.pending += 1,
                ReminderState::Missed => {
                    debug!(
                        "Reservation {} missed its reminder window (start {})",
                        reservation.id, start_at
                    );
                    outcome.missed += 1;
                }
                ReminderState::Due => match self.sender.send(reservation).await {
                    Ok(()) => {
                        self.store
                            .mark_notified(&reservation.id)
                            .await
                            .with_context(|| {
                                format!(
                                    "sent reminder for reservation {} but failed to record it",
                                    reservation.id
                                )
                            })?;
                        info!(
                            "Sent pickup reminder for reservation {} ({} at {})",
                            reservation.id, reservation.resource_name, reservation.time_range
                        );
                        outcome.sent += 1;
                    }
                    Err(e) => {
                        warn!(
                            "Failed to send pickup reminder for reservation {}: {e:#}",
                            reservation.id
                        );
                        outcome.send_failures += 1;
                    }
                },
            }
        }

        Ok(outcome)
    }

    /// Drives `tick` on the configured interval until `shutdown` fires.
    ///
    /// Ticks never overlap: each one runs to completion before the interval
    /// is awaited again. An in-flight tick finishes before shutdown takes
    /// effect.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.tick_interval);

        info!(
            "Pickup reminder scheduler started (tick: {}s, lead time: {}m, window: {}s)",
            self.tick_interval.as_secs(),
            self.lead_time.num_minutes(),
            self.fire_window.num_seconds()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Local::now().naive_local();
                    match self.tick(now).await {
                        Ok(outcome) if outcome.sent > 0 || outcome.send_failures > 0 => {
                            info!(
                                "Reminder tick: {} sent, {} failed, {} pending, {} unparseable, {} missed",
                                outcome.sent,
                                outcome.send_failures,
                                outcome.pending,
                                outcome.unparseable,
                                outcome.missed
                            );
                        }
                        Ok(outcome) => {
                            debug!("Reminder tick: nothing due ({} pending)", outcome.pending);
                        }
                        Err(e) => {
                            error!("Reminder tick aborted: {e:#}");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("Reminder scheduler shutting down");
                    break;
                }
            }
        }
    }
}
