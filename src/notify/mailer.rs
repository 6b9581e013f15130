//! HTTP mail-API transport.
//!
//! Posts one JSON message per reminder to a transactional mail service.
//! The request carries a bearer token and a bounded timeout so a wedged
//! mail service cannot stall the whole tick.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::{render_body, render_subject, NotificationSender};
use crate::store::Reservation;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Mail transport backed by an HTTP mail API.
pub struct HttpMailer {
    http: reqwest::Client,
    api_url: String,
    api_token: String,
    sender: String,
}

#[derive(Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text_body: String,
}

impl HttpMailer {
    /// Builds the mailer with its bounded-timeout HTTP client.
    pub fn new(api_url: String, api_token: String, sender: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("failed to build mail API client")?;

        Ok(HttpMailer {
            http,
            api_url,
            api_token,
            sender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailer_builds_with_timeout_client() {
        let mailer = HttpMailer::new(
            "https://mail.example.test/send".to_string(),
            "token".to_string(),
            "reminders@uni.edu".to_string(),
        );
        assert!(mailer.is_ok());
    }
}

#[async_trait]
impl NotificationSender for HttpMailer {
    async fn send(&self, reservation: &Reservation) -> Result<()> {
        let message = OutboundEmail {
            from: &self.sender,
            to: &reservation.recipient,
            subject: render_subject(reservation),
            text_body: render_body(reservation),
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&message)
            .send()
            .await
            .context("mail API request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("mail API rejected message with status {status}");
        }
        Ok(())
    }
}
