//! Transactional email through SendGrid.
//!
//! Sending is best effort: the `send_*` helpers log failures and never surface them to the
//! request that triggered the email. Without an API key or sender address the service is
//! disabled and nothing is sent.

use serde_json::json;

use crate::server::{
    config::Config,
    error::AppError,
    model::{booking::Booking, user::User},
    util::parse::{format_date, format_time},
};

#[derive(Clone)]
pub struct EmailService {
    http_client: reqwest::Client,
    api_key: Option<String>,
    from_email: Option<String>,
    base_url: String,
    app_url: String,
}

impl EmailService {
    pub fn new(http_client: reqwest::Client, config: &Config) -> Self {
        Self {
            http_client,
            api_key: config.sendgrid_api_key.clone(),
            from_email: config.sendgrid_from_email.clone(),
            base_url: config.sendgrid_url.clone(),
            app_url: config.app_url.clone(),
        }
    }

    /// An email service that never sends, for tests and unconfigured deployments.
    pub fn disabled(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            api_key: None,
            from_email: None,
            base_url: String::new(),
            app_url: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some() && self.from_email.is_some()
    }

    /// Sends a plain-text email.
    ///
    /// # Returns
    /// - `Ok(true)` - SendGrid accepted the message
    /// - `Ok(false)` - Email is not configured, nothing was sent
    /// - `Err(AppError::ReqwestErr)` - The request failed or SendGrid rejected it
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<bool, AppError> {
        let (Some(api_key), Some(from_email)) = (&self.api_key, &self.from_email) else {
            return Ok(false);
        };

        self.http_client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&mail_payload(from_email, to, subject, body))
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Sent email '{}' to {}", subject, to);
        Ok(true)
    }

    /// Welcomes a newly registered user.
    pub async fn send_welcome(&self, user: &User) {
        let subject = "Welcome to CourtMatch";
        let body = format!(
            "Hi {},\n\nYour {} account is ready. Sign in at {} to get started.\n",
            user.display_name(),
            user.role.as_str(),
            self.app_url
        );

        self.deliver(&user.email, subject, &body).await;
    }

    /// Tells a player that their booking changed status.
    pub async fn send_booking_status(&self, user: &User, court_name: &str, booking: &Booking) {
        let subject = format!("Booking {}", booking.status.as_str());
        let body = format!(
            "Hi {},\n\n{}\n",
            user.display_name(),
            booking_status_text(court_name, booking)
        );

        self.deliver(&user.email, &subject, &body).await;
    }

    async fn deliver(&self, to: &str, subject: &str, body: &str) {
        if let Err(e) = self.send(to, subject, body).await {
            tracing::warn!("Failed to send email '{}' to {}: {}", subject, to, e);
        }
    }
}

/// Human-readable summary of a booking status change, shared by email and chat.
pub fn booking_status_text(court_name: &str, booking: &Booking) -> String {
    let mut text = format!(
        "Your booking at {} on {} from {} to {} is now {}.",
        court_name,
        format_date(booking.booking_date),
        format_time(booking.start_time),
        format_time(booking.end_time),
        booking.status.as_str()
    );

    let reason = booking
        .rejection_reason
        .as_deref()
        .or(booking.cancellation_reason.as_deref());
    if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
        text.push_str(&format!(" Reason: {}", reason.trim()));
    }

    text
}

fn mail_payload(from: &str, to: &str, subject: &str, body: &str) -> serde_json::Value {
    json!({
        "personalizations": [{ "to": [{ "email": to }] }],
        "from": { "email": from },
        "subject": subject,
        "content": [{ "type": "text/plain", "value": body }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::booking::BookingStatus;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn booking(status: BookingStatus, rejection_reason: Option<&str>) -> Booking {
        Booking {
            id: 1,
            court_id: 1,
            player_id: 1,
            partner_player_id: None,
            booking_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            status,
            notes: None,
            total_cost: 75.0,
            cancellation_reason: None,
            rejection_reason: rejection_reason.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn disabled_service_sends_nothing() {
        let email = EmailService::disabled(reqwest::Client::new());

        assert!(!email.is_enabled());
        assert!(!email.send("a@example.com", "Hi", "Body").await.unwrap());
    }

    #[test]
    fn status_text_includes_reason() {
        let text = booking_status_text(
            "Center Court",
            &booking(BookingStatus::Rejected, Some("Maintenance")),
        );

        assert_eq!(
            text,
            "Your booking at Center Court on 2026-03-04 from 09:00 to 10:30 is now rejected. Reason: Maintenance"
        );
    }

    #[test]
    fn payload_matches_sendgrid_shape() {
        let payload = mail_payload("noreply@example.com", "a@example.com", "Hi", "Body");

        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "a@example.com");
        assert_eq!(payload["from"]["email"], "noreply@example.com");
        assert_eq!(payload["content"][0]["value"], "Body");
    }
}
