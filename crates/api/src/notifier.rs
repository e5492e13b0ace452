// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Best-effort booking notifications.
//!
//! A notification is sent after the appointment row exists. It runs on its
//! own task and its outcome is only logged; the commit never waits for it.

use crate::error::NotifyError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use garage_booking_domain::BusinessHours;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Request timeout for webhook deliveries.
const WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Summary of a committed booking, in the shape the sheet webhook expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingNotification {
    #[serde(skip)]
    pub appointment_id: i64,
    #[serde(rename = "nombre")]
    pub client_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "matricula")]
    pub plate: String,
    #[serde(rename = "vehiculo")]
    pub vehicle: String,
    #[serde(rename = "servicio")]
    pub service: String,
    /// Local start as `dd/mm/yyyy HH:MM`.
    #[serde(rename = "fecha_hora")]
    pub start_local: String,
    #[serde(rename = "tecnico")]
    pub technician: String,
}

impl BookingNotification {
    /// Formats `start` in the garage timezone.
    #[must_use]
    pub fn format_start(hours: &BusinessHours, start: DateTime<Utc>) -> String {
        start
            .with_timezone(&hours.timezone())
            .format("%d/%m/%Y %H:%M")
            .to_string()
    }
}

/// Side channel told about each new booking.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    async fn notify_booked(&self, notification: &BookingNotification) -> Result<(), NotifyError>;
}

/// Discards notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify_booked(&self, notification: &BookingNotification) -> Result<(), NotifyError> {
        debug!(
            appointment_id = notification.appointment_id,
            "No notifier configured, skipping"
        );
        Ok(())
    }
}

/// Posts the booking summary as JSON to a webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Returns the target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_booked(&self, notification: &BookingNotification) -> Result<(), NotifyError> {
        let response = self.client.post(&self.url).json(notification).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %self.url,
                status = %status,
                appointment_id = notification.appointment_id,
                "Booking webhook rejected the notification"
            );
            return Err(NotifyError::Status {
                status: status.as_u16(),
            });
        }

        debug!(
            url = %self.url,
            appointment_id = notification.appointment_id,
            "Booking webhook delivered"
        );
        Ok(())
    }
}

/// Sends `notification` on a background task.
///
/// Failures are logged and dropped. The handle is returned so tests can wait
/// for delivery; callers in the booking path ignore it.
pub fn dispatch_notification(
    notifier: Arc<dyn Notifier>,
    notification: BookingNotification,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.notify_booked(&notification).await {
            Ok(()) => info!(
                appointment_id = notification.appointment_id,
                "Booking notification sent"
            ),
            Err(e) => error!(
                error = %e,
                appointment_id = notification.appointment_id,
                "Booking notification failed"
            ),
        }
    })
}
