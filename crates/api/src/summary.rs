// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{NaiveDate, NaiveTime};
use garage_booking::{BookingSession, CoreError};
use garage_booking_domain::{Service, format_time_slot, normalize_phone, normalize_plate};
use serde::Serialize;

/// What the summary step shows before the user confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub service_name: String,
    pub price: Option<String>,
    pub duration_minutes: u32,
    pub technician_label: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// `dd/mm/yyyy`
    pub date_label: String,
    /// `HH:MM`
    pub time_label: String,
    pub client_name: String,
    pub phone: String,
    pub plate: String,
    pub vehicle: String,
}

impl BookingSummary {
    /// Builds the summary from the session's selections.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingSelection` if the service, date or time has
    /// not been chosen.
    pub fn from_session(session: &BookingSession) -> Result<Self, CoreError> {
        let service: &Service = session
            .selected_service
            .as_ref()
            .ok_or(CoreError::MissingSelection { field: "service" })?;
        let date: NaiveDate = session
            .selected_date
            .ok_or(CoreError::MissingSelection { field: "date" })?;
        let time: NaiveTime = session
            .selected_time
            .ok_or(CoreError::MissingSelection { field: "time" })?;

        Ok(Self {
            service_name: service.name.clone(),
            price: service.price.clone(),
            duration_minutes: session.duration_minutes(),
            technician_label: session.technician.label().to_string(),
            date,
            time,
            date_label: date.format("%d/%m/%Y").to_string(),
            time_label: format_time_slot(time),
            client_name: session.client.name.trim().to_string(),
            phone: normalize_phone(&session.client.phone),
            plate: normalize_plate(&session.vehicle.plate),
            vehicle: format!(
                "{} {}",
                session.vehicle.make.trim(),
                session.vehicle.model.trim()
            )
            .trim()
            .to_string(),
        })
    }
}
