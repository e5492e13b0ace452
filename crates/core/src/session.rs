// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The in-progress booking draft.
//!
//! A `BookingSession` is owned by exactly one user session. It is mutated
//! field by field as the user moves through the flow and is cleared after a
//! successful commit or an explicit reset. The last booking summary survives
//! a reset so the confirmation screen can still render.

use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use garage_booking_domain::{
    BusinessHours, ClientDetails, DEFAULT_APPOINTMENT_MINUTES, Service, TechnicianChoice,
    VehicleDetails,
};
use serde::{Deserialize, Serialize};

/// Informational summary of the most recent confirmed booking.
///
/// Never used for conflict checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastBooking {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service_name: String,
    pub duration_minutes: u32,
}

/// A booking attempt in progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingSession {
    pub client: ClientDetails,
    pub vehicle: VehicleDetails,
    pub selected_service: Option<Service>,
    pub technician: TechnicianChoice,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<NaiveTime>,
    pub last_booking: Option<LastBooking>,
}

impl BookingSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the selected service.
    pub fn select_service(&mut self, service: Service) {
        self.selected_service = Some(service);
    }

    /// Records the technician choice.
    pub fn select_technician(&mut self, technician: TechnicianChoice) {
        self.technician = technician;
    }

    /// Records the selected date and time slot.
    pub const fn select_slot(&mut self, date: NaiveDate, time: NaiveTime) {
        self.selected_date = Some(date);
        self.selected_time = Some(time);
    }

    /// Forgets the selected date and time slot.
    pub const fn clear_slot(&mut self) {
        self.selected_date = None;
        self.selected_time = None;
    }

    /// Clears every field except the last booking summary.
    pub fn reset(&mut self) {
        let last_booking: Option<LastBooking> = self.last_booking.take();
        *self = Self {
            last_booking,
            ..Self::default()
        };
    }

    /// Duration of the selected service, or the default appointment length.
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.selected_service
            .as_ref()
            .map_or(DEFAULT_APPOINTMENT_MINUTES, Service::duration_minutes)
    }

    /// Lists the fields a booking cannot be committed without.
    ///
    /// Only presence is checked here; field rules are applied by the flow.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = Vec::new();
        if self.selected_service.is_none() {
            missing.push("service");
        }
        if self.selected_date.is_none() {
            missing.push("date");
        }
        if self.selected_time.is_none() {
            missing.push("time");
        }
        if self.client.name.trim().is_empty() {
            missing.push("client name");
        }
        if self.client.phone.trim().is_empty() {
            missing.push("client phone");
        }
        if !self.client.consent {
            missing.push("consent");
        }
        if self.vehicle.plate.trim().is_empty() {
            missing.push("vehicle plate");
        }
        missing
    }

    /// Whether every required field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Resolves the selected date and time to an instant in the garage timezone.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingSelection` if no slot is selected, or
    /// `CoreError::Validation` if the local time does not exist.
    pub fn start_instant(&self, hours: &BusinessHours) -> Result<DateTime<Utc>, CoreError> {
        let date: NaiveDate = self
            .selected_date
            .ok_or(CoreError::MissingSelection { field: "date" })?;
        let time: NaiveTime = self
            .selected_time
            .ok_or(CoreError::MissingSelection { field: "time" })?;
        Ok(hours.local_instant(date, time)?)
    }
}
