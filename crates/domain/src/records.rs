// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Input records: client-entered details and the field sets written to the
//! backing store.

use crate::types::AppointmentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact details entered at the client-info step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientDetails {
    /// Full name (at least first name and surname).
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Data-processing consent.
    pub consent: bool,
}

/// Vehicle details entered at the vehicle-info step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub plate: String,
    pub make: String,
    pub model: String,
    /// Optional four-digit year; empty when unknown.
    pub year: String,
    /// Free-text reason for the visit.
    pub reason: String,
}

/// Fields for creating a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    /// Normalized phone.
    pub phone: String,
    pub email: Option<String>,
    pub consent: bool,
}

/// Mutable client fields updated when an existing client books again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientChanges {
    pub name: String,
    pub email: Option<String>,
}

/// Fields for creating a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub client_id: i64,
    /// Normalized plate.
    pub plate: String,
    pub make: String,
    pub model: String,
    pub year: Option<String>,
    pub notes: String,
}

/// Mutable vehicle fields updated when an existing vehicle is booked again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleChanges {
    pub make: String,
    pub model: String,
    pub year: Option<String>,
    pub notes: String,
}

/// Fields for inserting an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub client_id: i64,
    pub vehicle_id: i64,
    pub technician_id: Option<i64>,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub access_code: String,
}
