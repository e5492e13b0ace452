// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversion to domain types.
//!
//! Timestamps are stored as RFC 3339 UTC text with second precision
//! (`2026-03-02T09:00:00Z`), so lexical order matches chronological order
//! and range filters can compare strings directly.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use garage_booking_domain::{
    Appointment, AppointmentStatus, BlockedPeriod, Client, Service, ServiceType, Technician,
    Vehicle,
};
use std::str::FromStr;

use crate::diesel_schema::{
    appointments, blocked_periods, clients, services, technicians, vehicles,
};
use crate::error::PersistenceError;

/// Formats an instant for storage.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| PersistenceError::InvalidStoredValue(format!("timestamp '{value}': {e}")))
}

fn to_minutes(value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value)
        .map_err(|_| PersistenceError::InvalidStoredValue(format!("duration {value}")))
}

/// Converts minutes to the stored integer.
///
/// # Errors
///
/// Returns an error if the value exceeds the column range.
pub fn from_minutes(value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value)
        .map_err(|_| PersistenceError::InvalidStoredValue(format!("duration {value}")))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = services)]
pub struct ServiceRow {
    pub service_type: String,
    pub name: String,
    pub duration_minutes: i32,
    pub price: Option<String>,
}

impl TryFrom<ServiceRow> for Service {
    type Error = PersistenceError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let service_type: ServiceType = ServiceType::from_str(&row.service_type)
            .map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))?;
        Self::new(
            service_type,
            &row.name,
            to_minutes(row.duration_minutes)?,
            row.price,
        )
        .map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = technicians)]
pub struct TechnicianRow {
    pub technician_id: i64,
    pub name: String,
    pub specialty: String,
    pub is_active: i32,
}

impl From<TechnicianRow> for Technician {
    fn from(row: TechnicianRow) -> Self {
        Self {
            technician_id: row.technician_id,
            name: row.name,
            specialty: row.specialty,
            active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = clients)]
pub struct ClientRow {
    pub client_id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub consent: i32,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            client_id: row.client_id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            consent: row.consent != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = vehicles)]
pub struct VehicleRow {
    pub vehicle_id: i64,
    pub client_id: i64,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub year: Option<String>,
    pub notes: String,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            vehicle_id: row.vehicle_id,
            client_id: row.client_id,
            plate: row.plate,
            make: row.make,
            model: row.model,
            year: row.year,
            notes: row.notes,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = appointments)]
pub struct AppointmentRow {
    pub appointment_id: i64,
    pub client_id: i64,
    pub vehicle_id: i64,
    pub technician_id: Option<i64>,
    pub starts_at: String,
    pub duration_minutes: i32,
    pub status: String,
    pub access_code: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = PersistenceError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status: AppointmentStatus = AppointmentStatus::from_str(&row.status)
            .map_err(|e| PersistenceError::InvalidStoredValue(e.to_string()))?;
        Ok(Self {
            appointment_id: row.appointment_id,
            client_id: row.client_id,
            vehicle_id: row.vehicle_id,
            technician_id: row.technician_id,
            start: parse_timestamp(&row.starts_at)?,
            duration_minutes: to_minutes(row.duration_minutes)?,
            status,
            access_code: row.access_code,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = blocked_periods)]
pub struct BlockedPeriodRow {
    pub technician_id: Option<i64>,
    pub starts_at: String,
    pub ends_at: String,
    pub reason: String,
}

impl TryFrom<BlockedPeriodRow> for BlockedPeriod {
    type Error = PersistenceError;

    fn try_from(row: BlockedPeriodRow) -> Result<Self, Self::Error> {
        Ok(Self {
            technician_id: row.technician_id,
            start: parse_timestamp(&row.starts_at)?,
            end: parse_timestamp(&row.ends_at)?,
            reason: row.reason,
        })
    }
}

/// Converts a batch of rows, failing on the first bad row.
///
/// # Errors
///
/// Returns the first conversion error.
pub fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, PersistenceError>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}
