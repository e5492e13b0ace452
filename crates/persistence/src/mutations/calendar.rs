// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment writes.
//!
//! `create_appointment_if_free` re-reads the calendar inside an immediate
//! (write-locking) transaction and inserts only if the interval is still
//! free. Two writers targeting the same slot are serialized by the lock, so
//! the second observes the first's row and is rejected.

use diesel::prelude::*;
use diesel::SqliteConnection;
use garage_booking_domain::{
    Appointment, AppointmentStatus, NewAppointment, TechnicianChoice, TimeInterval, slot_is_free,
};
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{format_timestamp, from_minutes};
use crate::diesel_schema::appointments;
use crate::error::PersistenceError;
use crate::queries::calendar::{list_appointments, list_blocked_periods};
use crate::queries::catalog::{count_active_technicians, get_technician};

/// Inserts an appointment without checking the calendar.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_appointment(
    conn: &mut SqliteConnection,
    appointment: &NewAppointment,
) -> Result<Appointment, PersistenceError> {
    let interval: TimeInterval =
        TimeInterval::from_minutes(appointment.start, appointment.duration_minutes);

    diesel::insert_into(appointments::table)
        .values((
            appointments::client_id.eq(appointment.client_id),
            appointments::vehicle_id.eq(appointment.vehicle_id),
            appointments::technician_id.eq(appointment.technician_id),
            appointments::starts_at.eq(format_timestamp(interval.start)),
            appointments::ends_at.eq(format_timestamp(interval.end)),
            appointments::duration_minutes.eq(from_minutes(appointment.duration_minutes)?),
            appointments::status.eq(appointment.status.as_str()),
            appointments::access_code.eq(&appointment.access_code),
        ))
        .execute(conn)?;
    let appointment_id: i64 = conn.get_last_insert_rowid()?;

    info!(
        appointment_id,
        client_id = appointment.client_id,
        technician_id = ?appointment.technician_id,
        start = %interval.start,
        "Created appointment"
    );

    Ok(Appointment {
        appointment_id,
        client_id: appointment.client_id,
        vehicle_id: appointment.vehicle_id,
        technician_id: appointment.technician_id,
        start: appointment.start,
        duration_minutes: appointment.duration_minutes,
        status: appointment.status,
        access_code: appointment.access_code.clone(),
    })
}

/// Inserts an appointment only if its interval is still free.
///
/// Inside one immediate transaction this reads the overlapping appointments
/// and blocked periods, the requested technician (or the active technician
/// count for unassigned bookings), applies the availability rule and inserts.
///
/// # Errors
///
/// Returns `PersistenceError::SlotUnavailable` if the interval is taken,
/// `PersistenceError::TechnicianNotFound` for an unknown technician, or a
/// database error.
pub fn create_appointment_if_free(
    conn: &mut SqliteConnection,
    appointment: &NewAppointment,
) -> Result<Appointment, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let interval: TimeInterval =
            TimeInterval::from_minutes(appointment.start, appointment.duration_minutes);

        let (choice, capacity): (TechnicianChoice, u32) = match appointment.technician_id {
            Some(id) => {
                let technician = get_technician(conn, id)?
                    .ok_or(PersistenceError::TechnicianNotFound(id))?;
                (TechnicianChoice::Specific(technician), 0)
            }
            None => (TechnicianChoice::Any, count_active_technicians(conn)?),
        };

        let existing: Vec<Appointment> =
            list_appointments(conn, interval.start, interval.end, None)?;
        let blocks = list_blocked_periods(conn, interval.start, interval.end, None)?;

        if !slot_is_free(&interval, &choice, capacity, &existing, &blocks) {
            warn!(
                technician_id = ?appointment.technician_id,
                start = %interval.start,
                overlapping = existing.len(),
                "Rejected appointment for unavailable slot"
            );
            return Err(PersistenceError::SlotUnavailable {
                start: appointment.start,
            });
        }

        create_appointment(conn, appointment)
    })
}

/// Sets an appointment's status.
///
/// No transition rules are applied here.
///
/// # Errors
///
/// Returns `PersistenceError::AppointmentNotFound` if no row has the ID.
pub fn update_appointment_status(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    status: AppointmentStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(appointments::table)
        .filter(appointments::appointment_id.eq(appointment_id))
        .set(appointments::status.eq(status.as_str()))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::AppointmentNotFound(appointment_id));
    }
    info!(appointment_id, status = %status, "Updated appointment status");
    Ok(())
}
