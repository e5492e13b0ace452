// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment and blocked-period reads.
//!
//! Range reads return rows whose `[starts_at, ends_at)` overlaps the
//! requested range. Cancelled appointments are never returned by range reads.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use garage_booking_domain::{Appointment, AppointmentStatus, BlockedPeriod};

use crate::data_models::{AppointmentRow, BlockedPeriodRow, convert_rows, format_timestamp};
use crate::diesel_schema::{appointments, blocked_periods};
use crate::error::PersistenceError;

/// Lists non-cancelled appointments overlapping `[range_start, range_end)`,
/// ordered by start.
///
/// With `technician_id`, only that technician's appointments are returned.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_appointments(
    conn: &mut SqliteConnection,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    technician_id: Option<i64>,
) -> Result<Vec<Appointment>, PersistenceError> {
    let mut query = appointments::table
        .filter(appointments::starts_at.lt(format_timestamp(range_end)))
        .filter(appointments::ends_at.gt(format_timestamp(range_start)))
        .filter(appointments::status.ne(AppointmentStatus::Cancelled.as_str()))
        .into_boxed();
    if let Some(id) = technician_id {
        query = query.filter(appointments::technician_id.eq(id));
    }
    let rows: Vec<AppointmentRow> = query
        .order((appointments::starts_at.asc(), appointments::appointment_id.asc()))
        .select(AppointmentRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Lists blocked periods overlapping `[range_start, range_end)`.
///
/// With `technician_id`, garage-wide blocks and that technician's blocks are
/// returned; without it, every block is.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_blocked_periods(
    conn: &mut SqliteConnection,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    technician_id: Option<i64>,
) -> Result<Vec<BlockedPeriod>, PersistenceError> {
    let mut query = blocked_periods::table
        .filter(blocked_periods::starts_at.lt(format_timestamp(range_end)))
        .filter(blocked_periods::ends_at.gt(format_timestamp(range_start)))
        .into_boxed();
    if let Some(id) = technician_id {
        query = query.filter(
            blocked_periods::technician_id
                .is_null()
                .or(blocked_periods::technician_id.eq(id)),
        );
    }
    let rows: Vec<BlockedPeriodRow> = query
        .order(blocked_periods::starts_at.asc())
        .select(BlockedPeriodRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}

/// Retrieves an appointment by ID regardless of status.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<Option<Appointment>, PersistenceError> {
    let row: Option<AppointmentRow> = appointments::table
        .filter(appointments::appointment_id.eq(appointment_id))
        .select(AppointmentRow::as_select())
        .first(conn)
        .optional()?;
    row.map(Appointment::try_from).transpose()
}

/// Lists a client's appointments starting at or after `from`, in any status,
/// ordered by start.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_client_appointments_from(
    conn: &mut SqliteConnection,
    client_id: i64,
    from: DateTime<Utc>,
) -> Result<Vec<Appointment>, PersistenceError> {
    let rows: Vec<AppointmentRow> = appointments::table
        .filter(appointments::client_id.eq(client_id))
        .filter(appointments::starts_at.ge(format_timestamp(from)))
        .order(appointments::starts_at.asc())
        .select(AppointmentRow::as_select())
        .load(conn)?;
    convert_rows(rows)
}
