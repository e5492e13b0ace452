// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use garage_booking_domain::{Service, Technician};
use tracing::debug;

use crate::data_models::{ServiceRow, TechnicianRow, convert_rows};
use crate::diesel_schema::{services, technicians};
use crate::error::PersistenceError;

/// Lists active services in catalog order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_active_services(conn: &mut SqliteConnection) -> Result<Vec<Service>, PersistenceError> {
    let rows: Vec<ServiceRow> = services::table
        .filter(services::is_active.eq(1))
        .order(services::service_id.asc())
        .select(ServiceRow::as_select())
        .load(conn)?;
    debug!(count = rows.len(), "Loaded active services");
    convert_rows(rows)
}

/// Lists active technicians ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_active_technicians(
    conn: &mut SqliteConnection,
) -> Result<Vec<Technician>, PersistenceError> {
    let rows: Vec<TechnicianRow> = technicians::table
        .filter(technicians::is_active.eq(1))
        .order(technicians::name.asc())
        .select(TechnicianRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Technician::from).collect())
}

/// Counts active technicians.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_technicians(conn: &mut SqliteConnection) -> Result<u32, PersistenceError> {
    let count: i64 = technicians::table
        .filter(technicians::is_active.eq(1))
        .count()
        .get_result(conn)?;
    u32::try_from(count)
        .map_err(|_| PersistenceError::InvalidStoredValue(format!("technician count {count}")))
}

/// Retrieves a technician by ID, active or not.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_technician(
    conn: &mut SqliteConnection,
    technician_id: i64,
) -> Result<Option<Technician>, PersistenceError> {
    let row: Option<TechnicianRow> = technicians::table
        .filter(technicians::technician_id.eq(technician_id))
        .select(TechnicianRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Technician::from))
}
