// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use garage_booking_domain::{BlockedPeriod, Service, Technician};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_timestamp, from_minutes};
use crate::diesel_schema::{blocked_periods, services, technicians};
use crate::error::PersistenceError;

/// Inserts an active catalog service.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the service type already exists.
pub fn insert_service(
    conn: &mut SqliteConnection,
    service: &Service,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(services::table)
        .values((
            services::service_type.eq(service.service_type.as_str()),
            services::name.eq(&service.name),
            services::duration_minutes.eq(from_minutes(service.duration_minutes())?),
            services::price.eq(service.price.as_deref()),
            services::is_active.eq(1),
        ))
        .execute(conn)?;
    let service_id: i64 = conn.get_last_insert_rowid()?;
    info!(service_id, service_type = %service.service_type, "Inserted service");
    Ok(service_id)
}

/// Inserts a technician.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_technician(
    conn: &mut SqliteConnection,
    name: &str,
    specialty: &str,
    active: bool,
) -> Result<Technician, PersistenceError> {
    diesel::insert_into(technicians::table)
        .values((
            technicians::name.eq(name),
            technicians::specialty.eq(specialty),
            technicians::is_active.eq(i32::from(active)),
        ))
        .execute(conn)?;
    let technician_id: i64 = conn.get_last_insert_rowid()?;
    info!(technician_id, name, "Inserted technician");
    Ok(Technician {
        technician_id,
        name: name.to_string(),
        specialty: specialty.to_string(),
        active,
    })
}

/// Inserts a blocked period.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the period is empty
/// or names an unknown technician.
pub fn insert_blocked_period(
    conn: &mut SqliteConnection,
    block: &BlockedPeriod,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(blocked_periods::table)
        .values((
            blocked_periods::technician_id.eq(block.technician_id),
            blocked_periods::starts_at.eq(format_timestamp(block.start)),
            blocked_periods::ends_at.eq(format_timestamp(block.end)),
            blocked_periods::reason.eq(&block.reason),
        ))
        .execute(conn)?;
    let block_id: i64 = conn.get_last_insert_rowid()?;
    info!(block_id, technician_id = ?block.technician_id, "Inserted blocked period");
    Ok(block_id)
}
