// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use garage_booking_domain::{Client, Vehicle};
use tracing::debug;

use crate::data_models::{ClientRow, VehicleRow};
use crate::diesel_schema::{clients, vehicles};
use crate::error::PersistenceError;

/// Looks up a client by normalized phone.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` when no client
/// has that phone.
pub fn find_client_by_phone(
    conn: &mut SqliteConnection,
    phone: &str,
) -> Result<Option<Client>, PersistenceError> {
    debug!(phone, "Looking up client by phone");
    let row: Option<ClientRow> = clients::table
        .filter(clients::phone.eq(phone))
        .select(ClientRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Client::from))
}

/// Looks up a vehicle by normalized plate.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` when no vehicle
/// has that plate.
pub fn find_vehicle_by_plate(
    conn: &mut SqliteConnection,
    plate: &str,
) -> Result<Option<Vehicle>, PersistenceError> {
    debug!(plate, "Looking up vehicle by plate");
    let row: Option<VehicleRow> = vehicles::table
        .filter(vehicles::plate.eq(plate))
        .select(VehicleRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Vehicle::from))
}
