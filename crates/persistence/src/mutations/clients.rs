// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use garage_booking_domain::{
    Client, ClientChanges, NewClient, NewVehicle, Vehicle, VehicleChanges,
};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{clients, vehicles};
use crate::error::PersistenceError;

/// Creates a client.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the phone is already registered.
pub fn create_client(
    conn: &mut SqliteConnection,
    client: &NewClient,
) -> Result<Client, PersistenceError> {
    diesel::insert_into(clients::table)
        .values((
            clients::name.eq(&client.name),
            clients::phone.eq(&client.phone),
            clients::email.eq(client.email.as_deref()),
            clients::consent.eq(i32::from(client.consent)),
        ))
        .execute(conn)?;
    let client_id: i64 = conn.get_last_insert_rowid()?;
    info!(client_id, "Created client");
    Ok(Client {
        client_id,
        name: client.name.clone(),
        phone: client.phone.clone(),
        email: client.email.clone(),
        consent: client.consent,
    })
}

/// Updates a client's name and email.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no client has the ID.
pub fn update_client(
    conn: &mut SqliteConnection,
    client_id: i64,
    changes: &ClientChanges,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(clients::table)
        .filter(clients::client_id.eq(client_id))
        .set((
            clients::name.eq(&changes.name),
            clients::email.eq(changes.email.as_deref()),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("client {client_id}")));
    }
    debug!(client_id, "Updated client");
    Ok(())
}

/// Creates a vehicle owned by `vehicle.client_id`.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the plate is already registered.
pub fn create_vehicle(
    conn: &mut SqliteConnection,
    vehicle: &NewVehicle,
) -> Result<Vehicle, PersistenceError> {
    diesel::insert_into(vehicles::table)
        .values((
            vehicles::client_id.eq(vehicle.client_id),
            vehicles::plate.eq(&vehicle.plate),
            vehicles::make.eq(&vehicle.make),
            vehicles::model.eq(&vehicle.model),
            vehicles::year.eq(vehicle.year.as_deref()),
            vehicles::notes.eq(&vehicle.notes),
        ))
        .execute(conn)?;
    let vehicle_id: i64 = conn.get_last_insert_rowid()?;
    info!(vehicle_id, client_id = vehicle.client_id, "Created vehicle");
    Ok(Vehicle {
        vehicle_id,
        client_id: vehicle.client_id,
        plate: vehicle.plate.clone(),
        make: vehicle.make.clone(),
        model: vehicle.model.clone(),
        year: vehicle.year.clone(),
        notes: vehicle.notes.clone(),
    })
}

/// Updates a vehicle's make, model, year and notes. Ownership is unchanged.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no vehicle has the ID.
pub fn update_vehicle(
    conn: &mut SqliteConnection,
    vehicle_id: i64,
    changes: &VehicleChanges,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(vehicles::table)
        .filter(vehicles::vehicle_id.eq(vehicle_id))
        .set((
            vehicles::make.eq(&changes.make),
            vehicles::model.eq(&changes.model),
            vehicles::year.eq(changes.year.as_deref()),
            vehicles::notes.eq(&changes.notes),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("vehicle {vehicle_id}")));
    }
    debug!(vehicle_id, "Updated vehicle");
    Ok(())
}
