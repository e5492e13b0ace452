// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the garage booking system.
//!
//! Stores the service catalog, technicians, clients, vehicles, appointments
//! and blocked periods in `SQLite` through Diesel. Migrations are embedded
//! and applied on open.
//!
//! ## Natural keys
//!
//! Clients are unique by normalized phone and vehicles by normalized plate.
//! Callers normalize before calling in.
//!
//! ## Guarded inserts
//!
//! [`Persistence::create_appointment_if_free`] re-runs the availability rule
//! inside an immediate transaction. [`Persistence::create_appointment`] does
//! not and is kept for callers that have already decided to skip the check.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] hands out a uniquely named shared-cache
//! database per call, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use garage_booking_domain::{
    Appointment, AppointmentStatus, BlockedPeriod, Client, ClientChanges, NewAppointment,
    NewClient, NewVehicle, Service, Technician, Vehicle, VehicleChanges,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

use backend::PersistenceBackend;
use backend::sqlite::DatabaseTarget;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let conn: SqliteConnection =
            backend::sqlite::connect(&DatabaseTarget::Memory(format!("memdb_booking_{db_id}")))?;
        Ok(Self { conn })
    }

    /// Creates a persistence adapter over a database file, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database cannot
    /// be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;
        let conn: SqliteConnection =
            backend::sqlite::connect(&DatabaseTarget::File(path_str.to_string()))?;
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Lists active services in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_services(&mut self) -> Result<Vec<Service>, PersistenceError> {
        queries::catalog::list_active_services(&mut self.conn)
    }

    /// Lists active technicians ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_technicians(&mut self) -> Result<Vec<Technician>, PersistenceError> {
        queries::catalog::list_active_technicians(&mut self.conn)
    }

    /// Counts active technicians.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_technicians(&mut self) -> Result<u32, PersistenceError> {
        queries::catalog::count_active_technicians(&mut self.conn)
    }

    /// Retrieves a technician by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_technician(
        &mut self,
        technician_id: i64,
    ) -> Result<Option<Technician>, PersistenceError> {
        queries::catalog::get_technician(&mut self.conn, technician_id)
    }

    /// Inserts a catalog service.
    ///
    /// # Errors
    ///
    /// Returns an error if the service type already exists.
    pub fn insert_service(&mut self, service: &Service) -> Result<i64, PersistenceError> {
        mutations::catalog::insert_service(&mut self.conn, service)
    }

    /// Inserts a technician.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_technician(
        &mut self,
        name: &str,
        specialty: &str,
        active: bool,
    ) -> Result<Technician, PersistenceError> {
        mutations::catalog::insert_technician(&mut self.conn, name, specialty, active)
    }

    /// Inserts a blocked period.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_blocked_period(
        &mut self,
        block: &BlockedPeriod,
    ) -> Result<i64, PersistenceError> {
        mutations::catalog::insert_blocked_period(&mut self.conn, block)
    }

    // ========================================================================
    // Clients & Vehicles
    // ========================================================================

    /// Looks up a client by normalized phone.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_client_by_phone(
        &mut self,
        phone: &str,
    ) -> Result<Option<Client>, PersistenceError> {
        queries::clients::find_client_by_phone(&mut self.conn, phone)
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone is already registered.
    pub fn create_client(&mut self, client: &NewClient) -> Result<Client, PersistenceError> {
        mutations::clients::create_client(&mut self.conn, client)
    }

    /// Updates a client's name and email.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist.
    pub fn update_client(
        &mut self,
        client_id: i64,
        changes: &ClientChanges,
    ) -> Result<(), PersistenceError> {
        mutations::clients::update_client(&mut self.conn, client_id, changes)
    }

    /// Looks up a vehicle by normalized plate.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_vehicle_by_plate(
        &mut self,
        plate: &str,
    ) -> Result<Option<Vehicle>, PersistenceError> {
        queries::clients::find_vehicle_by_plate(&mut self.conn, plate)
    }

    /// Creates a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the plate is already registered or the owner does
    /// not exist.
    pub fn create_vehicle(&mut self, vehicle: &NewVehicle) -> Result<Vehicle, PersistenceError> {
        mutations::clients::create_vehicle(&mut self.conn, vehicle)
    }

    /// Updates a vehicle's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle does not exist.
    pub fn update_vehicle(
        &mut self,
        vehicle_id: i64,
        changes: &VehicleChanges,
    ) -> Result<(), PersistenceError> {
        mutations::clients::update_vehicle(&mut self.conn, vehicle_id, changes)
    }

    // ========================================================================
    // Calendar
    // ========================================================================

    /// Lists non-cancelled appointments overlapping `[range_start, range_end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_appointments(
        &mut self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> Result<Vec<Appointment>, PersistenceError> {
        queries::calendar::list_appointments(&mut self.conn, range_start, range_end, technician_id)
    }

    /// Lists blocked periods overlapping `[range_start, range_end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_blocked_periods(
        &mut self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> Result<Vec<BlockedPeriod>, PersistenceError> {
        queries::calendar::list_blocked_periods(
            &mut self.conn,
            range_start,
            range_end,
            technician_id,
        )
    }

    /// Retrieves an appointment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_appointment(
        &mut self,
        appointment_id: i64,
    ) -> Result<Option<Appointment>, PersistenceError> {
        queries::calendar::get_appointment(&mut self.conn, appointment_id)
    }

    /// Lists a client's appointments starting at or after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_client_appointments_from(
        &mut self,
        client_id: i64,
        from: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, PersistenceError> {
        queries::calendar::list_client_appointments_from(&mut self.conn, client_id, from)
    }

    /// Inserts an appointment without checking the calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_appointment(
        &mut self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, PersistenceError> {
        mutations::calendar::create_appointment(&mut self.conn, appointment)
    }

    /// Inserts an appointment only if its interval is still free.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SlotUnavailable` if the slot is taken.
    pub fn create_appointment_if_free(
        &mut self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, PersistenceError> {
        mutations::calendar::create_appointment_if_free(&mut self.conn, appointment)
    }

    /// Sets an appointment's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment does not exist.
    pub fn update_appointment_status(
        &mut self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<(), PersistenceError> {
        mutations::calendar::update_appointment_status(&mut self.conn, appointment_id, status)
    }
}
