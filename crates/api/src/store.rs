// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator boundaries.
//!
//! The booking services talk to reference data and the calendar only through
//! these traits, so any backing store can sit behind them.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use garage_booking_domain::{
    Appointment, AppointmentStatus, BlockedPeriod, Client, ClientChanges, NewAppointment,
    NewClient, NewVehicle, Service, Technician, Vehicle, VehicleChanges,
};

/// Read access to the service catalog and technician directory.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Lists the services clients may book.
    async fn list_active_services(&self) -> Result<Vec<Service>, StoreError>;

    /// Lists technicians currently taking bookings.
    async fn list_active_technicians(&self) -> Result<Vec<Technician>, StoreError>;
}

/// Calendar, client and vehicle access used by availability and commit.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Non-cancelled appointments overlapping `[range_start, range_end)`.
    async fn list_appointments(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// Blocked periods overlapping `[range_start, range_end)`.
    ///
    /// With a technician, returns garage-wide blocks and that technician's.
    async fn list_blocked_periods(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> Result<Vec<BlockedPeriod>, StoreError>;

    /// Number of active technicians.
    async fn count_active_technicians(&self) -> Result<u32, StoreError>;

    async fn find_client_by_phone(&self, phone: &str) -> Result<Option<Client>, StoreError>;

    async fn create_client(&self, client: &NewClient) -> Result<Client, StoreError>;

    async fn update_client(&self, client_id: i64, changes: &ClientChanges)
    -> Result<(), StoreError>;

    async fn find_vehicle_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, StoreError>;

    async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, StoreError>;

    async fn update_vehicle(
        &self,
        vehicle_id: i64,
        changes: &VehicleChanges,
    ) -> Result<(), StoreError>;

    /// Inserts an appointment without checking the calendar.
    async fn create_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, StoreError>;

    /// Inserts an appointment only if its interval is still free, checked in
    /// the same unit of work as the insert.
    ///
    /// Returns `StoreError::SlotUnavailable` when the interval is taken.
    async fn create_appointment_if_free(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, StoreError>;

    async fn get_appointment(&self, appointment_id: i64)
    -> Result<Option<Appointment>, StoreError>;

    async fn update_appointment_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<(), StoreError>;

    /// A client's appointments (any status) starting at or after `from`.
    async fn list_client_appointments_from(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;
}
