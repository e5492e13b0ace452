// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! [`Catalog`] and [`BookingStore`] over the SQLite persistence layer.

use crate::error::StoreError;
use crate::store::{BookingStore, Catalog};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use garage_booking_domain::{
    Appointment, AppointmentStatus, BlockedPeriod, Client, ClientChanges, NewAppointment,
    NewClient, NewVehicle, Service, Technician, Vehicle, VehicleChanges,
};
use garage_booking_persistence::Persistence;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shares one SQLite connection between the booking services.
///
/// Every call holds the connection lock for a single persistence operation,
/// so the guarded insert's transaction is never interleaved with another call.
#[derive(Clone)]
pub struct SqliteStore {
    persistence: Arc<Mutex<Persistence>>,
}

impl SqliteStore {
    /// Wraps an open persistence handle.
    #[must_use]
    pub fn new(persistence: Persistence) -> Self {
        Self::from_shared(Arc::new(Mutex::new(persistence)))
    }

    /// Uses a handle already shared with other components.
    #[must_use]
    pub const fn from_shared(persistence: Arc<Mutex<Persistence>>) -> Self {
        Self { persistence }
    }

    /// Returns the shared handle, for seeding and administration.
    #[must_use]
    pub fn shared(&self) -> Arc<Mutex<Persistence>> {
        Arc::clone(&self.persistence)
    }
}

#[async_trait]
impl Catalog for SqliteStore {
    async fn list_active_services(&self) -> Result<Vec<Service>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.list_active_services()?)
    }

    async fn list_active_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.list_active_technicians()?)
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn list_appointments(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.list_appointments(range_start, range_end, technician_id)?)
    }

    async fn list_blocked_periods(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> Result<Vec<BlockedPeriod>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.list_blocked_periods(range_start, range_end, technician_id)?)
    }

    async fn count_active_technicians(&self) -> Result<u32, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.count_active_technicians()?)
    }

    async fn find_client_by_phone(&self, phone: &str) -> Result<Option<Client>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.find_client_by_phone(phone)?)
    }

    async fn create_client(&self, client: &NewClient) -> Result<Client, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.create_client(client)?)
    }

    async fn update_client(
        &self,
        client_id: i64,
        changes: &ClientChanges,
    ) -> Result<(), StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.update_client(client_id, changes)?)
    }

    async fn find_vehicle_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.find_vehicle_by_plate(plate)?)
    }

    async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.create_vehicle(vehicle)?)
    }

    async fn update_vehicle(
        &self,
        vehicle_id: i64,
        changes: &VehicleChanges,
    ) -> Result<(), StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.update_vehicle(vehicle_id, changes)?)
    }

    async fn create_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.create_appointment(appointment)?)
    }

    async fn create_appointment_if_free(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.create_appointment_if_free(appointment)?)
    }

    async fn get_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.get_appointment(appointment_id)?)
    }

    async fn update_appointment_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<(), StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.update_appointment_status(appointment_id, status)?)
    }

    async fn list_client_appointments_from(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut persistence = self.persistence.lock().await;
        Ok(persistence.list_client_appointments_from(client_id, from)?)
    }
}
