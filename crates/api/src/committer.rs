// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Turns a completed booking session into a stored appointment.
//!
//! ## Order of work
//!
//! 1. Check the session satisfies every step precondition
//! 2. Normalize phone and plate
//! 3. Re-check the slot (when the policy asks for it)
//! 4. Resolve the client by phone, updating or creating it
//! 5. Resolve the vehicle by plate, updating or creating it
//! 6. Insert the appointment as confirmed
//! 7. Dispatch the notification
//!
//! Steps 4 to 6 are strictly ordered; each uses the identity produced by the
//! step before. A failure in any of them leaves the session untouched so the
//! caller can retry.

use crate::error::{BookingError, StoreError};
use crate::notifier::{BookingNotification, Notifier, dispatch_notification};
use crate::store::BookingStore;
use chrono::{DateTime, Utc};
use garage_booking::{BookingSession, CoreError, LastBooking, Step, check_step_precondition};
use garage_booking_domain::{
    AppointmentStatus, BusinessHours, ClientChanges, ClientDetails, NewAppointment, NewClient,
    NewVehicle, Service, TechnicianChoice, TimeInterval, VehicleChanges, VehicleDetails,
    is_candidate_start, normalize_phone, normalize_plate, slot_is_free,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How strictly a commit guards against double-booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPolicy {
    /// Re-check the slot before any write and insert through the guarded path.
    ///
    /// When `false`, the appointment is inserted without any calendar check
    /// and two concurrent commits for one slot can both succeed.
    pub recheck_availability: bool,
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self {
            recheck_availability: true,
        }
    }
}

/// The result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingReceipt {
    pub appointment_id: i64,
    pub client_id: i64,
    pub vehicle_id: i64,
    /// Six-digit code the client quotes at the garage.
    pub access_code: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub service_name: String,
    pub technician_label: String,
}

impl BookingReceipt {
    /// Builds the informational summary kept after the session is cleared.
    #[must_use]
    pub fn last_booking(&self, hours: &BusinessHours) -> LastBooking {
        let (date, time) = hours.to_local(self.start);
        LastBooking {
            date,
            time,
            service_name: self.service_name.clone(),
            duration_minutes: self.duration_minutes,
        }
    }
}

/// Generates a six-digit appointment access code.
#[must_use]
pub fn generate_access_code() -> String {
    format!("{:06}", rand::random::<u32>() % 1_000_000)
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn client_changes(details: &ClientDetails) -> ClientChanges {
    ClientChanges {
        name: details.name.trim().to_string(),
        email: optional_text(&details.email),
    }
}

fn vehicle_changes(details: &VehicleDetails) -> VehicleChanges {
    VehicleChanges {
        make: details.make.trim().to_string(),
        model: details.model.trim().to_string(),
        year: optional_text(&details.year),
        notes: details.reason.trim().to_string(),
    }
}

/// Persists completed sessions.
pub struct BookingCommitter {
    store: Arc<dyn BookingStore>,
    notifier: Arc<dyn Notifier>,
    hours: BusinessHours,
    policy: CommitPolicy,
}

impl BookingCommitter {
    /// Creates a committer with the default (re-checking) policy.
    #[must_use]
    pub fn new(
        store: Arc<dyn BookingStore>,
        notifier: Arc<dyn Notifier>,
        hours: BusinessHours,
    ) -> Self {
        Self {
            store,
            notifier,
            hours,
            policy: CommitPolicy::default(),
        }
    }

    /// Replaces the commit policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> CommitPolicy {
        self.policy
    }

    #[must_use]
    pub const fn hours(&self) -> &BusinessHours {
        &self.hours
    }

    /// Commits `session` as a confirmed appointment.
    ///
    /// The session is only read. Clearing it and recording the last booking
    /// is the caller's job once this returns `Ok`.
    ///
    /// # Errors
    ///
    /// - `Validation` or `Flow` if the session is incomplete or invalid
    /// - `SlotConflict` if the start is not one the calculator offers for the
    ///   service, or (re-checking policy only) is past or taken
    /// - `LookupFailure` if a client, vehicle or calendar read fails
    /// - `Commit` if a write fails
    pub async fn commit(
        &self,
        session: &BookingSession,
        now: DateTime<Utc>,
    ) -> Result<BookingReceipt, BookingError> {
        check_step_precondition(Step::Summary, session)?;
        let service: &Service = session
            .selected_service
            .as_ref()
            .ok_or(CoreError::MissingSelection { field: "service" })?;
        let start: DateTime<Utc> = session.start_instant(&self.hours)?;
        let duration_minutes: u32 = session.duration_minutes();

        if !is_candidate_start(&self.hours, start, duration_minutes) {
            debug!(start = %start, duration_minutes, "Start is not an offered slot");
            return Err(BookingError::SlotConflict { start });
        }

        let phone: String = normalize_phone(&session.client.phone);
        let plate: String = normalize_plate(&session.vehicle.plate);

        if self.policy.recheck_availability {
            self.ensure_slot_open(start, duration_minutes, &session.technician, now)
                .await?;
        }

        let client_id: i64 = self.resolve_client(&phone, &session.client).await?;
        let vehicle_id: i64 = self
            .resolve_vehicle(client_id, &plate, &session.vehicle)
            .await?;

        let request = NewAppointment {
            client_id,
            vehicle_id,
            technician_id: session.technician.technician_id(),
            start,
            duration_minutes,
            status: AppointmentStatus::Confirmed,
            access_code: generate_access_code(),
        };
        let appointment = if self.policy.recheck_availability {
            self.store
                .create_appointment_if_free(&request)
                .await
                .map_err(|e| match e {
                    StoreError::SlotUnavailable { start } => BookingError::SlotConflict { start },
                    other => BookingError::Commit(other),
                })?
        } else {
            self.store
                .create_appointment(&request)
                .await
                .map_err(BookingError::Commit)?
        };

        info!(
            appointment_id = appointment.appointment_id,
            client_id,
            vehicle_id,
            start = %start,
            technician = session.technician.label(),
            "Booking committed"
        );

        let notification = BookingNotification {
            appointment_id: appointment.appointment_id,
            client_name: session.client.name.trim().to_string(),
            email: session.client.email.trim().to_string(),
            phone,
            plate,
            vehicle: format!("{} {}", session.vehicle.make.trim(), session.vehicle.model.trim())
                .trim()
                .to_string(),
            service: service.name.clone(),
            start_local: BookingNotification::format_start(&self.hours, start),
            technician: session.technician.label().to_string(),
        };
        drop(dispatch_notification(
            Arc::clone(&self.notifier),
            notification,
        ));

        Ok(BookingReceipt {
            appointment_id: appointment.appointment_id,
            client_id,
            vehicle_id,
            access_code: appointment.access_code,
            start,
            duration_minutes,
            service_name: service.name.clone(),
            technician_label: session.technician.label().to_string(),
        })
    }

    /// Rejects a slot that is past or already full.
    async fn ensure_slot_open(
        &self,
        start: DateTime<Utc>,
        duration_minutes: u32,
        technician: &TechnicianChoice,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        if start < now {
            debug!(start = %start, now = %now, "Slot is in the past");
            return Err(BookingError::SlotConflict { start });
        }

        let interval = TimeInterval::from_minutes(start, duration_minutes);
        let capacity: u32 = match technician {
            TechnicianChoice::Specific(_) => 0,
            TechnicianChoice::Any => self
                .store
                .count_active_technicians()
                .await
                .map_err(BookingError::LookupFailure)?,
        };
        let appointments = self
            .store
            .list_appointments(interval.start, interval.end, None)
            .await
            .map_err(BookingError::LookupFailure)?;
        let blocks = self
            .store
            .list_blocked_periods(interval.start, interval.end, technician.technician_id())
            .await
            .map_err(BookingError::LookupFailure)?;

        if slot_is_free(&interval, technician, capacity, &appointments, &blocks) {
            Ok(())
        } else {
            warn!(
                start = %start,
                technician = technician.label(),
                "Slot taken since it was offered"
            );
            Err(BookingError::SlotConflict { start })
        }
    }

    async fn resolve_client(
        &self,
        phone: &str,
        details: &ClientDetails,
    ) -> Result<i64, BookingError> {
        let changes: ClientChanges = client_changes(details);
        let existing = self
            .store
            .find_client_by_phone(phone)
            .await
            .map_err(BookingError::LookupFailure)?;
        if let Some(client) = existing {
            return self.update_client(client.client_id, &changes).await;
        }

        let request = NewClient {
            name: changes.name.clone(),
            phone: phone.to_string(),
            email: changes.email.clone(),
            consent: details.consent,
        };
        match self.store.create_client(&request).await {
            Ok(client) => Ok(client.client_id),
            Err(StoreError::Duplicate(_)) => {
                // Registered by a concurrent commit after our lookup.
                let client = self
                    .store
                    .find_client_by_phone(phone)
                    .await
                    .map_err(BookingError::LookupFailure)?
                    .ok_or_else(|| {
                        BookingError::Commit(StoreError::NotFound(format!("client {phone}")))
                    })?;
                self.update_client(client.client_id, &changes).await
            }
            Err(e) => Err(BookingError::Commit(e)),
        }
    }

    async fn update_client(
        &self,
        client_id: i64,
        changes: &ClientChanges,
    ) -> Result<i64, BookingError> {
        self.store
            .update_client(client_id, changes)
            .await
            .map_err(BookingError::Commit)?;
        debug!(client_id, "Reused existing client");
        Ok(client_id)
    }

    async fn resolve_vehicle(
        &self,
        client_id: i64,
        plate: &str,
        details: &VehicleDetails,
    ) -> Result<i64, BookingError> {
        let changes: VehicleChanges = vehicle_changes(details);
        let existing = self
            .store
            .find_vehicle_by_plate(plate)
            .await
            .map_err(BookingError::LookupFailure)?;
        if let Some(vehicle) = existing {
            return self.update_vehicle(vehicle.vehicle_id, &changes).await;
        }

        let request = NewVehicle {
            client_id,
            plate: plate.to_string(),
            make: changes.make.clone(),
            model: changes.model.clone(),
            year: changes.year.clone(),
            notes: changes.notes.clone(),
        };
        match self.store.create_vehicle(&request).await {
            Ok(vehicle) => Ok(vehicle.vehicle_id),
            Err(StoreError::Duplicate(_)) => {
                let vehicle = self
                    .store
                    .find_vehicle_by_plate(plate)
                    .await
                    .map_err(BookingError::LookupFailure)?
                    .ok_or_else(|| {
                        BookingError::Commit(StoreError::NotFound(format!("vehicle {plate}")))
                    })?;
                self.update_vehicle(vehicle.vehicle_id, &changes).await
            }
            Err(e) => Err(BookingError::Commit(e)),
        }
    }

    async fn update_vehicle(
        &self,
        vehicle_id: i64,
        changes: &VehicleChanges,
    ) -> Result<i64, BookingError> {
        self.store
            .update_vehicle(vehicle_id, changes)
            .await
            .map_err(BookingError::Commit)?;
        debug!(vehicle_id, "Reused existing vehicle");
        Ok(vehicle_id)
    }
}
