// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lookup and status changes for existing appointments.

use crate::error::{BookingError, StoreError};
use crate::store::BookingStore;
use chrono::{DateTime, Utc};
use garage_booking_domain::{Appointment, AppointmentStatus, normalize_phone};
use serde::Serialize;
use tracing::info;

/// Result of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    /// The appointment was cancelled by this request.
    Cancelled,
    /// The appointment was already cancelled; nothing changed.
    AlreadyCancelled,
}

async fn load(store: &dyn BookingStore, appointment_id: i64) -> Result<Appointment, BookingError> {
    store
        .get_appointment(appointment_id)
        .await
        .map_err(BookingError::LookupFailure)?
        .ok_or(BookingError::AppointmentNotFound(appointment_id))
}

async fn transition(
    store: &dyn BookingStore,
    appointment: &Appointment,
    target: AppointmentStatus,
) -> Result<(), BookingError> {
    if !appointment.status.can_transition_to(target) {
        return Err(BookingError::InvalidStatusTransition {
            from: appointment.status,
            to: target,
        });
    }
    store
        .update_appointment_status(appointment.appointment_id, target)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => BookingError::AppointmentNotFound(appointment.appointment_id),
            other => BookingError::Commit(other),
        })?;
    info!(
        appointment_id = appointment.appointment_id,
        from = %appointment.status,
        to = %target,
        "Appointment status changed"
    );
    Ok(())
}

/// Cancels a pending or confirmed appointment.
///
/// Cancelling an already cancelled appointment succeeds without writing.
///
/// # Errors
///
/// Returns `AppointmentNotFound` for an unknown ID, `InvalidStatusTransition`
/// for a completed or no-show appointment, or a store error.
pub async fn cancel_appointment(
    store: &dyn BookingStore,
    appointment_id: i64,
) -> Result<CancelOutcome, BookingError> {
    let appointment: Appointment = load(store, appointment_id).await?;
    if appointment.status == AppointmentStatus::Cancelled {
        info!(appointment_id, "Appointment already cancelled");
        return Ok(CancelOutcome::AlreadyCancelled);
    }
    transition(store, &appointment, AppointmentStatus::Cancelled).await?;
    Ok(CancelOutcome::Cancelled)
}

/// Marks a confirmed appointment as completed.
///
/// # Errors
///
/// Returns `AppointmentNotFound`, `InvalidStatusTransition` unless the
/// appointment is confirmed, or a store error.
pub async fn complete_appointment(
    store: &dyn BookingStore,
    appointment_id: i64,
) -> Result<(), BookingError> {
    let appointment: Appointment = load(store, appointment_id).await?;
    transition(store, &appointment, AppointmentStatus::Completed).await
}

/// Marks a confirmed appointment as a no-show.
///
/// # Errors
///
/// Returns `AppointmentNotFound`, `InvalidStatusTransition` unless the
/// appointment is confirmed, or a store error.
pub async fn mark_no_show(
    store: &dyn BookingStore,
    appointment_id: i64,
) -> Result<(), BookingError> {
    let appointment: Appointment = load(store, appointment_id).await?;
    transition(store, &appointment, AppointmentStatus::NoShow).await
}

/// Lists the non-cancelled appointments of the client owning `phone` that
/// start at or after `now`, earliest first.
///
/// An unknown phone yields an empty list.
///
/// # Errors
///
/// Returns `LookupFailure` if the store cannot be read.
pub async fn upcoming_appointments(
    store: &dyn BookingStore,
    phone: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Appointment>, BookingError> {
    let phone: String = normalize_phone(phone);
    if phone.is_empty() {
        return Ok(Vec::new());
    }
    let Some(client) = store
        .find_client_by_phone(&phone)
        .await
        .map_err(BookingError::LookupFailure)?
    else {
        return Ok(Vec::new());
    };

    let mut appointments: Vec<Appointment> = store
        .list_client_appointments_from(client.client_id, now)
        .await
        .map_err(BookingError::LookupFailure)?;
    appointments.retain(|appointment| appointment.status != AppointmentStatus::Cancelled);
    appointments.sort_by_key(|appointment| appointment.start);
    Ok(appointments)
}

/// Returns the client's next confirmed appointment, if any.
///
/// # Errors
///
/// Returns `LookupFailure` if the store cannot be read.
pub async fn next_confirmed_appointment(
    store: &dyn BookingStore,
    phone: &str,
    now: DateTime<Utc>,
) -> Result<Option<Appointment>, BookingError> {
    Ok(upcoming_appointments(store, phone, now)
        .await?
        .into_iter()
        .find(|appointment| appointment.status == AppointmentStatus::Confirmed))
}
