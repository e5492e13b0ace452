// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the booking services.

use chrono::{DateTime, Utc};
use garage_booking::CoreError;
use garage_booking_domain::{AppointmentStatus, DomainError};
use garage_booking_persistence::PersistenceError;
use thiserror::Error;

/// Message shown for failures the user can only retry.
const RETRY_MESSAGE: &str = "Something went wrong while saving your booking. Please try again.";

const SLOT_TAKEN_MESSAGE: &str =
    "That time was just booked by someone else. Please choose another slot.";

/// Failures reported by a [`crate::BookingStore`] or [`crate::Catalog`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A natural key (phone, plate) is already registered.
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// The referenced record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The guarded insert found the interval already taken.
    #[error("Slot starting at {start} is no longer available")]
    SlotUnavailable { start: DateTime<Utc> },
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::DuplicateKey(key) => Self::Duplicate(key),
            PersistenceError::SlotUnavailable { start } => Self::SlotUnavailable { start },
            PersistenceError::AppointmentNotFound(id) => Self::NotFound(format!("appointment {id}")),
            PersistenceError::TechnicianNotFound(id) => Self::NotFound(format!("technician {id}")),
            PersistenceError::NotFound(what) => Self::NotFound(what),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Failures of the best-effort notification channel.
///
/// These are logged by the dispatcher and never reach the booking result.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The HTTP request could not be built or sent.
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Notification endpoint returned status {status}")]
    Status { status: u16 },
}

/// Errors surfaced to the presentation layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingError {
    /// User input broke a field rule.
    #[error("Validation failed: {0}")]
    Validation(#[source] DomainError),

    /// The booking flow rejected the requested step change.
    #[error("Booking flow error: {0}")]
    Flow(#[source] CoreError),

    /// A read from the store failed.
    #[error("Lookup failed: {0}")]
    LookupFailure(#[source] StoreError),

    /// A client, vehicle or appointment write failed.
    #[error("Commit failed: {0}")]
    Commit(#[source] StoreError),

    /// The chosen slot was taken between selection and commit.
    #[error("Slot starting at {start} is no longer available")]
    SlotConflict { start: DateTime<Utc> },

    /// No appointment has the given ID.
    #[error("Appointment {0} not found")]
    AppointmentNotFound(i64),

    /// The appointment's status does not allow the requested change.
    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

impl BookingError {
    /// Whether repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupFailure(_) | Self::Commit(_))
    }

    /// Returns the message to show the user.
    ///
    /// Validation and flow errors are specific; store failures collapse to a
    /// generic retry message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Flow(err) => err.to_string(),
            Self::LookupFailure(_) | Self::Commit(_) => String::from(RETRY_MESSAGE),
            Self::SlotConflict { .. } => String::from(SLOT_TAKEN_MESSAGE),
            Self::AppointmentNotFound(_) => String::from("The appointment could not be found."),
            Self::InvalidStatusTransition { from, .. } => {
                format!("The appointment is {from} and can no longer be changed.")
            }
        }
    }
}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStatusTransition { from, to } => {
                Self::InvalidStatusTransition { from, to }
            }
            other => Self::Validation(other),
        }
    }
}

impl From<CoreError> for BookingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => Self::from(inner),
            other => Self::Flow(other),
        }
    }
}
