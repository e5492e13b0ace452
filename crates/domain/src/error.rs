// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::AppointmentStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Client name is empty or not a full name.
    InvalidClientName(String),
    /// Phone number does not match the mobile pattern.
    InvalidPhone(String),
    /// Email address is not syntactically valid.
    InvalidEmail(String),
    /// The data-processing consent was not given.
    ConsentRequired,
    /// Licence plate does not match a recognised format.
    InvalidPlate(String),
    /// Vehicle make is empty.
    InvalidMake,
    /// Vehicle model is empty.
    InvalidModel,
    /// Vehicle year is present but not exactly four digits.
    InvalidVehicleYear(String),
    /// Service duration must be positive.
    InvalidServiceDuration {
        /// The invalid duration in minutes.
        minutes: u32,
    },
    /// Service type string is not one of the catalog types.
    InvalidServiceType(String),
    /// Appointment status string is not recognised.
    InvalidAppointmentStatus(String),
    /// The requested status change is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: AppointmentStatus,
        /// The requested status.
        to: AppointmentStatus,
    },
    /// Business hours configuration is invalid.
    InvalidBusinessHours {
        /// Description of the problem.
        reason: String,
    },
    /// Timezone name could not be parsed.
    InvalidTimezone(String),
    /// A time slot string could not be parsed as `HH:MM`.
    InvalidTimeSlot(String),
    /// A wall-clock time does not map to a single instant in the garage timezone.
    UnresolvableLocalTime {
        /// The local date.
        date: chrono::NaiveDate,
        /// The local time of day.
        time: chrono::NaiveTime,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClientName(msg) => write!(f, "Invalid client name: {msg}"),
            Self::InvalidPhone(msg) => write!(f, "Invalid phone: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::ConsentRequired => {
                write!(f, "The privacy policy must be accepted before booking")
            }
            Self::InvalidPlate(msg) => write!(f, "Invalid plate: {msg}"),
            Self::InvalidMake => write!(f, "Vehicle make cannot be empty"),
            Self::InvalidModel => write!(f, "Vehicle model cannot be empty"),
            Self::InvalidVehicleYear(year) => {
                write!(f, "Invalid vehicle year '{year}': must be exactly 4 digits")
            }
            Self::InvalidServiceDuration { minutes } => {
                write!(
                    f,
                    "Invalid service duration: {minutes}. Must be greater than 0"
                )
            }
            Self::InvalidServiceType(value) => write!(f, "Invalid service type: {value}"),
            Self::InvalidAppointmentStatus(value) => {
                write!(f, "Invalid appointment status: {value}")
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot change appointment status from {from} to {to}")
            }
            Self::InvalidBusinessHours { reason } => {
                write!(f, "Invalid business hours: {reason}")
            }
            Self::InvalidTimezone(name) => write!(f, "Invalid timezone: {name}"),
            Self::InvalidTimeSlot(value) => {
                write!(f, "Invalid time slot '{value}': expected HH:MM")
            }
            Self::UnresolvableLocalTime { date, time } => {
                write!(
                    f,
                    "Local time {date} {time} is ambiguous or does not exist in the garage timezone"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
