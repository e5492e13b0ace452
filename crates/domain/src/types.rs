// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::interval::TimeInterval;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Duration applied when a booking carries no service duration.
pub const DEFAULT_APPOINTMENT_MINUTES: u32 = 30;

/// The closed set of services the garage offers.
///
/// Display concerns (icons, colours) are not modelled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "cambio_aceite")]
    OilChange,
    #[serde(rename = "pedir_cita")]
    Diagnosis,
    #[serde(rename = "mantenimiento")]
    Maintenance,
    #[serde(rename = "frenos")]
    Brakes,
    #[serde(rename = "bateria")]
    Battery,
    #[serde(rename = "itv")]
    PreInspection,
    #[serde(rename = "neumaticos")]
    Tires,
}

impl ServiceType {
    /// All service types in catalog order.
    pub const ALL: [Self; 7] = [
        Self::OilChange,
        Self::Diagnosis,
        Self::Maintenance,
        Self::Brakes,
        Self::Battery,
        Self::PreInspection,
        Self::Tires,
    ];

    /// Converts this service type to the catalog key stored by the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OilChange => "cambio_aceite",
            Self::Diagnosis => "pedir_cita",
            Self::Maintenance => "mantenimiento",
            Self::Brakes => "frenos",
            Self::Battery => "bateria",
            Self::PreInspection => "itv",
            Self::Tires => "neumaticos",
        }
    }
}

impl FromStr for ServiceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service_type| service_type.as_str() == s)
            .ok_or_else(|| DomainError::InvalidServiceType(s.to_string()))
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog service. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// The catalog type.
    pub service_type: ServiceType,
    /// Human-readable name.
    pub name: String,
    /// Duration in minutes. Always greater than zero.
    duration_minutes: u32,
    /// Display price, if the catalog publishes one.
    pub price: Option<String>,
}

impl Service {
    /// Creates a new `Service`.
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_minutes` is zero.
    pub fn new(
        service_type: ServiceType,
        name: &str,
        duration_minutes: u32,
        price: Option<String>,
    ) -> Result<Self, DomainError> {
        if duration_minutes == 0 {
            return Err(DomainError::InvalidServiceDuration {
                minutes: duration_minutes,
            });
        }
        Ok(Self {
            service_type,
            name: name.to_string(),
            duration_minutes,
            price,
        })
    }

    /// Returns the duration in minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

/// A garage technician. Immutable for the duration of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    /// The canonical numeric identifier.
    pub technician_id: i64,
    /// Display name.
    pub name: String,
    /// Free-text specialty.
    pub specialty: String,
    /// Whether the technician currently takes bookings.
    pub active: bool,
}

/// Which technician a booking is for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "technician", rename_all = "snake_case")]
pub enum TechnicianChoice {
    /// First available technician; consumes shared capacity.
    #[default]
    Any,
    /// A specific technician's calendar.
    Specific(Technician),
}

impl TechnicianChoice {
    /// Returns the technician ID when a specific technician was chosen.
    #[must_use]
    pub const fn technician_id(&self) -> Option<i64> {
        match self {
            Self::Any => None,
            Self::Specific(technician) => Some(technician.technician_id),
        }
    }

    /// Returns the label shown on summaries.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Any => "Cualquier técnico",
            Self::Specific(technician) => &technician.name,
        }
    }
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Whether an appointment in this status still occupies calendar time.
    #[must_use]
    pub const fn occupies_calendar(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Confirmed
    /// - Pending | Confirmed → Cancelled
    /// - Confirmed → Completed
    /// - Confirmed → `NoShow`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (
                    Self::Confirmed,
                    Self::Cancelled | Self::Completed | Self::NoShow
                )
        )
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(DomainError::InvalidAppointmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted appointment.
///
/// A non-cancelled appointment occupies `[start, start + duration)` on its
/// technician's calendar, or one unit of shared capacity when unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: i64,
    pub client_id: i64,
    pub vehicle_id: i64,
    /// `None` when booked against "any technician".
    pub technician_id: Option<i64>,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    /// Short code the client quotes when contacting the garage.
    pub access_code: String,
}

impl Appointment {
    /// Returns the exclusive end instant.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Returns the half-open interval this appointment occupies.
    #[must_use]
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.end())
    }
}

/// A persisted client, keyed by phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub consent: bool,
}

/// A persisted vehicle, keyed by plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub client_id: i64,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub year: Option<String>,
    pub notes: String,
}

/// A period during which bookings are not accepted.
///
/// Without a technician the block applies to the whole garage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedPeriod {
    pub technician_id: Option<i64>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: String,
}

impl BlockedPeriod {
    /// Returns the half-open interval covered by this block.
    #[must_use]
    pub const fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.end)
    }
}
