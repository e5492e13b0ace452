// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod availability;
mod business_hours;
mod error;
mod interval;
mod records;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use availability::{
    CandidateStarts, DaySlots, Slot, SlotQuery, TechnicianCapacity, candidate_starts,
    compute_slots, format_time_slot, is_candidate_start, parse_time_slot, slot_is_free,
};
pub use business_hours::{BusinessHours, DEFAULT_TIMEZONE, FALLBACK_TECHNICIAN_CAPACITY};
pub use error::DomainError;
pub use interval::{TimeInterval, intervals_overlap};
pub use records::{
    ClientChanges, ClientDetails, NewAppointment, NewClient, NewVehicle, VehicleChanges,
    VehicleDetails,
};
pub use types::{
    Appointment, AppointmentStatus, BlockedPeriod, Client, DEFAULT_APPOINTMENT_MINUTES, Service,
    ServiceType, Technician, TechnicianChoice, Vehicle,
};
pub use validation::{
    normalize_phone, normalize_plate, validate_client_details, validate_client_name,
    validate_consent, validate_email, validate_phone, validate_plate, validate_vehicle_details,
    validate_vehicle_year,
};
