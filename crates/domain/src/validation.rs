// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::records::{ClientDetails, VehicleDetails};
use regex::Regex;
use std::sync::LazyLock;

/// Nine digits starting with 6 or 7.
#[allow(clippy::expect_used)]
static MOBILE_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[67][0-9]{8}$").expect("valid phone pattern"));

/// One `@`, a non-empty local part and at least two non-empty domain labels.
#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid email pattern")
});

/// Current (`1234BCD`) or provincial (`M1234AB`) plate, already normalized.
#[allow(clippy::expect_used)]
static PLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}[A-Z]{3}|[A-Z]{1,2}[0-9]{4}[A-Z]{1,2})$").expect("valid plate pattern")
});

#[allow(clippy::expect_used)]
static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year pattern"));

/// Strips all whitespace from a phone number.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strips all whitespace from a plate and uppercases it.
#[must_use]
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Validates a client's full name.
///
/// # Errors
///
/// Returns an error unless the name has at least two space-separated tokens.
pub fn validate_client_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidClientName(String::from(
            "Name cannot be empty",
        )));
    }
    if name.split_whitespace().count() < 2 {
        return Err(DomainError::InvalidClientName(String::from(
            "Name must include first name and surname",
        )));
    }
    Ok(())
}

/// Validates a mobile phone number.
///
/// After whitespace is stripped the number must be exactly 9 digits
/// starting with 6 or 7.
///
/// # Errors
///
/// Returns an error if the phone does not match the mobile pattern.
pub fn validate_phone(phone: &str) -> Result<(), DomainError> {
    let normalized: String = normalize_phone(phone);
    if normalized.is_empty() {
        return Err(DomainError::InvalidPhone(String::from(
            "Phone cannot be empty",
        )));
    }
    if !MOBILE_PHONE_REGEX.is_match(&normalized) {
        return Err(DomainError::InvalidPhone(format!(
            "'{phone}' is not a 9-digit mobile number"
        )));
    }
    Ok(())
}

/// Validates an email address syntactically.
///
/// # Errors
///
/// Returns an error if the address contains whitespace, lacks a single `@`
/// with a non-empty local part, or has a domain without an inner dot.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let email: &str = email.trim();
    if email.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' is not a valid address"
        )));
    }
    Ok(())
}

/// Validates that consent was given.
///
/// # Errors
///
/// Returns `DomainError::ConsentRequired` if `consent` is false.
pub const fn validate_consent(consent: bool) -> Result<(), DomainError> {
    if consent {
        Ok(())
    } else {
        Err(DomainError::ConsentRequired)
    }
}

/// Validates every client-info field in order: name, phone, email, consent.
///
/// # Errors
///
/// Returns the first field error encountered.
pub fn validate_client_details(client: &ClientDetails) -> Result<(), DomainError> {
    validate_client_name(&client.name)?;
    validate_phone(&client.phone)?;
    validate_email(&client.email)?;
    validate_consent(client.consent)
}

/// Validates a licence plate.
///
/// Accepted formats after normalization:
/// - current: 4 digits followed by 3 letters (`1234BCD`)
/// - provincial: 1-2 letters, 4 digits, 1-2 letters (`M1234AB`)
///
/// # Errors
///
/// Returns an error if the plate matches neither format.
pub fn validate_plate(plate: &str) -> Result<(), DomainError> {
    let normalized: String = normalize_plate(plate);
    if normalized.is_empty() {
        return Err(DomainError::InvalidPlate(String::from(
            "Plate cannot be empty",
        )));
    }
    if PLATE_REGEX.is_match(&normalized) {
        Ok(())
    } else {
        Err(DomainError::InvalidPlate(format!(
            "'{plate}' is not a recognised plate format"
        )))
    }
}

/// Validates an optional vehicle year.
///
/// # Errors
///
/// Returns an error if the year is present but is not exactly 4 digits.
pub fn validate_vehicle_year(year: &str) -> Result<(), DomainError> {
    let year: &str = year.trim();
    if year.is_empty() {
        return Ok(());
    }
    if !YEAR_REGEX.is_match(year) {
        return Err(DomainError::InvalidVehicleYear(year.to_string()));
    }
    Ok(())
}

/// Validates every vehicle-info field in order: plate, make, model, year.
///
/// # Errors
///
/// Returns the first field error encountered.
pub fn validate_vehicle_details(vehicle: &VehicleDetails) -> Result<(), DomainError> {
    validate_plate(&vehicle.plate)?;
    if vehicle.make.trim().is_empty() {
        return Err(DomainError::InvalidMake);
    }
    if vehicle.model.trim().is_empty() {
        return Err(DomainError::InvalidModel);
    }
    validate_vehicle_year(&vehicle.year)
}
