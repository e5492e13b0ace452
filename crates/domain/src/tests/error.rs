// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AppointmentStatus, DomainError};
use chrono::{NaiveDate, NaiveTime};

#[test]
fn test_consent_message_is_user_facing() {
    let message = DomainError::ConsentRequired.to_string();
    assert!(message.contains("privacy policy"));
}

#[test]
fn test_status_transition_message_names_both_states() {
    let error = DomainError::InvalidStatusTransition {
        from: AppointmentStatus::Cancelled,
        to: AppointmentStatus::Completed,
    };
    assert_eq!(
        error.to_string(),
        "Cannot change appointment status from cancelled to completed"
    );
}

#[test]
fn test_unresolvable_local_time_message() {
    let error = DomainError::UnresolvableLocalTime {
        date: NaiveDate::from_ymd_opt(2026, 3, 29).unwrap(),
        time: NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
    };
    let message = error.to_string();
    assert!(message.contains("2026-03-29"));
    assert!(message.contains("02:30:00"));
}

#[test]
fn test_domain_error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&DomainError::InvalidMake);
}
