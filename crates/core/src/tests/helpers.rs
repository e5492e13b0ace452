// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::BookingSession;
use chrono::{NaiveDate, NaiveTime};
use garage_booking_domain::{
    ClientDetails, Service, ServiceType, Technician, TechnicianChoice, VehicleDetails,
};

pub fn create_test_service() -> Service {
    Service::new(
        ServiceType::OilChange,
        "Cambio de aceite",
        60,
        Some(String::from("49€")),
    )
    .unwrap()
}

pub fn create_test_technician() -> Technician {
    Technician {
        technician_id: 2,
        name: String::from("Carlos Ruiz"),
        specialty: String::from("Motor"),
        active: true,
    }
}

pub fn create_test_client() -> ClientDetails {
    ClientDetails {
        name: String::from("Ana García"),
        phone: String::from("611 222 333"),
        email: String::from("ana@example.com"),
        consent: true,
    }
}

pub fn create_test_vehicle() -> VehicleDetails {
    VehicleDetails {
        plate: String::from("1234 bcd"),
        make: String::from("Seat"),
        model: String::from("León"),
        year: String::from("2019"),
        reason: String::from("Ruido al frenar"),
    }
}

/// Monday, 2 March 2026.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn test_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 30, 0).unwrap()
}

/// A session with every field filled in and valid.
pub fn create_complete_session() -> BookingSession {
    let mut session = BookingSession::new();
    session.select_service(create_test_service());
    session.select_technician(TechnicianChoice::Specific(create_test_technician()));
    session.select_slot(test_date(), test_time());
    session.client = create_test_client();
    session.vehicle = create_test_vehicle();
    session
}
