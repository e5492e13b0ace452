// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::Persistence;
use chrono::{DateTime, TimeZone, Utc};
use garage_booking_domain::{
    AppointmentStatus, Client, NewAppointment, NewClient, NewVehicle, Vehicle,
};

/// Monday, 2 March 2026 at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

pub fn create_test_client(persistence: &mut Persistence, phone: &str) -> Client {
    persistence
        .create_client(&NewClient {
            name: String::from("Ana García"),
            phone: phone.to_string(),
            email: Some(String::from("ana@example.com")),
            consent: true,
        })
        .unwrap()
}

pub fn create_test_vehicle(persistence: &mut Persistence, client_id: i64, plate: &str) -> Vehicle {
    persistence
        .create_vehicle(&NewVehicle {
            client_id,
            plate: plate.to_string(),
            make: String::from("Seat"),
            model: String::from("Ibiza"),
            year: Some(String::from("2018")),
            notes: String::new(),
        })
        .unwrap()
}

pub fn new_appointment(
    client: &Client,
    vehicle: &Vehicle,
    technician_id: Option<i64>,
    start: DateTime<Utc>,
) -> NewAppointment {
    NewAppointment {
        client_id: client.client_id,
        vehicle_id: vehicle.vehicle_id,
        technician_id,
        start,
        duration_minutes: 30,
        status: AppointmentStatus::Confirmed,
        access_code: String::from("482913"),
    }
}

/// A database with one client and one vehicle.
pub fn seeded() -> (Persistence, Client, Vehicle) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let client = create_test_client(&mut persistence, "611222333");
    let vehicle = create_test_vehicle(&mut persistence, client.client_id, "1234BCD");
    (persistence, client, vehicle)
}
