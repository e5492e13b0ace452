// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use garage_booking::BookingSession;
use garage_booking_domain::{
    BusinessHours, ClientDetails, Service, ServiceType, Technician, TechnicianChoice,
    VehicleDetails,
};
use garage_booking_persistence::Persistence;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    BookingCommitter, BookingNotification, Catalog, NoopNotifier, Notifier, NotifyError,
    SqliteStore, StoreError,
};

/// 09:00-19:00 UTC, 30-minute default slots, fallback capacity 3.
pub fn test_hours() -> BusinessHours {
    BusinessHours::new(
        Tz::UTC,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        30,
        3,
    )
    .unwrap()
}

/// Monday, 2 March 2026.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// `test_date()` at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

/// Sunday noon before `test_date()`.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn oil_change() -> Service {
    Service::new(
        ServiceType::OilChange,
        "Cambio de aceite",
        30,
        Some(String::from("49€")),
    )
    .unwrap()
}

pub fn diagnosis() -> Service {
    Service::new(ServiceType::Diagnosis, "Diagnóstico", 60, None).unwrap()
}

/// Store with the two services above and technicians Carlos and Marta.
pub fn seeded_store() -> (SqliteStore, Technician, Technician) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence.insert_service(&oil_change()).unwrap();
    persistence.insert_service(&diagnosis()).unwrap();
    let carlos = persistence
        .insert_technician("Carlos Ruiz", "Motor", true)
        .unwrap();
    let marta = persistence
        .insert_technician("Marta Vidal", "Frenos", true)
        .unwrap();
    (SqliteStore::new(persistence), carlos, marta)
}

pub fn client_details(name: &str, phone: &str) -> ClientDetails {
    ClientDetails {
        name: name.to_string(),
        phone: phone.to_string(),
        email: String::from("cliente@example.com"),
        consent: true,
    }
}

pub fn vehicle_details(plate: &str) -> VehicleDetails {
    VehicleDetails {
        plate: plate.to_string(),
        make: String::from("Seat"),
        model: String::from("León"),
        year: String::from("2019"),
        reason: String::from("Revisión anual"),
    }
}

/// A complete session for an oil change at `test_date()` `hour:minute`.
pub fn session_at(
    technician: TechnicianChoice,
    hour: u32,
    minute: u32,
    phone: &str,
    plate: &str,
) -> BookingSession {
    let mut session = BookingSession::new();
    session.select_service(oil_change());
    session.select_technician(technician);
    session.select_slot(test_date(), time(hour, minute));
    session.client = client_details("Ana García", phone);
    session.vehicle = vehicle_details(plate);
    session
}

pub fn committer(store: &SqliteStore) -> BookingCommitter {
    BookingCommitter::new(
        Arc::new(store.clone()),
        Arc::new(NoopNotifier),
        test_hours(),
    )
}

/// Forwards every notification to a channel.
pub struct RecordingNotifier {
    sender: mpsc::UnboundedSender<BookingNotification>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BookingNotification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_booked(&self, notification: &BookingNotification) -> Result<(), NotifyError> {
        self.sender.send(notification.clone()).unwrap();
        Ok(())
    }
}

/// Rejects every notification.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify_booked(&self, _notification: &BookingNotification) -> Result<(), NotifyError> {
        Err(NotifyError::Status { status: 503 })
    }
}

/// A catalog whose technician directory is down.
pub struct UnavailableCatalog;

#[async_trait]
impl Catalog for UnavailableCatalog {
    async fn list_active_services(&self) -> Result<Vec<Service>, StoreError> {
        Err(StoreError::Unavailable(String::from("catalog offline")))
    }

    async fn list_active_technicians(&self) -> Result<Vec<Technician>, StoreError> {
        Err(StoreError::Unavailable(String::from("directory offline")))
    }
}
