// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use garage_booking_domain::{
    AppointmentStatus, BlockedPeriod, DaySlots, NewAppointment, NewClient, NewVehicle,
    TechnicianCapacity, TechnicianChoice,
};

use super::helpers::{
    UnavailableCatalog, at, diagnosis, oil_change, seeded_store, test_date, test_hours, test_now,
};
use crate::{AvailabilityService, SqliteStore};

fn service_for(store: &SqliteStore) -> AvailabilityService {
    AvailabilityService::new(Arc::new(store.clone()), Arc::new(store.clone()), test_hours())
}

/// Inserts a confirmed 30-minute appointment at `start` for a fresh client
/// identified by `key`.
async fn book(store: &SqliteStore, key: u32, technician_id: Option<i64>, start: DateTime<Utc>) {
    let shared = store.shared();
    let mut persistence = shared.lock().await;
    let phone = format!("6000000{key:02}");
    let client = persistence
        .create_client(&NewClient {
            name: String::from("Luis Pérez"),
            phone: phone.clone(),
            email: None,
            consent: true,
        })
        .unwrap();
    let vehicle = persistence
        .create_vehicle(&NewVehicle {
            client_id: client.client_id,
            plate: format!("{key:04}BCD"),
            make: String::from("Renault"),
            model: String::from("Clio"),
            year: None,
            notes: String::new(),
        })
        .unwrap();
    persistence
        .create_appointment(&NewAppointment {
            client_id: client.client_id,
            vehicle_id: vehicle.vehicle_id,
            technician_id,
            start,
            duration_minutes: 30,
            status: AppointmentStatus::Confirmed,
            access_code: String::from("000001"),
        })
        .unwrap();
}

fn is_available(days: &[DaySlots], start: DateTime<Utc>) -> bool {
    days.iter()
        .flat_map(|day| day.slots.iter())
        .any(|slot| slot.start == start && slot.available)
}

#[tokio::test]
async fn test_specific_technician_excludes_booked_slot() {
    let (store, carlos, _) = seeded_store();
    book(&store, 1, Some(carlos.technician_id), at(10, 0)).await;

    let days = service_for(&store)
        .available_slots(
            test_date(),
            test_date().succ_opt().unwrap(),
            &oil_change(),
            &TechnicianChoice::Specific(carlos),
            test_now(),
        )
        .await
        .unwrap();

    assert_eq!(days.len(), 1);
    assert!(!is_available(&days, at(10, 0)));
    assert!(is_available(&days, at(9, 30)));
    assert!(is_available(&days, at(10, 30)));
}

#[tokio::test]
async fn test_other_technician_unaffected() {
    let (store, carlos, marta) = seeded_store();
    book(&store, 1, Some(carlos.technician_id), at(10, 0)).await;

    let days = service_for(&store)
        .available_slots(
            test_date(),
            test_date().succ_opt().unwrap(),
            &oil_change(),
            &TechnicianChoice::Specific(marta),
            test_now(),
        )
        .await
        .unwrap();

    assert!(is_available(&days, at(10, 0)));
}

#[tokio::test]
async fn test_any_technician_uses_active_count() {
    let (store, carlos, marta) = seeded_store();
    book(&store, 1, Some(carlos.technician_id), at(11, 0)).await;
    book(&store, 2, Some(marta.technician_id), at(11, 0)).await;

    let days = service_for(&store)
        .available_slots(
            test_date(),
            test_date().succ_opt().unwrap(),
            &oil_change(),
            &TechnicianChoice::Any,
            test_now(),
        )
        .await
        .unwrap();

    assert!(!is_available(&days, at(11, 0)));
    assert!(is_available(&days, at(10, 30)));
    assert!(is_available(&days, at(11, 30)));
}

#[tokio::test]
async fn test_directory_failure_falls_back_to_configured_capacity() {
    let (store, carlos, marta) = seeded_store();
    book(&store, 1, Some(carlos.technician_id), at(11, 0)).await;
    book(&store, 2, Some(marta.technician_id), at(11, 0)).await;

    let service = AvailabilityService::new(
        Arc::new(UnavailableCatalog),
        Arc::new(store.clone()),
        test_hours(),
    );
    assert_eq!(service.technician_capacity().await, TechnicianCapacity::Unknown);

    let days = service
        .available_slots(
            test_date(),
            test_date().succ_opt().unwrap(),
            &oil_change(),
            &TechnicianChoice::Any,
            test_now(),
        )
        .await
        .unwrap();

    // Two bookings against a fallback capacity of three.
    assert!(is_available(&days, at(11, 0)));
}

#[tokio::test]
async fn test_service_duration_sets_slot_step() {
    let (store, _, _) = seeded_store();
    let availability = service_for(&store);
    let end = test_date().succ_opt().unwrap();

    let short = availability
        .available_slots(test_date(), end, &oil_change(), &TechnicianChoice::Any, test_now())
        .await
        .unwrap();
    let long = availability
        .available_slots(test_date(), end, &diagnosis(), &TechnicianChoice::Any, test_now())
        .await
        .unwrap();

    assert_eq!(short[0].slots.len(), 20);
    assert_eq!(long[0].slots.len(), 10);
}

#[tokio::test]
async fn test_garage_block_applies_to_every_choice() {
    let (store, carlos, _) = seeded_store();
    store
        .shared()
        .lock()
        .await
        .insert_blocked_period(&BlockedPeriod {
            technician_id: None,
            start: at(13, 0),
            end: at(14, 0),
            reason: String::from("Formación"),
        })
        .unwrap();
    let availability = service_for(&store);
    let end = test_date().succ_opt().unwrap();

    for choice in [TechnicianChoice::Any, TechnicianChoice::Specific(carlos)] {
        let days = availability
            .available_slots(test_date(), end, &oil_change(), &choice, test_now())
            .await
            .unwrap();
        assert!(!is_available(&days, at(13, 0)));
        assert!(!is_available(&days, at(13, 30)));
        assert!(is_available(&days, at(14, 0)));
    }
}

#[tokio::test]
async fn test_empty_range_returns_no_days() {
    let (store, _, _) = seeded_store();
    let days = service_for(&store)
        .available_slots(
            test_date(),
            test_date(),
            &oil_change(),
            &TechnicianChoice::Any,
            test_now(),
        )
        .await
        .unwrap();
    assert!(days.is_empty());
}

#[tokio::test]
async fn test_past_slots_are_dropped() {
    let (store, _, _) = seeded_store();
    let days = service_for(&store)
        .available_slots(
            test_date(),
            test_date().succ_opt().unwrap(),
            &oil_change(),
            &TechnicianChoice::Any,
            at(12, 0),
        )
        .await
        .unwrap();

    assert_eq!(days[0].slots.first().unwrap().start, at(12, 0));
    assert!(days[0].slots.iter().all(|slot| slot.start >= at(12, 0)));
}
