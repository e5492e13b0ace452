// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commit ordering, upsert and slot-guard tests.

use std::sync::Arc;

use garage_booking::CoreError;
use garage_booking_domain::{
    AppointmentStatus, BlockedPeriod, DomainError, NewClient, TechnicianChoice,
};

use super::helpers::{
    FailingNotifier, RecordingNotifier, at, committer, oil_change, seeded_store, session_at,
    test_date, test_hours, test_now,
};
use crate::{AvailabilityService, BookingCommitter, BookingError, BookingStore, CommitPolicy};

// ============================================================================
// Successful commits
// ============================================================================

#[tokio::test]
async fn test_commit_stores_one_confirmed_appointment() {
    let (store, carlos, _) = seeded_store();
    let session = session_at(
        TechnicianChoice::Specific(carlos.clone()),
        10,
        0,
        "611 222 333",
        "1234 bcd",
    );

    let receipt = committer(&store).commit(&session, test_now()).await.unwrap();

    let booked = store
        .list_appointments(at(10, 0), at(10, 30), None)
        .await
        .unwrap();
    assert_eq!(booked.len(), 1);
    let appointment = &booked[0];
    assert_eq!(appointment.appointment_id, receipt.appointment_id);
    assert_eq!(appointment.client_id, receipt.client_id);
    assert_eq!(appointment.vehicle_id, receipt.vehicle_id);
    assert_eq!(appointment.technician_id, Some(carlos.technician_id));
    assert_eq!(appointment.start, at(10, 0));
    assert_eq!(appointment.duration_minutes, 30);
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(appointment.access_code, receipt.access_code);

    assert_eq!(receipt.access_code.len(), 6);
    assert!(receipt.access_code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(receipt.service_name, "Cambio de aceite");
    assert_eq!(receipt.technician_label, "Carlos Ruiz");
}

#[tokio::test]
async fn test_commit_normalizes_natural_keys() {
    let (store, _, _) = seeded_store();
    let session = session_at(TechnicianChoice::Any, 9, 0, " 611 222 333 ", "1234 bcd");

    committer(&store).commit(&session, test_now()).await.unwrap();

    let client = store.find_client_by_phone("611222333").await.unwrap();
    assert!(client.is_some());
    let vehicle = store.find_vehicle_by_plate("1234BCD").await.unwrap().unwrap();
    assert_eq!(vehicle.make, "Seat");
    assert_eq!(vehicle.year.as_deref(), Some("2019"));
    assert_eq!(vehicle.notes, "Revisión anual");
}

#[tokio::test]
async fn test_commit_reuses_existing_client_by_phone() {
    let (store, _, _) = seeded_store();
    let existing = store
        .create_client(&NewClient {
            name: String::from("Ana Antigua"),
            phone: String::from("611222333"),
            email: None,
            consent: true,
        })
        .await
        .unwrap();

    let session = session_at(TechnicianChoice::Any, 12, 0, "611222333", "1234BCD");
    let receipt = committer(&store).commit(&session, test_now()).await.unwrap();

    assert_eq!(receipt.client_id, existing.client_id);
    let client = store.find_client_by_phone("611222333").await.unwrap().unwrap();
    assert_eq!(client.name, "Ana García");
    assert_eq!(client.email.as_deref(), Some("cliente@example.com"));
}

#[tokio::test]
async fn test_recommit_updates_vehicle_instead_of_duplicating() {
    let (store, _, _) = seeded_store();
    let committer = committer(&store);

    let first = committer
        .commit(
            &session_at(TechnicianChoice::Any, 9, 0, "611222333", "1234BCD"),
            test_now(),
        )
        .await
        .unwrap();

    let mut again = session_at(TechnicianChoice::Any, 15, 0, "611222333", "1234 BCD");
    again.vehicle.model = String::from("Ibiza");
    let second = committer.commit(&again, test_now()).await.unwrap();

    assert_eq!(first.client_id, second.client_id);
    assert_eq!(first.vehicle_id, second.vehicle_id);
    assert_ne!(first.appointment_id, second.appointment_id);
    let vehicle = store.find_vehicle_by_plate("1234BCD").await.unwrap().unwrap();
    assert_eq!(vehicle.model, "Ibiza");
}

// ============================================================================
// Rejected commits
// ============================================================================

#[tokio::test]
async fn test_invalid_session_writes_nothing() {
    let (store, _, _) = seeded_store();
    let mut session = session_at(TechnicianChoice::Any, 10, 0, "611222333", "1234BCD");
    session.client.consent = false;

    let result = committer(&store).commit(&session, test_now()).await;

    assert_eq!(
        result,
        Err(BookingError::Validation(DomainError::ConsentRequired))
    );
    assert!(store.find_client_by_phone("611222333").await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_slot_is_a_flow_error() {
    let (store, _, _) = seeded_store();
    let mut session = session_at(TechnicianChoice::Any, 10, 0, "611222333", "1234BCD");
    session.clear_slot();

    let result = committer(&store).commit(&session, test_now()).await;

    assert_eq!(
        result,
        Err(BookingError::Flow(CoreError::MissingSelection { field: "date" }))
    );
}

#[tokio::test]
async fn test_past_slot_is_a_conflict() {
    let (store, _, _) = seeded_store();
    let session = session_at(TechnicianChoice::Any, 10, 0, "611222333", "1234BCD");

    let result = committer(&store).commit(&session, at(10, 1)).await;

    assert_eq!(result, Err(BookingError::SlotConflict { start: at(10, 0) }));
}

#[tokio::test]
async fn test_off_grid_start_is_rejected_under_either_policy() {
    let (store, carlos, _) = seeded_store();
    let session = session_at(
        TechnicianChoice::Specific(carlos),
        9,
        17,
        "611222333",
        "1234BCD",
    );
    let guarded = committer(&store);
    let unguarded = committer(&store).with_policy(CommitPolicy {
        recheck_availability: false,
    });

    for committer in [&guarded, &unguarded] {
        let result = committer.commit(&session, test_now()).await;
        assert_eq!(result, Err(BookingError::SlotConflict { start: at(9, 17) }));
    }
    assert!(store.find_client_by_phone("611222333").await.unwrap().is_none());
    assert!(
        store
            .list_appointments(at(9, 0), at(10, 0), None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_any_commit_succeeds_when_busy_technician_is_also_blocked() {
    let (store, carlos, _) = seeded_store();
    let committer = committer(&store);
    committer
        .commit(
            &session_at(
                TechnicianChoice::Specific(carlos.clone()),
                10,
                0,
                "722333444",
                "5678CDF",
            ),
            test_now(),
        )
        .await
        .unwrap();
    store
        .shared()
        .lock()
        .await
        .insert_blocked_period(&BlockedPeriod {
            technician_id: Some(carlos.technician_id),
            start: at(10, 0),
            end: at(12, 0),
            reason: String::from("Curso"),
        })
        .unwrap();

    let availability =
        AvailabilityService::new(Arc::new(store.clone()), Arc::new(store.clone()), test_hours());
    let days = availability
        .available_slots(
            test_date(),
            test_date().succ_opt().unwrap(),
            &oil_change(),
            &TechnicianChoice::Any,
            test_now(),
        )
        .await
        .unwrap();
    let ten = days[0].slots.iter().find(|slot| slot.start == at(10, 0)).unwrap();
    assert!(ten.available);

    let any = session_at(TechnicianChoice::Any, 10, 0, "611222333", "1234BCD");
    assert!(committer.commit(&any, test_now()).await.is_ok());
}

#[tokio::test]
async fn test_taken_slot_is_rejected_before_client_writes() {
    let (store, carlos, _) = seeded_store();
    let committer = committer(&store);
    committer
        .commit(
            &session_at(
                TechnicianChoice::Specific(carlos.clone()),
                16,
                0,
                "611222333",
                "1234BCD",
            ),
            test_now(),
        )
        .await
        .unwrap();

    let late = session_at(
        TechnicianChoice::Specific(carlos),
        16,
        0,
        "722333444",
        "5678CDF",
    );
    let result = committer.commit(&late, test_now()).await;

    assert_eq!(result, Err(BookingError::SlotConflict { start: at(16, 0) }));
    assert!(store.find_client_by_phone("722333444").await.unwrap().is_none());
}

// ============================================================================
// Concurrent commits for one slot
// ============================================================================

#[tokio::test]
async fn test_concurrent_commits_with_recheck_book_once() {
    let (store, carlos, _) = seeded_store();
    let committer = committer(&store);
    let first = session_at(
        TechnicianChoice::Specific(carlos.clone()),
        11,
        0,
        "611222333",
        "1234BCD",
    );
    let second = session_at(
        TechnicianChoice::Specific(carlos.clone()),
        11,
        0,
        "722333444",
        "5678CDF",
    );

    let (a, b) = tokio::join!(
        committer.commit(&first, test_now()),
        committer.commit(&second, test_now())
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|result| *result == Err(BookingError::SlotConflict { start: at(11, 0) }))
    );
    let booked = store
        .list_appointments(at(11, 0), at(11, 30), Some(carlos.technician_id))
        .await
        .unwrap();
    assert_eq!(booked.len(), 1);
}

#[tokio::test]
async fn test_concurrent_commits_without_recheck_double_book() {
    let (store, carlos, _) = seeded_store();
    let committer = committer(&store).with_policy(CommitPolicy {
        recheck_availability: false,
    });
    let first = session_at(
        TechnicianChoice::Specific(carlos.clone()),
        11,
        0,
        "611222333",
        "1234BCD",
    );
    let second = session_at(
        TechnicianChoice::Specific(carlos.clone()),
        11,
        0,
        "722333444",
        "5678CDF",
    );

    let (a, b) = tokio::join!(
        committer.commit(&first, test_now()),
        committer.commit(&second, test_now())
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    let booked = store
        .list_appointments(at(11, 0), at(11, 30), Some(carlos.technician_id))
        .await
        .unwrap();
    assert_eq!(booked.len(), 2);
}

#[tokio::test]
async fn test_concurrent_commits_for_one_client_share_the_record() {
    let (store, _, _) = seeded_store();
    let committer = committer(&store);
    let morning = session_at(TechnicianChoice::Any, 9, 0, "611222333", "1234BCD");
    let afternoon = session_at(TechnicianChoice::Any, 17, 0, "611222333", "1234BCD");

    let (a, b) = tokio::join!(
        committer.commit(&morning, test_now()),
        committer.commit(&afternoon, test_now())
    );

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.client_id, b.client_id);
    assert_eq!(a.vehicle_id, b.vehicle_id);
}

// ============================================================================
// Notifications
// ============================================================================

#[tokio::test]
async fn test_commit_dispatches_notification() {
    let (store, carlos, _) = seeded_store();
    let (notifier, mut received) = RecordingNotifier::new();
    let committer =
        BookingCommitter::new(Arc::new(store.clone()), Arc::new(notifier), test_hours());
    let session = session_at(
        TechnicianChoice::Specific(carlos),
        10,
        30,
        "611 222 333",
        "1234 bcd",
    );

    let receipt = committer.commit(&session, test_now()).await.unwrap();
    let notification = received.recv().await.unwrap();

    assert_eq!(notification.appointment_id, receipt.appointment_id);
    assert_eq!(notification.client_name, "Ana García");
    assert_eq!(notification.phone, "611222333");
    assert_eq!(notification.plate, "1234BCD");
    assert_eq!(notification.vehicle, "Seat León");
    assert_eq!(notification.service, "Cambio de aceite");
    assert_eq!(notification.start_local, "02/03/2026 10:30");
    assert_eq!(notification.technician, "Carlos Ruiz");
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_commit() {
    let (store, _, _) = seeded_store();
    let committer =
        BookingCommitter::new(Arc::new(store.clone()), Arc::new(FailingNotifier), test_hours());
    let session = session_at(TechnicianChoice::Any, 10, 0, "611222333", "1234BCD");

    let receipt = committer.commit(&session, test_now()).await.unwrap();

    let stored = store.get_appointment(receipt.appointment_id).await.unwrap();
    assert_eq!(stored.unwrap().status, AppointmentStatus::Confirmed);
}
