// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use garage_booking_domain::{AppointmentStatus, TechnicianChoice};

use super::helpers::{at, committer, seeded_store, session_at, test_now};
use crate::{
    BookingError, BookingReceipt, BookingStore, CancelOutcome, SqliteStore, cancel_appointment,
    complete_appointment, mark_no_show, next_confirmed_appointment, upcoming_appointments,
};

async fn book_at(store: &SqliteStore, hour: u32) -> BookingReceipt {
    committer(store)
        .commit(
            &session_at(TechnicianChoice::Any, hour, 0, "611222333", "1234BCD"),
            test_now(),
        )
        .await
        .unwrap()
}

async fn status_of(store: &SqliteStore, appointment_id: i64) -> AppointmentStatus {
    store
        .get_appointment(appointment_id)
        .await
        .unwrap()
        .unwrap()
        .status
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let (store, _, _) = seeded_store();
    let receipt = book_at(&store, 10).await;

    assert_eq!(
        cancel_appointment(&store, receipt.appointment_id).await,
        Ok(CancelOutcome::Cancelled)
    );
    assert_eq!(
        cancel_appointment(&store, receipt.appointment_id).await,
        Ok(CancelOutcome::AlreadyCancelled)
    );
    assert_eq!(
        status_of(&store, receipt.appointment_id).await,
        AppointmentStatus::Cancelled
    );
}

#[tokio::test]
async fn test_cancel_frees_the_slot() {
    let (store, _, _) = seeded_store();
    let receipt = book_at(&store, 10).await;
    cancel_appointment(&store, receipt.appointment_id)
        .await
        .unwrap();

    assert!(
        store
            .list_appointments(at(10, 0), at(10, 30), None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_cancel_unknown_appointment() {
    let (store, _, _) = seeded_store();
    assert_eq!(
        cancel_appointment(&store, 999).await,
        Err(BookingError::AppointmentNotFound(999))
    );
}

#[tokio::test]
async fn test_completed_appointment_cannot_be_cancelled() {
    let (store, _, _) = seeded_store();
    let receipt = book_at(&store, 10).await;
    complete_appointment(&store, receipt.appointment_id)
        .await
        .unwrap();

    assert_eq!(
        cancel_appointment(&store, receipt.appointment_id).await,
        Err(BookingError::InvalidStatusTransition {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Cancelled,
        })
    );
}

// ============================================================================
// Completion and no-show
// ============================================================================

#[tokio::test]
async fn test_no_show_only_from_confirmed() {
    let (store, _, _) = seeded_store();
    let receipt = book_at(&store, 10).await;

    mark_no_show(&store, receipt.appointment_id).await.unwrap();
    assert_eq!(
        status_of(&store, receipt.appointment_id).await,
        AppointmentStatus::NoShow
    );

    assert_eq!(
        complete_appointment(&store, receipt.appointment_id).await,
        Err(BookingError::InvalidStatusTransition {
            from: AppointmentStatus::NoShow,
            to: AppointmentStatus::Completed,
        })
    );
}

#[tokio::test]
async fn test_cancelled_appointment_cannot_be_completed() {
    let (store, _, _) = seeded_store();
    let receipt = book_at(&store, 10).await;
    cancel_appointment(&store, receipt.appointment_id)
        .await
        .unwrap();

    assert!(matches!(
        complete_appointment(&store, receipt.appointment_id).await,
        Err(BookingError::InvalidStatusTransition { .. })
    ));
}

// ============================================================================
// Lookup by phone
// ============================================================================

#[tokio::test]
async fn test_upcoming_appointments_skip_past_and_cancelled() {
    let (store, _, _) = seeded_store();
    let early = book_at(&store, 9).await;
    let cancelled = book_at(&store, 12).await;
    let late = book_at(&store, 16).await;
    let later = book_at(&store, 18).await;
    cancel_appointment(&store, cancelled.appointment_id)
        .await
        .unwrap();

    let upcoming = upcoming_appointments(&store, "611 222 333", at(10, 0))
        .await
        .unwrap();

    let ids: Vec<i64> = upcoming.iter().map(|a| a.appointment_id).collect();
    assert_eq!(ids, vec![late.appointment_id, later.appointment_id]);
    assert!(!ids.contains(&early.appointment_id));
}

#[tokio::test]
async fn test_unknown_phone_has_no_appointments() {
    let (store, _, _) = seeded_store();
    book_at(&store, 9).await;

    assert!(
        upcoming_appointments(&store, "699000000", test_now())
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        next_confirmed_appointment(&store, "699000000", test_now()).await,
        Ok(None)
    );
}

#[tokio::test]
async fn test_next_confirmed_skips_other_statuses() {
    let (store, _, _) = seeded_store();
    let first = book_at(&store, 9).await;
    let second = book_at(&store, 11).await;
    mark_no_show(&store, first.appointment_id).await.unwrap();

    let next = next_confirmed_appointment(&store, "611222333", test_now())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(next.appointment_id, second.appointment_id);
}
