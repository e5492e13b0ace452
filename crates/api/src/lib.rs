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
#![allow(clippy::multiple_crate_versions)]

//! Booking services for the garage booking system.
//!
//! This crate sits between the presentation layer and storage. It reads
//! availability, commits completed sessions, manages existing appointments
//! and sends best-effort notifications, talking to storage only through the
//! [`Catalog`] and [`BookingStore`] traits.

mod appointments;
mod availability;
mod committer;
mod error;
mod notifier;
mod sqlite_store;
mod store;
mod summary;
mod workflow;

#[cfg(test)]
mod tests;

pub use appointments::{
    CancelOutcome, cancel_appointment, complete_appointment, mark_no_show,
    next_confirmed_appointment, upcoming_appointments,
};
pub use availability::AvailabilityService;
pub use committer::{BookingCommitter, BookingReceipt, CommitPolicy, generate_access_code};
pub use error::{BookingError, NotifyError, StoreError};
pub use notifier::{
    BookingNotification, NoopNotifier, Notifier, WebhookNotifier, dispatch_notification,
};
pub use sqlite_store::SqliteStore;
pub use store::{BookingStore, Catalog};
pub use summary::BookingSummary;
pub use workflow::BookingWorkflow;
