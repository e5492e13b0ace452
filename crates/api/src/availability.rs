// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability reads for the date/time step.

use crate::error::BookingError;
use crate::store::{BookingStore, Catalog};
use chrono::{DateTime, NaiveDate, Utc};
use garage_booking_domain::{
    Appointment, BlockedPeriod, BusinessHours, DaySlots, Service, SlotQuery, TechnicianCapacity,
    TechnicianChoice, compute_slots,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads the calendar for a date range and computes its slots.
pub struct AvailabilityService {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn BookingStore>,
    hours: BusinessHours,
}

impl AvailabilityService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn BookingStore>,
        hours: BusinessHours,
    ) -> Self {
        Self {
            catalog,
            store,
            hours,
        }
    }

    #[must_use]
    pub const fn hours(&self) -> &BusinessHours {
        &self.hours
    }

    /// Counts active technicians for "any technician" queries.
    ///
    /// A failed directory read degrades to [`TechnicianCapacity::Unknown`],
    /// which resolves to the configured fallback.
    pub async fn technician_capacity(&self) -> TechnicianCapacity {
        match self.catalog.list_active_technicians().await {
            Ok(technicians) => {
                TechnicianCapacity::Counted(u32::try_from(technicians.len()).unwrap_or(u32::MAX))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    fallback = self.hours.fallback_capacity(),
                    "Technician directory unavailable, using fallback capacity"
                );
                TechnicianCapacity::Unknown
            }
        }
    }

    /// Computes the slots for `service` on each business day in
    /// `[range_start, range_end)`.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::LookupFailure` if the calendar cannot be read,
    /// or `BookingError::Validation` if the service duration is zero or the
    /// opening time cannot be resolved in the garage timezone.
    pub async fn available_slots(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
        service: &Service,
        technician: &TechnicianChoice,
        now: DateTime<Utc>,
    ) -> Result<Vec<DaySlots>, BookingError> {
        let capacity: TechnicianCapacity = match technician {
            TechnicianChoice::Specific(_) => TechnicianCapacity::Counted(0),
            TechnicianChoice::Any => self.technician_capacity().await,
        };

        let (appointments, blocks): (Vec<Appointment>, Vec<BlockedPeriod>) =
            if range_start < range_end {
                let read_start: DateTime<Utc> =
                    self.hours.local_instant(range_start, self.hours.open())?;
                let read_end: DateTime<Utc> =
                    self.hours.local_instant(range_end, self.hours.open())?;
                let technician_id: Option<i64> = technician.technician_id();
                let appointments = self
                    .store
                    .list_appointments(read_start, read_end, technician_id)
                    .await
                    .map_err(BookingError::LookupFailure)?;
                let blocks = self
                    .store
                    .list_blocked_periods(read_start, read_end, technician_id)
                    .await
                    .map_err(BookingError::LookupFailure)?;
                (appointments, blocks)
            } else {
                (Vec::new(), Vec::new())
            };

        let query = SlotQuery {
            range_start,
            range_end,
            service,
            technician,
            capacity,
            now,
        };
        let days: Vec<DaySlots> = compute_slots(&self.hours, &query, &appointments, &blocks)?;

        debug!(
            %range_start,
            %range_end,
            technician = technician.label(),
            appointments = appointments.len(),
            days = days.len(),
            "Computed availability"
        );
        Ok(days)
    }
}
