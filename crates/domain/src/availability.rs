// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot availability calculation.
//!
//! This module computes the bookable slots for a service over a range of
//! days from:
//! - Business hours (open/close, timezone)
//! - The selected service's duration (slot step size)
//! - The technician choice (specific calendar or shared capacity)
//! - Existing appointments and blocked periods in the range
//!
//! ## Invariants
//!
//! - Slots start at or after opening and end at or before closing
//! - Only Monday-Friday produce slots
//! - Slots starting before `now` are never emitted; a slot at `now` is kept
//! - Cancelled appointments never affect availability
//! - Output is a pure function of the inputs

use crate::business_hours::BusinessHours;
use crate::error::DomainError;
use crate::interval::TimeInterval;
use crate::types::{Appointment, BlockedPeriod, Service, TechnicianChoice};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How many technicians can absorb "any technician" bookings at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechnicianCapacity {
    /// Count read from the technician directory.
    Counted(u32),
    /// The directory could not be read; the configured fallback applies.
    Unknown,
}

impl TechnicianCapacity {
    /// Resolves the capacity, substituting the fallback when unknown.
    #[must_use]
    pub const fn resolve(self, hours: &BusinessHours) -> u32 {
        match self {
            Self::Counted(count) => count,
            Self::Unknown => hours.fallback_capacity(),
        }
    }
}

/// A candidate appointment start evaluated for availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot start (UTC).
    pub start: DateTime<Utc>,
    /// Slot length, equal to the service duration.
    pub duration_minutes: u32,
    /// Whether the slot can be booked.
    pub available: bool,
}

impl Slot {
    /// Returns the half-open interval covered by this slot.
    #[must_use]
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::from_minutes(self.start, self.duration_minutes)
    }
}

/// The slots of one business day, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlots {
    /// The local calendar date.
    pub date: NaiveDate,
    /// Slots for the day.
    pub slots: Vec<Slot>,
}

impl DaySlots {
    /// Returns the available slots only.
    pub fn available(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.available)
    }
}

/// Input to [`compute_slots`].
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery<'a> {
    /// First local date to consider (inclusive).
    pub range_start: NaiveDate,
    /// Last local date to consider (exclusive).
    pub range_end: NaiveDate,
    /// The selected service; its duration is the slot step.
    pub service: &'a Service,
    /// The technician choice.
    pub technician: &'a TechnicianChoice,
    /// Capacity for "any technician" queries.
    pub capacity: TechnicianCapacity,
    /// The query time. Earlier slots are discarded.
    pub now: DateTime<Utc>,
}

/// Lazy sequence of candidate slot starts for one day.
///
/// The sequence is finite and can be restarted by cloning it before iteration.
#[derive(Debug, Clone)]
pub struct CandidateStarts {
    next: DateTime<Utc>,
    close: DateTime<Utc>,
    step: Duration,
}

impl Iterator for CandidateStarts {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.next + self.step;
        if end > self.close {
            return None;
        }
        let start = self.next;
        self.next = end;
        Some(start)
    }
}

/// Generates candidate starts from opening time, stepping by `duration_minutes`,
/// keeping only slots that end at or before closing time.
///
/// # Errors
///
/// Returns an error if the duration is zero or opening/closing cannot be
/// resolved in the garage timezone on `date`.
pub fn candidate_starts(
    hours: &BusinessHours,
    date: NaiveDate,
    duration_minutes: u32,
) -> Result<CandidateStarts, DomainError> {
    if duration_minutes == 0 {
        return Err(DomainError::InvalidServiceDuration {
            minutes: duration_minutes,
        });
    }
    Ok(CandidateStarts {
        next: hours.local_instant(date, hours.open())?,
        close: hours.local_instant(date, hours.close())?,
        step: Duration::minutes(i64::from(duration_minutes)),
    })
}

/// Whether `start` is one of the starts [`candidate_starts`] generates for a
/// service of `duration_minutes` on its local business day.
#[must_use]
pub fn is_candidate_start(
    hours: &BusinessHours,
    start: DateTime<Utc>,
    duration_minutes: u32,
) -> bool {
    if !hours.contains_slot(start, duration_minutes) {
        return false;
    }
    let (date, _) = hours.to_local(start);
    candidate_starts(hours, date, duration_minutes)
        .is_ok_and(|mut starts| starts.any(|candidate| candidate == start))
}

/// Computes the slots for each business day in `[range_start, range_end)`.
///
/// # Arguments
///
/// * `hours` - Business hours configuration
/// * `query` - Range, service, technician choice, capacity and query time
/// * `appointments` - Existing appointments overlapping the range
/// * `blocks` - Blocked periods overlapping the range
///
/// # Returns
///
/// One `DaySlots` per business day in ascending date order. Slots before
/// `query.now` are omitted.
///
/// # Errors
///
/// Returns an error if the service duration is zero or a day's opening hours
/// cannot be resolved in the garage timezone.
pub fn compute_slots(
    hours: &BusinessHours,
    query: &SlotQuery<'_>,
    appointments: &[Appointment],
    blocks: &[BlockedPeriod],
) -> Result<Vec<DaySlots>, DomainError> {
    let duration_minutes: u32 = query.service.duration_minutes();
    let capacity: u32 = query.capacity.resolve(hours);
    let mut days: Vec<DaySlots> = Vec::new();

    let mut date: NaiveDate = query.range_start;
    while date < query.range_end {
        if BusinessHours::is_business_day(date.weekday()) {
            let slots: Vec<Slot> = candidate_starts(hours, date, duration_minutes)?
                .filter(|start| *start >= query.now)
                .map(|start| {
                    let interval = TimeInterval::from_minutes(start, duration_minutes);
                    Slot {
                        start,
                        duration_minutes,
                        available: slot_is_free(
                            &interval,
                            query.technician,
                            capacity,
                            appointments,
                            blocks,
                        ),
                    }
                })
                .collect();
            days.push(DaySlots { date, slots });
        }

        date = date
            .succ_opt()
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("advancing past {date}"),
            })?;
    }

    Ok(days)
}

/// Decides whether `interval` can be booked for `technician`.
///
/// - Specific technician: free iff no non-cancelled appointment assigned to
///   that technician overlaps, and no block for that technician or the whole
///   garage overlaps.
/// - Any technician: free iff the busy technicians (blocked or holding an
///   overlapping assigned appointment, each counted once) plus the
///   overlapping unassigned appointments stay below `capacity`. A garage-wide
///   block always makes the slot unavailable.
#[must_use]
pub fn slot_is_free(
    interval: &TimeInterval,
    technician: &TechnicianChoice,
    capacity: u32,
    appointments: &[Appointment],
    blocks: &[BlockedPeriod],
) -> bool {
    let mut overlapping_blocks = blocks
        .iter()
        .filter(|block| block.interval().overlaps(interval));
    let mut overlapping_appointments = appointments
        .iter()
        .filter(|appt| appt.status.occupies_calendar() && appt.interval().overlaps(interval));

    match technician {
        TechnicianChoice::Specific(tech) => {
            let blocked = overlapping_blocks
                .any(|block| block.technician_id.is_none_or(|id| id == tech.technician_id));
            if blocked {
                return false;
            }
            !overlapping_appointments.any(|appt| appt.technician_id == Some(tech.technician_id))
        }
        TechnicianChoice::Any => {
            let mut busy_technicians: HashSet<i64> = HashSet::new();
            for block in overlapping_blocks {
                match block.technician_id {
                    None => return false,
                    Some(id) => {
                        busy_technicians.insert(id);
                    }
                }
            }
            let mut unassigned: usize = 0;
            for appt in overlapping_appointments {
                match appt.technician_id {
                    Some(id) => {
                        busy_technicians.insert(id);
                    }
                    None => unassigned += 1,
                }
            }
            let occupied: usize = busy_technicians.len().saturating_add(unassigned);
            u32::try_from(occupied).is_ok_and(|occupied| occupied < capacity)
        }
    }
}

/// Parses a `HH:MM` slot label.
///
/// # Errors
///
/// Returns an error if the string is not a valid 24-hour time.
pub fn parse_time_slot(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| DomainError::InvalidTimeSlot(value.to_string()))
}

/// Formats a slot time as `HH:MM`.
#[must_use]
pub fn format_time_slot(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
