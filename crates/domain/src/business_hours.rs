// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Garage opening hours.
//!
//! ## Invariants
//!
//! - Business days are Monday-Friday
//! - Opening and closing times are wall-clock times in the declared timezone
//! - `open < close` and the default slot duration is positive

use crate::error::DomainError;
use crate::types::DEFAULT_APPOINTMENT_MINUTES;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Capacity assumed when the technician directory cannot be read.
pub const FALLBACK_TECHNICIAN_CAPACITY: u32 = 3;

/// Default garage timezone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Madrid;

/// Opening hours and slot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    timezone: Tz,
    open: NaiveTime,
    close: NaiveTime,
    default_slot_minutes: u32,
    fallback_capacity: u32,
}

impl BusinessHours {
    /// Creates validated business hours.
    ///
    /// # Arguments
    ///
    /// * `timezone` - The garage timezone
    /// * `open` - Opening time (first possible slot start)
    /// * `close` - Closing time (every slot must end at or before it)
    /// * `default_slot_minutes` - Slot step when no service duration is known
    /// * `fallback_capacity` - Capacity used when technicians cannot be counted
    ///
    /// # Errors
    ///
    /// Returns an error if `open` is not before `close` or the slot duration is zero.
    pub fn new(
        timezone: Tz,
        open: NaiveTime,
        close: NaiveTime,
        default_slot_minutes: u32,
        fallback_capacity: u32,
    ) -> Result<Self, DomainError> {
        if open >= close {
            return Err(DomainError::InvalidBusinessHours {
                reason: format!("opening time {open} must be before closing time {close}"),
            });
        }
        if default_slot_minutes == 0 {
            return Err(DomainError::InvalidBusinessHours {
                reason: String::from("default slot duration must be greater than 0"),
            });
        }
        Ok(Self {
            timezone,
            open,
            close,
            default_slot_minutes,
            fallback_capacity,
        })
    }

    /// Parses a timezone name such as `Europe/Madrid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA timezone.
    pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
        name.parse()
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub const fn open(&self) -> NaiveTime {
        self.open
    }

    #[must_use]
    pub const fn close(&self) -> NaiveTime {
        self.close
    }

    #[must_use]
    pub const fn default_slot_minutes(&self) -> u32 {
        self.default_slot_minutes
    }

    #[must_use]
    pub const fn fallback_capacity(&self) -> u32 {
        self.fallback_capacity
    }

    /// Whether the garage opens on this weekday.
    #[must_use]
    pub const fn is_business_day(weekday: Weekday) -> bool {
        !matches!(weekday, Weekday::Sat | Weekday::Sun)
    }

    /// Resolves a garage wall-clock time to a UTC instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the local time falls in a DST gap or overlap.
    pub fn local_instant(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<DateTime<Utc>, DomainError> {
        self.timezone
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or(DomainError::UnresolvableLocalTime { date, time })
    }

    /// Converts a UTC instant to the garage's local date and time.
    #[must_use]
    pub fn to_local(&self, instant: DateTime<Utc>) -> (NaiveDate, NaiveTime) {
        let local = instant.with_timezone(&self.timezone).naive_local();
        (local.date(), local.time())
    }

    /// Whether a slot starting at `start` and lasting `minutes` lies inside
    /// opening hours on a business day.
    #[must_use]
    pub fn contains_slot(&self, start: DateTime<Utc>, minutes: u32) -> bool {
        let (date, time) = self.to_local(start);
        if !Self::is_business_day(date.weekday()) || time < self.open {
            return false;
        }
        let Ok(close) = self.local_instant(date, self.close) else {
            return false;
        };
        start + Duration::minutes(i64::from(minutes)) <= close
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN),
            default_slot_minutes: DEFAULT_APPOINTMENT_MINUTES,
            fallback_capacity: FALLBACK_TECHNICIAN_CAPACITY,
        }
    }
}
