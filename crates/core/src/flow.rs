// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step-order enforcement for the booking flow.
//!
//! ## Rules
//!
//! - Forward moves require the target step's precondition to hold
//! - Backward moves are always permitted and never clear session fields
//! - `Confirmed` is entered only through [`StepFlow::complete`], after a
//!   successful commit
//! - An abandoned flow keeps its step and data until resumed or reset

use crate::error::CoreError;
use crate::session::{BookingSession, LastBooking};
use crate::step::Step;
use garage_booking_domain::{validate_client_details, validate_vehicle_details};
use serde::{Deserialize, Serialize};

/// Checks whether `session` satisfies the precondition for entering `step`.
///
/// Preconditions are cumulative: each step requires everything the steps
/// before it require.
///
/// # Errors
///
/// Returns `CoreError::MissingSelection` when a required selection is absent,
/// or `CoreError::Validation` when an entered field breaks its rule.
pub fn check_step_precondition(step: Step, session: &BookingSession) -> Result<(), CoreError> {
    if step == Step::Services {
        return Ok(());
    }
    if session.selected_service.is_none() {
        return Err(CoreError::MissingSelection { field: "service" });
    }
    if step <= Step::DateTime {
        return Ok(());
    }
    if session.selected_date.is_none() {
        return Err(CoreError::MissingSelection { field: "date" });
    }
    if session.selected_time.is_none() {
        return Err(CoreError::MissingSelection { field: "time" });
    }
    if step == Step::ClientInfo {
        return Ok(());
    }
    validate_client_details(&session.client)?;
    if step == Step::VehicleInfo {
        return Ok(());
    }
    validate_vehicle_details(&session.vehicle)?;
    Ok(())
}

/// The booking flow controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepFlow {
    current: Step,
    abandoned: bool,
}

impl StepFlow {
    /// Creates a flow positioned at the first step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current step.
    #[must_use]
    pub const fn current(&self) -> Step {
        self.current
    }

    /// Whether the user navigated away without confirming.
    #[must_use]
    pub const fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Moves to the step after the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no next step or its precondition fails.
    pub fn advance(&mut self, session: &BookingSession) -> Result<Step, CoreError> {
        let next: Step = self.current.next().ok_or(CoreError::IllegalTransition {
            from: self.current,
            to: self.current,
        })?;
        self.advance_to(next, session)
    }

    /// Moves forward to `target`, possibly skipping steps whose data is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is abandoned, `target` is not ahead of the
    /// current step, `target` is `Confirmed`, or the precondition fails.
    pub fn advance_to(
        &mut self,
        target: Step,
        session: &BookingSession,
    ) -> Result<Step, CoreError> {
        if self.abandoned {
            return Err(CoreError::Abandoned);
        }
        if target <= self.current || self.current == Step::Confirmed {
            return Err(CoreError::IllegalTransition {
                from: self.current,
                to: target,
            });
        }
        if target == Step::Confirmed {
            return Err(CoreError::ConfirmationRequiresCommit);
        }
        check_step_precondition(target, session)?;
        self.current = target;
        Ok(target)
    }

    /// Moves back to an earlier (or the current) step.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is abandoned, the booking is already
    /// confirmed, or `target` is ahead of the current step.
    pub fn back_to(&mut self, target: Step) -> Result<Step, CoreError> {
        if self.abandoned {
            return Err(CoreError::Abandoned);
        }
        if target > self.current || self.current == Step::Confirmed {
            return Err(CoreError::IllegalTransition {
                from: self.current,
                to: target,
            });
        }
        self.current = target;
        Ok(target)
    }

    /// Marks the flow abandoned. The step and session data are kept.
    pub const fn abandon(&mut self) {
        if !matches!(self.current, Step::Confirmed) {
            self.abandoned = true;
        }
    }

    /// Resumes an abandoned flow at the step where it was left.
    pub const fn resume(&mut self) -> Step {
        self.abandoned = false;
        self.current
    }

    /// Enters `Confirmed` after a successful commit, clearing the session
    /// and recording `last_booking`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the flow is active at `Summary`.
    pub fn complete(
        &mut self,
        session: &mut BookingSession,
        last_booking: LastBooking,
    ) -> Result<Step, CoreError> {
        if self.abandoned {
            return Err(CoreError::Abandoned);
        }
        if self.current != Step::Summary {
            return Err(CoreError::IllegalTransition {
                from: self.current,
                to: Step::Confirmed,
            });
        }
        session.reset();
        session.last_booking = Some(last_booking);
        self.current = Step::Confirmed;
        Ok(Step::Confirmed)
    }

    /// Returns to the initial empty state.
    pub fn reset(&mut self, session: &mut BookingSession) {
        session.reset();
        self.current = Step::Services;
        self.abandoned = false;
    }
}
