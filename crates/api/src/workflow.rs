// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One user's booking attempt, end to end.
//!
//! `BookingWorkflow` owns the draft session and the step flow, saves the
//! draft after every change and commits it at the summary step. A slot
//! conflict on commit sends the user back to date/time selection with the
//! stale slot cleared; any other failure leaves the draft as it was.

use crate::committer::{BookingCommitter, BookingReceipt};
use crate::error::BookingError;
use crate::summary::BookingSummary;
use chrono::{DateTime, Utc};
use garage_booking::{
    BookingSession, CoreError, SessionStore, Step, StepFlow, check_step_precondition,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Drives a booking session through its steps.
pub struct BookingWorkflow<S: SessionStore> {
    flow: StepFlow,
    session: BookingSession,
    drafts: S,
    committer: Arc<BookingCommitter>,
}

impl<S: SessionStore> BookingWorkflow<S> {
    /// Starts a workflow, resuming the stored draft when there is one.
    ///
    /// A resumed draft is positioned at the furthest step its data allows. An
    /// unreadable draft is discarded and the workflow starts empty.
    pub fn start(drafts: S, committer: Arc<BookingCommitter>) -> Self {
        let session: BookingSession = match drafts.load() {
            Ok(Some(session)) => session,
            Ok(None) => BookingSession::new(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable booking draft");
                if let Err(e) = drafts.clear() {
                    warn!(error = %e, "Failed to clear booking draft");
                }
                BookingSession::new()
            }
        };

        let mut flow = StepFlow::new();
        let resume_at: Option<Step> = Step::ORDER
            .iter()
            .rev()
            .copied()
            .filter(|step| *step > Step::Services && *step < Step::Confirmed)
            .find(|step| check_step_precondition(*step, &session).is_ok());
        if let Some(step) = resume_at
            && flow.advance_to(step, &session).is_ok()
        {
            info!(step = %step, "Resumed booking draft");
        }

        Self {
            flow,
            session,
            drafts,
            committer,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &BookingSession {
        &self.session
    }

    #[must_use]
    pub const fn flow(&self) -> &StepFlow {
        &self.flow
    }

    /// Applies `change` to the draft and saves it.
    pub fn edit<F>(&mut self, change: F)
    where
        F: FnOnce(&mut BookingSession),
    {
        change(&mut self.session);
        self.save_draft();
    }

    /// Moves to the next step.
    ///
    /// # Errors
    ///
    /// Returns `Validation` or `Flow` if the next step's precondition fails.
    pub fn advance(&mut self) -> Result<Step, BookingError> {
        let step: Step = self.flow.advance(&self.session)?;
        self.save_draft();
        Ok(step)
    }

    /// Moves forward to `target`, skipping steps whose data is present.
    ///
    /// # Errors
    ///
    /// Returns `Validation` or `Flow` if the move is not permitted.
    pub fn advance_to(&mut self, target: Step) -> Result<Step, BookingError> {
        let step: Step = self.flow.advance_to(target, &self.session)?;
        self.save_draft();
        Ok(step)
    }

    /// Moves back to an earlier step without clearing any field.
    ///
    /// # Errors
    ///
    /// Returns `Flow` if the flow is abandoned, confirmed, or `target` is ahead.
    pub fn back_to(&mut self, target: Step) -> Result<Step, BookingError> {
        Ok(self.flow.back_to(target)?)
    }

    /// Builds the summary for the current selections.
    ///
    /// # Errors
    ///
    /// Returns `Flow` if the service or slot has not been selected.
    pub fn summary(&self) -> Result<BookingSummary, BookingError> {
        Ok(BookingSummary::from_session(&self.session)?)
    }

    /// Commits the draft from the summary step.
    ///
    /// On success the session is cleared, the last booking is recorded and
    /// the flow moves to `Confirmed`.
    ///
    /// # Errors
    ///
    /// Returns `Flow` unless the flow is active at `Summary`, `SlotConflict`
    /// (after routing back to `DateTime`) when the slot was taken, or any
    /// commit error with the draft preserved.
    pub async fn confirm(&mut self, now: DateTime<Utc>) -> Result<BookingReceipt, BookingError> {
        if self.flow.is_abandoned() {
            return Err(CoreError::Abandoned.into());
        }
        if self.flow.current() != Step::Summary {
            return Err(CoreError::IllegalTransition {
                from: self.flow.current(),
                to: Step::Confirmed,
            }
            .into());
        }

        match self.committer.commit(&self.session, now).await {
            Ok(receipt) => {
                let last_booking = receipt.last_booking(self.committer.hours());
                self.flow.complete(&mut self.session, last_booking)?;
                if let Err(e) = self.drafts.clear() {
                    warn!(error = %e, "Failed to clear booking draft");
                }
                Ok(receipt)
            }
            Err(err @ BookingError::SlotConflict { .. }) => {
                self.flow.back_to(Step::DateTime)?;
                self.session.clear_slot();
                self.save_draft();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Leaves the flow without confirming. The draft is kept for resumption.
    pub fn abandon(&mut self) {
        self.flow.abandon();
        self.save_draft();
    }

    /// Resumes an abandoned flow where it was left.
    pub const fn resume(&mut self) -> Step {
        self.flow.resume()
    }

    /// Discards the draft and returns to the first step.
    pub fn reset(&mut self) {
        self.flow.reset(&mut self.session);
        if let Err(e) = self.drafts.clear() {
            warn!(error = %e, "Failed to clear booking draft");
        }
    }

    fn save_draft(&self) {
        if let Err(e) = self.drafts.save(&self.session) {
            warn!(error = %e, "Failed to save booking draft");
        }
    }
}
