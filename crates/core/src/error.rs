// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::step::Step;
use garage_booking_domain::DomainError;

/// Errors raised while moving a booking session through its steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A field rule was violated.
    Validation(DomainError),
    /// A selection required by the target step has not been made.
    MissingSelection {
        /// The missing field.
        field: &'static str,
    },
    /// The requested step change is not permitted from the current step.
    IllegalTransition {
        /// The current step.
        from: Step,
        /// The requested step.
        to: Step,
    },
    /// The confirmed step is reached only through a successful commit.
    ConfirmationRequiresCommit,
    /// The flow was abandoned and must be resumed first.
    Abandoned,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Validation failed: {err}"),
            Self::MissingSelection { field } => write!(f, "No {field} has been selected"),
            Self::IllegalTransition { from, to } => {
                write!(f, "Cannot move from step {from} to step {to}")
            }
            Self::ConfirmationRequiresCommit => {
                write!(f, "A booking is confirmed only by committing it")
            }
            Self::Abandoned => write!(f, "The booking was abandoned and must be resumed"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}

/// Errors raised by a [`crate::SessionStore`].
#[derive(Debug)]
pub enum SessionStoreError {
    /// Reading or writing the backing file failed.
    Io(std::io::Error),
    /// The stored draft could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// The stored draft was written by an incompatible schema version.
    SchemaMismatch {
        /// Version found in storage.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
    /// The in-memory store's lock was poisoned by a panicking writer.
    Poisoned,
}

impl std::fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "Session storage I/O error: {err}"),
            Self::Serialization(err) => write!(f, "Session serialization error: {err}"),
            Self::SchemaMismatch { found, expected } => write!(
                f,
                "Stored session has schema version {found}, expected {expected}"
            ),
            Self::Poisoned => write!(f, "Session store lock poisoned"),
        }
    }
}

impl std::error::Error for SessionStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::SchemaMismatch { .. } | Self::Poisoned => None,
        }
    }
}

impl From<std::io::Error> for SessionStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SessionStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}
