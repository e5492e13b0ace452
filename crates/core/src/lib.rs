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

mod error;
mod flow;
mod session;
mod session_store;
mod step;

#[cfg(test)]
mod tests;

pub use error::{CoreError, SessionStoreError};
pub use flow::{StepFlow, check_step_precondition};
pub use session::{BookingSession, LastBooking};
pub use session_store::{
    FileSessionStore, MemorySessionStore, SESSION_SCHEMA_VERSION, SessionSnapshot, SessionStore,
};
pub use step::Step;
