// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `catalog`: reference data inserts (services, technicians, blocks)
//! - `clients`: client and vehicle create/update
//! - `calendar`: appointment inserts and status changes

pub mod calendar;
pub mod catalog;
pub mod clients;
