// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `catalog`: services and technicians
//! - `clients`: client and vehicle lookups by natural key
//! - `calendar`: appointments and blocked periods

pub mod calendar;
pub mod catalog;
pub mod clients;
