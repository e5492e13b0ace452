// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A step of the booking flow, in visiting order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Services,
    Technician,
    DateTime,
    ClientInfo,
    VehicleInfo,
    Summary,
    Confirmed,
}

impl Step {
    /// All steps in visiting order.
    pub const ORDER: [Self; 7] = [
        Self::Services,
        Self::Technician,
        Self::DateTime,
        Self::ClientInfo,
        Self::VehicleInfo,
        Self::Summary,
        Self::Confirmed,
    ];

    /// Returns the step's position in the flow.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the following step, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Returns the preceding step, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|index| Self::ORDER.get(index).copied())
    }

    /// Returns the stable name of this step.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Technician => "technician",
            Self::DateTime => "date_time",
            Self::ClientInfo => "client_info",
            Self::VehicleInfo => "vehicle_info",
            Self::Summary => "summary",
            Self::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
