// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator state and counters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the polling loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CoordinatorState {
    /// Waiting for the next tick.
    Idle,
    /// A fetch is in flight.
    Fetching,
    /// The last fetch was rejected with HTTP 401/403.
    ///
    /// Polling continues; the state clears on the next successful fetch.
    AuthFailed,
    /// The coordinator has been shut down.
    Stopped,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::AuthFailed => "auth_failed",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Counters of the polling loop since start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoordinatorStats {
    /// Fetches that replaced the snapshot, including the initial one.
    pub successful: u64,
    /// Fetches that failed, leaving the snapshot unchanged.
    pub failed: u64,
    /// Timer ticks skipped because a fetch was already in flight.
    pub skipped: u64,
    /// Completion time of the last successful fetch.
    pub last_success: Option<DateTime<Utc>>,
}
