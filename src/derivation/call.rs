// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Call-related values: phone state, last call, mute.

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::json;
use crate::snapshot::{ResourceKey, Snapshot};
use crate::types::{DeviceTimestamp, LAST_CALL_MARKER};

const DEFAULT_PHONE_STATE: &str = "Idle";

fn state_of(snapshot: &Snapshot, key: ResourceKey) -> Option<&str> {
    json::field(snapshot.get(key), "State").and_then(json::as_str)
}

/// Free-text `StateData` of `poll_status`, if non-empty.
fn state_data(snapshot: &Snapshot) -> Option<&str> {
    json::field(snapshot.get(ResourceKey::PollStatus), "StateData").and_then(json::as_str)
}

/// Current phone state.
///
/// Prefers `poll_status.State`, falls back to `call_status.State` for
/// firmware without the poll endpoint, and defaults to `"Idle"`.
#[must_use]
pub fn phone_state(snapshot: &Snapshot) -> String {
    state_of(snapshot, ResourceKey::PollStatus)
        .or_else(|| state_of(snapshot, ResourceKey::CallStatus))
        .unwrap_or(DEFAULT_PHONE_STATE)
        .to_string()
}

/// Time of the last call, parsed from `poll_status.StateData`.
///
/// A timestamp without offset is taken as wall-clock time in `tz`.
#[must_use]
pub fn last_call_time<Tz: TimeZone>(snapshot: &Snapshot, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    DeviceTimestamp::after_marker(state_data(snapshot)?, LAST_CALL_MARKER)?.localize(tz)
}

/// Duration text of the active call, when the state data mentions one.
#[must_use]
pub fn call_duration(snapshot: &Snapshot) -> Option<String> {
    state_data(snapshot)
        .filter(|data| data.to_lowercase().contains("duration"))
        .map(str::to_string)
}

/// Error text, when the state data reports an error or a failure.
#[must_use]
pub fn phone_error(snapshot: &Snapshot) -> Option<String> {
    state_data(snapshot)
        .filter(|data| {
            let lower = data.to_lowercase();
            lower.contains("error") || lower.contains("fail")
        })
        .map(str::to_string)
}

/// Last dialed number from `session_stats`.
#[must_use]
pub fn last_called_number(snapshot: &Snapshot) -> Option<String> {
    match json::field(snapshot.get(ResourceKey::SessionStats), "LastCalledNumber")? {
        serde_json::Value::Number(n) => Some(n.to_string()),
        other => json::as_str(other).map(str::to_string),
    }
}

/// Microphone mute from `communication_info.PhoneMuteState`.
///
/// Only an explicit `"True"` or `"False"` yields a value.
#[must_use]
pub fn mute_status(snapshot: &Snapshot) -> Option<bool> {
    json::field(snapshot.get(ResourceKey::CommunicationInfo), "PhoneMuteState")
        .and_then(json::as_flag)
}
