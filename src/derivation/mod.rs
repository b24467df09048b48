// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display values derived from a [`Snapshot`].
//!
//! Every function here is pure and total: a missing resource, a payload of
//! the wrong shape, an element of the wrong type or a number that does not
//! parse all yield `None` (or the documented default) instead of an error,
//! since any resource may legitimately be an empty placeholder.
//!
//! Values are addressed by a [`DerivedKey`], whose string form is a stable
//! identifier hosts can persist.
//!
//! | Key | Source | Unknown when |
//! |-----|--------|--------------|
//! | `phone_state` | `poll_status.State`, else `call_status.State` | never (`"Idle"`) |
//! | `last_call_time` | `poll_status.StateData` after `"Time of last call"` | no marker, bad timestamp |
//! | `call_duration` | `poll_status.StateData` mentioning a duration | otherwise |
//! | `phone_error` | `poll_status.StateData` mentioning an error | otherwise |
//! | `cpu_usage` | `device_stats.CPU.Current` or `.Usage` | non-numeric |
//! | `memory_usage` | `device_stats.Memory` used / total | total <= 0 |
//! | `memory_total` | `device_stats.Memory.Total` in MB | non-numeric |
//! | `last_called_number` | `session_stats.LastCalledNumber` | absent |
//! | `sip_connection` | first call server's `Working` | never (`Unknown`) |
//! | `uptime` | `device_info.UpTime` subtracted from now | total <= 0, non-numeric |
//! | `dnd_status` | first line's `DoNotDisturb` | no line |
//! | `mute_status` | `communication_info.PhoneMuteState` | absent or not a flag |
//! | `line_registered` | first line's `RegistrationStatus` | no line |
//! | `line_active` | first line's `Active` | no line |
//! | `dnd_enabled` | `dnd_status.enabled` | absent |
//! | `volume` | `volume.volume` | non-numeric |
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use polycom_lib::derivation::{self, DerivedKey, DerivedValue};
//! use polycom_lib::snapshot::{ResourceKey, Snapshot};
//! use serde_json::json;
//!
//! let snapshot = Snapshot::from_payloads([(
//!     ResourceKey::DeviceStats,
//!     json!({"Memory": {"Total": "1000", "Free": "400"}}),
//! )]);
//!
//! let value = derivation::derive(DerivedKey::MemoryUsage, &snapshot, &Utc::now());
//! assert_eq!(value, Some(DerivedValue::Float(60.0)));
//!
//! let key: DerivedKey = "cpu_usage".parse().unwrap();
//! assert_eq!(derivation::derive(key, &snapshot, &Utc::now()), None);
//! ```

mod call;
mod controls;
mod line;
mod system;

pub use call::{
    call_duration, last_call_time, last_called_number, mute_status, phone_error, phone_state,
};
pub use controls::{dnd_enabled, volume};
pub use line::{dnd_status, line_active, line_registered, sip_connection};
pub use system::{cpu_usage, memory_total, memory_usage, uptime};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;

use crate::error::ValueError;
use crate::snapshot::Snapshot;

// ============================================================================
// DerivedKey
// ============================================================================

/// Stable identifier of a derived value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedKey {
    /// Current phone state, e.g. `"Idle"`.
    PhoneState,
    /// Time of the last call.
    LastCallTime,
    /// Duration text of the active call.
    CallDuration,
    /// Error text reported by the phone.
    PhoneError,
    /// CPU usage in percent.
    CpuUsage,
    /// Memory usage in percent.
    MemoryUsage,
    /// Total memory in megabytes.
    MemoryTotal,
    /// Last dialed number.
    LastCalledNumber,
    /// SIP call server connection.
    SipConnection,
    /// Time the phone booted.
    Uptime,
    /// Do-not-disturb as reported by the first line.
    DndStatus,
    /// Microphone mute.
    MuteStatus,
    /// First line registered with its SIP server.
    LineRegistered,
    /// First line in use.
    LineActive,
    /// Do-not-disturb setting, for toggles.
    DndEnabled,
    /// Speaker volume, for numeric controls.
    Volume,
}

impl DerivedKey {
    /// Every key.
    pub const ALL: [Self; 16] = [
        Self::PhoneState,
        Self::LastCallTime,
        Self::CallDuration,
        Self::PhoneError,
        Self::CpuUsage,
        Self::MemoryUsage,
        Self::MemoryTotal,
        Self::LastCalledNumber,
        Self::SipConnection,
        Self::Uptime,
        Self::DndStatus,
        Self::MuteStatus,
        Self::LineRegistered,
        Self::LineActive,
        Self::DndEnabled,
        Self::Volume,
    ];

    /// Returns the stable identifier, e.g. `"cpu_usage"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhoneState => "phone_state",
            Self::LastCallTime => "last_call_time",
            Self::CallDuration => "call_duration",
            Self::PhoneError => "phone_error",
            Self::CpuUsage => "cpu_usage",
            Self::MemoryUsage => "memory_usage",
            Self::MemoryTotal => "memory_total",
            Self::LastCalledNumber => "last_called_number",
            Self::SipConnection => "sip_connection",
            Self::Uptime => "uptime",
            Self::DndStatus => "dnd_status",
            Self::MuteStatus => "mute_status",
            Self::LineRegistered => "line_registered",
            Self::LineActive => "line_active",
            Self::DndEnabled => "dnd_enabled",
            Self::Volume => "volume",
        }
    }
}

impl fmt::Display for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DerivedKey {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValueError::UnknownKey(s.to_string()))
    }
}

// ============================================================================
// DerivedValue
// ============================================================================

/// State of the SIP call server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectionStatus {
    /// The first call server reports `Working: "True"`.
    Connected,
    /// The first call server reports anything else.
    Disconnected,
    /// No line or no call server is listed.
    Unknown,
}

impl ConnectionStatus {
    /// Returns the display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, display-ready value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DerivedValue {
    /// A flag.
    Bool(bool),
    /// An integral quantity.
    Int(i64),
    /// A measurement, rounded where documented.
    Float(f64),
    /// Free text.
    Text(String),
    /// A point in time.
    Timestamp(DateTime<FixedOffset>),
    /// A connection state.
    Connection(ConnectionStatus),
}

impl fmt::Display for DerivedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
            Self::Connection(status) => write!(f, "{status}"),
        }
    }
}

/// Computes the value for `key`.
///
/// `now` anchors time-relative values (the boot time) and its time zone is
/// used to localize device timestamps that carry no offset.
pub fn derive<Tz: TimeZone>(
    key: DerivedKey,
    snapshot: &Snapshot,
    now: &DateTime<Tz>,
) -> Option<DerivedValue> {
    match key {
        DerivedKey::PhoneState => Some(DerivedValue::Text(phone_state(snapshot))),
        DerivedKey::LastCallTime => {
            last_call_time(snapshot, &now.timezone()).map(DerivedValue::Timestamp)
        }
        DerivedKey::CallDuration => call_duration(snapshot).map(DerivedValue::Text),
        DerivedKey::PhoneError => phone_error(snapshot).map(DerivedValue::Text),
        DerivedKey::CpuUsage => cpu_usage(snapshot).map(DerivedValue::Float),
        DerivedKey::MemoryUsage => memory_usage(snapshot).map(DerivedValue::Float),
        DerivedKey::MemoryTotal => memory_total(snapshot).map(DerivedValue::Float),
        DerivedKey::LastCalledNumber => last_called_number(snapshot).map(DerivedValue::Text),
        DerivedKey::SipConnection => Some(DerivedValue::Connection(sip_connection(snapshot))),
        DerivedKey::Uptime => uptime(snapshot, now).map(DerivedValue::Timestamp),
        DerivedKey::DndStatus => dnd_status(snapshot).map(DerivedValue::Bool),
        DerivedKey::MuteStatus => mute_status(snapshot).map(DerivedValue::Bool),
        DerivedKey::LineRegistered => line_registered(snapshot).map(DerivedValue::Bool),
        DerivedKey::LineActive => line_active(snapshot).map(DerivedValue::Bool),
        DerivedKey::DndEnabled => dnd_enabled(snapshot).map(DerivedValue::Bool),
        DerivedKey::Volume => volume(snapshot).map(DerivedValue::Int),
    }
}

/// Rounds to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
