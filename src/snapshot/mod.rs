// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshots of raw device state.
//!
//! A [`Snapshot`] maps every [`ResourceKey`] to the payload fetched for it in
//! one composite fetch. Resources that could not be fetched hold an empty
//! placeholder (`{}` or `[]`, see [`PayloadShape`]) so consumers always see
//! the same set of keys.
//!
//! Snapshots are immutable. The polling coordinator publishes a new
//! `Arc<Snapshot>` for every successful fetch instead of editing the current
//! one, so a reader holding a snapshot never sees it change.
//!
//! # Examples
//!
//! ```
//! use polycom_lib::snapshot::{ResourceKey, Snapshot};
//! use serde_json::json;
//!
//! let snapshot = Snapshot::from_payloads([
//!     (ResourceKey::Volume, json!({"volume": 40})),
//! ]);
//!
//! assert_eq!(snapshot.get(ResourceKey::Volume), &json!({"volume": 40}));
//! // Resources without a payload hold a placeholder
//! assert_eq!(snapshot.get(ResourceKey::LineInfo), &json!([]));
//! ```

mod identity;

pub use identity::DeviceIdentity;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, ValueError};

static NULL: Value = Value::Null;

// ============================================================================
// ResourceKey
// ============================================================================

/// One independently fetchable piece of device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKey {
    /// `mgmt/device/info`: vendor, model, firmware, uptime.
    DeviceInfo,
    /// `mgmt/network/info`: MAC address and addressing.
    NetworkInfo,
    /// `webCallControl/callStatus`: call state on older firmware.
    CallStatus,
    /// `mgmt/pollForStatus`: phone state and free-text state data.
    PollStatus,
    /// `mgmt/doNotDisturb`: do-not-disturb setting.
    DndStatus,
    /// `mgmt/audio/volume`: speaker volume.
    Volume,
    /// `mgmt/device/stats`: CPU and memory usage.
    DeviceStats,
    /// `mgmt/lineInfo`: SIP line registrations.
    LineInfo,
    /// `mgmt/media/sessionStats`: media session statistics.
    SessionStats,
    /// `webCallControl/communicationInfo`: mute state.
    CommunicationInfo,
}

impl ResourceKey {
    /// Every resource, in fetch order.
    pub const ALL: [Self; 10] = [
        Self::DeviceInfo,
        Self::NetworkInfo,
        Self::CallStatus,
        Self::PollStatus,
        Self::DndStatus,
        Self::Volume,
        Self::DeviceStats,
        Self::LineInfo,
        Self::SessionStats,
        Self::CommunicationInfo,
    ];

    /// Returns the stable identifier, e.g. `"device_stats"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceInfo => "device_info",
            Self::NetworkInfo => "network_info",
            Self::CallStatus => "call_status",
            Self::PollStatus => "poll_status",
            Self::DndStatus => "dnd_status",
            Self::Volume => "volume",
            Self::DeviceStats => "device_stats",
            Self::LineInfo => "line_info",
            Self::SessionStats => "session_stats",
            Self::CommunicationInfo => "communication_info",
        }
    }

    /// Returns the API path, relative to `/api/v1`.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::DeviceInfo => "mgmt/device/info",
            Self::NetworkInfo => "mgmt/network/info",
            Self::CallStatus => "webCallControl/callStatus",
            Self::PollStatus => "mgmt/pollForStatus",
            Self::DndStatus => "mgmt/doNotDisturb",
            Self::Volume => "mgmt/audio/volume",
            Self::DeviceStats => "mgmt/device/stats",
            Self::LineInfo => "mgmt/lineInfo",
            Self::SessionStats => "mgmt/media/sessionStats",
            Self::CommunicationInfo => "webCallControl/communicationInfo",
        }
    }

    /// Returns the shape of the placeholder used when the fetch fails.
    #[must_use]
    pub const fn shape(&self) -> PayloadShape {
        match self {
            Self::LineInfo => PayloadShape::Array,
            _ => PayloadShape::Object,
        }
    }

    /// Returns `true` for resources whose failure fails the whole fetch.
    ///
    /// Device and network info establish the device identity, so they are
    /// never replaced by placeholders.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::DeviceInfo | Self::NetworkInfo)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKey {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValueError::UnknownKey(s.to_string()))
    }
}

// ============================================================================
// PayloadShape / EndpointResult
// ============================================================================

/// Top-level JSON shape of a resource payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// A JSON object; placeholder `{}`.
    Object,
    /// A JSON array; placeholder `[]`.
    Array,
}

impl PayloadShape {
    /// Returns the empty value of this shape.
    #[must_use]
    pub fn placeholder(&self) -> Value {
        match self {
            Self::Object => Value::Object(serde_json::Map::new()),
            Self::Array => Value::Array(Vec::new()),
        }
    }
}

/// Outcome of fetching one sub-resource.
#[derive(Debug)]
pub enum EndpointResult {
    /// The unwrapped payload.
    Ok(Value),
    /// The fetch failed; the error is kept for diagnostics only.
    Failed(Error),
}

impl EndpointResult {
    /// Returns `true` if the fetch succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns the payload, or the placeholder for `shape` on failure.
    #[must_use]
    pub fn into_payload(self, shape: PayloadShape) -> Value {
        match self {
            Self::Ok(value) => value,
            Self::Failed(_) => shape.placeholder(),
        }
    }
}

impl From<Result<Value, Error>> for EndpointResult {
    fn from(result: Result<Value, Error>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::Failed(err),
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// The raw payloads of one composite fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    resources: BTreeMap<ResourceKey, Value>,
    failures: Vec<ResourceKey>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Assembles a snapshot from per-resource fetch outcomes.
    ///
    /// Failed and missing resources are replaced by their placeholder and
    /// recorded in [`failures`](Self::failures).
    #[must_use]
    pub fn from_results(
        results: impl IntoIterator<Item = (ResourceKey, EndpointResult)>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let mut resources = BTreeMap::new();
        let mut failures = Vec::new();

        for (key, result) in results {
            if !result.is_ok() {
                failures.push(key);
            }
            resources.insert(key, result.into_payload(key.shape()));
        }

        for key in ResourceKey::ALL {
            resources
                .entry(key)
                .or_insert_with(|| key.shape().placeholder());
        }

        failures.sort_unstable();
        failures.dedup();

        Self {
            resources,
            failures,
            fetched_at,
        }
    }

    /// Builds a snapshot from known payloads, stamped with the current time.
    ///
    /// Resources not listed hold their placeholder but are not reported as
    /// failures. Mainly useful to feed derivations in tests.
    #[must_use]
    pub fn from_payloads(payloads: impl IntoIterator<Item = (ResourceKey, Value)>) -> Self {
        Self::from_results(
            payloads
                .into_iter()
                .map(|(key, value)| (key, EndpointResult::Ok(value))),
            Utc::now(),
        )
    }

    /// Returns the payload stored for `key`.
    ///
    /// Never absent: resources that were not fetched hold a placeholder.
    #[must_use]
    pub fn get(&self, key: ResourceKey) -> &Value {
        self.resources.get(&key).unwrap_or(&NULL)
    }

    /// Returns the resources that fell back to a placeholder in this fetch.
    #[must_use]
    pub fn failures(&self) -> &[ResourceKey] {
        &self.failures
    }

    /// Returns `true` if `key` holds a placeholder because its fetch failed.
    #[must_use]
    pub fn is_placeholder(&self, key: ResourceKey) -> bool {
        self.failures.contains(&key)
    }

    /// Returns when the fetch completed.
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Iterates over all resources in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &Value)> {
        self.resources.iter().map(|(key, value)| (*key, value))
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::from_results(std::iter::empty(), Utc::now())
    }
}
