// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! System diagnostics: CPU, memory and boot time.
//!
//! `device_stats` comes in two shapes: CPU load as `CPU.Current` or
//! `CPU.Usage`, and memory either with an explicit `Used` byte count or with
//! only `Total` and `Free`. Both are handled by ordered strategy lists.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::Value;

use super::round1;
use crate::json::{self, Extractor};
use crate::snapshot::{ResourceKey, Snapshot};
use crate::types::Uptime;

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

const CPU_STRATEGIES: [Extractor<f64>; 2] = [
    |stats| json::nested(stats, "CPU", "Current").and_then(json::as_f64),
    |stats| json::nested(stats, "CPU", "Usage").and_then(json::as_f64),
];

/// Used memory in bytes, given the `Memory` object.
const MEMORY_USED_STRATEGIES: [Extractor<f64>; 2] = [
    |memory| json::field(memory, "Used").and_then(json::as_f64),
    |memory| {
        let total = json::field(memory, "Total").and_then(json::as_f64)?;
        let free = json::field(memory, "Free").and_then(json::as_f64)?;
        Some(total - free)
    },
];

fn memory(snapshot: &Snapshot) -> Option<&Value> {
    json::field(snapshot.get(ResourceKey::DeviceStats), "Memory")
}

/// CPU usage in percent.
#[must_use]
pub fn cpu_usage(snapshot: &Snapshot) -> Option<f64> {
    json::first_match(snapshot.get(ResourceKey::DeviceStats), &CPU_STRATEGIES)
}

/// Memory usage in percent, rounded to one decimal.
///
/// `None` when the total is not positive.
#[must_use]
pub fn memory_usage(snapshot: &Snapshot) -> Option<f64> {
    let memory = memory(snapshot)?;
    let total = json::field(memory, "Total")
        .and_then(json::as_f64)
        .filter(|total| *total > 0.0)?;
    let used = json::first_match(memory, &MEMORY_USED_STRATEGIES)?;
    Some(round1(used / total * 100.0))
}

/// Total memory in megabytes, rounded to one decimal.
#[must_use]
pub fn memory_total(snapshot: &Snapshot) -> Option<f64> {
    let total = json::field(memory(snapshot)?, "Total").and_then(json::as_f64)?;
    Some(round1(total / BYTES_PER_MEGABYTE))
}

/// Time the phone booted, reconstructed from its uptime and `now`.
///
/// Sub-second precision is dropped.
#[must_use]
pub fn uptime<Tz: TimeZone>(snapshot: &Snapshot, now: &DateTime<Tz>) -> Option<DateTime<FixedOffset>> {
    let components = json::field(snapshot.get(ResourceKey::DeviceInfo), "UpTime")?;
    Uptime::from_json(components)?
        .started_at(now)
        .map(|started| started.fixed_offset())
}
