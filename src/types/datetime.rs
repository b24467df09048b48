// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timestamps reported by the phone.
//!
//! The phone embeds timestamps in free text, e.g. the `StateData` of
//! `mgmt/pollForStatus`:
//!
//! ```text
//! Time of last call 2025-08-03T10:35:57
//! ```
//!
//! The ISO 8601 part may or may not carry a UTC offset. Timestamps without
//! one are wall-clock times in the phone's zone, which is assumed to be the
//! zone configured by the host.
//!
//! # Supported Formats
//!
//! - ISO 8601 without offset: `"2025-08-03T10:35:57"` (also with a space
//!   instead of `T`, and with fractional seconds)
//! - ISO 8601 with offset: `"2025-08-03T10:35:57+02:00"`, `"...Z"`

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use crate::error::ParseError;

/// Marker preceding the last call time in `pollForStatus` state data.
pub const LAST_CALL_MARKER: &str = "Time of last call";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// A timestamp parsed from device text, with or without a UTC offset.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use polycom_lib::types::DeviceTimestamp;
///
/// let ts: DeviceTimestamp = "2025-08-03T10:35:57".parse().unwrap();
/// assert!(ts.offset().is_none());
///
/// let paris = FixedOffset::east_opt(2 * 3600).unwrap();
/// let local = ts.localize(&paris).unwrap();
/// assert_eq!(local.to_rfc3339(), "2025-08-03T10:35:57+02:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTimestamp {
    /// Wall-clock time without zone information.
    Naive(NaiveDateTime),
    /// Time with an explicit UTC offset.
    Offset(DateTime<FixedOffset>),
}

impl DeviceTimestamp {
    /// Parses a timestamp, returning `None` on failure.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Extracts the timestamp following `marker` in free text.
    ///
    /// Returns `None` if the marker is absent or the remainder does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use polycom_lib::types::{DeviceTimestamp, LAST_CALL_MARKER};
    ///
    /// let text = "Time of last call 2025-08-03T10:35:57";
    /// assert!(DeviceTimestamp::after_marker(text, LAST_CALL_MARKER).is_some());
    /// assert!(DeviceTimestamp::after_marker("Idle", LAST_CALL_MARKER).is_none());
    /// ```
    #[must_use]
    pub fn after_marker(text: &str, marker: &str) -> Option<Self> {
        let (_, remainder) = text.rsplit_once(marker)?;
        Self::parse(remainder)
    }

    /// Returns the explicit UTC offset, if the text carried one.
    #[must_use]
    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            Self::Naive(_) => None,
            Self::Offset(dt) => Some(*dt.offset()),
        }
    }

    /// Resolves the timestamp in `tz`.
    ///
    /// Offset-carrying timestamps are converted to `tz`; naive ones are taken
    /// as wall-clock time in `tz`. For a wall-clock time repeated by a DST
    /// transition the earlier instant is used. Returns `None` for a time that
    /// does not exist in `tz` (skipped by a DST gap).
    #[must_use]
    pub fn localize<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Naive(naive) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Self::Offset(dt) => Some(dt.with_timezone(tz).fixed_offset()),
        }
    }

    fn parse_with_offset(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .or_else(|| {
                OFFSET_FORMATS
                    .iter()
                    .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
            })
            .map(Self::Offset)
    }

    fn parse_naive(s: &str) -> Option<Self> {
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Self::Naive)
    }
}

impl FromStr for DeviceTimestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Self::parse_with_offset(s)
            .or_else(|| Self::parse_naive(s))
            .ok_or_else(|| ParseError::InvalidValue {
                field: "timestamp".to_string(),
                message: format!("expected ISO 8601, got: '{s}'"),
            })
    }
}
