// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polycom uptime parsing.
//!
//! Phones report uptime in `device_info` as an object of components:
//!
//! ```json
//! {"UpTime": {"Days": "1", "Hours": "2", "Minutes": "3", "Seconds": "4"}}
//! ```
//!
//! Components arrive as numbers or numeric strings depending on firmware.
//! A missing component counts as zero; a component that is present but not
//! numeric invalidates the whole value.
//!
//! # Examples
//!
//! ```
//! use polycom_lib::types::Uptime;
//! use serde_json::json;
//!
//! let uptime = Uptime::from_json(&json!({"Days": 1, "Hours": "2"})).unwrap();
//! assert_eq!(uptime.total_seconds(), 93_600);
//!
//! assert!(Uptime::from_json(&json!({"Days": "soon"})).is_none());
//! ```

use chrono::{DateTime, TimeDelta, TimeZone, Timelike};
use serde_json::Value;

use crate::json;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Device uptime split into its reported components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uptime {
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
}

impl Uptime {
    /// Creates an uptime from explicit components.
    #[must_use]
    pub const fn new(days: i64, hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Parses the `UpTime` object of a `device_info` payload.
    ///
    /// Returns `None` if `value` is not an object or if any present
    /// component is not numeric.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let component = |key: &str| match object.get(key) {
            None | Some(Value::Null) => Some(0),
            Some(v) => json::as_i64(v),
        };

        Some(Self {
            days: component("Days")?,
            hours: component("Hours")?,
            minutes: component("Minutes")?,
            seconds: component("Seconds")?,
        })
    }

    /// Returns the uptime as a number of seconds.
    ///
    /// Saturates instead of overflowing on absurd component values.
    #[must_use]
    pub fn total_seconds(&self) -> i64 {
        self.days
            .saturating_mul(SECONDS_PER_DAY)
            .saturating_add(self.hours.saturating_mul(SECONDS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(SECONDS_PER_MINUTE))
            .saturating_add(self.seconds)
    }

    /// Reconstructs the moment the device booted, relative to `now`.
    ///
    /// Sub-second precision is dropped. Returns `None` when the uptime is not
    /// positive or the subtraction falls outside chrono's range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use polycom_lib::types::Uptime;
    ///
    /// let now = Utc.with_ymd_and_hms(2025, 8, 3, 12, 0, 0).unwrap();
    /// let boot = Uptime::new(0, 1, 0, 0).started_at(&now).unwrap();
    /// assert_eq!(boot, Utc.with_ymd_and_hms(2025, 8, 3, 11, 0, 0).unwrap());
    /// ```
    #[must_use]
    pub fn started_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let total = self.total_seconds();
        if total <= 0 {
            return None;
        }

        let elapsed = TimeDelta::try_seconds(total)?;
        now.clone()
            .checked_sub_signed(elapsed)?
            .with_nanosecond(0)
    }
}
