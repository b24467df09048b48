// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Polycom device monitoring and control.
//!
//! Command arguments are validated at construction time, so an invalid value
//! is rejected locally instead of being sent to the phone. Parsed values are
//! lenient about the representation the firmware picked.
//!
//! # Types
//!
//! - [`Volume`] - Speaker volume (0-100%)
//! - [`MacAddress`] - Normalized MAC, the stable device identifier
//! - [`Uptime`] - Uptime components reported in `device_info`
//! - [`DeviceTimestamp`] - ISO 8601 timestamp embedded in device text

mod datetime;
mod mac;
mod uptime;
mod volume;

pub use datetime::{DeviceTimestamp, LAST_CALL_MARKER};
pub use mac::MacAddress;
pub use uptime::Uptime;
pub use volume::Volume;
