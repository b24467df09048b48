// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polycom command definitions.
//!
//! Every mutation the phone accepts is a `POST` to a fixed endpoint, with the
//! arguments wrapped in the same `{"data": ...}` envelope the phone uses for
//! its responses.
//!
//! # Available Commands
//!
//! | Command | Endpoint | Body |
//! |---------|----------|------|
//! | [`DeviceCommand::Reboot`] | `mgmt/safeReboot` (`mgmt/reboot` on older firmware) | none |
//! | [`DeviceCommand::SetDnd`] | `mgmt/doNotDisturb` | `{"data":{"enabled":true}}` |
//! | [`DeviceCommand::SetVolume`] | `mgmt/audio/volume` | `{"data":{"volume":50}}` |
//! | [`DeviceCommand::SetMute`] | `callctrl/mute` | `{"data":{"state":"1"}}` |
//!
//! # Examples
//!
//! ```
//! use polycom_lib::command::{Command, DeviceCommand};
//! use polycom_lib::types::Volume;
//!
//! let cmd = DeviceCommand::SetVolume(Volume::new(50).unwrap());
//! assert_eq!(cmd.endpoint(), "mgmt/audio/volume");
//! assert_eq!(cmd.body().unwrap().to_string(), r#"{"data":{"volume":50}}"#);
//! ```

use std::fmt;

use serde_json::{Value, json};

use crate::types::Volume;

/// A command that can be sent to a Polycom device.
pub trait Command {
    /// Returns a short name for logging.
    fn name(&self) -> &'static str;

    /// Returns the API path the command is posted to.
    fn endpoint(&self) -> &'static str;

    /// Returns the path to retry on when [`endpoint`](Self::endpoint)
    /// answers HTTP 404, if the command has one.
    fn fallback_endpoint(&self) -> Option<&'static str> {
        None
    }

    /// Returns the JSON request body, if any.
    fn body(&self) -> Option<Value>;
}

/// The mutations a phone accepts.
///
/// Arguments are already validated: a [`Volume`] cannot be out of range,
/// so every value of this type can be transmitted as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Restart the phone, letting active calls end first where supported.
    Reboot,
    /// Enable or disable do-not-disturb.
    SetDnd(bool),
    /// Set the speaker volume.
    SetVolume(Volume),
    /// Mute or unmute the microphone.
    SetMute(bool),
}

impl Command for DeviceCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Reboot => "reboot",
            Self::SetDnd(_) => "set_dnd",
            Self::SetVolume(_) => "set_volume",
            Self::SetMute(_) => "set_mute",
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            Self::Reboot => "mgmt/safeReboot",
            Self::SetDnd(_) => "mgmt/doNotDisturb",
            Self::SetVolume(_) => "mgmt/audio/volume",
            Self::SetMute(_) => "callctrl/mute",
        }
    }

    fn fallback_endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Reboot => Some("mgmt/reboot"),
            _ => None,
        }
    }

    fn body(&self) -> Option<Value> {
        match self {
            Self::Reboot => None,
            Self::SetDnd(enabled) => Some(json!({"data": {"enabled": enabled}})),
            Self::SetVolume(volume) => Some(json!({"data": {"volume": volume.value()}})),
            Self::SetMute(muted) => Some(json!({"data": {"state": if *muted { "1" } else { "0" }}})),
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reboot => f.write_str("reboot"),
            Self::SetDnd(enabled) => write!(f, "set_dnd {enabled}"),
            Self::SetVolume(volume) => write!(f, "set_volume {volume}"),
            Self::SetMute(muted) => write!(f, "set_mute {muted}"),
        }
    }
}
