// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity derived from `device_info` and `network_info`.

use serde::Serialize;
use serde_json::Value;

use crate::json::{self, Extractor};
use crate::types::MacAddress;

const DEFAULT_VENDOR: &str = "Polycom";
const UNKNOWN: &str = "Unknown";

/// Firmware version, newest payload shape first.
const FIRMWARE_STRATEGIES: [Extractor<String>; 2] = [
    |info| {
        json::nested(info, "Firmware", "Application")
            .and_then(json::as_str)
            .map(str::to_string)
    },
    |info| {
        json::field(info, "FirmwareRelease")
            .and_then(json::as_str)
            .map(str::to_string)
    },
];

/// Static identity of the monitored phone.
///
/// Computed once when a session starts and kept for its lifetime; a phone
/// whose firmware changed is picked up by rebuilding the session.
///
/// # Examples
///
/// ```
/// use polycom_lib::snapshot::DeviceIdentity;
/// use serde_json::json;
///
/// let identity = DeviceIdentity::from_payloads(
///     &json!({"DeviceVendor": "Polycom", "ModelNumber": "Trio 8800",
///             "Firmware": {"Application": "7.2.2.1094"}}),
///     &json!({"MacAddress": "00:04:F2:AA:BB:CC"}),
///     "192.168.1.60",
/// );
///
/// assert_eq!(identity.name(), "Polycom Trio 8800");
/// assert_eq!(identity.firmware(), "7.2.2.1094");
/// assert_eq!(identity.mac().unwrap().as_str(), "00:04:f2:aa:bb:cc");
/// assert_eq!(identity.management_url(), "https://192.168.1.60");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    vendor: String,
    model: String,
    firmware: String,
    mac: Option<MacAddress>,
    management_url: String,
}

impl DeviceIdentity {
    /// Derives the identity from the two identity payloads.
    ///
    /// Never fails: vendor, model and firmware fall back to defaults, and a
    /// missing or malformed MAC address leaves [`mac`](Self::mac) empty.
    #[must_use]
    pub fn from_payloads(device_info: &Value, network_info: &Value, host: &str) -> Self {
        let text = |key: &str, default: &str| {
            json::field(device_info, key)
                .and_then(json::as_str)
                .unwrap_or(default)
                .to_string()
        };

        Self {
            vendor: text("DeviceVendor", DEFAULT_VENDOR),
            model: text("ModelNumber", UNKNOWN),
            firmware: json::first_match(device_info, &FIRMWARE_STRATEGIES)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            mac: mac_address(network_info),
            management_url: management_url(host),
        }
    }

    /// Returns the display name, `"<vendor> <model>"`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{} {}", self.vendor, self.model)
    }

    /// Returns the manufacturer.
    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Returns the model number.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the application firmware version.
    #[must_use]
    pub fn firmware(&self) -> &str {
        &self.firmware
    }

    /// Returns the MAC address, the stable identifier of the device.
    ///
    /// `None` if `network_info` carried no usable address.
    #[must_use]
    pub fn mac(&self) -> Option<&MacAddress> {
        self.mac.as_ref()
    }

    /// Returns the URL of the phone's web interface.
    #[must_use]
    pub fn management_url(&self) -> &str {
        &self.management_url
    }
}

fn mac_address(network_info: &Value) -> Option<MacAddress> {
    let Some(raw) = json::field(network_info, "MacAddress").and_then(json::as_str) else {
        tracing::warn!("Device reports no MAC address");
        return None;
    };

    match raw.parse() {
        Ok(mac) => Some(mac),
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring malformed MAC address");
            None
        }
    }
}

fn management_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn network() -> Value {
        json!({"MacAddress": "00:04:F2:AA:BB:CC"})
    }

    #[test]
    fn nested_firmware_wins() {
        let info = json!({
            "Firmware": {"Application": "7.2.2"},
            "FirmwareRelease": "5.9.0"
        });
        let identity = DeviceIdentity::from_payloads(&info, &network(), "phone");
        assert_eq!(identity.firmware(), "7.2.2");
    }

    #[test]
    fn flat_firmware_fallback() {
        let info = json!({"FirmwareRelease": "5.9.0"});
        let identity = DeviceIdentity::from_payloads(&info, &network(), "phone");
        assert_eq!(identity.firmware(), "5.9.0");

        // A non-object Firmware field does not hide the flat one
        let info = json!({"Firmware": "weird", "FirmwareRelease": "5.9.0"});
        let identity = DeviceIdentity::from_payloads(&info, &network(), "phone");
        assert_eq!(identity.firmware(), "5.9.0");
    }

    #[test]
    fn defaults_for_missing_fields() {
        let identity = DeviceIdentity::from_payloads(&json!({}), &network(), "phone");
        assert_eq!(identity.vendor(), "Polycom");
        assert_eq!(identity.model(), "Unknown");
        assert_eq!(identity.firmware(), "Unknown");
        assert_eq!(identity.name(), "Polycom Unknown");
    }

    #[test]
    fn mac_is_normalized() {
        let identity = DeviceIdentity::from_payloads(&json!({}), &network(), "phone");
        assert_eq!(identity.mac().map(MacAddress::as_str), Some("00:04:f2:aa:bb:cc"));
    }

    #[test]
    fn missing_or_malformed_mac_is_tolerated() {
        for network_info in [
            json!({}),
            json!({"IPv4Address": "10.0.0.2"}),
            json!({"MacAddress": ""}),
            json!({"MacAddress": "nope"}),
            json!([]),
        ] {
            let identity = DeviceIdentity::from_payloads(
                &json!({"ModelNumber": "VVX 450"}),
                &network_info,
                "phone",
            );
            assert!(identity.mac().is_none(), "network_info {network_info}");
            assert_eq!(identity.name(), "Polycom VVX 450");
        }
    }

    #[test]
    fn management_url_keeps_explicit_scheme() {
        assert_eq!(management_url("10.0.0.2"), "https://10.0.0.2");
        assert_eq!(management_url("http://10.0.0.2/"), "http://10.0.0.2");
    }
}
