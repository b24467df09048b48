// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Current values of the settings hosts expose as controls.

use crate::json;
use crate::snapshot::{ResourceKey, Snapshot};

/// Do-not-disturb setting from `dnd_status.enabled`.
#[must_use]
pub fn dnd_enabled(snapshot: &Snapshot) -> Option<bool> {
    json::field(snapshot.get(ResourceKey::DndStatus), "enabled").and_then(json::as_flag)
}

/// Speaker volume from `volume.volume`.
#[must_use]
pub fn volume(snapshot: &Snapshot) -> Option<i64> {
    json::field(snapshot.get(ResourceKey::Volume), "volume").and_then(json::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dnd_accepts_bool_and_string_flags() {
        for (payload, expected) in [
            (json!({"enabled": true}), Some(true)),
            (json!({"enabled": "False"}), Some(false)),
            (json!({"enabled": "off"}), None),
            (json!({}), None),
        ] {
            let snapshot = Snapshot::from_payloads([(ResourceKey::DndStatus, payload)]);
            assert_eq!(dnd_enabled(&snapshot), expected);
        }
    }

    #[test]
    fn volume_accepts_numeric_strings() {
        for (payload, expected) in [
            (json!({"volume": 50}), Some(50)),
            (json!({"volume": "50"}), Some(50)),
            (json!({"volume": "loud"}), None),
            (json!([]), None),
        ] {
            let snapshot = Snapshot::from_payloads([(ResourceKey::Volume, payload)]);
            assert_eq!(volume(&snapshot), expected);
        }
    }
}
