// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Values derived from the first SIP line in `line_info`.
//!
//! Depending on firmware, `line_info` is either a bare array of lines or an
//! object holding them under `Lines`. Only the first line is considered.

use serde_json::{Map, Value};

use super::ConnectionStatus;
use crate::json;
use crate::snapshot::{ResourceKey, Snapshot};

type LineListExtractor = for<'a> fn(&'a Value) -> Option<&'a [Value]>;

const LINE_LIST_STRATEGIES: [LineListExtractor; 2] = [
    |v| v.as_array().map(Vec::as_slice),
    |v| json::field(v, "Lines")?.as_array().map(Vec::as_slice),
];

fn first_line(snapshot: &Snapshot) -> Option<&Map<String, Value>> {
    let line_info = snapshot.get(ResourceKey::LineInfo);
    LINE_LIST_STRATEGIES
        .iter()
        .find_map(|extract| extract(line_info))?
        .first()?
        .as_object()
}

/// Reads a `"True"` / `"False"` flag of the first line; a missing field
/// reads as `false`.
fn line_flag(snapshot: &Snapshot, field: &str) -> Option<bool> {
    let line = first_line(snapshot)?;
    Some(line.get(field).and_then(json::as_flag).unwrap_or(false))
}

/// Do-not-disturb as reported by the first line.
///
/// `None` when no line is listed.
#[must_use]
pub fn dnd_status(snapshot: &Snapshot) -> Option<bool> {
    line_flag(snapshot, "DoNotDisturb")
}

/// Whether the first line is in use.
///
/// `None` when no line is listed.
#[must_use]
pub fn line_active(snapshot: &Snapshot) -> Option<bool> {
    line_flag(snapshot, "Active")
}

/// Whether the first line is registered, compared case-insensitively.
///
/// `None` when no line is listed.
#[must_use]
pub fn line_registered(snapshot: &Snapshot) -> Option<bool> {
    let line = first_line(snapshot)?;
    Some(
        line.get("RegistrationStatus")
            .and_then(Value::as_str)
            .is_some_and(|status| status.eq_ignore_ascii_case("registered")),
    )
}

/// Connection state of the first line's first call server.
#[must_use]
pub fn sip_connection(snapshot: &Snapshot) -> ConnectionStatus {
    let server = first_line(snapshot)
        .and_then(|line| line.get("CallServers"))
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(Value::as_object);

    match server {
        None => ConnectionStatus::Unknown,
        Some(server) if server.get("Working").and_then(json::as_flag) == Some(true) => {
            ConnectionStatus::Connected
        }
        Some(_) => ConnectionStatus::Disconnected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_lines(line_info: Value) -> Snapshot {
        Snapshot::from_payloads([(ResourceKey::LineInfo, line_info)])
    }

    #[test]
    fn array_and_nested_shapes() {
        let line = json!({"DoNotDisturb": "True", "RegistrationStatus": "Registered"});

        for snapshot in [
            with_lines(json!([line.clone()])),
            with_lines(json!({"Lines": [line]})),
        ] {
            assert_eq!(dnd_status(&snapshot), Some(true));
            assert_eq!(line_registered(&snapshot), Some(true));
        }
    }

    #[test]
    fn no_line_is_unknown() {
        for snapshot in [
            Snapshot::default(),
            with_lines(json!([])),
            with_lines(json!({"Lines": []})),
            with_lines(json!({"Lines": "none"})),
            with_lines(json!(["not an object"])),
        ] {
            assert_eq!(dnd_status(&snapshot), None);
            assert_eq!(line_active(&snapshot), None);
            assert_eq!(line_registered(&snapshot), None);
            assert_eq!(sip_connection(&snapshot), ConnectionStatus::Unknown);
        }
    }

    #[test]
    fn missing_fields_read_as_false() {
        let snapshot = with_lines(json!([{}]));
        assert_eq!(dnd_status(&snapshot), Some(false));
        assert_eq!(line_active(&snapshot), Some(false));
        assert_eq!(line_registered(&snapshot), Some(false));
    }

    #[test]
    fn registration_is_case_insensitive() {
        let snapshot = with_lines(json!([{"RegistrationStatus": "REGISTERED"}]));
        assert_eq!(line_registered(&snapshot), Some(true));

        let snapshot = with_lines(json!([{"RegistrationStatus": "Unregistered"}]));
        assert_eq!(line_registered(&snapshot), Some(false));
    }

    #[test]
    fn only_first_line_counts() {
        let snapshot = with_lines(json!([{"Active": "False"}, {"Active": "True"}]));
        assert_eq!(line_active(&snapshot), Some(false));
    }

    #[test]
    fn sip_connection_states() {
        let working = with_lines(json!([{"CallServers": [{"Working": "True"}]}]));
        assert_eq!(sip_connection(&working), ConnectionStatus::Connected);

        let down = with_lines(json!([{"CallServers": [{"Working": "False"}]}]));
        assert_eq!(sip_connection(&down), ConnectionStatus::Disconnected);

        let unflagged = with_lines(json!([{"CallServers": [{}]}]));
        assert_eq!(sip_connection(&unflagged), ConnectionStatus::Disconnected);

        let no_servers = with_lines(json!([{"CallServers": []}]));
        assert_eq!(sip_connection(&no_servers), ConnectionStatus::Unknown);
    }
}
