// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted in-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::ProtocolError;
use crate::protocol::{ApiMethod, Transport};

/// Canned outcome for one path.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Status(u16),
    Timeout,
}

impl Reply {
    fn into_result(self) -> Result<Value, ProtocolError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Status(status @ (401 | 403)) => {
                Err(ProtocolError::AuthenticationFailed { status })
            }
            Self::Status(status) => Err(ProtocolError::Status {
                status,
                reason: "scripted".to_string(),
            }),
            Self::Timeout => Err(ProtocolError::Timeout(10_000)),
        }
    }
}

/// A transport whose replies are scripted per path.
///
/// Unscripted paths answer 404. Every call is recorded, and the number of
/// requests in flight at the same time is tracked so tests can assert on
/// fetch exclusion.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(ApiMethod, String, Option<Value>)>>,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A transport answering every sub-resource of a healthy phone.
    pub(crate) fn healthy() -> Self {
        let mock = Self::new();
        mock.reply_json(
            "mgmt/device/info",
            serde_json::json!({"data": {
                "DeviceVendor": "Polycom",
                "ModelNumber": "Trio 8800",
                "Firmware": {"Application": "7.2.2.1094"},
                "UpTime": {"Days": "1", "Hours": "2", "Minutes": "3", "Seconds": "4"}
            }}),
        );
        mock.reply_json(
            "mgmt/network/info",
            serde_json::json!({"data": {"MacAddress": "00:04:F2:AA:BB:CC"}}),
        );
        mock.reply_json(
            "webCallControl/callStatus",
            serde_json::json!({"data": {"State": "Idle"}}),
        );
        mock.reply_json(
            "mgmt/pollForStatus",
            serde_json::json!({"data": {"State": "Idle", "StateData": ""}}),
        );
        mock.reply_json(
            "mgmt/doNotDisturb",
            serde_json::json!({"data": {"enabled": false}}),
        );
        mock.reply_json("mgmt/audio/volume", serde_json::json!({"data": {"volume": 40}}));
        mock.reply_json(
            "mgmt/device/stats",
            serde_json::json!({"data": {
                "CPU": {"Current": "12.5"},
                "Memory": {"Total": "1000", "Used": "600"}
            }}),
        );
        mock.reply_json(
            "mgmt/lineInfo",
            serde_json::json!({"data": [{
                "RegistrationStatus": "Registered",
                "DoNotDisturb": "False",
                "Active": "True",
                "CallServers": [{"Working": "True"}]
            }]}),
        );
        mock.reply_json(
            "mgmt/media/sessionStats",
            serde_json::json!({"data": {"LastCalledNumber": "1001"}}),
        );
        mock.reply_json(
            "webCallControl/communicationInfo",
            serde_json::json!({"data": {"PhoneMuteState": "False"}}),
        );
        mock
    }

    pub(crate) fn reply(&self, path: &str, reply: Reply) {
        self.replies.lock().insert(path.to_string(), reply);
    }

    pub(crate) fn reply_json(&self, path: &str, body: Value) {
        self.reply(path, Reply::Json(body));
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub(crate) fn calls(&self) -> Vec<(ApiMethod, String, Option<Value>)> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|(_, p, _)| p == path).count()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    async fn request(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ProtocolError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.calls.lock().push((method, path.to_string(), body));

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .get(path)
            .cloned()
            .unwrap_or(Reply::Status(404));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply.into_result()
    }
}
