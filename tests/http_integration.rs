// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport, gateway and session using wiremock.

use std::time::Duration;

use polycom_lib::protocol::{ApiMethod, HttpConfig, Transport};
use polycom_lib::{
    DerivedKey, DerivedValue, DeviceGateway, ErrorKind, MacAddress, ProtocolError, ResourceKey,
    Session,
};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/api/v1";

fn api(endpoint: &str) -> String {
    format!("{API}/{endpoint}")
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_get(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(api(endpoint)))
        .respond_with(ok(body))
        .mount(server)
        .await;
}

/// Mounts identity resources plus every optional resource.
async fn mount_phone(server: &MockServer) {
    mount_get(
        server,
        "mgmt/device/info",
        json!({"Status": "2000", "data": {
            "ModelNumber": "VVX 450",
            "FirmwareRelease": "6.4.3.5156",
            "UpTime": {"Days": 0, "Hours": 5, "Minutes": 0, "Seconds": 0}
        }}),
    )
    .await;
    mount_get(
        server,
        "mgmt/network/info",
        json!({"Status": "2000", "data": {"MacAddress": "64167F0A0B0C"}}),
    )
    .await;
    mount_get(
        server,
        "mgmt/pollForStatus",
        json!({"data": {"State": "Idle", "StateData": "Time of last call 2025-08-03T10:35:57+00:00"}}),
    )
    .await;
    mount_get(server, "webCallControl/callStatus", json!({"data": {"State": "Idle"}})).await;
    mount_get(server, "mgmt/doNotDisturb", json!({"data": {"enabled": "False"}})).await;
    mount_get(
        server,
        "mgmt/device/stats",
        json!({"data": {"CPU": {"Usage": 7}, "Memory": {"Total": 2_097_152, "Free": 1_048_576}}}),
    )
    .await;
    mount_get(
        server,
        "mgmt/lineInfo",
        json!({"data": {"Lines": [{"RegistrationStatus": "Unregistered", "Active": "False"}]}}),
    )
    .await;
    mount_get(server, "mgmt/media/sessionStats", json!({"data": {}})).await;
    mount_get(
        server,
        "webCallControl/communicationInfo",
        json!({"data": {"PhoneMuteState": "True"}}),
    )
    .await;
}

fn gateway(server: &MockServer) -> DeviceGateway {
    let client = HttpConfig::new(server.uri())
        .with_credentials("Polycom", "456")
        .into_client()
        .unwrap();
    DeviceGateway::new(client)
}

// ============================================================================
// Transport
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn sends_basic_auth_and_json_content_type() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(api("mgmt/device/info")))
            .and(basic_auth("Polycom", "456"))
            .and(header("content-type", "application/json"))
            .respond_with(ok(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpConfig::new(server.uri())
            .with_credentials("Polycom", "456")
            .into_client()
            .unwrap();

        let body = client
            .request(ApiMethod::Get, "mgmt/device/info", None)
            .await
            .unwrap();
        assert_eq!(body, json!({"data": {}}));
    }

    #[tokio::test]
    async fn classifies_status_codes() {
        let server = MockServer::start().await;
        for (endpoint, status) in [("a", 401), ("b", 403), ("c", 404), ("d", 500)] {
            Mock::given(path(api(endpoint)))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }
        let client = HttpConfig::new(server.uri()).into_client().unwrap();

        for (endpoint, status, kind) in [
            ("a", 401, ErrorKind::Authentication),
            ("b", 403, ErrorKind::Authentication),
            ("c", 404, ErrorKind::Communication),
            ("d", 500, ErrorKind::Communication),
        ] {
            let err = client
                .request(ApiMethod::Get, endpoint, None)
                .await
                .unwrap_err();
            assert_eq!(err.status(), Some(status), "endpoint {endpoint}");
            assert_eq!(err.kind(), kind, "endpoint {endpoint}");
        }
    }

    #[tokio::test]
    async fn empty_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("mgmt/safeReboot")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let client = HttpConfig::new(server.uri()).into_client().unwrap();

        let body = client
            .request(ApiMethod::Post, "mgmt/safeReboot", None)
            .await
            .unwrap();
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn non_json_body_is_generic_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("mgmt/device/info")))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;
        let client = HttpConfig::new(server.uri()).into_client().unwrap();

        let err = client
            .request(ApiMethod::Get, "mgmt/device/info", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidBody(_)));
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[tokio::test]
    async fn slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("mgmt/device/info")))
            .respond_with(ok(json!({"data": {}})).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        let client = HttpConfig::new(server.uri())
            .with_timeout(Duration::from_millis(200))
            .into_client()
            .unwrap();

        let err = client
            .request(ApiMethod::Get, "mgmt/device/info", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout(200)), "got {err:?}");
        assert_eq!(err.kind(), ErrorKind::Communication);
    }

    #[tokio::test]
    async fn unreachable_host_is_communication_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = HttpConfig::new("http://127.0.0.1:9").into_client().unwrap();

        let err = client
            .request(ApiMethod::Get, "mgmt/device/info", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Communication);
    }
}

// ============================================================================
// Gateway
// ============================================================================

mod gateway {
    use super::*;

    #[tokio::test]
    async fn unwraps_data_envelope() {
        let server = MockServer::start().await;
        mount_phone(&server).await;

        let info = gateway(&server).device_info().await.unwrap();
        assert_eq!(info["ModelNumber"], "VVX 450");
        assert!(info.get("Status").is_none());
    }

    #[tokio::test]
    async fn fetch_all_tolerates_missing_endpoints() {
        let server = MockServer::start().await;
        mount_get(&server, "mgmt/device/info", json!({"data": {"ModelNumber": "VVX 250"}})).await;
        mount_get(&server, "mgmt/network/info", json!({"data": {"MacAddress": "64167f000001"}})).await;

        let snapshot = gateway(&server).fetch_all().await.unwrap();

        assert_eq!(snapshot.failures().len(), 8);
        assert_eq!(snapshot.get(ResourceKey::LineInfo), &json!([]));
        assert_eq!(snapshot.get(ResourceKey::Volume), &json!({}));
        assert_eq!(snapshot.get(ResourceKey::DeviceInfo)["ModelNumber"], "VVX 250");
    }

    #[tokio::test]
    async fn fetch_all_fails_on_rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(path(api("mgmt/device/info")))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = gateway(&server).fetch_all().await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn mutation_bodies() {
        let server = MockServer::start().await;
        for (endpoint, body) in [
            ("mgmt/doNotDisturb", json!({"data": {"enabled": true}})),
            ("mgmt/audio/volume", json!({"data": {"volume": 30}})),
            ("callctrl/mute", json!({"data": {"state": "0"}})),
        ] {
            Mock::given(method("POST"))
                .and(path(api(endpoint)))
                .and(body_json(body))
                .respond_with(ok(json!({"Status": "2000"})))
                .expect(1)
                .mount(&server)
                .await;
        }
        let gateway = gateway(&server);

        gateway.set_dnd(true).await.unwrap();
        gateway
            .set_volume(polycom_lib::Volume::new(30).unwrap())
            .await
            .unwrap();
        gateway.set_mute(false).await.unwrap();
    }

    #[tokio::test]
    async fn reboot_falls_back_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("mgmt/safeReboot")))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(api("mgmt/reboot")))
            .respond_with(ok(json!({"Status": "2000"})))
            .expect(1)
            .mount(&server)
            .await;

        gateway(&server).reboot().await.unwrap();
    }

    #[tokio::test]
    async fn reboot_does_not_fall_back_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(api("mgmt/safeReboot")))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(api("mgmt/reboot")))
            .respond_with(ok(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let err = gateway(&server).reboot().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Communication);
    }
}

// ============================================================================
// Session
// ============================================================================

mod session {
    use super::*;

    async fn requests_to(server: &MockServer, verb: &str, endpoint: &str) -> usize {
        let full = api(endpoint);
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == full)
            .count()
    }

    #[tokio::test]
    async fn probe_returns_identity_without_polling() {
        let server = MockServer::start().await;
        mount_phone(&server).await;

        let identity = Session::builder(server.uri())
            .with_password("456")
            .probe()
            .await
            .unwrap();

        assert_eq!(identity.name(), "Polycom VVX 450");
        assert_eq!(identity.firmware(), "6.4.3.5156");
        assert_eq!(identity.mac().map(MacAddress::as_str), Some("64167f0a0b0c"));
        assert_eq!(requests_to(&server, "GET", "mgmt/lineInfo").await, 0);
    }

    #[tokio::test]
    async fn probe_reports_bad_password() {
        let server = MockServer::start().await;
        Mock::given(path(api("mgmt/device/info")))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = Session::builder(server.uri())
            .with_password("wrong")
            .probe()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn derived_values_over_http() {
        let server = MockServer::start().await;
        mount_phone(&server).await;

        let session = Session::builder(server.uri())
            .with_password("456")
            .build()
            .await
            .unwrap();

        assert_eq!(session.value(DerivedKey::CpuUsage), Some(DerivedValue::Float(7.0)));
        assert_eq!(session.value(DerivedKey::MemoryUsage), Some(DerivedValue::Float(50.0)));
        assert_eq!(session.value(DerivedKey::MemoryTotal), Some(DerivedValue::Float(2.0)));
        assert_eq!(session.value(DerivedKey::LineRegistered), Some(DerivedValue::Bool(false)));
        assert_eq!(session.value(DerivedKey::MuteStatus), Some(DerivedValue::Bool(true)));
        assert_eq!(session.value(DerivedKey::DndEnabled), Some(DerivedValue::Bool(false)));
        assert_eq!(session.value(DerivedKey::Volume), None);
        assert!(matches!(
            session.value(DerivedKey::LastCallTime),
            Some(DerivedValue::Timestamp(_))
        ));
        assert_eq!(session.snapshot().failures(), &[ResourceKey::Volume]);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn set_volume_refreshes_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("mgmt/audio/volume")))
            .respond_with(ok(json!({"data": {"volume": 20}})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_get(&server, "mgmt/audio/volume", json!({"data": {"volume": 50}})).await;
        mount_phone(&server).await;
        Mock::given(method("POST"))
            .and(path(api("mgmt/audio/volume")))
            .and(body_json(json!({"data": {"volume": 50}})))
            .respond_with(ok(json!({"Status": "2000"})))
            .expect(2)
            .mount(&server)
            .await;

        let session = Session::builder(server.uri())
            .with_password("456")
            .build()
            .await
            .unwrap();
        assert_eq!(session.value(DerivedKey::Volume), Some(DerivedValue::Int(20)));

        session.set_volume(50).await.unwrap();
        assert_eq!(session.value(DerivedKey::Volume), Some(DerivedValue::Int(50)));
        assert_eq!(requests_to(&server, "GET", "mgmt/device/info").await, 2);

        session.set_volume(50).await.unwrap();
        assert_eq!(session.value(DerivedKey::Volume), Some(DerivedValue::Int(50)));
        assert_eq!(requests_to(&server, "GET", "mgmt/device/info").await, 3);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn out_of_range_volume_sends_nothing() {
        let server = MockServer::start().await;
        mount_phone(&server).await;

        let session = Session::builder(server.uri())
            .with_password("456")
            .build()
            .await
            .unwrap();
        let before = server.received_requests().await.unwrap_or_default().len();

        let err = session.set_volume(150).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            server.received_requests().await.unwrap_or_default().len(),
            before
        );
        session.shutdown().await;
    }

    #[tokio::test]
    async fn auth_failure_on_refresh_fires_callback() {
        use polycom_lib::CoordinatorState;
        use polycom_lib::subscription::Subscribable;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("mgmt/device/info")))
            .respond_with(ok(json!({"data": {"ModelNumber": "VVX 450"}})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(path(api("mgmt/device/info")))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        mount_phone(&server).await;

        let session = Session::builder(server.uri())
            .with_password("456")
            .build()
            .await
            .unwrap();
        let first = session.snapshot();

        let failures = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&failures);
        session.on_auth_failure(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = session.refresh().await.unwrap_err();

        assert!(err.is_authentication());
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(session.state(), CoordinatorState::AuthFailed);
        assert!(Arc::ptr_eq(&first, &session.snapshot()));
        session.shutdown().await;
    }
}
