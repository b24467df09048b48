// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed access to the Polycom REST API.
//!
//! [`DeviceGateway`] wraps a [`Transport`] with one method per device
//! capability, plus [`fetch_all`](DeviceGateway::fetch_all), the composite
//! fetch that feeds the polling coordinator.

use chrono::Utc;
use serde_json::Value;

use crate::command::{Command, DeviceCommand};
use crate::error::Error;
use crate::protocol::{ApiMethod, HttpClient, Transport};
use crate::snapshot::{DeviceIdentity, EndpointResult, ResourceKey, Snapshot};
use crate::types::Volume;

/// Returns the `data` member of an enveloped response, or the body itself.
///
/// Recent firmware wraps every payload as `{"data": ...}`; older endpoints
/// answer with the bare payload.
#[must_use]
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Typed client for one Polycom phone.
///
/// Getters return the unwrapped payload of their endpoint. Mutations return
/// the raw response body and do not refresh any cached state; callers that
/// keep a snapshot are expected to refresh it afterwards.
///
/// # Examples
///
/// ```no_run
/// use polycom_lib::gateway::DeviceGateway;
/// use polycom_lib::protocol::HttpConfig;
///
/// # async fn example() -> polycom_lib::Result<()> {
/// let client = HttpConfig::new("192.168.1.60")
///     .with_credentials("Polycom", "456")
///     .with_tls_verification(false)
///     .into_client()?;
/// let gateway = DeviceGateway::new(client);
///
/// let snapshot = gateway.fetch_all().await?;
/// println!("{} resources failed", snapshot.failures().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceGateway<T: Transport = HttpClient> {
    transport: T,
}

impl<T: Transport> DeviceGateway<T> {
    /// Creates a gateway on top of `transport`.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches one resource and unwraps its envelope.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get(&self, key: ResourceKey) -> Result<Value, Error> {
        let body = self
            .transport
            .request(ApiMethod::Get, key.path(), None)
            .await?;
        Ok(unwrap_envelope(body))
    }

    // ========== Getters ==========

    /// Returns vendor, model, firmware and uptime information.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn device_info(&self) -> Result<Value, Error> {
        self.get(ResourceKey::DeviceInfo).await
    }

    /// Returns network information, including the MAC address.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn network_info(&self) -> Result<Value, Error> {
        self.get(ResourceKey::NetworkInfo).await
    }

    /// Returns the call status. Some firmware answers with an error status
    /// while no call is active.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn call_status(&self) -> Result<Value, Error> {
        self.get(ResourceKey::CallStatus).await
    }

    /// Returns the phone state and its free-text state data.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn poll_status(&self) -> Result<Value, Error> {
        self.get(ResourceKey::PollStatus).await
    }

    /// Returns the do-not-disturb setting.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn dnd_status(&self) -> Result<Value, Error> {
        self.get(ResourceKey::DndStatus).await
    }

    /// Returns the speaker volume.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn volume(&self) -> Result<Value, Error> {
        self.get(ResourceKey::Volume).await
    }

    /// Returns CPU and memory statistics.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn device_stats(&self) -> Result<Value, Error> {
        self.get(ResourceKey::DeviceStats).await
    }

    /// Returns SIP line information.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn line_info(&self) -> Result<Value, Error> {
        self.get(ResourceKey::LineInfo).await
    }

    /// Returns media session statistics.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn session_stats(&self) -> Result<Value, Error> {
        self.get(ResourceKey::SessionStats).await
    }

    /// Returns communication information, including the mute state.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn communication_info(&self) -> Result<Value, Error> {
        self.get(ResourceKey::CommunicationInfo).await
    }

    /// Fetches both identity resources and derives the device identity.
    ///
    /// `host` is only used to build the management URL.
    ///
    /// # Errors
    ///
    /// Returns error if either request fails. Payload content never fails.
    pub async fn identity(&self, host: &str) -> Result<DeviceIdentity, Error> {
        let device_info = self.device_info().await?;
        let network_info = self.network_info().await?;
        Ok(DeviceIdentity::from_payloads(
            &device_info,
            &network_info,
            host,
        ))
    }

    // ========== Composite Fetch ==========

    /// Fetches every resource into a [`Snapshot`].
    ///
    /// Resources are fetched in [`ResourceKey::ALL`] order. A failure of a
    /// [required](ResourceKey::is_required) resource (device and network
    /// info, fetched first) is returned. Every other resource is fetched
    /// independently; a failed one
    /// is replaced by an empty placeholder and listed in
    /// [`Snapshot::failures`], so a firmware lacking an endpoint still
    /// produces a complete snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if device info or network info cannot be fetched.
    pub async fn fetch_all(&self) -> Result<Snapshot, Error> {
        let mut results = Vec::with_capacity(ResourceKey::ALL.len());

        for key in ResourceKey::ALL {
            if key.is_required() {
                results.push((key, EndpointResult::Ok(self.get(key).await?)));
                continue;
            }

            let result = EndpointResult::from(self.get(key).await);
            if let EndpointResult::Failed(err) = &result {
                tracing::debug!(resource = %key, error = %err, "Resource unavailable, using placeholder");
            }
            results.push((key, result));
        }

        Ok(Snapshot::from_results(results, Utc::now()))
    }

    // ========== Mutations ==========

    /// Sends a command and returns the raw response body.
    ///
    /// A command with a fallback endpoint is retried there once if the
    /// primary endpoint answers HTTP 404.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn execute(&self, command: &DeviceCommand) -> Result<Value, Error> {
        tracing::info!(command = %command, "Sending command");

        let result = self
            .transport
            .request(ApiMethod::Post, command.endpoint(), command.body())
            .await
            .map_err(Error::from);

        match (result, command.fallback_endpoint()) {
            (Err(err), Some(fallback)) if err.is_not_found() => {
                tracing::debug!(command = %command, fallback, "Endpoint not found, retrying on fallback");
                Ok(self
                    .transport
                    .request(ApiMethod::Post, fallback, command.body())
                    .await?)
            }
            (result, _) => result,
        }
    }

    /// Enables or disables do-not-disturb.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_dnd(&self, enabled: bool) -> Result<Value, Error> {
        self.execute(&DeviceCommand::SetDnd(enabled)).await
    }

    /// Sets the speaker volume.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_volume(&self, volume: Volume) -> Result<Value, Error> {
        self.execute(&DeviceCommand::SetVolume(volume)).await
    }

    /// Mutes or unmutes the microphone.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_mute(&self, muted: bool) -> Result<Value, Error> {
        self.execute(&DeviceCommand::SetMute(muted)).await
    }

    /// Reboots the phone, via `mgmt/safeReboot` or `mgmt/reboot` depending
    /// on which one the firmware provides.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn reboot(&self) -> Result<Value, Error> {
        self.execute(&DeviceCommand::Reboot).await
    }
}
