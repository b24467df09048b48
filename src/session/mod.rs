// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitoring session for one phone.
//!
//! A [`Session`] ties together the gateway, the polling coordinator and the
//! device identity. Hosts create one per monitored phone and pass it to
//! whatever displays values or issues commands; nothing is global.
//!
//! Commands are validated locally, executed, and followed by an immediate
//! refresh so the new state shows up without waiting for the next tick.

mod builder;

pub use builder::SessionBuilder;

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::watch;

use crate::coordinator::{Coordinator, CoordinatorState, CoordinatorStats, PollingConfig};
use crate::derivation::{self, DerivedKey, DerivedValue};
use crate::error::Error;
use crate::gateway::DeviceGateway;
use crate::protocol::{HttpClient, Transport};
use crate::snapshot::{DeviceIdentity, ResourceKey, Snapshot};
use crate::subscription::{Subscribable, SubscriptionId};
use crate::types::Volume;

/// A running monitoring session.
///
/// # Examples
///
/// ```no_run
/// use polycom_lib::{DerivedKey, Session};
///
/// # async fn example() -> polycom_lib::Result<()> {
/// let session = Session::builder("192.168.1.60")
///     .with_password("456")
///     .with_tls_verification(false)
///     .build()
///     .await?;
///
/// println!("{} running {}", session.identity().name(), session.identity().firmware());
///
/// if let Some(cpu) = session.value(DerivedKey::CpuUsage) {
///     println!("CPU: {cpu}%");
/// }
///
/// session.set_volume(60).await?;
/// session.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct Session<T: Transport = HttpClient> {
    host: String,
    identity: DeviceIdentity,
    coordinator: Coordinator<T>,
}

impl Session<HttpClient> {
    /// Creates a builder for a session with the phone at `host`.
    ///
    /// `host` is an IP address or host name, optionally with an explicit
    /// `http://` or `https://` scheme.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(host)
    }
}

impl<T: Transport> Session<T> {
    /// Starts a session over an existing gateway.
    ///
    /// Fetches the first snapshot, derives the identity from it and starts
    /// polling. `host` is only used for the management URL.
    ///
    /// # Errors
    ///
    /// Returns the error of the first fetch. Unexpected payload content is
    /// tolerated, so a reachable phone always yields a session.
    pub async fn start(
        gateway: DeviceGateway<T>,
        host: impl Into<String>,
        config: PollingConfig,
    ) -> Result<Self, Error> {
        let host = host.into();
        let coordinator = Coordinator::start(Arc::new(gateway), config).await?;

        let snapshot = coordinator.snapshot();
        let identity = DeviceIdentity::from_payloads(
            snapshot.get(ResourceKey::DeviceInfo),
            snapshot.get(ResourceKey::NetworkInfo),
            &host,
        );

        tracing::info!(
            host = %host,
            device = %identity.name(),
            mac = ?identity.mac(),
            "Session started"
        );

        Ok(Self {
            host,
            identity,
            coordinator,
        })
    }

    /// Returns the host this session talks to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the identity captured when the session started.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.coordinator.snapshot()
    }

    /// Computes a display value from the current snapshot.
    ///
    /// Time-relative values use the local clock and time zone.
    #[must_use]
    pub fn value(&self, key: DerivedKey) -> Option<DerivedValue> {
        self.value_at(key, &Local::now())
    }

    /// Computes a display value relative to `now`.
    #[must_use]
    pub fn value_at<Tz: TimeZone>(
        &self,
        key: DerivedKey,
        now: &DateTime<Tz>,
    ) -> Option<DerivedValue> {
        derivation::derive(key, &self.snapshot(), now)
    }

    /// Returns a receiver that observes every stored snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.coordinator.watch()
    }

    /// Returns the polling coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &Coordinator<T> {
        &self.coordinator
    }

    /// Returns the gateway, for requests outside the snapshot.
    #[must_use]
    pub fn gateway(&self) -> &DeviceGateway<T> {
        self.coordinator.gateway()
    }

    /// Returns the state of the polling loop.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.coordinator.state()
    }

    /// Returns the counters of the polling loop.
    #[must_use]
    pub fn stats(&self) -> CoordinatorStats {
        self.coordinator.stats()
    }

    /// Fetches a fresh snapshot now.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or `Error::Stopped` after shutdown.
    pub async fn refresh(&self) -> Result<(), Error> {
        self.coordinator.request_refresh().await
    }

    // ========== Commands ==========

    /// Sets the speaker volume (0-100).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for an out-of-range level, without contacting
    /// the phone, or the error of the request.
    pub async fn set_volume(&self, level: i64) -> Result<(), Error> {
        let volume = Volume::new(level)?;
        self.gateway().set_volume(volume).await?;
        self.refresh_after_command().await;
        Ok(())
    }

    /// Enables or disables Do Not Disturb.
    ///
    /// # Errors
    ///
    /// Returns the error of the request.
    pub async fn set_dnd(&self, enabled: bool) -> Result<(), Error> {
        self.gateway().set_dnd(enabled).await?;
        self.refresh_after_command().await;
        Ok(())
    }

    /// Mutes or unmutes the microphone.
    ///
    /// # Errors
    ///
    /// Returns the error of the request.
    pub async fn set_mute(&self, muted: bool) -> Result<(), Error> {
        self.gateway().set_mute(muted).await?;
        self.refresh_after_command().await;
        Ok(())
    }

    /// Reboots the phone.
    ///
    /// The refresh that follows usually fails while the phone restarts; the
    /// regular polling picks it up again once it is back.
    ///
    /// # Errors
    ///
    /// Returns the error of the request.
    pub async fn reboot(&self) -> Result<(), Error> {
        self.gateway().reboot().await?;
        self.refresh_after_command().await;
        Ok(())
    }

    /// Stops polling and drops every subscription. The last snapshot stays
    /// readable.
    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
    }

    /// A failed refresh is already recorded by the coordinator and must not
    /// turn a command that succeeded into an error.
    async fn refresh_after_command(&self) {
        if let Err(err) = self.coordinator.request_refresh().await {
            tracing::debug!(error = %err, "Refresh after command failed");
        }
    }
}

impl<T: Transport> Subscribable for Session<T> {
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.coordinator.on_update(callback)
    }

    fn on_auth_failure<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.coordinator.on_auth_failure(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.coordinator.unsubscribe(id)
    }
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("identity", &self.identity)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
