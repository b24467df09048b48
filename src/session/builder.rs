// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session builder.

use std::time::Duration;

use crate::coordinator::PollingConfig;
use crate::error::Error;
use crate::gateway::DeviceGateway;
use crate::protocol::{HttpClient, HttpConfig};
use crate::session::Session;
use crate::snapshot::DeviceIdentity;

/// Builder for a [`Session`] talking to a phone over HTTPS.
///
/// Created with [`Session::builder`]. Every setting is fixed once the
/// session is built; changing the password means building a new session.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use polycom_lib::Session;
///
/// # async fn example() -> polycom_lib::Result<()> {
/// // Validate the credentials without starting to poll
/// let identity = Session::builder("192.168.1.60")
///     .with_password("456")
///     .with_tls_verification(false)
///     .probe()
///     .await?;
/// println!("Found {} ({:?})", identity.name(), identity.mac());
///
/// let session = Session::builder("192.168.1.60")
///     .with_password("456")
///     .with_tls_verification(false)
///     .with_poll_interval(Duration::from_secs(60))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    host: String,
    username: String,
    password: String,
    verify_tls: bool,
    timeout: Duration,
    polling: PollingConfig,
}

impl SessionBuilder {
    /// Username the phones ship with.
    pub const DEFAULT_USERNAME: &'static str = "Polycom";

    pub(crate) fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: Self::DEFAULT_USERNAME.to_string(),
            password: String::new(),
            verify_tls: true,
            timeout: HttpConfig::DEFAULT_TIMEOUT,
            polling: PollingConfig::default(),
        }
    }

    /// Sets the admin password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Overrides the username (defaults to `"Polycom"`).
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub fn with_tls_verification(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the polling interval (defaults to 30 seconds).
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.polling = self.polling.with_interval(interval);
        self
    }

    /// Returns the configured host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the configured polling settings.
    #[must_use]
    pub fn polling(&self) -> PollingConfig {
        self.polling
    }

    /// Returns the transport configuration this builder produces.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(self.host.clone())
            .with_credentials(self.username.clone(), self.password.clone())
            .with_tls_verification(self.verify_tls)
            .with_timeout(self.timeout)
    }

    /// Fetches the device identity once without starting a session.
    ///
    /// Used to check a host and password before committing to them.
    ///
    /// # Errors
    ///
    /// Returns the classified error of either identity request; see
    /// [`Error::kind`].
    pub async fn probe(self) -> Result<DeviceIdentity, Error> {
        let gateway = self.gateway()?;
        gateway.identity(&self.host).await
    }

    /// Builds the session: fetches the first snapshot and starts polling.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be created or the first fetch
    /// fails. A phone that reports no MAC address still starts.
    pub async fn build(self) -> Result<Session<HttpClient>, Error> {
        let gateway = self.gateway()?;
        Session::start(gateway, self.host, self.polling).await
    }

    fn gateway(&self) -> Result<DeviceGateway<HttpClient>, Error> {
        let client = self.http_config().into_client()?;
        Ok(DeviceGateway::new(client))
    }
}
