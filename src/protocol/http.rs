// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTPS transport for the Polycom REST API.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::protocol::{ApiMethod, Transport};

// ============================================================================
// HttpConfig
// ============================================================================

/// Connection parameters for one Polycom device.
///
/// The configuration is immutable once turned into a client; changing the
/// host or the credentials means building a new client.
///
/// # Examples
///
/// ```
/// use polycom_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.60")
///     .with_credentials("Polycom", "456")
///     .with_tls_verification(false)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "https://192.168.1.60/api/v1");
/// ```
#[derive(Clone)]
pub struct HttpConfig {
    host: String,
    port: Option<u16>,
    credentials: Option<(String, String)>,
    verify_tls: bool,
    timeout: Duration,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Path prefix of the REST API.
    pub const API_ROOT: &'static str = "/api/v1";

    /// Creates a new configuration for the specified host.
    ///
    /// A bare host or IP address is reached over HTTPS. A host that already
    /// carries an `http://` or `https://` scheme is used verbatim.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            port: None,
            credentials: None,
            verify_tls: true,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Enables or disables TLS certificate verification.
    ///
    /// Phones ship with self-signed certificates, so hosts commonly turn
    /// this off. Defaults to `true`.
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

    /// Returns the host as configured.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the custom port, if any.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns whether TLS certificates are verified.
    #[must_use]
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the scheme and authority, e.g. `https://192.168.1.60`.
    #[must_use]
    pub fn origin(&self) -> String {
        let origin = if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        };

        match self.port {
            Some(port) => format!("{origin}:{port}"),
            None => origin,
        }
    }

    /// Returns the API root URL, e.g. `https://192.168.1.60/api/v1`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}{}", self.origin(), Self::API_ROOT)
    }

    /// Creates an [`HttpClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "host is required".to_string(),
            ));
        }

        let base_url = self.base_url();

        let client = Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()
            .map_err(ProtocolError::Http)?;

        let credentials = self
            .credentials
            .map(|(username, password)| Credentials { username, password });

        Ok(HttpClient {
            base_url,
            client,
            credentials,
            timeout: self.timeout,
        })
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.credentials.as_ref().map(|(u, _)| u))
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for one Polycom device.
///
/// # Examples
///
/// ```no_run
/// use polycom_lib::protocol::{ApiMethod, HttpConfig, Transport};
///
/// # async fn example() -> Result<(), polycom_lib::ProtocolError> {
/// let client = HttpConfig::new("192.168.1.60")
///     .with_credentials("Polycom", "456")
///     .into_client()?;
///
/// let info = client.request(ApiMethod::Get, "mgmt/device/info", None).await?;
/// println!("{info}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    credentials: Option<Credentials>,
    timeout: Duration,
}

#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl HttpClient {
    /// Returns the API root URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full URL for an API path.
    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Maps a `reqwest` failure onto the error taxonomy.
    fn classify(&self, err: reqwest::Error) -> ProtocolError {
        if err.is_timeout() {
            let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            ProtocolError::Timeout(millis)
        } else if err.is_connect() {
            ProtocolError::ConnectionFailed(err.to_string())
        } else {
            ProtocolError::Http(err)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field(
                "username",
                &self.credentials.as_ref().map(|c| c.username.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl Transport for HttpClient {
    async fn request(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ProtocolError> {
        let url = self.build_url(path);

        tracing::debug!(%method, url = %url, "Sending HTTP request");

        let mut request = match method {
            ApiMethod::Get => self.client.get(&url),
            ApiMethod::Post => self.client.post(&url),
        }
        .header(CONTENT_TYPE, "application/json");

        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        tracing::debug!(%method, url = %url, status = status.as_u16(), "Received HTTP response");

        // Credential problems are reported before generic status handling
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProtocolError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ProtocolError::InvalidBody(e.to_string()))
    }
}
