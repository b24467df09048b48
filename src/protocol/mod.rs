// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for talking to Polycom devices.
//!
//! The phone exposes a JSON REST API under `https://<host>/api/v1/`, protected
//! by HTTP basic authentication. [`HttpClient`] is the production
//! implementation of [`Transport`]; the trait exists so the gateway and the
//! polling coordinator can be driven by any request/response source.
//!
//! Every failure leaving a transport is already classified as a
//! [`ProtocolError`], so callers never see an unclassified error type.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpClient, HttpConfig};

use std::fmt;
use std::future::Future;

use serde_json::Value;

use crate::error::ProtocolError;

/// HTTP method used for a device request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    /// Read a resource.
    Get,
    /// Mutate state or trigger an action.
    Post,
}

impl ApiMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request/response channel to one device.
///
/// Implementations are stateless per call aside from their fixed base URL and
/// credentials, and must be safe to share between tasks.
pub trait Transport: Send + Sync + 'static {
    /// Sends a request to `path` (relative to the API root, e.g.
    /// `"mgmt/device/info"`) and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ProtocolError`]:
    /// - `AuthenticationFailed` for HTTP 401/403
    /// - `Status` for any other non-2xx status
    /// - `Timeout` / `ConnectionFailed` for network failures
    /// - `Http` for anything else
    fn request(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<Value>,
    ) -> impl Future<Output = Result<Value, ProtocolError>> + Send;
}
