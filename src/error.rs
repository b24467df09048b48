// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `polycom_lib` library.
//!
//! Failures are split by where they originate: local value validation,
//! transport/protocol communication with the phone, and decoding of the
//! phone's JSON payloads. [`Error::kind`] collapses them into the coarse
//! classes a polling loop needs to decide between "retry on the next tick"
//! and "the credentials are no longer valid".

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A command argument failed local validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Communication with the device failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A device response could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The coordinator has been shut down.
    #[error("coordinator has been stopped")]
    Stopped,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The device rejected the configured credentials.
    ///
    /// Fatal for the session: the host must ask the user to re-authenticate.
    Authentication,
    /// Timeout, network failure or a non-2xx HTTP status.
    ///
    /// Transient: the next polling tick retries.
    Communication,
    /// Anything unclassified (undecodable bodies, client construction, ...).
    Api,
    /// Rejected locally before anything was sent to the device.
    Validation,
}

impl Error {
    /// Returns the coarse class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Value(_) => ErrorKind::Validation,
            Self::Protocol(err) => err.kind(),
            Self::Parse(_) | Self::Stopped => ErrorKind::Api,
        }
    }

    /// Returns `true` if the device rejected the credentials.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// Returns `true` if retrying on the next tick may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Communication | ErrorKind::Api)
    }

    /// Returns `true` if the device answered with HTTP 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Protocol(err) if err.status() == Some(404))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A MAC address string could not be parsed.
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    /// An unknown derived value key was requested.
    #[error("unknown value key: {0}")]
    UnknownKey(String),
}

/// Errors related to HTTP communication with the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The device answered 401 or 403.
    #[error("authentication failed (HTTP {status})")]
    AuthenticationFailed {
        /// The HTTP status returned by the device.
        status: u16,
    },

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Connection to the device failed (DNS, refused, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The device answered with a non-2xx status other than 401/403.
    #[error("HTTP {status} - {reason}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The canonical reason phrase.
        reason: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A 2xx response body was not valid JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// Any other HTTP client failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProtocolError {
    /// Returns the coarse class of this protocol error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed { .. } => ErrorKind::Authentication,
            Self::Timeout(_) | Self::ConnectionFailed(_) | Self::Status { .. } => {
                ErrorKind::Communication
            }
            Self::InvalidAddress(_) | Self::InvalidBody(_) | Self::Http(_) => ErrorKind::Api,
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { status } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn authentication_is_its_own_class() {
        let err: Error = ProtocolError::AuthenticationFailed { status: 401 }.into();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.is_authentication());
        assert!(!err.is_transient());
    }

    #[test]
    fn communication_failures_are_transient() {
        let timeout: Error = ProtocolError::Timeout(10_000).into();
        let status: Error = ProtocolError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        }
        .into();
        let refused: Error = ProtocolError::ConnectionFailed("refused".to_string()).into();

        for err in [timeout, status, refused] {
            assert_eq!(err.kind(), ErrorKind::Communication);
            assert!(err.is_transient());
        }
    }

    #[test]
    fn parse_failures_are_generic() {
        let err: Error = ParseError::MissingField("MacAddress".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.is_transient());
    }

    #[test]
    fn validation_errors_are_not_transient() {
        let err: Error = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: -1,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_transient());
    }

    #[test]
    fn not_found_detection() {
        let err: Error = ProtocolError::Status {
            status: 404,
            reason: "Not Found".to_string(),
        }
        .into();
        assert!(err.is_not_found());

        let err: Error = ProtocolError::AuthenticationFailed { status: 403 }.into();
        assert!(!err.is_not_found());
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("MacAddress".to_string());
        assert_eq!(err.to_string(), "missing field in response: MacAddress");
    }
}
