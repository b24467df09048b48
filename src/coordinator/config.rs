// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling configuration.

use std::time::Duration;

/// Configuration of the polling loop.
///
/// # Examples
///
/// ```
/// use polycom_lib::coordinator::PollingConfig;
/// use std::time::Duration;
///
/// let config = PollingConfig::default();
/// assert_eq!(config.interval(), Duration::from_secs(30));
///
/// let config = PollingConfig::new().with_interval(Duration::from_secs(10));
/// assert_eq!(config.interval(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    interval: Duration,
}

impl PollingConfig {
    /// Default time between two fetches.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Shortest accepted interval.
    pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    /// Sets the time between two fetches, raised to
    /// [`MIN_INTERVAL`](Self::MIN_INTERVAL) if shorter.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Self::MIN_INTERVAL);
        self
    }

    /// Returns the time between two fetches.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::new()
    }
}
