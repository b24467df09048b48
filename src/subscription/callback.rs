// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for coordinator notifications.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Internal registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::Error;
use crate::snapshot::Snapshot;

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a coordinator's lifetime.
///
/// # Examples
///
/// ```no_run
/// use polycom_lib::Session;
/// use polycom_lib::subscription::Subscribable;
///
/// # async fn example() -> polycom_lib::Result<()> {
/// let session = Session::builder("192.168.1.60")
///     .with_password("456")
///     .build()
///     .await?;
///
/// let sub_id = session.on_update(|snapshot| {
///     println!("Polled at {}", snapshot.fetched_at());
/// });
/// println!("Subscribed as {sub_id}");
///
/// // Later, unsubscribe
/// assert!(session.unsubscribe(sub_id));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for snapshot update callbacks.
type UpdateCallback = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Type alias for authentication failure callbacks.
type AuthFailureCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// Registry for managing coordinator callbacks.
///
/// It uses thread-safe interior mutability via `parking_lot::RwLock`, so it
/// can be shared between the polling task and the host.
///
/// Callbacks run synchronously on the polling task and should return
/// quickly. Dispatch works on a copy of the registered callbacks, so a
/// callback may subscribe or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Called after every successful fetch-and-store.
    update_callbacks: RwLock<HashMap<SubscriptionId, UpdateCallback>>,
    /// Called when the device rejects the credentials.
    auth_failure_callbacks: RwLock<HashMap<SubscriptionId, AuthFailureCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            update_callbacks: RwLock::new(HashMap::new()),
            auth_failure_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback fired after every successful fetch.
    ///
    /// The callback receives the snapshot that was just stored.
    pub fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.update_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback fired when the device rejects the credentials.
    pub fn on_auth_failure<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.auth_failure_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.update_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.auth_failure_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks, releasing whatever they captured.
    pub fn clear(&self) {
        self.update_callbacks.write().clear();
        self.auth_failure_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Notifies update subscribers of a newly stored snapshot.
    pub fn dispatch_update(&self, snapshot: &Snapshot) {
        let callbacks: Vec<_> = self.update_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(snapshot);
        }
    }

    /// Notifies auth-failure subscribers.
    pub fn dispatch_auth_failure(&self, error: &Error) {
        let callbacks: Vec<_> = self
            .auth_failure_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(error);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.update_callbacks.read().len() + self.auth_failure_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
