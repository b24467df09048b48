// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling coordinator.
//!
//! The [`Coordinator`] owns the polling loop for one phone. It runs
//! [`DeviceGateway::fetch_all`] on a fixed interval, keeps the last
//! successful [`Snapshot`] and notifies subscribers when it changes.
//!
//! # Failure handling
//!
//! - A failed fetch never touches the stored snapshot; stale data is kept.
//! - An authentication failure (HTTP 401/403) moves the coordinator to
//!   [`CoordinatorState::AuthFailed`] and fires the auth-failure callbacks
//!   once for that tick. Polling continues so the coordinator recovers on
//!   its own once the credentials are fixed on the phone.
//! - Any other failure is recorded and retried on the next tick. There is no
//!   backoff.
//!
//! # Fetch exclusion
//!
//! At most one fetch is in flight at a time. A timer tick that finds a fetch
//! in flight is skipped; [`Coordinator::request_refresh`] waits for the
//! in-flight fetch and then runs its own.

mod config;
mod state;

pub use config::PollingConfig;
pub use state::{CoordinatorState, CoordinatorStats};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorKind};
use crate::gateway::DeviceGateway;
use crate::protocol::{HttpClient, Transport};
use crate::snapshot::Snapshot;
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};

/// Shared between the coordinator handle and its polling task.
struct Inner<T: Transport> {
    gateway: Arc<DeviceGateway<T>>,
    config: PollingConfig,
    snapshot: watch::Sender<Arc<Snapshot>>,
    fetch_lock: tokio::sync::Mutex<()>,
    callbacks: CallbackRegistry,
    state: RwLock<CoordinatorState>,
    stats: Mutex<CoordinatorStats>,
    last_error: RwLock<Option<String>>,
    /// Set by a rejected fetch, cleared by a successful one.
    auth_pending: AtomicBool,
    cancel: CancellationToken,
}

impl<T: Transport> Inner<T> {
    /// Runs one fetch-and-store cycle. The caller holds `fetch_lock`.
    async fn fetch_and_store(&self) -> Result<(), Error> {
        *self.state.write() = CoordinatorState::Fetching;
        let _in_flight = FetchInFlight { inner: self };

        let result = self.gateway.fetch_all().await;

        if self.cancel.is_cancelled() {
            tracing::debug!("Discarding fetch result after shutdown");
            return Err(Error::Stopped);
        }

        match result {
            Ok(snapshot) => {
                self.store(snapshot);
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    fn store(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        self.snapshot.send_replace(Arc::clone(&snapshot));

        self.auth_pending.store(false, Ordering::SeqCst);
        *self.state.write() = CoordinatorState::Idle;
        *self.last_error.write() = None;
        {
            let mut stats = self.stats.lock();
            stats.successful += 1;
            stats.last_success = Some(snapshot.fetched_at());
        }

        tracing::debug!(
            failures = snapshot.failures().len(),
            "Snapshot updated"
        );
        self.callbacks.dispatch_update(&snapshot);
    }

    fn record_failure(&self, err: &Error) {
        self.stats.lock().failed += 1;
        *self.last_error.write() = Some(err.to_string());

        match err.kind() {
            ErrorKind::Authentication => {
                self.auth_pending.store(true, Ordering::SeqCst);
                *self.state.write() = CoordinatorState::AuthFailed;
                tracing::warn!(error = %err, "Device rejected credentials");
                self.callbacks.dispatch_auth_failure(err);
            }
            kind => {
                // A transient failure does not clear a pending auth failure
                *self.state.write() = self.resting_state();

                if kind == ErrorKind::Communication {
                    tracing::warn!(error = %err, "Fetch failed, keeping previous snapshot");
                } else {
                    tracing::error!(error = %err, "Unexpected fetch failure, keeping previous snapshot");
                }
            }
        }
    }

    /// State between fetches.
    fn resting_state(&self) -> CoordinatorState {
        if self.auth_pending.load(Ordering::SeqCst) {
            CoordinatorState::AuthFailed
        } else {
            CoordinatorState::Idle
        }
    }
}

/// Leaves `Fetching` when a fetch future is dropped before it completes.
struct FetchInFlight<'a, T: Transport> {
    inner: &'a Inner<T>,
}

impl<T: Transport> Drop for FetchInFlight<'_, T> {
    fn drop(&mut self) {
        let mut state = self.inner.state.write();
        if *state == CoordinatorState::Fetching {
            tracing::debug!("Fetch abandoned before completion");
            *state = self.inner.resting_state();
        }
    }
}

/// Polling coordinator for one phone.
///
/// Created with [`Coordinator::start`], which performs the first fetch
/// before returning, so a running coordinator always has a snapshot.
///
/// Dropping the coordinator stops the polling task; use
/// [`shutdown`](Self::shutdown) to also wait for it.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use polycom_lib::coordinator::{Coordinator, PollingConfig};
/// use polycom_lib::gateway::DeviceGateway;
/// use polycom_lib::protocol::HttpConfig;
///
/// # async fn example() -> polycom_lib::Result<()> {
/// let client = HttpConfig::new("192.168.1.60")
///     .with_credentials("Polycom", "456")
///     .into_client()?;
/// let gateway = Arc::new(DeviceGateway::new(client));
///
/// let coordinator = Coordinator::start(gateway, PollingConfig::default()).await?;
/// println!("fetched at {}", coordinator.snapshot().fetched_at());
///
/// coordinator.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct Coordinator<T: Transport = HttpClient> {
    inner: Arc<Inner<T>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Transport> Coordinator<T> {
    /// Fetches the first snapshot and starts polling.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the error of the initial fetch; no task is started then.
    pub async fn start(gateway: Arc<DeviceGateway<T>>, config: PollingConfig) -> Result<Self, Error> {
        let snapshot = match gateway.fetch_all().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "Initial fetch failed, not starting");
                return Err(err);
            }
        };

        let stats = CoordinatorStats {
            successful: 1,
            last_success: Some(snapshot.fetched_at()),
            ..CoordinatorStats::default()
        };
        let (sender, _) = watch::channel(Arc::new(snapshot));

        let inner = Arc::new(Inner {
            gateway,
            config,
            snapshot: sender,
            fetch_lock: tokio::sync::Mutex::new(()),
            callbacks: CallbackRegistry::new(),
            state: RwLock::new(CoordinatorState::Idle),
            stats: Mutex::new(stats),
            last_error: RwLock::new(None),
            auth_pending: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        });

        let task = tokio::spawn(poll_task(Arc::clone(&inner)));

        tracing::info!(interval = ?config.interval(), "Polling coordinator started");

        Ok(Self {
            inner,
            task: Mutex::new(Some(task)),
        })
    }

    /// Returns the last successfully fetched snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Returns a receiver that observes every stored snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.snapshot.subscribe()
    }

    /// Returns the gateway used for fetching.
    #[must_use]
    pub fn gateway(&self) -> &Arc<DeviceGateway<T>> {
        &self.inner.gateway
    }

    /// Returns the polling configuration.
    #[must_use]
    pub fn config(&self) -> PollingConfig {
        self.inner.config
    }

    /// Returns the current state of the polling loop.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        *self.inner.state.read()
    }

    /// Returns the counters of the polling loop.
    #[must_use]
    pub fn stats(&self) -> CoordinatorStats {
        self.inner.stats.lock().clone()
    }

    /// Returns the error of the last failed fetch, cleared by a success.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.read().clone()
    }

    /// Returns `true` until the coordinator is shut down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    /// Runs one fetch-and-store cycle outside the regular interval.
    ///
    /// Waits for a fetch already in flight to finish first, so this never
    /// overlaps with a timer tick. Failures are handled exactly as on a
    /// tick (snapshot kept, auth callbacks fired) and also returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::Stopped` after shutdown, or the fetch error.
    pub async fn request_refresh(&self) -> Result<(), Error> {
        let cancel = &self.inner.cancel;

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Stopped),
            result = async {
                let _guard = self.inner.fetch_lock.lock().await;
                if cancel.is_cancelled() {
                    return Err(Error::Stopped);
                }
                self.inner.fetch_and_store().await
            } => result,
        }
    }

    /// Stops polling and waits for the polling task to exit.
    ///
    /// An in-flight fetch is abandoned; its result is never stored. Every
    /// registered callback is dropped. Calling this more than once is
    /// harmless.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Polling task ended abnormally");
            }
            tracing::info!("Polling coordinator stopped");
        }

        // Wait out a refresh that is between its fetch and its store
        let _guard = self.inner.fetch_lock.lock().await;
        *self.inner.state.write() = CoordinatorState::Stopped;
        self.inner.callbacks.clear();
    }
}

impl<T: Transport> Subscribable for Coordinator<T> {
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_update(callback)
    }

    fn on_auth_failure<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_auth_failure(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }
}

impl<T: Transport> Drop for Coordinator<T> {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

impl<T: Transport> std::fmt::Debug for Coordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state())
            .field("interval", &self.inner.config.interval())
            .field("callbacks", &self.inner.callbacks)
            .finish_non_exhaustive()
    }
}

/// Timer-driven polling loop.
async fn poll_task<T: Transport>(inner: Arc<Inner<T>>) {
    let period = inner.config.interval();
    // The initial fetch already ran in `start`
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = inner.cancel.cancelled() => break,
            _ = interval.tick() => {
                let Ok(_guard) = inner.fetch_lock.try_lock() else {
                    inner.stats.lock().skipped += 1;
                    tracing::debug!("Fetch still in flight, skipping tick");
                    continue;
                };

                tokio::select! {
                    biased;
                    () = inner.cancel.cancelled() => break,
                    // Failures are recorded and logged by the cycle itself
                    _ = inner.fetch_and_store() => {}
                }
            }
        }
    }
}
