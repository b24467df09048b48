// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish coordinator notifications.

use crate::error::Error;
use crate::snapshot::Snapshot;
use crate::subscription::SubscriptionId;

/// Trait for types that support notification subscriptions.
///
/// Implemented by the polling coordinator and by the session that owns it.
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
///     println!("New data fetched at {}", snapshot.fetched_at());
/// });
///
/// session.on_auth_failure(|err| {
///     eprintln!("Credentials rejected: {err}");
/// });
///
/// session.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to snapshot updates.
    ///
    /// The callback is called after every successful fetch-and-store, with
    /// the snapshot that was just stored. No delta is computed; consumers
    /// re-read the values they display.
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static;

    /// Subscribes to authentication failures.
    ///
    /// The callback is called once per polling tick whose fetch was rejected
    /// with HTTP 401/403. The stored snapshot is left untouched.
    fn on_auth_failure<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
