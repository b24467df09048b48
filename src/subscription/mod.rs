// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for coordinator notifications.
//!
//! The polling coordinator publishes two kinds of events:
//!
//! - a snapshot update after every successful fetch-and-store
//! - an authentication failure when the phone rejects the credentials
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Internal registry that manages callbacks and dispatches events
//! - [`Subscribable`] - Trait for types that support event subscriptions
//!
//! Hosts that prefer channels over callbacks can use
//! [`Coordinator::watch`](crate::coordinator::Coordinator::watch) instead.

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
