// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `polycom_lib` - A Rust library to monitor and control Polycom phones.
//!
//! This library talks to the REST API of Polycom desk phones and
//! speakerphones (`https://<host>/api/v1/...`), polls it on a fixed interval
//! and turns the raw payloads into display values.
//!
//! # Supported Features
//!
//! - **Monitoring**: Device info, call state, line registration, CPU and
//!   memory usage, uptime, DND and mute state
//! - **Control**: Volume, Do Not Disturb, mute, reboot
//! - **Polling**: One fetch at a time, stale data kept on failure,
//!   authentication failures reported to the host
//! - **Firmware tolerance**: Endpoints missing on a firmware version are
//!   replaced by empty placeholders instead of failing the whole poll
//!
//! # Quick Start
//!
//! ```no_run
//! use polycom_lib::{DerivedKey, Session};
//! use polycom_lib::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> polycom_lib::Result<()> {
//!     let session = Session::builder("192.168.1.60")
//!         .with_password("456")
//!         .with_tls_verification(false)
//!         .build()
//!         .await?;
//!
//!     session.on_update(|snapshot| {
//!         println!("Polled at {}", snapshot.fetched_at());
//!     });
//!     session.on_auth_failure(|err| {
//!         eprintln!("Password rejected: {err}");
//!     });
//!
//!     println!("Phone state: {:?}", session.value(DerivedKey::PhoneState));
//!     session.set_dnd(true).await?;
//!
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Layers
//!
//! - [`protocol`]: the [`Transport`](protocol::Transport) trait and its HTTPS
//!   implementation
//! - [`gateway`]: one method per device resource or command, plus the
//!   composite [`fetch_all`](gateway::DeviceGateway::fetch_all)
//! - [`coordinator`]: the polling loop owning the current [`Snapshot`]
//! - [`derivation`]: pure functions from a snapshot to display values
//! - [`session`]: the per-phone object hosts hold on to

pub mod command;
pub mod coordinator;
pub mod derivation;
pub mod error;
pub mod gateway;
pub(crate) mod json;
pub mod protocol;
pub mod session;
pub mod snapshot;
pub mod subscription;
pub mod types;

pub use command::{Command, DeviceCommand};
pub use coordinator::{Coordinator, CoordinatorState, CoordinatorStats, PollingConfig};
pub use derivation::{ConnectionStatus, DerivedKey, DerivedValue};
pub use error::{Error, ErrorKind, ParseError, ProtocolError, Result, ValueError};
pub use gateway::DeviceGateway;
pub use protocol::{HttpClient, HttpConfig};
pub use session::{Session, SessionBuilder};
pub use snapshot::{DeviceIdentity, ResourceKey, Snapshot};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{MacAddress, Uptime, Volume};
