// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change-tracked entity proxies.
//!
//! A [`TrackedEntity`] is the client-side copy of a remote entity. Individual
//! writes are recorded in a [`ChangeSet`] so the owning client can send only
//! the changed fields; snapshot loads from the server bypass the change set.
//! A [`LockRule`] makes one field immutable once its lock flag is `true`.
//!
//! # Sync Cycle
//!
//! ```
//! use omm_lib::entity::TrackedEntity;
//! use omm_lib::types::FieldValue;
//!
//! # fn main() -> omm_lib::Result<()> {
//! let entity = TrackedEntity::new(());
//!
//! // Full read from the server
//! entity.load_snapshot([("id", FieldValue::Int(3)), ("name", FieldValue::from("hall"))]);
//!
//! // Local edits
//! entity.set("name", "lobby")?;
//! entity.set("dectOn", true)?;
//!
//! // Build the update request from the deltas only
//! let changes = entity.pending_changes();
//! assert_eq!(changes.names(), vec!["name", "dectOn"]);
//!
//! // Server accepted the update
//! entity.acknowledge_changes(&changes);
//! assert!(!entity.has_pending_changes());
//! # Ok(())
//! # }
//! ```

mod builder;
mod change_set;
mod lock;
mod tracked_entity;

pub use builder::TrackedEntityBuilder;
pub use change_set::ChangeSet;
pub use lock::{LockRule, LockState};
pub use tracked_entity::{BulkLoadPolicy, TrackedEntity};
