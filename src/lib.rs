// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `omm_lib` - Change-tracked entity proxies for the SIP-DECT OM Application
//! XML Interface.
//!
//! The OMM client reads entities such as RFPs from the server, lets the
//! application edit them locally and then sends only the changed fields back
//! in an update request. This crate provides the client-side entity proxy
//! behind that cycle; the session and the XML transport live elsewhere.
//!
//! # Features
//!
//! - **Change tracking**: every field write is recorded in first-write order
//! - **Snapshots**: server reads are installed without creating pending changes
//! - **Field locking**: one field becomes immutable once its lock flag is set
//! - **Schemas**: optional name and kind validation of individual writes
//! - **Thread safety**: entities are `Sync` and written through `&self`
//!
//! # Quick Start
//!
//! ```
//! use omm_lib::rfp::Rfp;
//! use omm_lib::types::FieldValue;
//!
//! # fn main() -> omm_lib::Result<()> {
//! // Seed from a full read; nothing is pending yet
//! let rfp = Rfp::from_snapshot((), [
//!     ("id", FieldValue::Int(3)),
//!     ("hwType", FieldValue::enum_tag("A")),
//!     ("hwTypeLocked", FieldValue::Bool(false)),
//! ]);
//! assert!(!rfp.has_pending_changes());
//!
//! rfp.set_hw_type("B")?;
//! rfp.set("hwTypeLocked", true)?;
//!
//! // The hardware type is now locked
//! assert!(rfp.set_hw_type("C").is_err());
//!
//! // Deltas for the update request, as XML attribute pairs
//! let attributes = rfp.pending_changes().to_attributes();
//! assert_eq!(attributes[0], ("hwType".to_string(), "B".to_string()));
//! rfp.clear_pending_changes();
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod rfp;
pub mod schema;
pub mod types;

pub use entity::{
    BulkLoadPolicy, ChangeSet, LockRule, LockState, TrackedEntity, TrackedEntityBuilder,
};
pub use error::{Error, FieldError, Result, SchemaError};
pub use rfp::Rfp;
pub use schema::{Schema, SchemaBuilder};
pub use types::{FieldKind, FieldValue};
