// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RFP (Radio Fixed Part) entities.
//!
//! An RFP is a DECT base station managed by the OMM. Its hardware type
//! (`hwType`) can be configured until the RFP connects to the OMM for the
//! first time; from then on the server reports `hwTypeLocked = true` and the
//! hardware type can no longer be changed.
//!
//! # Examples
//!
//! ```
//! use omm_lib::rfp::Rfp;
//! use omm_lib::types::FieldValue;
//!
//! # fn main() -> omm_lib::Result<()> {
//! let rfp = Rfp::from_snapshot((), [
//!     ("id", FieldValue::Int(3)),
//!     ("hwType", FieldValue::enum_tag("RFP35")),
//!     ("hwTypeLocked", FieldValue::Bool(true)),
//! ]);
//!
//! assert_eq!(rfp.id()?, Some(3));
//! assert!(rfp.set_hw_type("RFP43").unwrap_err().is_immutable());
//!
//! rfp.set_name("Lobby")?;
//! assert_eq!(rfp.pending_changes().names(), vec!["name"]);
//! # Ok(())
//! # }
//! ```

use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use crate::entity::{LockRule, TrackedEntity};
use crate::error::{Result, SchemaError};
use crate::schema::Schema;
use crate::types::{FieldKind, FieldValue};

/// The RFP field that becomes immutable.
pub const LOCKABLE_FIELD: &str = "hwType";

/// The RFP flag that locks [`LOCKABLE_FIELD`].
pub const LOCK_FLAG: &str = "hwTypeLocked";

const INT_FIELDS: &[&str] = &[
    "id",
    "rpn",
    "pagingArea",
    "cluster",
    "site",
    "x",
    "y",
    "wlanProfile",
    "wlanAntenna",
    "wlanChannel",
    "wlanPower",
    "wlanChannelUsed",
    "wlanPowerUsed",
    "nSyncRels",
];

const STR_FIELDS: &[&str] = &[
    "ethAddr",
    "name",
    "hierarchy1",
    "hierarchy2",
    "hierarchy3",
    "hierarchy4",
    "ipAddr",
    "swVersion",
    "wlanHighThroughputTypeUsed",
];

const BOOL_FIELDS: &[&str] = &[
    "dectOn",
    "wlanOn",
    "licenseRfp",
    "preferredSync",
    "reflectiveEnv",
    "hwTypeLocked",
    "wlanAntennaDiv",
    "wlanHighThroughput",
    "conferenceChannels",
    "connected",
    "newSoftwareRequest",
    "dectRunning",
    "wlanRunning",
    "ommRunning",
    "ommStbRunning",
    "hasWlan",
    "hasEncryption",
    "hasAdvancedFeatures",
    "brandingMismatch",
    "versionMismatch",
    "stbMismatch",
    "wlanLinkNok",
    "outdoorType",
    "hasFreqShift",
];

const ENUM_FIELDS: &[&str] = &["hwType", "syncState", "radioType"];

/// Returns the schema of the RFP fields.
///
/// The schema is built once and shared.
#[must_use]
pub fn schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Arc::new(
                Schema::builder()
                    .fields(INT_FIELDS.iter().copied(), FieldKind::Int)
                    .fields(STR_FIELDS.iter().copied(), FieldKind::Str)
                    .fields(BOOL_FIELDS.iter().copied(), FieldKind::Bool)
                    .fields(ENUM_FIELDS.iter().copied(), FieldKind::Enum)
                    .build(),
            )
        })
        .clone()
}

/// A tracked RFP entity.
///
/// Wraps a [`TrackedEntity`] configured with the RFP [`schema`] and the
/// `hwType`/`hwTypeLocked` [`LockRule`]. All generic operations are
/// available through `Deref`.
pub struct Rfp<O> {
    entity: TrackedEntity<O>,
}

impl<O> Rfp<O> {
    /// Creates an empty RFP.
    #[must_use]
    pub fn new(owner: O) -> Self {
        Self {
            entity: Self::configure(owner).build(),
        }
    }

    /// Creates an RFP from a full read, without pending changes.
    #[must_use]
    pub fn from_snapshot<I, K, V>(owner: O, snapshot: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            entity: Self::configure(owner).with_snapshot(snapshot).build(),
        }
    }

    fn configure(owner: O) -> crate::entity::TrackedEntityBuilder<O> {
        TrackedEntity::builder(owner)
            .with_lock_rule(LockRule::rfp_hw_type())
            .with_schema(schema())
    }

    /// Returns the wrapped entity.
    #[must_use]
    pub fn into_inner(self) -> TrackedEntity<O> {
        self.entity
    }

    /// Unique RFP identifier, numbered from 0.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` was never set or holds a non-integer.
    pub fn id(&self) -> Result<Option<i64>> {
        self.typed("id", FieldKind::Int, FieldValue::as_int)
    }

    /// Free-form RFP name.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` was never set or holds a non-string.
    pub fn name(&self) -> Result<Option<String>> {
        self.typed("name", FieldKind::Str, |v| v.as_str().map(str::to_string))
    }

    /// Hardware type tag, such as `RFP35`.
    ///
    /// # Errors
    ///
    /// Returns an error if `hwType` was never set or holds a non-string.
    pub fn hw_type(&self) -> Result<Option<String>> {
        self.typed(LOCKABLE_FIELD, FieldKind::Enum, |v| v.as_str().map(str::to_string))
    }

    /// The lock flag as last written or loaded.
    ///
    /// Use [`TrackedEntity::is_locked`] for the lock itself, which stays
    /// set once this flag has been `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if `hwTypeLocked` was never set or holds a
    /// non-boolean.
    pub fn hw_type_locked(&self) -> Result<Option<bool>> {
        self.typed(LOCK_FLAG, FieldKind::Bool, FieldValue::as_bool)
    }

    /// Whether the RFP is connected to the OMM.
    ///
    /// # Errors
    ///
    /// Returns an error if `connected` was never set or holds a non-boolean.
    pub fn is_connected(&self) -> Result<Option<bool>> {
        self.typed("connected", FieldKind::Bool, FieldValue::as_bool)
    }

    /// Sets the RFP name.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in schema; returns the error of
    /// [`TrackedEntity::set`] otherwise.
    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        self.entity.set("name", FieldValue::Str(name.into()))
    }

    /// Sets the hardware type.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Immutable`](crate::error::FieldError::Immutable)
    /// if the hardware type is locked and already set.
    pub fn set_hw_type(&self, hw_type: impl Into<String>) -> Result<()> {
        self.entity.set(LOCKABLE_FIELD, FieldValue::enum_tag(hw_type))
    }

    fn typed<T>(
        &self,
        name: &str,
        kind: FieldKind,
        extract: impl FnOnce(&FieldValue) -> Option<T>,
    ) -> Result<Option<T>> {
        let value = self.entity.get(name)?;
        if value.is_null() {
            return Ok(None);
        }
        match extract(&value) {
            Some(v) => Ok(Some(v)),
            None => Err(SchemaError::TypeMismatch {
                field: name.to_string(),
                expected: kind,
                actual: value.kind().unwrap_or(kind),
            }
            .into()),
        }
    }
}

impl<O> Deref for Rfp<O> {
    type Target = TrackedEntity<O>;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

impl<O> std::fmt::Debug for Rfp<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rfp").field(&self.entity).finish()
    }
}
