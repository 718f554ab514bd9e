// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change-tracked entity with a lockable field.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{FieldError, Result, SchemaError};
use crate::schema::Schema;
use crate::types::FieldValue;

use super::builder::TrackedEntityBuilder;
use super::{ChangeSet, LockRule, LockState};

/// How a bulk snapshot load treats the lockable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BulkLoadPolicy {
    /// Install every snapshot entry, including a locked lockable field.
    ///
    /// The server is authoritative for snapshots, so the lock is not
    /// checked on this path.
    #[default]
    Overwrite,
    /// Skip the lockable field when the entity is locked and the field
    /// already holds a value.
    ///
    /// Only the last lockable field entry of a snapshot is considered.
    RespectLock,
}

/// Fields, pending changes and the latched lock, always updated together.
#[derive(Debug, Default)]
struct Inner {
    fields: HashMap<String, FieldValue>,
    pending: ChangeSet,
    lock: LockState,
}

impl Inner {
    /// Stores a field value and latches the lock if the value locks it.
    fn store(&mut self, rule: Option<&LockRule>, name: String, value: FieldValue) {
        if rule.is_some_and(|rule| rule.locks(&name, &value)) {
            self.lock = LockState::Locked;
        }
        self.fields.insert(name, value);
    }

    fn blocks(&self, rule: Option<&LockRule>, name: &str) -> bool {
        rule.is_some_and(|rule| rule.blocks(name, self.lock, &self.fields))
    }
}

/// Client-side proxy of a remote entity with change tracking.
///
/// Every [`set`](Self::set) is recorded in an ordered [`ChangeSet`] that the
/// owning client drains to build a partial update request.
/// [`load_snapshot`](Self::load_snapshot) installs server state without
/// recording changes. When a [`LockRule`] is configured, its lockable field
/// rejects writes once the lock flag has been `true` and the field holds a
/// value.
///
/// All methods take `&self`; the entity can be shared behind an `Arc` and
/// written from several threads.
///
/// # Examples
///
/// ```
/// use omm_lib::entity::{LockRule, TrackedEntity};
/// use omm_lib::types::FieldValue;
///
/// # fn main() -> omm_lib::Result<()> {
/// let entity = TrackedEntity::builder(())
///     .with_lock_rule(LockRule::rfp_hw_type())
///     .with_snapshot([("id", FieldValue::Int(3)), ("hwType", FieldValue::enum_tag("A"))])
///     .build();
///
/// // Snapshot values are readable but not pending
/// assert_eq!(entity.get("id")?, FieldValue::Int(3));
/// assert!(entity.pending_changes().is_empty());
///
/// entity.set("hwType", FieldValue::enum_tag("B"))?;
/// entity.set("hwTypeLocked", true)?;
/// assert!(entity.set("hwType", FieldValue::enum_tag("C")).is_err());
///
/// let changes = entity.pending_changes();
/// assert_eq!(changes.names(), vec!["hwType", "hwTypeLocked"]);
/// entity.clear_pending_changes();
/// # Ok(())
/// # }
/// ```
pub struct TrackedEntity<O> {
    owner: O,
    lock_rule: Option<LockRule>,
    schema: Option<Arc<Schema>>,
    bulk_load_policy: BulkLoadPolicy,
    inner: RwLock<Inner>,
}

impl<O> TrackedEntity<O> {
    /// Creates an empty entity with no lock rule and no schema.
    #[must_use]
    pub fn new(owner: O) -> Self {
        Self::builder(owner).build()
    }

    /// Creates an entity seeded with a snapshot. The snapshot is not
    /// recorded as pending changes.
    #[must_use]
    pub fn with_snapshot<I, K, V>(owner: O, snapshot: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::builder(owner).with_snapshot(snapshot).build()
    }

    /// Creates a builder for a configured entity.
    #[must_use]
    pub fn builder(owner: O) -> TrackedEntityBuilder<O> {
        TrackedEntityBuilder::new(owner)
    }

    pub(crate) fn from_parts(
        owner: O,
        lock_rule: Option<LockRule>,
        schema: Option<Arc<Schema>>,
        bulk_load_policy: BulkLoadPolicy,
    ) -> Self {
        Self {
            owner,
            lock_rule,
            schema,
            bulk_load_policy,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Returns the owning client.
    #[must_use]
    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// Returns the configured lock rule.
    #[must_use]
    pub fn lock_rule(&self) -> Option<&LockRule> {
        self.lock_rule.as_ref()
    }

    /// Returns the configured schema.
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// Returns the bulk load policy.
    #[must_use]
    pub fn bulk_load_policy(&self) -> BulkLoadPolicy {
        self.bulk_load_policy
    }

    // ========== Field Access ==========

    /// Writes a field and records the write as a pending change.
    ///
    /// The lock check, the change record and the field update happen under
    /// one write lock. Writing `true` to the lock flag locks the lockable
    /// field for the lifetime of the entity; writing `false` afterwards is
    /// recorded but does not unlock it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a schema is configured and rejects the
    /// value, or [`FieldError::Immutable`] if `name` is the locked lockable
    /// field and already holds a value. Nothing changes on error.
    pub fn set(&self, name: impl Into<String>, value: impl Into<FieldValue>) -> Result<()> {
        let name = name.into();
        let mut value = value.into();
        if let Some(schema) = &self.schema {
            value = schema.validate(&name, &value)?;
        }

        let mut inner = self.inner.write();
        if inner.blocks(self.lock_rule.as_ref(), &name) {
            tracing::debug!(field = %name, "Rejected write to locked field");
            return Err(FieldError::Immutable { field: name }.into());
        }

        tracing::trace!(field = %name, value = %value, "Tracked field write");
        inner.pending.record(name.clone(), value.clone());
        inner.store(self.lock_rule.as_ref(), name, value);
        Ok(())
    }

    /// Reads a field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NoSuchField`] if the field was never set or
    /// loaded.
    pub fn get(&self, name: &str) -> Result<FieldValue> {
        self.inner
            .read()
            .fields
            .get(name)
            .cloned()
            .ok_or_else(|| FieldError::NoSuchField(name.to_string()).into())
    }

    /// Returns `true` if the field holds a value, including `Null`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().fields.contains_key(name)
    }

    /// Returns the names of all fields that hold a value, sorted.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().fields.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns a copy of all fields.
    #[must_use]
    pub fn fields(&self) -> HashMap<String, FieldValue> {
        self.inner.read().fields.clone()
    }

    /// Returns the `id` field, the handle used to name the entity.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NoSuchField`] if `id` was never set.
    pub fn display_id(&self) -> Result<FieldValue> {
        self.get("id")
    }

    // ========== Lock ==========

    /// Returns the lock state of the lockable field.
    ///
    /// Locked once the lock flag was observed `true`, through a write or a
    /// snapshot, regardless of its current value. Always
    /// [`LockState::Unlocked`] without a lock rule.
    #[must_use]
    pub fn lock_state(&self) -> LockState {
        self.inner.read().lock
    }

    /// Returns `true` if the lock flag was ever observed `true`.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_state().is_locked()
    }

    // ========== Snapshots ==========

    /// Installs server state without recording pending changes.
    ///
    /// Existing pending changes are kept. Names outside a configured schema
    /// are stored anyway; strings for enum fields of the schema are stored
    /// as enum tags, as [`set`](Self::set) does. A lock flag of `true` in the
    /// snapshot latches the lock. With [`BulkLoadPolicy::RespectLock`], the lockable
    /// field is skipped when the entity is locked (after the rest of the
    /// snapshot is applied) and the field already holds a value.
    pub fn load_snapshot<I, K, V>(&self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let entries: Vec<(String, FieldValue)> = attributes
            .into_iter()
            .map(|(k, v)| {
                let name: String = k.into();
                let value = match &self.schema {
                    Some(schema) => schema.normalize(&name, v.into()),
                    None => v.into(),
                };
                (name, value)
            })
            .collect();

        if let Some(schema) = &self.schema {
            for (name, _) in entries.iter().filter(|(name, _)| !schema.contains(name)) {
                tracing::warn!(field = %name, "Snapshot field is not in the schema");
            }
        }

        let mut inner = self.inner.write();
        let mut loaded = 0usize;
        let mut deferred = None;

        for (name, value) in entries {
            match &self.lock_rule {
                Some(rule)
                    if self.bulk_load_policy == BulkLoadPolicy::RespectLock
                        && name == rule.lockable_field() =>
                {
                    deferred = Some((name, value));
                }
                _ => {
                    inner.store(self.lock_rule.as_ref(), name, value);
                    loaded += 1;
                }
            }
        }

        if let Some((name, value)) = deferred {
            if inner.blocks(self.lock_rule.as_ref(), &name) {
                tracing::debug!(field = %name, "Skipped locked field in snapshot");
            } else {
                inner.store(self.lock_rule.as_ref(), name, value);
                loaded += 1;
            }
        }

        tracing::debug!(fields = loaded, "Loaded snapshot");
    }

    /// Installs a JSON object snapshot without recording pending changes.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedValue`] if `snapshot` is not an
    /// object or one of its values is not a scalar. Nothing is loaded on
    /// error.
    pub fn load_json_snapshot(&self, snapshot: serde_json::Value) -> Result<()> {
        let serde_json::Value::Object(map) = snapshot else {
            return Err(SchemaError::UnsupportedValue(snapshot.to_string()).into());
        };

        let entries = map
            .into_iter()
            .map(|(name, value)| FieldValue::try_from(value).map(|value| (name, value)))
            .collect::<std::result::Result<Vec<_>, SchemaError>>()?;

        self.load_snapshot(entries);
        Ok(())
    }

    // ========== Pending Changes ==========

    /// Returns a copy of the pending changes in first-write order.
    ///
    /// Pending changes are not cleared; call
    /// [`clear_pending_changes`](Self::clear_pending_changes) or
    /// [`acknowledge_changes`](Self::acknowledge_changes) once the server
    /// accepted the update.
    #[must_use]
    pub fn pending_changes(&self) -> ChangeSet {
        self.inner.read().pending.clone()
    }

    /// Returns `true` if any field was written since the last clear.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.inner.read().pending.is_empty()
    }

    /// Discards all pending changes. Field values are kept.
    pub fn clear_pending_changes(&self) {
        let mut inner = self.inner.write();
        tracing::debug!(changes = inner.pending.len(), "Cleared pending changes");
        inner.pending.clear();
    }

    /// Discards the pending changes that were sent in `sent`.
    ///
    /// A field written again after `sent` was taken keeps its newer pending
    /// value. Returns the number of discarded changes.
    pub fn acknowledge_changes(&self, sent: &ChangeSet) -> usize {
        let removed = self.inner.write().pending.remove_acknowledged(sent);
        tracing::debug!(acknowledged = removed, "Acknowledged pending changes");
        removed
    }
}

impl<O> std::fmt::Debug for TrackedEntity<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("TrackedEntity")
            .field("id", &inner.fields.get("id"))
            .field("fields", &inner.fields.len())
            .field("pending_changes", &inner.pending.len())
            .field("lock_rule", &self.lock_rule)
            .finish_non_exhaustive()
    }
}
