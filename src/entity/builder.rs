// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracked entity builder.

use std::sync::Arc;

use crate::schema::Schema;
use crate::types::FieldValue;

use super::{BulkLoadPolicy, LockRule, TrackedEntity};

/// Builder for a [`TrackedEntity`].
///
/// Defaults: no lock rule, no schema, [`BulkLoadPolicy::Overwrite`] and no
/// initial snapshot.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use omm_lib::entity::{BulkLoadPolicy, LockRule, TrackedEntity};
/// use omm_lib::rfp;
///
/// let entity = TrackedEntity::builder("session-1")
///     .with_lock_rule(LockRule::rfp_hw_type())
///     .with_schema(rfp::schema())
///     .with_bulk_load_policy(BulkLoadPolicy::RespectLock)
///     .build();
///
/// assert_eq!(*entity.owner(), "session-1");
/// ```
pub struct TrackedEntityBuilder<O> {
    owner: O,
    lock_rule: Option<LockRule>,
    schema: Option<Arc<Schema>>,
    bulk_load_policy: BulkLoadPolicy,
    snapshot: Vec<(String, FieldValue)>,
}

impl<O> TrackedEntityBuilder<O> {
    pub(crate) fn new(owner: O) -> Self {
        Self {
            owner,
            lock_rule: None,
            schema: None,
            bulk_load_policy: BulkLoadPolicy::default(),
            snapshot: Vec::new(),
        }
    }

    /// Sets the lock rule.
    #[must_use]
    pub fn with_lock_rule(mut self, rule: LockRule) -> Self {
        self.lock_rule = Some(rule);
        self
    }

    /// Sets the schema individual writes are validated against.
    #[must_use]
    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets how snapshot loads treat the lockable field.
    #[must_use]
    pub fn with_bulk_load_policy(mut self, policy: BulkLoadPolicy) -> Self {
        self.bulk_load_policy = policy;
        self
    }

    /// Adds snapshot entries loaded at build time, without change tracking.
    ///
    /// Can be called several times; entries are loaded in order.
    #[must_use]
    pub fn with_snapshot<I, K, V>(mut self, snapshot: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.snapshot
            .extend(snapshot.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builds the entity and loads the snapshot, if any.
    #[must_use]
    pub fn build(self) -> TrackedEntity<O> {
        let entity = TrackedEntity::from_parts(
            self.owner,
            self.lock_rule,
            self.schema,
            self.bulk_load_policy,
        );
        if !self.snapshot.is_empty() {
            entity.load_snapshot(self.snapshot);
        }
        entity
    }
}

impl<O> std::fmt::Debug for TrackedEntityBuilder<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedEntityBuilder")
            .field("lock_rule", &self.lock_rule)
            .field("schema", &self.schema.as_ref().map(|s| s.len()))
            .field("bulk_load_policy", &self.bulk_load_policy)
            .field("snapshot", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}
