// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-way field locking.

use std::collections::HashMap;

use crate::types::FieldValue;

/// Names a lockable field and the boolean flag that locks it.
///
/// Once the lock flag has been `true`, the lockable field can only be written
/// if it never held a value.
///
/// # Examples
///
/// ```
/// use omm_lib::entity::LockRule;
///
/// let rule = LockRule::rfp_hw_type();
/// assert_eq!(rule.lockable_field(), "hwType");
/// assert_eq!(rule.lock_flag(), "hwTypeLocked");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockRule {
    lockable_field: String,
    lock_flag: String,
}

impl LockRule {
    /// Creates a lock rule.
    #[must_use]
    pub fn new(lockable_field: impl Into<String>, lock_flag: impl Into<String>) -> Self {
        Self {
            lockable_field: lockable_field.into(),
            lock_flag: lock_flag.into(),
        }
    }

    /// The RFP hardware type rule: `hwType` locked by `hwTypeLocked`.
    #[must_use]
    pub fn rfp_hw_type() -> Self {
        Self::new(crate::rfp::LOCKABLE_FIELD, crate::rfp::LOCK_FLAG)
    }

    /// Returns the name of the field that becomes immutable.
    #[must_use]
    pub fn lockable_field(&self) -> &str {
        &self.lockable_field
    }

    /// Returns the name of the flag that locks the field.
    #[must_use]
    pub fn lock_flag(&self) -> &str {
        &self.lock_flag
    }

    /// Returns `true` if storing `value` under `name` locks the field.
    ///
    /// Only `Bool(true)` on the lock flag locks; an absent, null or `false`
    /// flag does not.
    pub(crate) fn locks(&self, name: &str, value: &FieldValue) -> bool {
        name == self.lock_flag && matches!(value, FieldValue::Bool(true))
    }

    /// Returns `true` if writing `name` must be rejected.
    pub(crate) fn blocks(
        &self,
        name: &str,
        state: LockState,
        fields: &HashMap<String, FieldValue>,
    ) -> bool {
        name == self.lockable_field
            && state.is_locked()
            && fields.contains_key(&self.lockable_field)
    }
}

/// Lock state of the lockable field.
///
/// The transition is one way: once the lock flag has been observed `true`,
/// the state stays [`LockState::Locked`] even if the flag is later written
/// back to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockState {
    /// The lockable field can be written.
    #[default]
    Unlocked,
    /// The lockable field can only receive its first value.
    Locked,
}

impl LockState {
    /// Returns `true` if locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}
