// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered pending-change log.
//!
//! A [`ChangeSet`] holds the newest value of every field written since the
//! last clear. Entries keep the position of their first write: writing a
//! field again updates its value in place.
//!
//! # Examples
//!
//! ```
//! use omm_lib::entity::ChangeSet;
//! use omm_lib::types::FieldValue;
//!
//! let mut changes = ChangeSet::new();
//! changes.record("a", FieldValue::Int(1));
//! changes.record("b", FieldValue::Int(2));
//! changes.record("a", FieldValue::Int(3));
//!
//! assert_eq!(changes.names(), vec!["a", "b"]);
//! assert_eq!(changes.get("a"), Some(&FieldValue::Int(3)));
//! ```

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

use crate::types::FieldValue;

/// Field writes accumulated since the last clear, in first-write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: Vec<(String, FieldValue)>,
    /// Position of each name in `entries`.
    index: HashMap<String, usize>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a write. The newest value wins; the position stays that of
    /// the first write.
    pub fn record(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(&pos) = self.index.get(&name) {
            self.entries[pos].1 = value;
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push((name, value));
        }
    }

    /// Returns the pending value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    /// Returns `true` if the field has a pending change.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of changed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in first-write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the changed field names in first-write order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Returns `(name, wire text)` pairs in first-write order, ready to be
    /// written as XML attributes of an update request.
    #[must_use]
    pub fn to_attributes(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }

    /// Removes the entries of `acknowledged` whose pending value is still
    /// the acknowledged one, and returns how many were removed.
    ///
    /// Entries rewritten after `acknowledged` was taken are kept.
    pub(crate) fn remove_acknowledged(&mut self, acknowledged: &ChangeSet) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|(name, value)| acknowledged.get(name) != Some(value));

        let removed = before - self.entries.len();
        if removed > 0 {
            self.index = self
                .entries
                .iter()
                .enumerate()
                .map(|(pos, (name, _))| (name.clone(), pos))
                .collect();
        }
        removed
    }
}

impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = (&'a str, &'a FieldValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a FieldValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut changes = Self::new();
        for (name, value) in iter {
            changes.record(name, value);
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_value_wins_first_position_kept() {
        let changes: ChangeSet = [
            ("a", FieldValue::Int(1)),
            ("b", FieldValue::Int(2)),
            ("a", FieldValue::Int(3)),
            ("c", FieldValue::Int(4)),
        ]
        .into_iter()
        .collect();

        let entries: Vec<(&str, &FieldValue)> = changes.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("a", &FieldValue::Int(3)),
                ("b", &FieldValue::Int(2)),
                ("c", &FieldValue::Int(4)),
            ]
        );
    }

    #[test]
    fn clear_empties_everything() {
        let mut changes = ChangeSet::new();
        changes.record("a", FieldValue::Bool(true));
        changes.clear();
        assert!(changes.is_empty());
        assert!(!changes.contains("a"));

        changes.record("b", FieldValue::Null);
        assert_eq!(changes.names(), vec!["b"]);
    }

    #[test]
    fn to_attributes_uses_wire_text() {
        let mut changes = ChangeSet::new();
        changes.record("dectOn", FieldValue::Bool(false));
        changes.record("hwType", FieldValue::enum_tag("RFP35"));
        changes.record("pagingArea", FieldValue::Int(-1));

        assert_eq!(
            changes.to_attributes(),
            vec![
                ("dectOn".to_string(), "false".to_string()),
                ("hwType".to_string(), "RFP35".to_string()),
                ("pagingArea".to_string(), "-1".to_string()),
            ]
        );
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut changes = ChangeSet::new();
        changes.record("z", FieldValue::Int(1));
        changes.record("a", FieldValue::from("x"));

        let json = serde_json::to_string(&changes).unwrap();
        assert_eq!(json, r#"{"z":1,"a":"x"}"#);
    }

    #[test]
    fn remove_acknowledged_keeps_rewritten_entries() {
        let mut pending = ChangeSet::new();
        pending.record("a", FieldValue::Int(1));
        pending.record("b", FieldValue::Int(2));
        pending.record("c", FieldValue::Int(3));

        let sent = pending.clone();
        pending.record("b", FieldValue::Int(20));
        pending.record("d", FieldValue::Int(4));

        assert_eq!(pending.remove_acknowledged(&sent), 2);
        assert_eq!(pending.names(), vec!["b", "d"]);
        assert_eq!(pending.get("b"), Some(&FieldValue::Int(20)));

        // Index is rebuilt after removal
        pending.record("d", FieldValue::Int(40));
        assert_eq!(pending.get("d"), Some(&FieldValue::Int(40)));
        assert_eq!(pending.len(), 2);
    }
}
