// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field schema registration and validation.
//!
//! A [`Schema`] maps field names to the [`FieldKind`] their values must
//! have. Attaching a schema to a [`TrackedEntity`](crate::entity::TrackedEntity)
//! makes individual writes reject unknown names and mistyped values, while
//! the entity storage itself stays schema-agnostic.
//!
//! # Examples
//!
//! ```
//! use omm_lib::schema::Schema;
//! use omm_lib::types::{FieldKind, FieldValue};
//!
//! let schema = Schema::builder()
//!     .field("id", FieldKind::Int)
//!     .field("hwType", FieldKind::Enum)
//!     .build();
//!
//! // Strings are accepted for enum fields and normalized into enum tags
//! let value = schema.validate("hwType", &FieldValue::from("RFP35")).unwrap();
//! assert_eq!(value, FieldValue::enum_tag("RFP35"));
//!
//! assert!(schema.validate("id", &FieldValue::from("three")).is_err());
//! assert!(schema.validate("unknown", &FieldValue::Null).is_err());
//! ```

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::types::{FieldKind, FieldValue};

/// A registry of field names and their kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: HashMap<String, FieldKind>,
}

impl Schema {
    /// Creates a builder for a new schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Returns the registered kind of a field.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Returns `true` if the field is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the registered field names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the stored form of a value for `name`.
    ///
    /// A string for an enum field becomes an enum tag; everything else,
    /// including values for unregistered names, is returned unchanged.
    #[must_use]
    pub fn normalize(&self, name: &str, value: FieldValue) -> FieldValue {
        match (self.kind_of(name), value) {
            (Some(FieldKind::Enum), FieldValue::Str(tag)) => FieldValue::Enum(tag),
            (_, value) => value,
        }
    }

    /// Validates a value against the kind registered for `name`.
    ///
    /// `Null` is accepted for every field. A string is accepted for an enum
    /// field and returned as an enum tag.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] if `name` is not registered, or
    /// [`SchemaError::TypeMismatch`] if the value has another kind.
    pub fn validate(&self, name: &str, value: &FieldValue) -> Result<FieldValue, SchemaError> {
        let expected = self
            .kind_of(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;

        let Some(actual) = value.kind() else {
            return Ok(FieldValue::Null);
        };

        match (expected, value) {
            (FieldKind::Enum, FieldValue::Str(tag)) => Ok(FieldValue::Enum(tag.clone())),
            _ if expected == actual => Ok(value.clone()),
            _ => Err(SchemaError::TypeMismatch {
                field: name.to_string(),
                expected,
                actual,
            }),
        }
    }
}

/// Builder for a [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: HashMap<String, FieldKind>,
}

impl SchemaBuilder {
    /// Registers a field. Registering the same name twice keeps the last kind.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Registers several fields of the same kind.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I, kind: FieldKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.fields.insert(name.into(), kind);
        }
        self
    }

    /// Builds the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}
