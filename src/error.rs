// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `omm_lib` library.
//!
//! Field access failures ([`FieldError`]) and schema violations
//! ([`SchemaError`]) are both wrapped by the top-level [`Error`].

use thiserror::Error;

use crate::types::FieldKind;

/// The main error type for this library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Error occurred while reading or writing an entity field.
    #[error("field error: {0}")]
    Field(#[from] FieldError),

    /// A value did not match the registered schema.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors related to reading and writing entity fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field is locked and already holds a value.
    #[error("field `{field}` is immutable once locked")]
    Immutable {
        /// The field that was written.
        field: String,
    },

    /// The field was never set.
    #[error("no such field: {0}")]
    NoSuchField(String),
}

/// Errors related to schema validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The field name is not registered in the schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The value kind does not match the registered kind.
    #[error("field `{field}` expects {expected}, got {actual}")]
    TypeMismatch {
        /// The field that was written.
        field: String,
        /// The kind registered in the schema.
        expected: FieldKind,
        /// The kind of the rejected value.
        actual: FieldKind,
    },

    /// The value cannot be represented as a field value.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is an immutable field rejection.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Field(FieldError::Immutable { .. }))
    }

    /// Returns `true` if this is a read of a field that was never set.
    #[must_use]
    pub fn is_no_such_field(&self) -> bool {
        matches!(self, Self::Field(FieldError::NoSuchField(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immutable_display() {
        let err = FieldError::Immutable {
            field: "hwType".to_string(),
        };
        assert_eq!(err.to_string(), "field `hwType` is immutable once locked");
    }

    #[test]
    fn error_from_field_error() {
        let err: Error = FieldError::NoSuchField("id".to_string()).into();
        assert!(err.is_no_such_field());
        assert!(!err.is_immutable());
        assert_eq!(err.to_string(), "field error: no such field: id");
    }

    #[test]
    fn type_mismatch_display() {
        let err = SchemaError::TypeMismatch {
            field: "rpn".to_string(),
            expected: FieldKind::Int,
            actual: FieldKind::Str,
        };
        assert_eq!(err.to_string(), "field `rpn` expects int, got str");
    }
}
