// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dynamic field values.
//!
//! Values arrive already decoded from the wire by the owning client, so
//! this module only models the handful of scalar shapes an OMM entity
//! attribute can take.

use std::fmt;

use crate::error::SchemaError;

use super::FieldKind;

/// The value of a single entity field.
///
/// The `Display` implementation produces the wire text of the value, which
/// is what an XML attribute carries.
///
/// # Examples
///
/// ```
/// use omm_lib::types::{FieldKind, FieldValue};
///
/// let rpn = FieldValue::from(12);
/// assert_eq!(rpn.as_int(), Some(12));
/// assert_eq!(rpn.kind(), Some(FieldKind::Int));
///
/// let hw = FieldValue::enum_tag("RFP35");
/// assert_eq!(hw.as_str(), Some("RFP35"));
/// assert_eq!(hw.to_string(), "RFP35");
///
/// assert!(FieldValue::from(None::<bool>).is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value. Setting a field to `Null` still counts as setting it.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// Free-form text.
    Str(String),
    /// An enum tag. Serialized as a plain string.
    Enum(String),
}

impl FieldValue {
    /// Creates an enum tag value.
    #[must_use]
    pub fn enum_tag(tag: impl Into<String>) -> Self {
        Self::Enum(tag.into())
    }

    /// Returns the kind of this value, or `None` for [`FieldValue::Null`].
    #[must_use]
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(FieldKind::Bool),
            Self::Int(_) => Some(FieldKind::Int),
            Self::Str(_) => Some(FieldKind::Str),
            Self::Enum(_) => Some(FieldKind::Enum),
        }
    }

    /// Returns `true` if this is [`FieldValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the text of a string or enum tag value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) | Self::Enum(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for FieldValue {
    type Error = SchemaError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .ok_or_else(|| SchemaError::UnsupportedValue(n.to_string())),
            Value::String(s) => Ok(Self::Str(s)),
            other @ (Value::Array(_) | Value::Object(_)) => {
                Err(SchemaError::UnsupportedValue(other.to_string()))
            }
        }
    }
}
