// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Semantic field kinds.

use std::fmt;

/// The semantic type of a field value.
///
/// # Examples
///
/// ```
/// use omm_lib::types::FieldKind;
///
/// assert_eq!(FieldKind::Enum.as_str(), "enum");
/// assert_eq!(FieldKind::Int.to_string(), "int");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A boolean flag.
    Bool,
    /// A signed integer.
    Int,
    /// Free-form text.
    Str,
    /// A tag from a closed set of names, such as a hardware type.
    Enum,
}

impl FieldKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Str => "str",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
