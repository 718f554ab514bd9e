// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for entity fields.
//!
//! Entity storage is schema-agnostic: every field holds a [`FieldValue`],
//! and a [`FieldKind`] names the semantic type a schema expects.
//!
//! # Types
//!
//! - [`FieldValue`] - Null, boolean, integer, string or enum tag
//! - [`FieldKind`] - The semantic type of a non-null value

mod kind;
mod value;

pub use kind::FieldKind;
pub use value::FieldValue;
