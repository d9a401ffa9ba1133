// Copyright 2015-2024 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Type Driven JSON Representations
//!
//! This crate contains the [`Form`] trait that describes how a type is mapped to and from JSON
//! text, and the [`Registry`] that builds and caches a [`Representation`] for each type. A
//! representation reads and writes directly against the JSON reader and writer without building
//! an intermediate [`jsonform_model::Value`].
//!
//! Implementations are provided for the primitive types and the common standard library
//! collections. Structured types implement [`Record`], usually with `#[derive(Record)]` from the
//! `jsonform` crate, which lists their members along with the order in which they are written.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let mut scores = BTreeMap::new();
//! scores.insert("alice".to_string(), vec![1, 2]);
//! scores.insert("bob".to_string(), vec![]);
//!
//! let text = jsonform_form::write_json(&scores).unwrap();
//! assert_eq!(text, r#"{"alice":[1,2],"bob":[]}"#);
//!
//! let restored: BTreeMap<String, Vec<i32>> = jsonform_form::read_json(&text).unwrap();
//! assert_eq!(restored, scores);
//! ```

#[doc(hidden)]
pub use jsonform_json as json;
#[doc(hidden)]
pub use jsonform_model as model;

mod descriptor;
mod error;
mod impls;
mod record;
mod registry;
mod representation;

pub use descriptor::{FormKind, RawType, TypeDescriptor};
pub use error::{FormError, ModelError};
pub use impls::*;
pub use jsonform_json::PrintStrategy;
pub use record::{MemberSpec, Record, RecordRepresentation};
pub use registry::Registry;
pub use representation::{expect_kind, Form, Representation};

/// Read a complete document as a value of a type, using the global [`Registry`].
pub fn read_json<T: Form>(input: &str) -> Result<T, FormError> {
    Registry::global().read_str(input)
}

/// Write a value as a compact document, using the global [`Registry`].
pub fn write_json<T: Form>(value: &T) -> Result<String, FormError> {
    Registry::global().write_string(value, PrintStrategy::Compact)
}

/// Write a value as an indented document, using the global [`Registry`].
pub fn write_json_pretty<T: Form>(value: &T) -> Result<String, FormError> {
    Registry::global().write_string(value, PrintStrategy::pretty())
}
