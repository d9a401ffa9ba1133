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

//! # JSON Value Model
//!
//! This crate contains the generic representation of JSON documents used by the rest of the
//! workspace. A [`Value`] is one of a closed set of variants (object, array, string, number,
//! boolean and null). Values are immutable once built; objects and arrays are assembled with
//! the append-only [`ObjectBuilder`] and [`ArrayBuilder`] types and then frozen.
//!
//! Numbers are held as arbitrary precision decimals (see [`Number`]) so that no precision is
//! lost when a document is read and then written again. Two numbers are equal when their
//! decimal values are equal, so `10` and `10.0` compare as equal.
//!
//! Object members are always kept in key order. Two objects with the same members will
//! therefore always iterate (and serialize) identically, regardless of the order in which
//! the members were added.

pub use num_bigint as bigint;

mod number;
mod value;

pub use number::{Number, ParseNumberError};
pub use value::{Array, ArrayBuilder, Object, ObjectBuilder, Value, ValueKind};
