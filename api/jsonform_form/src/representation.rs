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

use crate::descriptor::TypeDescriptor;
use crate::error::{FormError, ModelError};
use crate::registry::Registry;
use jsonform_json::{JsonReader, JsonWriter, ParseErrorKind};
use jsonform_model::ValueKind;
use std::sync::Arc;

/// A codec for values of one type, operating directly against the JSON reader and writer.
/// Representations are built once per [`TypeDescriptor`] and shared; they are never mutated
/// after construction.
pub trait Representation<T>: Send + Sync {
    /// Read exactly one value from the reader.
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<T, FormError>;

    fn write(&self, value: &T, writer: &mut JsonWriter<'_>) -> Result<(), FormError>;

    /// Interpret the key of a JSON object member as a value. By default, the key is treated as
    /// the JSON text of the value.
    fn read_key(&self, key: &str) -> Result<T, FormError> {
        let mut reader = JsonReader::new(key);
        let value = self.read(&mut reader)?;
        reader.expect_end()?;
        Ok(value)
    }

    /// Produce the key of a JSON object member from a value. By default, this is the JSON text
    /// of the value.
    fn write_key(&self, value: &T) -> Result<String, FormError> {
        let mut key = String::new();
        let mut writer = JsonWriter::new(&mut key);
        self.write(value, &mut writer)?;
        Ok(key)
    }
}

/// A type that can be mapped to and from JSON through the [`Registry`].
///
/// Implementations are provided for the primitive types, [`String`], [`Vec`],
/// [`std::collections::BTreeSet`], [`std::collections::BTreeMap`],
/// [`std::collections::HashMap`], [`Option`] and [`Box`]. Record types implement it with
/// `#[derive(Record)]` or by hand using [`crate::RecordRepresentation`].
pub trait Form: Sized + 'static {
    /// The descriptor under which the representation of this type is cached.
    fn descriptor() -> TypeDescriptor;

    /// Build the representation of this type. Representations of any component types must be
    /// obtained from the registry.
    fn make_representation(
        registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError>;

    /// Whether this value is the "absent" marker for its type. Absent record members are
    /// omitted when the record is written.
    fn is_absent(&self) -> bool {
        false
    }
}

/// The kind of value that starts with a given character.
fn kind_of(c: char) -> Option<ValueKind> {
    match c {
        '{' => Some(ValueKind::Object),
        '[' => Some(ValueKind::Array),
        '"' => Some(ValueKind::String),
        't' | 'f' => Some(ValueKind::Boolean),
        'n' => Some(ValueKind::Null),
        '-' | '0'..='9' => Some(ValueKind::Number),
        _ => None,
    }
}

/// Check that the next value in the reader is of the expected kind without consuming it.
pub fn expect_kind(reader: &mut JsonReader<'_>, expected: ValueKind) -> Result<(), FormError> {
    match reader.peek_token() {
        None => Err(reader.error(ParseErrorKind::UnexpectedEnd).into()),
        Some(c) => match kind_of(c) {
            Some(found) if found == expected => Ok(()),
            Some(found) => Err(ModelError::UnexpectedKind { expected, found }.into()),
            None => Err(reader
                .error(ParseErrorKind::UnexpectedCharacter {
                    expected: "a value",
                    found: c,
                })
                .into()),
        },
    }
}
