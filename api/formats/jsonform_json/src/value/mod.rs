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

#[cfg(test)]
mod tests;

use crate::error::{ParseError, ParseErrorKind};
use crate::reader::JsonReader;
use crate::writer::JsonWriter;
use jsonform_model::Value;

/// Read a single [`Value`], dispatching on the next significant character. If the input is
/// already exhausted, [`Value::Null`] is returned rather than an error.
pub fn read_value(reader: &mut JsonReader<'_>) -> Result<Value, ParseError> {
    match reader.peek_token() {
        None => Ok(Value::Null),
        Some('{') => {
            let mut builder = Value::object();
            reader.read_object(|reader, key| {
                let value = read_value(reader)?;
                builder.insert(key, value);
                Ok::<_, ParseError>(())
            })?;
            Ok(builder.build())
        }
        Some('[') => {
            let mut builder = Value::array();
            reader.read_array(|reader| {
                let value = read_value(reader)?;
                builder.push(value);
                Ok::<_, ParseError>(())
            })?;
            Ok(builder.build())
        }
        Some('"') => reader.read_string().map(Value::String),
        Some('t' | 'f') => reader.read_boolean().map(Value::Boolean),
        Some('n') => reader.read_null().map(|_| Value::Null),
        Some(c) if c == '-' || c.is_ascii_digit() => reader.read_number().map(Value::Number),
        Some(found) => Err(reader.error(ParseErrorKind::UnexpectedCharacter {
            expected: "a value",
            found,
        })),
    }
}

/// Write a [`Value`]. Object members are always written in key order so two equal objects
/// produce identical text, however they were constructed.
pub fn write_value(value: &Value, writer: &mut JsonWriter<'_>) -> std::fmt::Result {
    match value {
        Value::Null => writer.write_null(),
        Value::Boolean(b) => writer.write_boolean(*b),
        Value::Number(n) => writer.write_number(n),
        Value::String(s) => writer.write_string(s),
        Value::Array(arr) => {
            writer.begin_array()?;
            for item in arr {
                writer.array_item()?;
                write_value(item, writer)?;
            }
            writer.end_array()
        }
        Value::Object(obj) => {
            writer.begin_object()?;
            for (key, member) in obj {
                writer.write_key(key)?;
                write_value(member, writer)?;
            }
            writer.end_object()
        }
    }
}
