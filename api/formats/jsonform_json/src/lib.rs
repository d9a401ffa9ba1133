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

//! # JSON Text Format
//!
//! A character level reader ([`JsonReader`]) and writer ([`JsonWriter`]) for JSON text, and
//! functions to read and write the generic [`Value`] model.
//!
//! The grammar differs from the standard in two deliberate ways:
//!
//! 1. If a value is expected and the input is already exhausted, `null` is produced rather than
//!    an error.
//! 2. Only the escapes `\\`, `\"`, `\/`, `\b`, `\f`, `\n`, `\r` and `\t` are recognized. Any
//!    other escape (including `\u`) is an error. Unescaped control characters are accepted.

mod error;
mod reader;
mod value;
mod writer;

use jsonform_model::Value;
use std::fmt::{Display, Formatter};

pub use error::{ParseError, ParseErrorKind};
pub use reader::{JsonReader, MAX_DEPTH};
pub use value::{read_value, write_value};
pub use writer::{JsonWriter, PrintStrategy};

/// Parse a complete document. Anything other than whitespace after the value is an error.
///
/// # Examples
///
/// ```
/// use jsonform_json::parse_value;
/// use jsonform_model::Value;
///
/// let value = parse_value(r#"{"b": [1, 2.0], "a": null}"#).unwrap();
/// let expected = Value::object()
///     .add("a", Value::Null)
///     .add("b", Value::array().add(1).add(2).build())
///     .build();
/// assert_eq!(value, expected);
/// ```
pub fn parse_value(input: &str) -> Result<Value, ParseError> {
    let mut reader = JsonReader::new(input);
    let value = read_value(&mut reader)?;
    reader.expect_end()?;
    Ok(value)
}

/// Print the compact JSON representation of a [`Value`].
pub fn print_value(value: &Value) -> impl Display + '_ {
    JsonPrint(value, PrintStrategy::Compact)
}

/// Print an indented JSON representation of a [`Value`].
pub fn print_value_pretty(value: &Value) -> impl Display + '_ {
    JsonPrint(value, PrintStrategy::pretty())
}

struct JsonPrint<'a>(&'a Value, PrintStrategy);

impl<'a> Display for JsonPrint<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let JsonPrint(value, strategy) = self;
        let mut writer = JsonWriter::with_strategy(f, *strategy);
        write_value(value, &mut writer)
    }
}

/// Interpret the body of a request as a JSON document.
pub fn parse_request_body(body: &[u8]) -> Result<Value, ParseError> {
    match std::str::from_utf8(body) {
        Ok(text) => parse_value(text),
        Err(err) => Err(ParseError::new(
            ParseErrorKind::InvalidUtf8,
            String::from_utf8_lossy(&body[..err.valid_up_to()])
                .chars()
                .count()
                + 1,
        )),
    }
}

/// Encode a JSON document as the body of a response.
pub fn serialize_response(value: &Value) -> Vec<u8> {
    print_value(value).to_string().into_bytes()
}
