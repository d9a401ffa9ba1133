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

use jsonform_model::Number;
use std::fmt::{Display, Formatter, Write};

/// Controls the layout of the JSON produced by a [`JsonWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintStrategy {
    /// No insignificant whitespace. This is the wire format.
    #[default]
    Compact,
    /// Each member and item on its own line, indented by `indent` spaces per level.
    Pretty { indent: usize },
}

impl PrintStrategy {
    pub fn pretty() -> Self {
        PrintStrategy::Pretty { indent: 4 }
    }

    fn key_separator(&self) -> &'static str {
        match self {
            PrintStrategy::Compact => ":",
            PrintStrategy::Pretty { .. } => ": ",
        }
    }

    fn line_padding(&self, depth: usize) -> Padding {
        match self {
            PrintStrategy::Compact => NO_SPACE,
            PrintStrategy::Pretty { indent } => Padding::Complex {
                prefix: NEW_LINE,
                block: SPACE,
                repeats: indent * depth,
            },
        }
    }
}

/// Padding written between the tokens of a document.
enum Padding {
    Simple(&'static str),
    Complex {
        prefix: &'static str,
        block: &'static str,
        repeats: usize,
    },
}

const NO_SPACE: Padding = Padding::Simple("");
const SPACE: &str = " ";
const NEW_LINE: &str = "\n";

impl Display for Padding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Padding::Simple(padding) => f.write_str(padding),
            Padding::Complex {
                prefix,
                block,
                repeats,
            } => {
                f.write_str(prefix)?;
                for _ in 0..*repeats {
                    f.write_str(block)?;
                }
                Ok(())
            }
        }
    }
}

/// Writes JSON tokens into a text sink.
///
/// Structural operations track whether a member or item has already been written at each
/// level of nesting so that separators are only emitted between entries.
///
/// # Examples
///
/// ```
/// use jsonform_json::JsonWriter;
///
/// let mut out = String::new();
/// let mut writer = JsonWriter::new(&mut out);
/// writer.begin_object().unwrap();
/// writer.write_key("a").unwrap();
/// writer.write_i64(1).unwrap();
/// writer.write_key("b").unwrap();
/// writer.write_null().unwrap();
/// writer.end_object().unwrap();
/// assert_eq!(out, r#"{"a":1,"b":null}"#);
/// ```
pub struct JsonWriter<'a> {
    sink: &'a mut dyn Write,
    strategy: PrintStrategy,
    first: Vec<bool>,
}

impl<'a> JsonWriter<'a> {
    pub fn new(sink: &'a mut dyn Write) -> Self {
        JsonWriter::with_strategy(sink, PrintStrategy::Compact)
    }

    pub fn with_strategy(sink: &'a mut dyn Write, strategy: PrintStrategy) -> Self {
        JsonWriter {
            sink,
            strategy,
            first: vec![],
        }
    }

    pub fn strategy(&self) -> PrintStrategy {
        self.strategy
    }

    /// Write a string literal, escaping the same characters that the reader accepts as escapes.
    pub fn write_string(&mut self, value: &str) -> std::fmt::Result {
        let JsonWriter { sink, .. } = self;
        sink.write_char('"')?;
        for c in value.chars() {
            match c {
                '"' => sink.write_str("\\\"")?,
                '\\' => sink.write_str("\\\\")?,
                '/' => sink.write_str("\\/")?,
                '\u{08}' => sink.write_str("\\b")?,
                '\u{0c}' => sink.write_str("\\f")?,
                '\n' => sink.write_str("\\n")?,
                '\r' => sink.write_str("\\r")?,
                '\t' => sink.write_str("\\t")?,
                _ => sink.write_char(c)?,
            }
        }
        sink.write_char('"')
    }

    pub fn write_number(&mut self, value: &Number) -> std::fmt::Result {
        write!(self.sink, "{}", value)
    }

    pub fn write_i64(&mut self, value: i64) -> std::fmt::Result {
        write!(self.sink, "{}", value)
    }

    pub fn write_u64(&mut self, value: u64) -> std::fmt::Result {
        write!(self.sink, "{}", value)
    }

    pub fn write_i128(&mut self, value: i128) -> std::fmt::Result {
        write!(self.sink, "{}", value)
    }

    pub fn write_u128(&mut self, value: u128) -> std::fmt::Result {
        write!(self.sink, "{}", value)
    }

    /// Write the shortest text that reads back as the same `f64`. JSON has no representation
    /// for non-finite values so these are written as `null`.
    pub fn write_f64(&mut self, value: f64) -> std::fmt::Result {
        if value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            self.sink.write_str(buffer.format_finite(value))
        } else {
            self.write_null()
        }
    }

    pub fn write_boolean(&mut self, value: bool) -> std::fmt::Result {
        self.sink.write_str(if value { "true" } else { "false" })
    }

    pub fn write_null(&mut self) -> std::fmt::Result {
        self.sink.write_str("null")
    }

    fn begin(&mut self, open: char) -> std::fmt::Result {
        self.first.push(true);
        self.sink.write_char(open)
    }

    fn end(&mut self, close: char) -> std::fmt::Result {
        let JsonWriter {
            sink,
            strategy,
            first,
        } = self;
        if let Some(empty) = first.pop() {
            if !empty {
                write!(sink, "{}", strategy.line_padding(first.len()))?;
            }
        }
        sink.write_char(close)
    }

    fn separate(&mut self) -> std::fmt::Result {
        let JsonWriter {
            sink,
            strategy,
            first,
        } = self;
        let depth = first.len();
        if let Some(is_first) = first.last_mut() {
            if *is_first {
                *is_first = false;
            } else {
                sink.write_char(',')?;
            }
        }
        write!(sink, "{}", strategy.line_padding(depth))
    }

    pub fn begin_object(&mut self) -> std::fmt::Result {
        self.begin('{')
    }

    /// Write the key of the next member of the current object, preceded by a separator if
    /// this is not the first member.
    pub fn write_key(&mut self, key: &str) -> std::fmt::Result {
        self.separate()?;
        self.write_string(key)?;
        let separator = self.strategy.key_separator();
        self.sink.write_str(separator)
    }

    pub fn end_object(&mut self) -> std::fmt::Result {
        self.end('}')
    }

    pub fn begin_array(&mut self) -> std::fmt::Result {
        self.begin('[')
    }

    /// Prepare to write the next item of the current array.
    pub fn array_item(&mut self) -> std::fmt::Result {
        self.separate()
    }

    pub fn end_array(&mut self) -> std::fmt::Result {
        self.end(']')
    }
}
