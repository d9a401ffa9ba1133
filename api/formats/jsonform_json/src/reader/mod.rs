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


use crate::error::{ParseError, ParseErrorKind};
use jsonform_model::Number;
use std::iter::Peekable;
use std::str::Chars;

/// The maximum depth to which arrays and objects may be nested.
pub const MAX_DEPTH: usize = 128;

/// A character level reader for JSON text with a single character of lookahead.
///
/// The reader tracks the number of characters that it has consumed so that errors can report
/// the column at which they occurred. Arrays and objects read through the reader may be nested
/// at most [`MAX_DEPTH`] deep. A reader is bound to exactly one input and is not
/// intended to be shared between threads.
///
/// # Examples
///
/// ```
/// use jsonform_json::JsonReader;
///
/// let mut reader = JsonReader::new(r#" "hello" 12.5"#);
/// assert_eq!(reader.read_string().unwrap(), "hello");
/// assert_eq!(reader.read_number().unwrap().to_string(), "12.5");
/// assert!(reader.is_exhausted());
/// ```
#[derive(Debug, Clone)]
pub struct JsonReader<'a> {
    chars: Peekable<Chars<'a>>,
    column: usize,
    depth: usize,
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

impl<'a> JsonReader<'a> {
    pub fn new(input: &'a str) -> Self {
        JsonReader {
            chars: input.chars().peekable(),
            column: 0,
            depth: 0,
        }
    }

    /// The number of characters consumed so far.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    pub fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.column += 1;
        }
        c
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if is_whitespace(c)) {
            self.next_char();
        }
    }

    /// Skip any whitespace and then peek at the next character.
    pub fn peek_token(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek()
    }

    /// The number of arrays and objects currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            Err(ParseError::new(
                ParseErrorKind::NestingTooDeep(MAX_DEPTH),
                self.column,
            ))
        } else {
            self.depth += 1;
            Ok(())
        }
    }

    /// An error at the position of the next, unconsumed, character.
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.column + 1)
    }

    fn unexpected(&mut self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(found) => self.error(ParseErrorKind::UnexpectedCharacter { expected, found }),
            None => self.error(ParseErrorKind::UnexpectedEnd),
        }
    }

    /// Skip whitespace and then consume exactly the expected character.
    pub fn consume(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.next_char();
                Ok(())
            }
            Some(found) => Err(self.error(ParseErrorKind::UnexpectedCharacter {
                expected: expected_name(expected),
                found,
            })),
            None => Err(self.error(ParseErrorKind::UnexpectedEnd)),
        }
    }

    /// Whether only whitespace remains.
    pub fn is_exhausted(&mut self) -> bool {
        self.peek_token().is_none()
    }

    /// Fail if anything other than whitespace remains.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.is_exhausted() {
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::TrailingCharacters))
        }
    }

    pub fn read_string(&mut self) -> Result<String, ParseError> {
        self.consume('"')?;
        let mut output = String::new();
        loop {
            match self.next_char() {
                Some('"') => break Ok(output),
                Some('\\') => {
                    let escaped = match self.next_char() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(other) => {
                            break Err(ParseError::new(
                                ParseErrorKind::InvalidEscape(other),
                                self.column,
                            ))
                        }
                        None => break Err(self.error(ParseErrorKind::UnexpectedEnd)),
                    };
                    output.push(escaped);
                }
                Some(c) => output.push(c),
                None => break Err(self.error(ParseErrorKind::UnexpectedEnd)),
            }
        }
    }

    fn read_digits(&mut self, target: &mut String) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                target.push(c);
                self.next_char();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// Read a number, retaining its exact decimal value.
    pub fn read_number(&mut self) -> Result<Number, ParseError> {
        self.skip_whitespace();
        let negative = if self.peek() == Some('-') {
            self.next_char();
            true
        } else {
            false
        };

        let mut integral = String::new();
        match self.peek() {
            Some('0') => {
                self.next_char();
                integral.push('0');
                if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    return Err(self.error(ParseErrorKind::LeadingZero));
                }
            }
            Some(c) if c.is_ascii_digit() => {
                self.read_digits(&mut integral);
            }
            _ => return Err(self.error(ParseErrorKind::InvalidNumber)),
        }

        let mut fraction = String::new();
        if self.peek() == Some('.') {
            self.next_char();
            if self.read_digits(&mut fraction) == 0 {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
        }

        let mut exponent = 0i64;
        if matches!(self.peek(), Some('e' | 'E')) {
            self.next_char();
            let exp_negative = match self.peek() {
                Some('-') => {
                    self.next_char();
                    true
                }
                Some('+') => {
                    self.next_char();
                    false
                }
                _ => false,
            };
            let mut exp_digits = String::new();
            if self.read_digits(&mut exp_digits) == 0 {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
            let magnitude = exp_digits
                .parse::<i64>()
                .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, self.column))?;
            exponent = if exp_negative { -magnitude } else { magnitude };
        }

        Number::from_decimal_parts(negative, &integral, &fraction, exponent)
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidNumber, self.column))
    }

    fn read_literal(&mut self, literal: &'static str) -> Result<(), ParseError> {
        for expected in literal.chars() {
            match self.peek() {
                Some(c) if c == expected => {
                    self.next_char();
                }
                _ => return Err(self.error(ParseErrorKind::InvalidLiteral(literal))),
            }
        }
        Ok(())
    }

    pub fn read_boolean(&mut self) -> Result<bool, ParseError> {
        match self.peek_token() {
            Some('t') => self.read_literal("true").map(|_| true),
            Some('f') => self.read_literal("false").map(|_| false),
            _ => Err(self.unexpected("a boolean")),
        }
    }

    pub fn read_null(&mut self) -> Result<(), ParseError> {
        match self.peek_token() {
            Some('n') => self.read_literal("null"),
            _ => Err(self.unexpected("null")),
        }
    }

    /// Read an object, calling `on_member` with each key once the reader is positioned at the
    /// start of the corresponding value. The callback must consume exactly that value.
    pub fn read_object<E, F>(&mut self, on_member: F) -> Result<(), E>
    where
        E: From<ParseError>,
        F: FnMut(&mut Self, String) -> Result<(), E>,
    {
        self.consume('{')?;
        self.enter()?;
        let result = self.read_members(on_member);
        self.depth -= 1;
        result
    }

    fn read_members<E, F>(&mut self, mut on_member: F) -> Result<(), E>
    where
        E: From<ParseError>,
        F: FnMut(&mut Self, String) -> Result<(), E>,
    {
        if self.peek_token() == Some('}') {
            self.next_char();
            return Ok(());
        }
        loop {
            if self.peek_token() != Some('"') {
                return Err(match self.peek() {
                    Some(_) => self.error(ParseErrorKind::NonStringKey),
                    None => self.error(ParseErrorKind::UnexpectedEnd),
                }
                .into());
            }
            let key = self.read_string()?;
            self.consume(':')?;
            on_member(self, key)?;
            match self.peek_token() {
                Some(',') => {
                    self.next_char();
                }
                Some('}') => {
                    self.next_char();
                    break Ok(());
                }
                _ => break Err(self.unexpected("',' or '}'").into()),
            }
        }
    }

    /// Read an array, calling `on_item` once the reader is positioned at the start of each
    /// item. The callback must consume exactly that item.
    pub fn read_array<E, F>(&mut self, on_item: F) -> Result<(), E>
    where
        E: From<ParseError>,
        F: FnMut(&mut Self) -> Result<(), E>,
    {
        self.consume('[')?;
        self.enter()?;
        let result = self.read_items(on_item);
        self.depth -= 1;
        result
    }

    fn read_items<E, F>(&mut self, mut on_item: F) -> Result<(), E>
    where
        E: From<ParseError>,
        F: FnMut(&mut Self) -> Result<(), E>,
    {
        if self.peek_token() == Some(']') {
            self.next_char();
            return Ok(());
        }
        loop {
            on_item(self)?;
            match self.peek_token() {
                Some(',') => {
                    self.next_char();
                }
                Some(']') => {
                    self.next_char();
                    break Ok(());
                }
                _ => break Err(self.unexpected("',' or ']'").into()),
            }
        }
    }
}

fn expected_name(c: char) -> &'static str {
    match c {
        '{' => "'{'",
        '}' => "'}'",
        '[' => "'['",
        ']' => "']'",
        ':' => "':'",
        ',' => "','",
        '"' => "a string",
        _ => "a structural character",
    }
}
