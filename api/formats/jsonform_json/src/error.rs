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

use thiserror::Error;

/// The ways in which JSON text can violate the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Expected {expected} but found '{found}'.")]
    UnexpectedCharacter { expected: &'static str, found: char },
    #[error("The input ended unexpectedly.")]
    UnexpectedEnd,
    #[error("'\\{0}' is not a valid escape sequence.")]
    InvalidEscape(char),
    #[error("Malformed number.")]
    InvalidNumber,
    #[error("Numbers may not have leading zeros.")]
    LeadingZero,
    #[error("Expected the literal '{0}'.")]
    InvalidLiteral(&'static str),
    #[error("Unexpected characters after the end of the document.")]
    TrailingCharacters,
    #[error("The input is not valid UTF-8.")]
    InvalidUtf8,
    #[error("Object keys must be strings.")]
    NonStringKey,
    #[error("Arrays and objects may not be nested more than {0} deep.")]
    NestingTooDeep(usize),
}

/// A violation of the JSON grammar. The column is the 1-based position (in characters) in
/// the input where the problem was detected. A stream that has produced a parse error must be
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (column {column})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, column: usize) -> Self {
        ParseError { kind, column }
    }
}
