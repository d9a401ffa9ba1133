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

use jsonform_json::ParseError;
use jsonform_model::ValueKind;
use thiserror::Error;

/// Errors raised when a type cannot be mapped to or from JSON, independent of the grammar of
/// the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("The type '{0}' has not been registered.")]
    UnregisteredType(String),
    #[error("The type '{0}' does not accept type parameters.")]
    NotGeneric(String),
    #[error("The type '{name}' expects {expected} type parameters but {actual} were provided.")]
    ParameterCount {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("The type '{name}' is already registered with a different shape.")]
    ConflictingRegistration { name: String },
    #[error("The record type '{0}' has no accessible constructor.")]
    NoConstructor(String),
    #[error("'{member}' is not a member of the record type '{record}'.")]
    UnknownMember { record: String, member: String },
    #[error("The record type '{record}' declares the member '{member}' more than once.")]
    DuplicateMember { record: String, member: String },
    #[error("The member '{member}' of '{record}' embeds the entity type '{entity}'.")]
    EntityMember {
        record: String,
        member: String,
        entity: String,
    },
    #[error("The singleton type '{0}' may only be constructed by its factory.")]
    SingletonOutsideFactory(String),
    #[error("The number {value} cannot be represented as {target}.")]
    NumericNarrowing { value: String, target: &'static str },
    #[error("Expected {expected} but found {found}.")]
    UnexpectedKind {
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Non-finite floating point numbers have no JSON representation.")]
    NonFiniteFloat,
    #[error("'{text}' is not a valid {target}.")]
    Malformed { target: &'static str, text: String },
    #[error("The identifier space has been exhausted.")]
    IdentifierSpaceExhausted,
    #[error("Two distinct types share the descriptor '{0}'.")]
    DescriptorCollision(String),
    #[error("The registry that created this representation no longer exists.")]
    RegistryDropped,
}

/// Any failure while reading or writing a value through a representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Writing to the output failed.")]
    Write(#[from] std::fmt::Error),
}
