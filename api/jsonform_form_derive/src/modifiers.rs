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

use jsonform_macro_utilities::attributes::{
    FlagConsumer, IntConsumer, NestedMetaConsumer, StringConsumer,
};
use jsonform_macro_utilities::{CaseConvention, CaseConventionConsumer, Symbol};

pub const FORM_PATH: Symbol = Symbol("form");
pub const ENTITY_TAG: Symbol = Symbol("entity");
pub const SINGLETON_TAG: Symbol = Symbol("singleton");
pub const CONVENTION_TAG: Symbol = Symbol("fields_convention");
pub const MEMBER_TAG: Symbol = Symbol("member");
pub const KEY_TAG: Symbol = Symbol("key");
pub const IDENTIFIER_TAG: Symbol = Symbol("identifier");
pub const RANK_TAG: Symbol = Symbol("rank");
pub const NAME_TAG: Symbol = Symbol("name");

/// Parts of the `form` attribute on the record type.
pub enum ContainerPart {
    Entity,
    Singleton,
    Convention(CaseConvention),
}

pub fn container_consumer() -> impl NestedMetaConsumer<ContainerPart> {
    frunk::hlist![
        FlagConsumer::new(ENTITY_TAG).map(|_| ContainerPart::Entity),
        FlagConsumer::new(SINGLETON_TAG).map(|_| ContainerPart::Singleton),
        CaseConventionConsumer::new(CONVENTION_TAG).map(ContainerPart::Convention),
    ]
}

/// Parts of the `form` attribute on a field.
pub enum FieldPart {
    Member,
    Key,
    Identifier,
    Rank(i32),
    Name(String),
}

pub fn field_consumer() -> impl NestedMetaConsumer<FieldPart> {
    frunk::hlist![
        FlagConsumer::new(MEMBER_TAG).map(|_| FieldPart::Member),
        FlagConsumer::new(KEY_TAG).map(|_| FieldPart::Key),
        FlagConsumer::new(IDENTIFIER_TAG).map(|_| FieldPart::Identifier),
        IntConsumer::new(RANK_TAG).map(FieldPart::Rank),
        StringConsumer::new(NAME_TAG).map(FieldPart::Name),
    ]
}
