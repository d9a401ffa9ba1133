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

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// The family of a raw type. This determines how the registry validates a descriptor and
/// whether a type may be embedded in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Primitive,
    List,
    Map,
    Optional,
    Record,
    Entity,
    Singleton,
    Custom,
}

impl FormKind {
    /// Record kinds are described by their own member tables rather than the registry.
    pub fn is_record(&self) -> bool {
        matches!(self, FormKind::Record | FormKind::Entity | FormKind::Singleton)
    }
}

/// A type without its parameters. Raw types are identified by name alone.
#[derive(Debug, Clone, Copy)]
pub struct RawType {
    pub name: &'static str,
    pub kind: FormKind,
    /// The number of type parameters the raw type expects.
    pub arity: usize,
}

impl RawType {
    pub const fn new(name: &'static str, kind: FormKind, arity: usize) -> Self {
        RawType { name, kind, arity }
    }

    pub const fn primitive(name: &'static str) -> Self {
        RawType::new(name, FormKind::Primitive, 0)
    }

    pub const fn custom(name: &'static str) -> Self {
        RawType::new(name, FormKind::Custom, 0)
    }

    pub const fn record(name: &'static str) -> Self {
        RawType::new(name, FormKind::Record, 0)
    }

    pub const fn entity(name: &'static str) -> Self {
        RawType::new(name, FormKind::Entity, 0)
    }

    pub const fn singleton(name: &'static str) -> Self {
        RawType::new(name, FormKind::Singleton, 0)
    }

    pub(crate) fn same_shape(&self, other: &RawType) -> bool {
        self.kind == other.kind && self.arity == other.arity
    }
}

impl PartialEq for RawType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RawType {}

impl Hash for RawType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

pub const LIST: RawType = RawType::new("List", FormKind::List, 1);
pub const SET: RawType = RawType::new("Set", FormKind::List, 1);
pub const MAP: RawType = RawType::new("Map", FormKind::Map, 2);
pub const HASH_MAP: RawType = RawType::new("HashMap", FormKind::Map, 2);
pub const OPTION: RawType = RawType::new("Option", FormKind::Optional, 1);
pub const BOX: RawType = RawType::new("Box", FormKind::Custom, 1);

/// A raw type together with its type parameters. This is the key under which representations
/// are cached: `List<i32>` and `List<String>` are distinct descriptors.
///
/// # Examples
///
/// ```
/// use jsonform_form::{Form, TypeDescriptor};
///
/// let desc = <Vec<Option<i32>>>::descriptor();
/// assert_eq!(desc.to_string(), "List<Option<i32>>");
/// assert_ne!(desc, <Vec<String>>::descriptor());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    raw: RawType,
    params: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    pub fn new(raw: RawType) -> Self {
        TypeDescriptor { raw, params: vec![] }
    }

    pub fn with_params(raw: RawType, params: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor { raw, params }
    }

    pub fn raw(&self) -> &RawType {
        &self.raw
    }

    pub fn name(&self) -> &'static str {
        self.raw.name
    }

    pub fn kind(&self) -> FormKind {
        self.raw.kind
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    /// The name of the first entity type mentioned by this descriptor, either directly or in
    /// any of its parameters.
    pub fn mentions_entity(&self) -> Option<&'static str> {
        if self.raw.kind == FormKind::Entity {
            Some(self.raw.name)
        } else {
            self.params.iter().find_map(TypeDescriptor::mentions_entity)
        }
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw.name)?;
        if let Some((first, rest)) = self.params.split_first() {
            write!(f, "<{}", first)?;
            for param in rest {
                write!(f, ", {}", param)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}
