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

use jsonform_form::{
    expect_kind, Form, FormError, ModelError, RawType, Registry, Representation, TypeDescriptor,
};
use jsonform_json::{JsonReader, JsonWriter};
use jsonform_model::ValueKind;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// The raw type under which identifiers are registered.
pub const IDENTIFIER: RawType = RawType::custom("Identifier");

const CLASS_OFFSET: u64 = 0x5eed_0000;
const CLASS_STRIDE: u64 = 0x1_0003;
const INSTANCE_OFFSET: u64 = 0x1_0000_0000;
const INSTANCE_STRIDE: u64 = 0x9e37;

/// A globally unique, two part identifier for an entity. The class component is shared by
/// every instance of one entity type and the instance component is unique to the instance.
///
/// Identifiers are never reused. They are sparse and hard to guess by eye but offer no
/// cryptographic guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    class: u64,
    instance: u64,
}

impl Identifier {
    /// Allocate a fresh identifier for an instance of `E`.
    pub fn create<E: 'static>() -> Result<Identifier, ModelError> {
        ALLOCATOR
            .lock()
            .allocate(TypeId::of::<E>(), type_name::<E>())
    }

    pub fn class(&self) -> u64 {
        self.class
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}-{:x}", self.class, self.instance)
    }
}

impl FromStr for Identifier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ModelError::Malformed {
            target: "identifier",
            text: s.to_string(),
        };
        let (class, instance) = s.split_once('-').ok_or_else(malformed)?;
        let parse = |part: &str| {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                None
            } else {
                u64::from_str_radix(part, 16).ok()
            }
        };
        match (parse(class), parse(instance)) {
            (Some(class), Some(instance)) => Ok(Identifier { class, instance }),
            _ => Err(malformed()),
        }
    }
}

struct Allocator {
    classes: HashMap<TypeId, u64>,
    next_class: u64,
    next_instance: u64,
}

impl Default for Allocator {
    fn default() -> Self {
        Allocator {
            classes: HashMap::new(),
            next_class: CLASS_OFFSET,
            next_instance: INSTANCE_OFFSET,
        }
    }
}

impl Allocator {
    fn allocate(&mut self, ty: TypeId, name: &'static str) -> Result<Identifier, ModelError> {
        let Allocator {
            classes,
            next_class,
            next_instance,
        } = self;
        let class = match classes.get(&ty) {
            Some(class) => *class,
            None => {
                let class = *next_class;
                *next_class = class
                    .checked_add(CLASS_STRIDE)
                    .ok_or(ModelError::IdentifierSpaceExhausted)?;
                classes.insert(ty, class);
                debug!(entity = name, class = %format_args!("{:x}", class), "Allocated an identifier class.");
                class
            }
        };
        let instance = *next_instance;
        *next_instance = instance
            .checked_add(INSTANCE_STRIDE)
            .ok_or(ModelError::IdentifierSpaceExhausted)?;
        Ok(Identifier { class, instance })
    }
}

lazy_static! {
    static ref ALLOCATOR: Mutex<Allocator> = Mutex::new(Allocator::default());
}

struct IdentifierRepresentation;

impl Representation<Identifier> for IdentifierRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Identifier, FormError> {
        expect_kind(reader, ValueKind::String)?;
        self.read_key(&reader.read_string()?)
    }

    fn write(&self, value: &Identifier, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        Ok(writer.write_string(&value.to_string())?)
    }

    fn read_key(&self, key: &str) -> Result<Identifier, FormError> {
        Ok(key.parse()?)
    }

    fn write_key(&self, value: &Identifier) -> Result<String, FormError> {
        Ok(value.to_string())
    }
}

impl Form for Identifier {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(IDENTIFIER)
    }

    fn make_representation(
        _registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(IdentifierRepresentation))
    }
}
