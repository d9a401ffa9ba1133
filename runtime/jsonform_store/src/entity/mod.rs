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


use crate::identifier::Identifier;
use jsonform_form::Record;
use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

/// A record with an identity that is distinct from the values of its members.
///
/// Entities are ordered and compared by their primary key: the tuple of their key members, in
/// declaration order. An entity that declares no key members has the unit key, so all of its
/// instances compare as equal.
pub trait Entity: Record {
    type Key: Ord + Clone + Debug + Send + Sync + 'static;

    fn identifier(&self) -> Identifier;

    fn key(&self) -> Self::Key;

    fn primary_key(&self) -> PrimaryKey<Self> {
        PrimaryKey::new(self.key())
    }
}

/// The primary key of an entity of type `E`.
pub struct PrimaryKey<E: Entity> {
    key: E::Key,
}

impl<E: Entity> PrimaryKey<E> {
    pub fn new(key: E::Key) -> Self {
        PrimaryKey { key }
    }

    pub fn key(&self) -> &E::Key {
        &self.key
    }

    pub fn into_key(self) -> E::Key {
        self.key
    }

    /// Forget the type of the entity so that keys of different entity types can be compared.
    pub fn erase(self) -> ErasedKey {
        ErasedKey {
            type_name: type_name::<E>(),
            type_id: TypeId::of::<E>(),
            key: Box::new(self.key),
        }
    }
}

impl<E: Entity> Clone for PrimaryKey<E> {
    fn clone(&self) -> Self {
        PrimaryKey {
            key: self.key.clone(),
        }
    }
}

impl<E: Entity> Debug for PrimaryKey<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrimaryKey").field(&self.key).finish()
    }
}

impl<E: Entity> PartialEq for PrimaryKey<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<E: Entity> Eq for PrimaryKey<E> {}

impl<E: Entity> PartialOrd for PrimaryKey<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Entity> Ord for PrimaryKey<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

trait DynKey: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn cmp_dyn(&self, other: &dyn Any) -> Option<Ordering>;

    fn debug(&self, f: &mut Formatter<'_>) -> std::fmt::Result;
}

impl<K: Ord + Debug + Send + Sync + 'static> DynKey for K {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn cmp_dyn(&self, other: &dyn Any) -> Option<Ordering> {
        other.downcast_ref::<K>().map(|other| self.cmp(other))
    }

    fn debug(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

/// A primary key with the type of its entity erased. Keys of different entity types are never
/// equal and are ordered by the names of their types first.
pub struct ErasedKey {
    type_name: &'static str,
    type_id: TypeId,
    key: Box<dyn DynKey>,
}

impl ErasedKey {
    /// The name of the entity type that the key belongs to.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_key_of<E: Entity>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }

    pub fn downcast_ref<E: Entity>(&self) -> Option<&E::Key> {
        if self.is_key_of::<E>() {
            self.key.as_any().downcast_ref()
        } else {
            None
        }
    }
}

impl Debug for ErasedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ErasedKey({}, ", self.type_name)?;
        self.key.debug(f)?;
        f.write_str(")")
    }
}

impl PartialEq for ErasedKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ErasedKey {}

impl PartialOrd for ErasedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErasedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_name
            .cmp(other.type_name)
            .then_with(|| self.type_id.cmp(&other.type_id))
            .then_with(|| {
                self.key
                    .cmp_dyn(other.key.as_any())
                    .unwrap_or(Ordering::Equal)
            })
    }
}
