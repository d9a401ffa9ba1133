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

use crate::descriptor::{RawType, TypeDescriptor, BOX, HASH_MAP, LIST, MAP, OPTION, SET};
use crate::error::{FormError, ModelError};
use crate::representation::{Form, Representation};
use jsonform_json::{JsonReader, JsonWriter, PrintStrategy};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::any::Any;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

const PRIMITIVES: [&str; 18] = [
    "bool", "i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64", "u128", "f32", "f64",
    "char", "String", "Number", "Value", "()",
];

type CachedRepresentation = Box<dyn Any + Send + Sync>;

struct RegistryInner {
    raw_types: RwLock<HashMap<&'static str, RawType>>,
    cache: RwLock<HashMap<TypeDescriptor, CachedRepresentation>>,
}

thread_local! {
    static BUILDING: RefCell<Vec<(usize, TypeDescriptor)>> = RefCell::new(vec![]);
}

/// Resolves and caches the [`Representation`] of each type.
///
/// Representations are keyed by the full [`TypeDescriptor`] of their type and the registry
/// guarantees that at most one representation is ever stored for each descriptor. Concurrent
/// first requests for the same descriptor may both build a representation but only one is kept
/// and returned to both callers. The registry is a cheap handle and may be cloned freely.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

lazy_static! {
    static ref GLOBAL: Registry = Registry::new();
}

impl Registry {
    /// Create a registry with all of the built in raw types registered.
    pub fn new() -> Self {
        let mut raw_types = HashMap::new();
        for name in PRIMITIVES {
            raw_types.insert(name, RawType::primitive(name));
        }
        for raw in [LIST, SET, MAP, HASH_MAP, OPTION, BOX] {
            raw_types.insert(raw.name, raw);
        }
        Registry {
            inner: Arc::new(RegistryInner {
                raw_types: RwLock::new(raw_types),
                cache: Default::default(),
            }),
        }
    }

    /// The process wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Register an additional raw type. Registering the same raw type again has no effect but
    /// registering a different shape under an existing name is an error.
    pub fn register(&self, raw: RawType) -> Result<(), ModelError> {
        let mut guard = self.inner.raw_types.write();
        match guard.entry(raw.name) {
            Entry::Occupied(entry) if !entry.get().same_shape(&raw) => {
                Err(ModelError::ConflictingRegistration {
                    name: raw.name.to_string(),
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                entry.insert(raw);
                Ok(())
            }
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.raw_types.read().contains_key(name)
    }

    fn validate(&self, descriptor: &TypeDescriptor) -> Result<(), ModelError> {
        let raw = descriptor.raw();
        if raw.kind.is_record() {
            return Ok(());
        }
        let known = self.inner.raw_types.read().get(raw.name).copied();
        let actual = descriptor.params().len();
        match known {
            None => Err(ModelError::UnregisteredType(raw.name.to_string())),
            Some(known) if !known.same_shape(raw) => Err(ModelError::ConflictingRegistration {
                name: raw.name.to_string(),
            }),
            Some(known) if known.arity == 0 && actual > 0 => {
                Err(ModelError::NotGeneric(raw.name.to_string()))
            }
            Some(known) if known.arity != actual => Err(ModelError::ParameterCount {
                name: raw.name.to_string(),
                expected: known.arity,
                actual,
            }),
            _ => Ok(()),
        }
    }

    fn cached<T: Form>(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<Arc<dyn Representation<T>>>, ModelError> {
        let guard = self.inner.cache.read();
        match guard.get(descriptor) {
            Some(entry) => downcast::<T>(descriptor, entry).map(Some),
            None => Ok(None),
        }
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Resolve the representation of a type, building it if this is the first request for its
    /// descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonform_form::Registry;
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// let first = registry.resolve::<Vec<i32>>().unwrap();
    /// let second = registry.resolve::<Vec<i32>>().unwrap();
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    pub fn resolve<T: Form>(&self) -> Result<Arc<dyn Representation<T>>, ModelError> {
        let descriptor = T::descriptor();
        if let Some(representation) = self.cached::<T>(&descriptor)? {
            return Ok(representation);
        }
        if let Err(err) = self.validate(&descriptor) {
            warn!(descriptor = %descriptor, error = %err, "Rejected type descriptor.");
            return Err(err);
        }

        let key = (self.id(), descriptor.clone());
        let recursive = BUILDING.with(|building| building.borrow().contains(&key));
        if recursive {
            return Ok(Arc::new(Deferred::<T> {
                registry: Arc::downgrade(&self.inner),
                _type: PhantomData,
            }));
        }

        BUILDING.with(|building| building.borrow_mut().push(key.clone()));
        let built = T::make_representation(self);
        BUILDING.with(|building| building.borrow_mut().retain(|entry| entry != &key));
        let built = built?;

        let mut guard = self.inner.cache.write();
        match guard.entry(descriptor) {
            Entry::Occupied(entry) => downcast::<T>(entry.key(), entry.get()),
            Entry::Vacant(entry) => {
                debug!(descriptor = %entry.key(), "Cached a new representation.");
                entry.insert(Box::new(built.clone()));
                Ok(built)
            }
        }
    }

    /// Read a complete document as a value of a type.
    pub fn read_str<T: Form>(&self, input: &str) -> Result<T, FormError> {
        let representation = self.resolve::<T>()?;
        let mut reader = JsonReader::new(input);
        let value = representation.read(&mut reader)?;
        reader.expect_end()?;
        Ok(value)
    }

    /// Write a value of a type as a document.
    pub fn write_string<T: Form>(
        &self,
        value: &T,
        strategy: PrintStrategy,
    ) -> Result<String, FormError> {
        let representation = self.resolve::<T>()?;
        let mut output = String::new();
        let mut writer = JsonWriter::with_strategy(&mut output, strategy);
        representation.write(value, &mut writer)?;
        Ok(output)
    }
}

fn downcast<T: Form>(
    descriptor: &TypeDescriptor,
    entry: &CachedRepresentation,
) -> Result<Arc<dyn Representation<T>>, ModelError> {
    entry
        .downcast_ref::<Arc<dyn Representation<T>>>()
        .cloned()
        .ok_or_else(|| ModelError::DescriptorCollision(descriptor.to_string()))
}

/// Stands in for a representation that is still being built when a type refers to itself. The
/// real representation is looked up on use, by which time it will have been cached.
struct Deferred<T> {
    registry: Weak<RegistryInner>,
    _type: PhantomData<fn() -> T>,
}

impl<T: Form> Deferred<T> {
    fn target(&self) -> Result<Arc<dyn Representation<T>>, ModelError> {
        let inner = self.registry.upgrade().ok_or(ModelError::RegistryDropped)?;
        Registry { inner }.resolve::<T>()
    }
}

impl<T: Form> Representation<T> for Deferred<T> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<T, FormError> {
        self.target()?.read(reader)
    }

    fn write(&self, value: &T, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        self.target()?.write(value, writer)
    }

    fn read_key(&self, key: &str) -> Result<T, FormError> {
        self.target()?.read_key(key)
    }

    fn write_key(&self, value: &T) -> Result<String, FormError> {
        self.target()?.write_key(value)
    }
}
