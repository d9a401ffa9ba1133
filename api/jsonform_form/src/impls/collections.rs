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

use crate::descriptor::{TypeDescriptor, BOX, HASH_MAP, LIST, MAP, OPTION, SET};
use crate::error::{FormError, ModelError};
use crate::registry::Registry;
use crate::representation::{expect_kind, Form, Representation};
use jsonform_json::{JsonReader, JsonWriter};
use jsonform_model::ValueKind;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::Arc;

/// Representation of sequences, parameterized by the representation of the elements.
pub struct ListRepresentation<E> {
    element: Arc<dyn Representation<E>>,
}

impl<E> ListRepresentation<E> {
    pub fn new(element: Arc<dyn Representation<E>>) -> Self {
        ListRepresentation { element }
    }

    fn read_each<F>(&self, reader: &mut JsonReader<'_>, mut add: F) -> Result<(), FormError>
    where
        F: FnMut(E),
    {
        expect_kind(reader, ValueKind::Array)?;
        let ListRepresentation { element } = self;
        reader.read_array(|reader| {
            add(element.read(reader)?);
            Ok(())
        })
    }

    fn write_each<'a, I>(&self, items: I, writer: &mut JsonWriter<'_>) -> Result<(), FormError>
    where
        I: Iterator<Item = &'a E>,
        E: 'a,
    {
        writer.begin_array()?;
        for item in items {
            writer.array_item()?;
            self.element.write(item, writer)?;
        }
        Ok(writer.end_array()?)
    }
}

impl<E> Representation<Vec<E>> for ListRepresentation<E> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Vec<E>, FormError> {
        let mut items = vec![];
        self.read_each(reader, |item| items.push(item))?;
        Ok(items)
    }

    fn write(&self, value: &Vec<E>, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        self.write_each(value.iter(), writer)
    }
}

impl<E: Ord> Representation<BTreeSet<E>> for ListRepresentation<E> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<BTreeSet<E>, FormError> {
        let mut items = BTreeSet::new();
        self.read_each(reader, |item| {
            items.insert(item);
        })?;
        Ok(items)
    }

    fn write(&self, value: &BTreeSet<E>, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        self.write_each(value.iter(), writer)
    }
}

impl<E: Form> Form for Vec<E> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(LIST, vec![E::descriptor()])
    }

    fn make_representation(
        registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(ListRepresentation::new(registry.resolve::<E>()?)))
    }
}

impl<E: Form + Ord> Form for BTreeSet<E> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(SET, vec![E::descriptor()])
    }

    fn make_representation(
        registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(ListRepresentation::new(registry.resolve::<E>()?)))
    }
}

/// Representation of maps as JSON objects. Keys are converted with the key representation's
/// [`Representation::read_key`] and [`Representation::write_key`].
pub struct MapRepresentation<K, V> {
    key: Arc<dyn Representation<K>>,
    value: Arc<dyn Representation<V>>,
}

impl<K, V> MapRepresentation<K, V> {
    pub fn new(key: Arc<dyn Representation<K>>, value: Arc<dyn Representation<V>>) -> Self {
        MapRepresentation { key, value }
    }

    fn read_each<F>(&self, reader: &mut JsonReader<'_>, mut add: F) -> Result<(), FormError>
    where
        F: FnMut(K, V),
    {
        expect_kind(reader, ValueKind::Object)?;
        let MapRepresentation { key, value } = self;
        reader.read_object(|reader, name| {
            let k = key.read_key(&name)?;
            let v = value.read(reader)?;
            add(k, v);
            Ok(())
        })
    }

    fn write_entries(
        &self,
        entries: Vec<(String, &V)>,
        writer: &mut JsonWriter<'_>,
    ) -> Result<(), FormError> {
        writer.begin_object()?;
        for (name, v) in entries {
            writer.write_key(&name)?;
            self.value.write(v, writer)?;
        }
        Ok(writer.end_object()?)
    }
}

impl<K: Ord, V> Representation<BTreeMap<K, V>> for MapRepresentation<K, V> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<BTreeMap<K, V>, FormError> {
        let mut map = BTreeMap::new();
        self.read_each(reader, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }

    fn write(&self, value: &BTreeMap<K, V>, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        let entries = value
            .iter()
            .map(|(k, v)| Ok((self.key.write_key(k)?, v)))
            .collect::<Result<Vec<_>, FormError>>()?;
        self.write_entries(entries, writer)
    }
}

/// Entries are written sorted by their key text so that equal maps always produce the same
/// output.
impl<K: Eq + Hash, V> Representation<HashMap<K, V>> for MapRepresentation<K, V> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<HashMap<K, V>, FormError> {
        let mut map = HashMap::new();
        self.read_each(reader, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }

    fn write(&self, value: &HashMap<K, V>, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        let mut entries = value
            .iter()
            .map(|(k, v)| Ok((self.key.write_key(k)?, v)))
            .collect::<Result<Vec<_>, FormError>>()?;
        entries.sort_by(|(left, _), (right, _)| left.cmp(right));
        self.write_entries(entries, writer)
    }
}

impl<K: Form + Ord, V: Form> Form for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(MAP, vec![K::descriptor(), V::descriptor()])
    }

    fn make_representation(
        registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(MapRepresentation::new(
            registry.resolve::<K>()?,
            registry.resolve::<V>()?,
        )))
    }
}

impl<K: Form + Eq + Hash, V: Form> Form for HashMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(HASH_MAP, vec![K::descriptor(), V::descriptor()])
    }

    fn make_representation(
        registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(MapRepresentation::new(
            registry.resolve::<K>()?,
            registry.resolve::<V>()?,
        )))
    }
}

/// `null` (or the end of the input) is read as `None`. `None` is absent and so is omitted
/// from records.
pub struct OptionRepresentation<T> {
    inner: Arc<dyn Representation<T>>,
}

impl<T> Representation<Option<T>> for OptionRepresentation<T> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Option<T>, FormError> {
        match reader.peek_token() {
            None => Ok(None),
            Some('n') => {
                reader.read_null()?;
                Ok(None)
            }
            _ => self.inner.read(reader).map(Some),
        }
    }

    fn write(&self, value: &Option<T>, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        match value {
            Some(inner) => self.inner.write(inner, writer),
            None => Ok(writer.write_null()?),
        }
    }
}

impl<T: Form> Form for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(OPTION, vec![T::descriptor()])
    }

    fn make_representation(
        registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(OptionRepresentation {
            inner: registry.resolve::<T>()?,
        }))
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

pub struct BoxRepresentation<T> {
    inner: Arc<dyn Representation<T>>,
}

impl<T> Representation<Box<T>> for BoxRepresentation<T> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Box<T>, FormError> {
        self.inner.read(reader).map(Box::new)
    }

    fn write(&self, value: &Box<T>, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        self.inner.write(value, writer)
    }

    fn read_key(&self, key: &str) -> Result<Box<T>, FormError> {
        self.inner.read_key(key).map(Box::new)
    }

    fn write_key(&self, value: &Box<T>) -> Result<String, FormError> {
        self.inner.write_key(value)
    }
}

impl<T: Form> Form for Box<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(BOX, vec![T::descriptor()])
    }

    fn make_representation(
        registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(BoxRepresentation {
            inner: registry.resolve::<T>()?,
        }))
    }

    fn is_absent(&self) -> bool {
        self.as_ref().is_absent()
    }
}
