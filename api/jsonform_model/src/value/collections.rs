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

use super::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A frozen JSON object. Keys are unique and iteration is always in key order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Object {
    members: BTreeMap<String, Value>,
}

impl Object {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over the members in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.members.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = ObjectBuilder::default();
        for (k, v) in iter {
            builder.insert(k, v);
        }
        builder.build_object()
    }
}

/// A frozen JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        self.items.as_slice()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Array {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Append-only builder for [`Object`] values. Adding a key that is already present replaces
/// the earlier value.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    members: BTreeMap<String, Value>,
}

impl ObjectBuilder {
    /// Add a member, returning the builder for chaining.
    pub fn add<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a member in place.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.members.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn build_object(self) -> Object {
        Object {
            members: self.members,
        }
    }

    pub fn build(self) -> Value {
        Value::Object(self.build_object())
    }
}

/// Append-only builder for [`Array`] values.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
    items: Vec<Value>,
}

impl ArrayBuilder {
    /// Add an item, returning the builder for chaining.
    pub fn add<V: Into<Value>>(mut self, value: V) -> Self {
        self.push(value);
        self
    }

    pub fn push<V: Into<Value>>(&mut self, value: V) {
        self.items.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn build_array(self) -> Array {
        Array { items: self.items }
    }

    pub fn build(self) -> Value {
        Value::Array(self.build_array())
    }
}
