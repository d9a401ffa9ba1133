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

use crate::descriptor::TypeDescriptor;
use crate::error::{FormError, ModelError};
use crate::registry::Registry;
use crate::representation::{expect_kind, Form, Representation};
use jsonform_json::{JsonReader, JsonWriter};
use jsonform_model::ValueKind;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A type whose state is a fixed set of named, individually typed members.
///
/// The members are normally described by `#[derive(Record)]` but the trait can also be
/// implemented by hand, listing each member with [`MemberSpec::new`].
///
/// # Examples
///
/// ```
/// use jsonform_form::{Form, FormError, MemberSpec, ModelError, Record, RecordRepresentation};
/// use jsonform_form::{RawType, Registry, Representation, TypeDescriptor};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Form for Point {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::new(RawType::record("Point"))
///     }
///
///     fn make_representation(registry: &Registry) -> Result<Arc<dyn Representation<Self>>, ModelError> {
///         Ok(Arc::new(RecordRepresentation::<Point>::build(registry)?))
///     }
/// }
///
/// impl Record for Point {
///     fn members() -> Vec<MemberSpec<Self>> {
///         vec![
///             MemberSpec::new::<i32>("y", 1, |p| &p.y, |p| &mut p.y),
///             MemberSpec::new::<i32>("x", 0, |p| &p.x, |p| &mut p.x),
///         ]
///     }
///
///     fn construct() -> Result<Self, ModelError> {
///         Ok(Point::default())
///     }
/// }
///
/// let text = jsonform_form::write_json(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, r#"{"x":1,"y":2}"#);
/// ```
pub trait Record: Form {
    /// The serializable members of the record.
    fn members() -> Vec<MemberSpec<Self>>;

    /// Create an instance with every member in its default state. Records that cannot be
    /// constructed without arguments cannot be read.
    fn construct() -> Result<Self, ModelError> {
        Err(ModelError::NoConstructor(Self::descriptor().to_string()))
    }
}

type Binder<T> = Box<dyn FnOnce(&Registry) -> Result<Box<dyn MemberCodec<T>>, ModelError>>;

/// The description of a single record member: its name, its write rank, the descriptor of its
/// type and how to access it.
pub struct MemberSpec<T> {
    name: &'static str,
    rank: i32,
    descriptor: TypeDescriptor,
    bind: Binder<T>,
}

impl<T: 'static> MemberSpec<T> {
    /// # Arguments
    /// * `name` - The key of the member in the JSON object.
    /// * `rank` - Members are written in ascending order of rank (ties in declaration order).
    /// * `get` - Borrow the member.
    /// * `get_mut` - Mutably borrow the member.
    pub fn new<F: Form>(
        name: &'static str,
        rank: i32,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        MemberSpec {
            name,
            rank,
            descriptor: F::descriptor(),
            bind: Box::new(move |registry| {
                let representation = registry.resolve::<F>()?;
                let codec: Box<dyn MemberCodec<T>> = Box::new(BoundMember {
                    representation,
                    get,
                    get_mut,
                });
                Ok(codec)
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rank(&self) -> i32 {
        self.rank
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

trait MemberCodec<T>: Send + Sync {
    fn read_into(&self, target: &mut T, reader: &mut JsonReader<'_>) -> Result<(), FormError>;

    fn is_absent(&self, source: &T) -> bool;

    fn write_from(&self, source: &T, writer: &mut JsonWriter<'_>) -> Result<(), FormError>;
}

struct BoundMember<T, F> {
    representation: Arc<dyn Representation<F>>,
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F: Form> MemberCodec<T> for BoundMember<T, F> {
    fn read_into(&self, target: &mut T, reader: &mut JsonReader<'_>) -> Result<(), FormError> {
        *(self.get_mut)(target) = self.representation.read(reader)?;
        Ok(())
    }

    fn is_absent(&self, source: &T) -> bool {
        (self.get)(source).is_absent()
    }

    fn write_from(&self, source: &T, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        self.representation.write((self.get)(source), writer)
    }
}

struct Member<T> {
    name: &'static str,
    codec: Box<dyn MemberCodec<T>>,
}

/// The composite representation of a [`Record`]: a JSON object with one member per record
/// member.
///
/// Reading is tolerant of missing members (they are left in the state given by
/// [`Record::construct`]) but any key that does not name a member is an error. When writing,
/// members are emitted in rank order and absent members are omitted entirely.
pub struct RecordRepresentation<T> {
    record: String,
    members: Vec<Member<T>>,
    index: HashMap<&'static str, usize>,
}

impl<T: Record> RecordRepresentation<T> {
    /// Build the representation, resolving the representation of each member. A member whose
    /// type mentions an entity anywhere is rejected: entities must be referred to by their
    /// identifiers.
    pub fn build(registry: &Registry) -> Result<Self, ModelError> {
        let record = T::descriptor().to_string();
        let mut members = Vec::new();
        for spec in T::members() {
            let MemberSpec {
                name,
                rank,
                descriptor,
                bind,
            } = spec;
            if let Some(entity) = descriptor.mentions_entity() {
                warn!(record = %record, member = name, entity, "Record embeds an entity.");
                return Err(ModelError::EntityMember {
                    record,
                    member: name.to_string(),
                    entity: entity.to_string(),
                });
            }
            let codec = bind(registry)?;
            members.push((rank, Member { name, codec }));
        }
        members.sort_by_key(|(rank, _)| *rank);
        let members = members
            .into_iter()
            .map(|(_, member)| member)
            .collect::<Vec<_>>();

        let mut index = HashMap::with_capacity(members.len());
        for (i, member) in members.iter().enumerate() {
            if index.insert(member.name, i).is_some() {
                return Err(ModelError::DuplicateMember {
                    record,
                    member: member.name.to_string(),
                });
            }
        }
        Ok(RecordRepresentation {
            record,
            members,
            index,
        })
    }

    /// The member names in write order.
    pub fn member_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|member| member.name)
    }
}

impl<T: Record> Representation<T> for RecordRepresentation<T> {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<T, FormError> {
        expect_kind(reader, ValueKind::Object)?;
        let RecordRepresentation {
            record,
            members,
            index,
        } = self;
        let mut target = T::construct()?;
        reader.read_object(|reader, key| match index.get(key.as_str()) {
            Some(i) => members[*i].codec.read_into(&mut target, reader),
            None => Err(ModelError::UnknownMember {
                record: record.clone(),
                member: key,
            }
            .into()),
        })?;
        Ok(target)
    }

    fn write(&self, value: &T, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        writer.begin_object()?;
        for Member { name, codec } in &self.members {
            if !codec.is_absent(value) {
                writer.write_key(name)?;
                codec.write_from(value, writer)?;
            }
        }
        Ok(writer.end_object()?)
    }
}
