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

use crate::Symbol;
use frunk::{HCons, HNil};
use std::marker::PhantomData;
use syn::{Lit, Meta, NestedMeta};

/// Process the attributes attached to an item using the provided interpretation strategy.
///
/// The attributes are assumed to have the form:
///
/// `#[name(part[,part]*)]`
///
/// The interpreted parts are returned in a vector along with a vector of errors for any
/// failures. Parts that no consumer recognizes are reported as errors.
///
/// # Arguments
///
/// * `tag` - The expected name of the attribute.
/// * `attributes` - The attributes to process.
/// * `f` - Consumer for the parts extracted from the attribute.
pub fn consume_attributes<'a, It, T, F>(
    tag: Symbol,
    attributes: It,
    f: F,
) -> (Vec<T>, Vec<syn::Error>)
where
    It: IntoIterator<Item = &'a syn::Attribute> + 'a,
    F: NestedMetaConsumer<T>,
{
    let mut values = vec![];
    let mut errors = vec![];
    for attr in attributes.into_iter().filter(|a| a.path == tag) {
        match attr.parse_meta() {
            Ok(Meta::List(list)) => {
                for nested in list.nested {
                    match f.try_consume(&nested) {
                        Ok(Some(t)) => values.push(t),
                        Ok(None) => errors.push(syn::Error::new_spanned(
                            nested,
                            format!("Unrecognized attribute for '{}'.", tag),
                        )),
                        Err(e) => errors.push(e),
                    }
                }
            }
            Ok(_) => errors.push(syn::Error::new_spanned(
                attr,
                format!("Invalid attribute. Expected #[{}(...)]", tag),
            )),
            Err(e) => errors.push(e),
        }
    }
    (values, errors)
}

/// A strategy for interpreting the parts of an attribute value.
pub trait NestedMetaConsumer<T> {
    /// Attempt to extract a single part. This may return an interpreted part, an error
    /// if the part is invalid or decline to process the part (by returning `Ok(None)`).
    fn try_consume(&self, meta: &NestedMeta) -> Result<Option<T>, syn::Error>;

    /// Transform the type of the results of this consumer.
    fn map<U, F>(self, f: F) -> MapConsumer<T, U, Self, F>
    where
        Self: Sized,
        F: Fn(T) -> U,
    {
        MapConsumer {
            inner: self,
            f,
            _type: PhantomData,
        }
    }
}

impl<T> NestedMetaConsumer<T> for HNil {
    fn try_consume(&self, _meta: &NestedMeta) -> Result<Option<T>, syn::Error> {
        Ok(None)
    }
}

impl<T, Head, Tail> NestedMetaConsumer<T> for HCons<Head, Tail>
where
    Head: NestedMetaConsumer<T>,
    Tail: NestedMetaConsumer<T>,
{
    fn try_consume(&self, meta: &NestedMeta) -> Result<Option<T>, syn::Error> {
        let HCons { head, tail } = self;
        match head.try_consume(meta)? {
            Some(t) => Ok(Some(t)),
            None => tail.try_consume(meta),
        }
    }
}

pub struct MapConsumer<T, U, C, F> {
    inner: C,
    f: F,
    _type: PhantomData<fn(T) -> U>,
}

impl<T, U, C, F> NestedMetaConsumer<U> for MapConsumer<T, U, C, F>
where
    C: NestedMetaConsumer<T>,
    F: Fn(T) -> U,
{
    fn try_consume(&self, meta: &NestedMeta) -> Result<Option<U>, syn::Error> {
        self.inner.try_consume(meta).map(|maybe| maybe.map(&self.f))
    }
}

/// Recognizes a bare flag such as `member` in `#[form(member)]`.
pub struct FlagConsumer {
    name: Symbol,
}

impl FlagConsumer {
    pub fn new(name: Symbol) -> Self {
        FlagConsumer { name }
    }
}

impl NestedMetaConsumer<()> for FlagConsumer {
    fn try_consume(&self, meta: &NestedMeta) -> Result<Option<()>, syn::Error> {
        match meta {
            NestedMeta::Meta(Meta::Path(path)) if path == self.name => Ok(Some(())),
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path == self.name => Err(
                syn::Error::new_spanned(meta, format!("'{}' does not take a value.", self.name)),
            ),
            _ => Ok(None),
        }
    }
}

/// Recognizes a string valued part such as `name = "x"`.
pub struct StringConsumer {
    name: Symbol,
}

impl StringConsumer {
    pub fn new(name: Symbol) -> Self {
        StringConsumer { name }
    }
}

impl NestedMetaConsumer<String> for StringConsumer {
    fn try_consume(&self, meta: &NestedMeta) -> Result<Option<String>, syn::Error> {
        match meta {
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path == self.name => match &nv.lit {
                Lit::Str(s) if !s.value().is_empty() => Ok(Some(s.value())),
                Lit::Str(s) => Err(syn::Error::new_spanned(
                    s,
                    format!("'{}' cannot be empty.", self.name),
                )),
                ow => Err(syn::Error::new_spanned(ow, "Expected a string literal.")),
            },
            _ => Ok(None),
        }
    }
}

/// Recognizes an integer valued part such as `rank = 2`.
pub struct IntConsumer {
    name: Symbol,
}

impl IntConsumer {
    pub fn new(name: Symbol) -> Self {
        IntConsumer { name }
    }
}

impl NestedMetaConsumer<i32> for IntConsumer {
    fn try_consume(&self, meta: &NestedMeta) -> Result<Option<i32>, syn::Error> {
        match meta {
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path == self.name => match &nv.lit {
                Lit::Int(n) => n.base10_parse::<i32>().map(Some),
                ow => Err(syn::Error::new_spanned(ow, "Expected an integer literal.")),
            },
            _ => Ok(None),
        }
    }
}
