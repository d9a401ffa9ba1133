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

use super::{consume_attributes, FlagConsumer, IntConsumer, NestedMetaConsumer, StringConsumer};
use crate::Symbol;
use syn::{parse_quote, Attribute};

#[derive(Debug, PartialEq)]
enum Part {
    Member,
    Rank(i32),
    Name(String),
}

fn consumer() -> impl NestedMetaConsumer<Part> {
    frunk::hlist![
        FlagConsumer::new(Symbol("member")).map(|_| Part::Member),
        IntConsumer::new(Symbol("rank")).map(Part::Rank),
        StringConsumer::new(Symbol("name")).map(Part::Name),
    ]
}

#[test]
fn consume_parts() {
    let attrs: Vec<Attribute> = vec![
        parse_quote!(#[form(member, rank = 3)]),
        parse_quote!(#[other(ignored)]),
        parse_quote!(#[form(name = "alias")]),
    ];
    let (parts, errors) = consume_attributes(Symbol("form"), &attrs, consumer());
    assert!(errors.is_empty());
    assert_eq!(
        parts,
        vec![Part::Member, Part::Rank(3), Part::Name("alias".to_string())]
    );
}

#[test]
fn report_bad_parts() {
    let attrs: Vec<Attribute> = vec![
        parse_quote!(#[form(bogus)]),
        parse_quote!(#[form(rank = "high")]),
        parse_quote!(#[form(name = "")]),
        parse_quote!(#[form(member = 1)]),
        parse_quote!(#[form]),
    ];
    let (parts, errors) = consume_attributes(Symbol("form"), &attrs, consumer());
    assert!(parts.is_empty());
    assert_eq!(errors.len(), 5);
}
