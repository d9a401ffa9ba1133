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

use super::{Allocator, Identifier, IDENTIFIER};
use jsonform_form::{FormError, ModelError, PrintStrategy, Registry};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::thread;

struct Widget;
struct Gadget;

#[test]
fn ten_thousand_identifiers() {
    let ids = (0..10_000)
        .map(|_| Identifier::create::<Widget>().unwrap())
        .collect::<Vec<_>>();
    let classes = ids.iter().map(Identifier::class).collect::<HashSet<_>>();
    let instances = ids.iter().map(Identifier::instance).collect::<HashSet<_>>();
    assert_eq!(classes.len(), 1);
    assert_eq!(instances.len(), 10_000);
}

#[test]
fn classes_per_type() {
    let widget = Identifier::create::<Widget>().unwrap();
    let gadget = Identifier::create::<Gadget>().unwrap();
    assert_ne!(widget.class(), gadget.class());
    assert_ne!(widget.instance(), gadget.instance());
    assert_eq!(Identifier::create::<Gadget>().unwrap().class(), gadget.class());
}

#[test]
fn concurrent_allocation() {
    let handles = (0..4)
        .map(|_| {
            thread::spawn(|| {
                (0..500)
                    .map(|_| Identifier::create::<Widget>().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect::<Vec<_>>();
    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all.insert(id));
        }
    }
    assert_eq!(all.len(), 2000);
}

#[test]
fn strides_from_offsets() {
    let mut allocator = Allocator::default();
    let first = allocator
        .allocate(TypeId::of::<Widget>(), "Widget")
        .unwrap();
    let second = allocator
        .allocate(TypeId::of::<Widget>(), "Widget")
        .unwrap();
    let other = allocator
        .allocate(TypeId::of::<Gadget>(), "Gadget")
        .unwrap();
    assert_eq!(first.class(), super::CLASS_OFFSET);
    assert_eq!(first.instance(), super::INSTANCE_OFFSET);
    assert_eq!(second.class(), first.class());
    assert_eq!(second.instance(), first.instance() + super::INSTANCE_STRIDE);
    assert_eq!(other.class(), first.class() + super::CLASS_STRIDE);
}

#[test]
fn exhausted_space() {
    let mut allocator = Allocator {
        classes: HashMap::new(),
        next_class: super::CLASS_OFFSET,
        next_instance: u64::MAX - 1,
    };
    assert_eq!(
        allocator.allocate(TypeId::of::<Widget>(), "Widget"),
        Err(ModelError::IdentifierSpaceExhausted)
    );

    let mut allocator = Allocator {
        classes: HashMap::new(),
        next_class: u64::MAX,
        next_instance: super::INSTANCE_OFFSET,
    };
    assert_eq!(
        allocator.allocate(TypeId::of::<Widget>(), "Widget"),
        Err(ModelError::IdentifierSpaceExhausted)
    );
}

#[test]
fn display_and_parse() {
    let id = Identifier {
        class: 0x5eed0000,
        instance: 0x1000f00d,
    };
    assert_eq!(id.to_string(), "5eed0000-1000f00d");
    assert_eq!("5eed0000-1000f00d".parse::<Identifier>(), Ok(id));
    for bad in ["", "5eed", "-1", "1-", "x-1", "1-+2", "1-2-3"] {
        assert!(bad.parse::<Identifier>().is_err(), "{} was accepted", bad);
    }
}

#[test]
fn identifier_form() {
    let registry = Registry::new();
    let id = Identifier::create::<Widget>().unwrap();
    assert_eq!(
        registry.resolve::<Identifier>().err(),
        Some(ModelError::UnregisteredType("Identifier".to_string()))
    );
    registry.register(IDENTIFIER).unwrap();

    let text = registry.write_string(&id, PrintStrategy::Compact).unwrap();
    assert_eq!(text, format!("\"{}\"", id));
    assert_eq!(registry.read_str::<Identifier>(&text), Ok(id));
    assert!(matches!(
        registry.read_str::<Identifier>("12"),
        Err(FormError::Model(ModelError::UnexpectedKind { .. }))
    ));
    assert!(matches!(
        registry.read_str::<Identifier>(r#""nope""#),
        Err(FormError::Model(ModelError::Malformed { .. }))
    ));

    let mut owners = BTreeMap::new();
    owners.insert(id, "ann".to_string());
    let text = registry
        .write_string(&owners, PrintStrategy::Compact)
        .unwrap();
    assert_eq!(text, format!("{{\"{}\":\"ann\"}}", id));
    assert_eq!(registry.read_str::<BTreeMap<Identifier, String>>(&text), Ok(owners));
}
