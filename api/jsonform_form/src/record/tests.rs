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

use super::{MemberSpec, Record, RecordRepresentation};
use crate::descriptor::{RawType, TypeDescriptor};
use crate::error::{FormError, ModelError};
use crate::registry::Registry;
use crate::representation::{Form, Representation};
use jsonform_json::PrintStrategy;
use jsonform_model::ValueKind;
use std::sync::Arc;

macro_rules! record_form {
    ($t:ty, $raw:expr) => {
        impl Form for $t {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::new($raw)
            }

            fn make_representation(
                registry: &Registry,
            ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
                Ok(Arc::new(RecordRepresentation::<$t>::build(registry)?))
            }
        }
    };
}

#[derive(Debug, Default, PartialEq)]
struct Person {
    name: String,
    age: Option<i32>,
    // Not a member.
    visits: u32,
}

record_form!(Person, RawType::record("Person"));

impl Record for Person {
    fn members() -> Vec<MemberSpec<Self>> {
        vec![
            MemberSpec::new::<String>("name", 0, |p| &p.name, |p| &mut p.name),
            MemberSpec::new::<Option<i32>>("age", 1, |p| &p.age, |p| &mut p.age),
        ]
    }

    fn construct() -> Result<Self, ModelError> {
        Ok(Person::default())
    }
}

fn read<T: Form>(input: &str) -> Result<T, FormError> {
    Registry::new().read_str(input)
}

fn write<T: Form>(value: &T) -> Result<String, FormError> {
    Registry::new().write_string(value, PrintStrategy::Compact)
}

#[test]
fn absent_member_omitted() {
    let tom = Person {
        name: "Tom".to_string(),
        age: None,
        visits: 3,
    };
    assert_eq!(write(&tom), Ok(r#"{"name":"Tom"}"#.to_string()));

    let restored = read::<Person>(r#"{"name":"Tom"}"#).unwrap();
    assert_eq!(restored.name, "Tom");
    assert_eq!(restored.age, None);
    assert_eq!(restored.visits, 0);
}

#[test]
fn present_members_written() {
    let ann = Person {
        name: "Ann".to_string(),
        age: Some(31),
        visits: 0,
    };
    let text = write(&ann).unwrap();
    assert_eq!(text, r#"{"name":"Ann","age":31}"#);
    assert_eq!(read::<Person>(&text), Ok(ann));
}

#[test]
fn read_order_follows_input() {
    let person = read::<Person>(r#"{"age": 40, "name": "Bo"}"#).unwrap();
    assert_eq!(person.name, "Bo");
    assert_eq!(person.age, Some(40));
}

#[test]
fn unknown_member_rejected() {
    assert_eq!(
        read::<Person>(r#"{"name":"Tom","bogus":1}"#),
        Err(FormError::Model(ModelError::UnknownMember {
            record: "Person".to_string(),
            member: "bogus".to_string()
        }))
    );
    assert!(matches!(
        read::<Person>(r#"{"visits":1}"#),
        Err(FormError::Model(ModelError::UnknownMember { .. }))
    ));
}

#[test]
fn record_must_be_object() {
    assert_eq!(
        read::<Person>("[]"),
        Err(FormError::Model(ModelError::UnexpectedKind {
            expected: ValueKind::Object,
            found: ValueKind::Array
        }))
    );
}

#[test]
fn pretty_record() {
    let ann = Person {
        name: "Ann".to_string(),
        age: Some(31),
        visits: 0,
    };
    let text = Registry::new()
        .write_string(&ann, PrintStrategy::pretty())
        .unwrap();
    assert_eq!(text, "{\n    \"name\": \"Ann\",\n    \"age\": 31\n}");
}

#[derive(Debug, Default, PartialEq)]
struct Ranked {
    first: i32,
    second: i32,
    third: i32,
}

record_form!(Ranked, RawType::record("Ranked"));

impl Record for Ranked {
    fn members() -> Vec<MemberSpec<Self>> {
        vec![
            MemberSpec::new::<i32>("first", 5, |r| &r.first, |r| &mut r.first),
            MemberSpec::new::<i32>("second", -1, |r| &r.second, |r| &mut r.second),
            MemberSpec::new::<i32>("third", 5, |r| &r.third, |r| &mut r.third),
        ]
    }

    fn construct() -> Result<Self, ModelError> {
        Ok(Ranked::default())
    }
}

#[test]
fn members_written_by_rank() {
    let ranked = Ranked {
        first: 1,
        second: 2,
        third: 3,
    };
    assert_eq!(
        write(&ranked),
        Ok(r#"{"second":2,"first":1,"third":3}"#.to_string())
    );
    let representation = RecordRepresentation::<Ranked>::build(&Registry::new()).unwrap();
    assert_eq!(
        representation.member_names().collect::<Vec<_>>(),
        vec!["second", "first", "third"]
    );
}

struct Unconstructible {
    value: i32,
}

record_form!(Unconstructible, RawType::record("Unconstructible"));

impl Record for Unconstructible {
    fn members() -> Vec<MemberSpec<Self>> {
        vec![MemberSpec::new::<i32>(
            "value",
            0,
            |r| &r.value,
            |r| &mut r.value,
        )]
    }
}

#[test]
fn missing_constructor() {
    assert_eq!(
        write(&Unconstructible { value: 4 }),
        Ok(r#"{"value":4}"#.to_string())
    );
    assert!(matches!(
        read::<Unconstructible>(r#"{"value":4}"#),
        Err(FormError::Model(ModelError::NoConstructor(name))) if name == "Unconstructible"
    ));
}

#[derive(Default)]
struct Account {
    balance: i64,
}

record_form!(Account, RawType::entity("Account"));

impl Record for Account {
    fn members() -> Vec<MemberSpec<Self>> {
        vec![MemberSpec::new::<i64>(
            "balance",
            0,
            |a| &a.balance,
            |a| &mut a.balance,
        )]
    }

    fn construct() -> Result<Self, ModelError> {
        Ok(Account::default())
    }
}

#[derive(Default)]
struct Ledger {
    accounts: Vec<Option<Account>>,
}

record_form!(Ledger, RawType::record("Ledger"));

impl Record for Ledger {
    fn members() -> Vec<MemberSpec<Self>> {
        vec![MemberSpec::new::<Vec<Option<Account>>>(
            "accounts",
            0,
            |l| &l.accounts,
            |l| &mut l.accounts,
        )]
    }

    fn construct() -> Result<Self, ModelError> {
        Ok(Ledger::default())
    }
}

#[test]
fn entities_serialize_directly() {
    assert_eq!(
        write(&Account { balance: 10 }),
        Ok(r#"{"balance":10}"#.to_string())
    );
}

#[test]
fn embedded_entity_rejected() {
    assert_eq!(
        Registry::new().resolve::<Ledger>().err(),
        Some(ModelError::EntityMember {
            record: "Ledger".to_string(),
            member: "accounts".to_string(),
            entity: "Account".to_string()
        })
    );
}

#[derive(Debug, Default, PartialEq)]
struct Duplicated {
    a: i32,
    b: i32,
}

record_form!(Duplicated, RawType::record("Duplicated"));

impl Record for Duplicated {
    fn members() -> Vec<MemberSpec<Self>> {
        vec![
            MemberSpec::new::<i32>("a", 0, |d| &d.a, |d| &mut d.a),
            MemberSpec::new::<i32>("a", 1, |d| &d.b, |d| &mut d.b),
        ]
    }

    fn construct() -> Result<Self, ModelError> {
        Ok(Duplicated::default())
    }
}

#[test]
fn duplicate_member_rejected() {
    assert_eq!(
        Registry::new().resolve::<Duplicated>().err(),
        Some(ModelError::DuplicateMember {
            record: "Duplicated".to_string(),
            member: "a".to_string()
        })
    );
}

#[derive(Debug, Default, PartialEq)]
struct Node {
    label: String,
    children: Vec<Node>,
}

record_form!(Node, RawType::record("Node"));

impl Record for Node {
    fn members() -> Vec<MemberSpec<Self>> {
        vec![
            MemberSpec::new::<String>("label", 0, |n| &n.label, |n| &mut n.label),
            MemberSpec::new::<Vec<Node>>("children", 1, |n| &n.children, |n| &mut n.children),
        ]
    }

    fn construct() -> Result<Self, ModelError> {
        Ok(Node::default())
    }
}

#[test]
fn recursive_record() {
    let tree = Node {
        label: "root".to_string(),
        children: vec![
            Node {
                label: "leaf".to_string(),
                children: vec![],
            },
            Node {
                label: "branch".to_string(),
                children: vec![Node {
                    label: "twig".to_string(),
                    children: vec![],
                }],
            },
        ],
    };
    let registry = Registry::new();
    let text = registry
        .write_string(&tree, PrintStrategy::Compact)
        .unwrap();
    assert_eq!(
        text,
        r#"{"label":"root","children":[{"label":"leaf","children":[]},{"label":"branch","children":[{"label":"twig","children":[]}]}]}"#
    );
    assert_eq!(registry.read_str::<Node>(&text), Ok(tree));
}
