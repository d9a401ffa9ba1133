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

use crate::{Array, Number, Object, Value, ValueKind};

#[test]
fn value_kinds() {
    assert_eq!(Value::Null.kind(), ValueKind::Null);
    assert_eq!(Value::boolean(true).kind(), ValueKind::Boolean);
    assert_eq!(Value::number(1).kind(), ValueKind::Number);
    assert_eq!(Value::string("a").kind(), ValueKind::String);
    assert_eq!(Value::array().build().kind(), ValueKind::Array);
    assert_eq!(Value::object().build().kind(), ValueKind::Object);
    assert_eq!(ValueKind::Object.to_string(), "object");
}

#[test]
fn object_keys_sorted() {
    let obj = Value::object()
        .add("zeta", 1)
        .add("alpha", 2)
        .add("mu", 3)
        .build_object();
    let keys = obj.keys().collect::<Vec<_>>();
    assert_eq!(keys, vec!["alpha", "mu", "zeta"]);
}

#[test]
fn later_member_replaces_earlier() {
    let obj = Value::object()
        .add("a", 1)
        .add("b", 2)
        .add("a", "replaced")
        .build_object();
    assert_eq!(obj.len(), 2);
    assert_eq!(obj.get("a"), Some(&Value::string("replaced")));
}

#[test]
fn construction_order_irrelevant() {
    let first = Value::object().add("x", 1).add("y", true).build();
    let second = Value::object().add("y", true).add("x", 1).build();
    assert_eq!(first, second);
}

#[test]
fn numbers_compare_by_decimal_value() {
    let ten: Number = "10.0".parse().unwrap();
    assert_eq!(Value::number(10), Value::Number(ten));
    let first = Value::array().add(Value::number(10)).build();
    let second = Value::array()
        .add(Value::Number("1e1".parse().unwrap()))
        .build();
    assert_eq!(first, second);
}

#[test]
fn array_preserves_order() {
    let arr = Value::array().add(3).add(1).add(2).build_array();
    let items = arr.iter().cloned().collect::<Vec<_>>();
    assert_eq!(
        items,
        vec![Value::number(3), Value::number(1), Value::number(2)]
    );
    assert_eq!(arr.get(1), Some(&Value::number(1)));
    assert_eq!(arr.get(3), None);
}

#[test]
fn collect_into_collections() {
    let obj: Object = vec![("b", 2), ("a", 1)].into_iter().collect();
    assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);

    let arr: Array = vec!["x", "y"].into_iter().collect();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr.get(0).and_then(Value::as_str), Some("x"));
}

#[test]
fn non_finite_floats_are_null() {
    assert_eq!(Value::from(f64::NAN), Value::Null);
    assert_eq!(Value::from(f64::INFINITY), Value::Null);
    assert_eq!(Value::from(1.5), Value::Number("1.5".parse().unwrap()));
}

#[test]
fn optional_values() {
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some("a")), Value::string("a"));
}

#[test]
fn accessors() {
    let value = Value::object()
        .add("flag", false)
        .add("items", Value::array().add(Value::Null).build())
        .build();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("flag").and_then(Value::as_bool), Some(false));
    assert!(obj
        .get("items")
        .and_then(Value::as_array)
        .and_then(|arr| arr.get(0))
        .map(Value::is_null)
        .unwrap_or(false));
    assert!(value.as_array().is_none());
    assert!(value.as_number().is_none());
}
