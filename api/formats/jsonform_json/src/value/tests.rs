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

use crate::{
    parse_request_body, parse_value, print_value, print_value_pretty, serialize_response,
    ParseErrorKind, MAX_DEPTH,
};
use jsonform_model::{Number, Value};

fn sample() -> Value {
    Value::object()
        .add("name", "Tom")
        .add("age", 42)
        .add("ratio", Value::Number("0.125".parse::<Number>().unwrap()))
        .add("tags", Value::array().add("a").add("b/c").build())
        .add("nested", Value::object().add("ok", true).add("none", Value::Null).build())
        .add("empty", Value::array().build())
        .build()
}

#[test]
fn round_trip() {
    let value = sample();
    let text = print_value(&value).to_string();
    assert_eq!(parse_value(&text), Ok(value.clone()));

    let pretty = print_value_pretty(&value).to_string();
    assert_eq!(parse_value(&pretty), Ok(value));
}

#[test]
fn members_written_in_key_order() {
    let value = sample();
    assert_eq!(
        print_value(&value).to_string(),
        r#"{"age":42,"empty":[],"name":"Tom","nested":{"none":null,"ok":true},"ratio":0.125,"tags":["a","b\/c"]}"#
    );
}

#[test]
fn serialization_is_idempotent() {
    let first = Value::object().add("x", 1).add("y", "z").build();
    let second = Value::object().add("y", "z").add("x", 1).build();
    assert_eq!(
        print_value(&first).to_string(),
        print_value(&second).to_string()
    );
    assert_eq!(
        print_value(&first).to_string(),
        print_value(&first).to_string()
    );
}

#[test]
fn number_equality_survives_round_trip() {
    let ten = Value::Number("10.0".parse::<Number>().unwrap());
    let text = print_value(&ten).to_string();
    assert_eq!(text, "10");
    assert_eq!(parse_value(&text), Ok(Value::number(10)));
}

#[test]
fn empty_input_is_null() {
    assert_eq!(parse_value(""), Ok(Value::Null));
    assert_eq!(parse_value("  \n\t"), Ok(Value::Null));
}

#[test]
fn trailing_characters_rejected() {
    let err = parse_value("[1] 2").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingCharacters);
    assert_eq!(err.column, 5);
}

#[test]
fn unexpected_leading_character() {
    let err = parse_value("[1, x]").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedCharacter {
            expected: "a value",
            found: 'x'
        }
    );
    assert_eq!(err.column, 5);
}

#[test]
fn duplicate_keys_keep_last() {
    let value = parse_value(r#"{"k":"a","k":"b"}"#).unwrap();
    assert_eq!(value, Value::object().add("k", "b").build());
}

#[test]
fn malformed_numbers_in_documents() {
    assert_eq!(
        parse_value("01").unwrap_err().kind,
        ParseErrorKind::LeadingZero
    );
    assert_eq!(
        parse_value("1.").unwrap_err().kind,
        ParseErrorKind::InvalidNumber
    );
    assert_eq!(
        parse_value(r#"{"a": -}"#).unwrap_err().kind,
        ParseErrorKind::InvalidNumber
    );
}

#[test]
fn request_and_response_bodies() {
    let value = parse_request_body(br#"{"a":[true]}"#).unwrap();
    assert_eq!(
        value,
        Value::object()
            .add("a", Value::array().add(true).build())
            .build()
    );
    assert_eq!(serialize_response(&value), br#"{"a":[true]}"#.to_vec());

    let err = parse_request_body(&[b'"', b'a', 0xff, b'"']).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
    assert_eq!(err.column, 3);
}

#[test]
fn deeply_nested_documents_rejected() {
    let text = format!("{}{}", "[".repeat(200_000), "]".repeat(200_000));
    let err = parse_value(&text).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(MAX_DEPTH));
    assert_eq!(err.column, MAX_DEPTH + 1);

    let text = format!("{}1{}", r#"{"a":"#.repeat(200_000), "}".repeat(200_000));
    let err = parse_request_body(text.as_bytes()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(MAX_DEPTH));

    let text = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
    assert!(parse_value(&text).is_ok());
}

#[test]
fn huge_exponent_printed_back() {
    let value = parse_value("1e9223372036854775807").unwrap();
    let text = print_value(&value).to_string();
    assert_eq!(text, "1E9223372036854775807");
    assert_eq!(parse_value(&text), Ok(value));
}
