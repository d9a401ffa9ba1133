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

use super::{JsonWriter, PrintStrategy};
use jsonform_model::Number;

fn write_with<F>(strategy: PrintStrategy, f: F) -> String
where
    F: FnOnce(&mut JsonWriter<'_>) -> std::fmt::Result,
{
    let mut out = String::new();
    let mut writer = JsonWriter::with_strategy(&mut out, strategy);
    f(&mut writer).expect("Writing to a string failed.");
    out
}

#[test]
fn write_escaped_string() {
    let out = write_with(PrintStrategy::Compact, |writer| {
        writer.write_string("a\"b\\c/d\u{08}\u{0c}\n\r\té")
    });
    assert_eq!(out, r#""a\"b\\c\/d\b\f\n\r\té""#);
}

#[test]
fn write_primitives() {
    let out = write_with(PrintStrategy::Compact, |writer| {
        writer.begin_array()?;
        writer.array_item()?;
        writer.write_i64(-5)?;
        writer.array_item()?;
        writer.write_u64(u64::MAX)?;
        writer.array_item()?;
        writer.write_f64(0.1)?;
        writer.array_item()?;
        writer.write_f64(f64::NAN)?;
        writer.array_item()?;
        writer.write_boolean(true)?;
        writer.array_item()?;
        writer.write_number(&"1.50".parse::<Number>().unwrap())?;
        writer.end_array()
    });
    assert_eq!(out, "[-5,18446744073709551615,0.1,null,true,1.5]");
}

#[test]
fn empty_structures() {
    let out = write_with(PrintStrategy::pretty(), |writer| {
        writer.begin_object()?;
        writer.write_key("list")?;
        writer.begin_array()?;
        writer.end_array()?;
        writer.end_object()
    });
    assert_eq!(out, "{\n    \"list\": []\n}");

    let out = write_with(PrintStrategy::pretty(), |writer| {
        writer.begin_object()?;
        writer.end_object()
    });
    assert_eq!(out, "{}");
}

#[test]
fn nested_compact() {
    let out = write_with(PrintStrategy::Compact, |writer| {
        writer.begin_object()?;
        writer.write_key("a")?;
        writer.begin_array()?;
        writer.array_item()?;
        writer.write_null()?;
        writer.array_item()?;
        writer.begin_object()?;
        writer.write_key("b")?;
        writer.write_boolean(false)?;
        writer.end_object()?;
        writer.end_array()?;
        writer.write_key("c")?;
        writer.write_string("d")?;
        writer.end_object()
    });
    assert_eq!(out, r#"{"a":[null,{"b":false}],"c":"d"}"#);
}

#[test]
fn nested_pretty() {
    let out = write_with(PrintStrategy::Pretty { indent: 2 }, |writer| {
        writer.begin_object()?;
        writer.write_key("a")?;
        writer.begin_array()?;
        writer.array_item()?;
        writer.write_i64(1)?;
        writer.array_item()?;
        writer.write_i64(2)?;
        writer.end_array()?;
        writer.write_key("b")?;
        writer.write_null()?;
        writer.end_object()
    });
    assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": null\n}");
}
