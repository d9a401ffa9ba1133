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

use super::Registry;
use crate::descriptor::{FormKind, RawType, TypeDescriptor, LIST};
use crate::error::{FormError, ModelError};
use crate::representation::{Form, Representation};
use jsonform_json::{JsonReader, JsonWriter, PrintStrategy};
use static_assertions::assert_impl_all;
use std::sync::Arc;
use std::thread;

assert_impl_all!(Registry: Send, Sync, Clone);

#[derive(Debug, PartialEq)]
struct Celsius(f64);

const CELSIUS: RawType = RawType::custom("Celsius");

struct CelsiusRepresentation;

impl Representation<Celsius> for CelsiusRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Celsius, FormError> {
        let text = reader.read_string()?;
        let degrees = text
            .strip_suffix("C")
            .and_then(|n| n.parse().ok())
            .ok_or(ModelError::Malformed {
                target: "temperature",
                text,
            })?;
        Ok(Celsius(degrees))
    }

    fn write(&self, value: &Celsius, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        Ok(writer.write_string(&format!("{}C", value.0))?)
    }
}

impl Form for Celsius {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(CELSIUS)
    }

    fn make_representation(
        _registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Ok(Arc::new(CelsiusRepresentation))
    }
}

/// A type that claims to be generic over a type that does not accept parameters.
struct Misparameterized;

impl Form for Misparameterized {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(
            RawType::primitive("i32"),
            vec![TypeDescriptor::new(RawType::primitive("bool"))],
        )
    }

    fn make_representation(
        _registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Err(ModelError::NoConstructor("Misparameterized".to_string()))
    }
}

/// A list with too many parameters.
struct Overparameterized;

impl Form for Overparameterized {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::with_params(
            LIST,
            vec![
                TypeDescriptor::new(RawType::primitive("bool")),
                TypeDescriptor::new(RawType::primitive("bool")),
            ],
        )
    }

    fn make_representation(
        _registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Err(ModelError::NoConstructor("Overparameterized".to_string()))
    }
}

/// A type that shares its descriptor with `Vec<i32>`.
struct Impostor;

impl Form for Impostor {
    fn descriptor() -> TypeDescriptor {
        <Vec<i32>>::descriptor()
    }

    fn make_representation(
        _registry: &Registry,
    ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
        Err(ModelError::NoConstructor("Impostor".to_string()))
    }
}

#[test]
fn same_descriptor_same_instance() {
    let registry = Registry::new();
    let first = registry.resolve::<Vec<i32>>().unwrap();
    let second = registry.resolve::<Vec<i32>>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn parameters_cached_separately() {
    let registry = Registry::new();
    let ints = registry.resolve::<Vec<i32>>().unwrap();
    let strings = registry.resolve::<Vec<String>>().unwrap();
    let mut out = String::new();
    let mut writer = JsonWriter::new(&mut out);
    ints.write(&vec![1], &mut writer).unwrap();
    strings.write(&vec!["1".to_string()], &mut writer).unwrap();
    assert_eq!(out, r#"[1]["1"]"#);
    assert_ne!(<Vec<i32>>::descriptor(), <Vec<String>>::descriptor());
}

#[test]
fn nested_parameters_share_components() {
    let registry = Registry::new();
    let inner = registry.resolve::<Vec<i32>>().unwrap();
    registry.resolve::<Vec<Vec<i32>>>().unwrap();
    let again = registry.resolve::<Vec<i32>>().unwrap();
    assert!(Arc::ptr_eq(&inner, &again));
}

#[test]
fn unregistered_custom_type() {
    let registry = Registry::new();
    assert_eq!(
        registry.resolve::<Celsius>().err(),
        Some(ModelError::UnregisteredType("Celsius".to_string()))
    );
    assert!(registry.register(CELSIUS).is_ok());
    assert!(registry.is_registered("Celsius"));
    let celsius = registry
        .read_str::<Celsius>(r#""21.5C""#)
        .expect("Registered type failed.");
    assert_eq!(celsius, Celsius(21.5));
    assert_eq!(
        registry.write_string(&Celsius(-4.0), PrintStrategy::Compact),
        Ok(r#""-4C""#.to_string())
    );
}

#[test]
fn conflicting_registration() {
    let registry = Registry::new();
    assert!(registry.register(CELSIUS).is_ok());
    assert!(registry.register(CELSIUS).is_ok());
    assert_eq!(
        registry.register(RawType::new("Celsius", FormKind::Custom, 1)),
        Err(ModelError::ConflictingRegistration {
            name: "Celsius".to_string()
        })
    );
}

#[test]
fn parameters_on_non_generic_type() {
    let registry = Registry::new();
    assert_eq!(
        registry.resolve::<Misparameterized>().err(),
        Some(ModelError::NotGeneric("i32".to_string()))
    );
}

#[test]
fn wrong_parameter_count() {
    let registry = Registry::new();
    assert_eq!(
        registry.resolve::<Overparameterized>().err(),
        Some(ModelError::ParameterCount {
            name: "List".to_string(),
            expected: 1,
            actual: 2
        })
    );
}

#[test]
fn descriptor_collision() {
    let registry = Registry::new();
    registry.resolve::<Vec<i32>>().unwrap();
    assert_eq!(
        registry.resolve::<Impostor>().err(),
        Some(ModelError::DescriptorCollision("List<i32>".to_string()))
    );
}

#[test]
fn concurrent_resolution_converges() {
    let registry = Registry::new();
    let handles = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.resolve::<Vec<Option<String>>>().unwrap())
        })
        .collect::<Vec<_>>();
    let representations = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();
    let cached = registry.resolve::<Vec<Option<String>>>().unwrap();
    for representation in &representations {
        assert!(Arc::ptr_eq(representation, &cached));
    }
}

#[test]
fn registries_are_independent() {
    let first = Registry::new();
    let second = Registry::new();
    let a = first.resolve::<Vec<u8>>().unwrap();
    let b = second.resolve::<Vec<u8>>().unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}
