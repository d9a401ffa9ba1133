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

use crate::descriptor::{RawType, TypeDescriptor};
use crate::error::{FormError, ModelError};
use crate::registry::Registry;
use crate::representation::{expect_kind, Form, Representation};
use jsonform_json::{read_value, write_value, JsonReader, JsonWriter};
use jsonform_model::{Number, Value, ValueKind};
use std::sync::Arc;

fn read_number(reader: &mut JsonReader<'_>) -> Result<Number, FormError> {
    expect_kind(reader, ValueKind::Number)?;
    Ok(reader.read_number()?)
}

fn narrowing(n: &Number, target: &'static str) -> FormError {
    ModelError::NumericNarrowing {
        value: n.to_string(),
        target,
    }
    .into()
}

macro_rules! primitive_form {
    ($t:ty, $name:literal, $rep:ident) => {
        impl Form for $t {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::new(RawType::primitive($name))
            }

            fn make_representation(
                _registry: &Registry,
            ) -> Result<Arc<dyn Representation<Self>>, ModelError> {
                Ok(Arc::new($rep))
            }
        }
    };
}

/// Representation of all of the fixed width integer types.
#[derive(Debug, Clone, Copy)]
pub struct IntegerRepresentation;

macro_rules! integer_forms {
    ($($t:ty => $name:literal, $narrow:ident, $write:ident, $wide:ty);* $(;)?) => {
        $(
            impl Representation<$t> for IntegerRepresentation {
                fn read(&self, reader: &mut JsonReader<'_>) -> Result<$t, FormError> {
                    let n = read_number(reader)?;
                    n.$narrow().ok_or_else(|| narrowing(&n, $name))
                }

                fn write(&self, value: &$t, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
                    Ok(writer.$write(<$wide>::from(*value))?)
                }
            }

            primitive_form!($t, $name, IntegerRepresentation);
        )*
    };
}

integer_forms! {
    i8 => "i8", to_i8, write_i64, i64;
    i16 => "i16", to_i16, write_i64, i64;
    i32 => "i32", to_i32, write_i64, i64;
    i64 => "i64", to_i64, write_i64, i64;
    i128 => "i128", to_i128, write_i128, i128;
    u8 => "u8", to_u8, write_u64, u64;
    u16 => "u16", to_u16, write_u64, u64;
    u32 => "u32", to_u32, write_u64, u64;
    u64 => "u64", to_u64, write_u64, u64;
    u128 => "u128", to_u128, write_u128, u128;
}

/// Representation of the floating point types. Reading a number that is outside of the finite
/// range of the type is a narrowing error and non-finite values cannot be written.
#[derive(Debug, Clone, Copy)]
pub struct FloatRepresentation;

impl Representation<f64> for FloatRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<f64, FormError> {
        let n = read_number(reader)?;
        n.to_f64().ok_or_else(|| narrowing(&n, "f64"))
    }

    fn write(&self, value: &f64, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        if value.is_finite() {
            Ok(writer.write_f64(*value)?)
        } else {
            Err(ModelError::NonFiniteFloat.into())
        }
    }
}

impl Representation<f32> for FloatRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<f32, FormError> {
        let n = read_number(reader)?;
        n.to_f64()
            .map(|x| x as f32)
            .filter(|x| x.is_finite())
            .ok_or_else(|| narrowing(&n, "f32"))
    }

    fn write(&self, value: &f32, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        match Number::try_from(*value) {
            Ok(n) => Ok(writer.write_number(&n)?),
            Err(_) => Err(ModelError::NonFiniteFloat.into()),
        }
    }
}

primitive_form!(f64, "f64", FloatRepresentation);
primitive_form!(f32, "f32", FloatRepresentation);

#[derive(Debug, Clone, Copy)]
pub struct BoolRepresentation;

impl Representation<bool> for BoolRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<bool, FormError> {
        expect_kind(reader, ValueKind::Boolean)?;
        Ok(reader.read_boolean()?)
    }

    fn write(&self, value: &bool, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        Ok(writer.write_boolean(*value)?)
    }
}

primitive_form!(bool, "bool", BoolRepresentation);

/// Strings are used verbatim as object keys.
#[derive(Debug, Clone, Copy)]
pub struct StringRepresentation;

impl Representation<String> for StringRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<String, FormError> {
        expect_kind(reader, ValueKind::String)?;
        Ok(reader.read_string()?)
    }

    fn write(&self, value: &String, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        Ok(writer.write_string(value)?)
    }

    fn read_key(&self, key: &str) -> Result<String, FormError> {
        Ok(key.to_string())
    }

    fn write_key(&self, value: &String) -> Result<String, FormError> {
        Ok(value.clone())
    }
}

primitive_form!(String, "String", StringRepresentation);

/// A `char` is a string containing exactly one character.
#[derive(Debug, Clone, Copy)]
pub struct CharRepresentation;

impl Representation<char> for CharRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<char, FormError> {
        let text = StringRepresentation.read(reader)?;
        self.read_key(&text)
    }

    fn write(&self, value: &char, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        let mut buffer = [0u8; 4];
        Ok(writer.write_string(value.encode_utf8(&mut buffer))?)
    }

    fn read_key(&self, key: &str) -> Result<char, FormError> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ModelError::Malformed {
                target: "char",
                text: key.to_string(),
            }
            .into()),
        }
    }

    fn write_key(&self, value: &char) -> Result<String, FormError> {
        Ok(value.to_string())
    }
}

primitive_form!(char, "char", CharRepresentation);

#[derive(Debug, Clone, Copy)]
pub struct NumberRepresentation;

impl Representation<Number> for NumberRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Number, FormError> {
        read_number(reader)
    }

    fn write(&self, value: &Number, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        Ok(writer.write_number(value)?)
    }
}

primitive_form!(Number, "Number", NumberRepresentation);

/// Any JSON document, read through the generic value model.
#[derive(Debug, Clone, Copy)]
pub struct ValueRepresentation;

impl Representation<Value> for ValueRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<Value, FormError> {
        Ok(read_value(reader)?)
    }

    fn write(&self, value: &Value, writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        Ok(write_value(value, writer)?)
    }
}

primitive_form!(Value, "Value", ValueRepresentation);

/// The unit type is written as `null`.
#[derive(Debug, Clone, Copy)]
pub struct UnitRepresentation;

impl Representation<()> for UnitRepresentation {
    fn read(&self, reader: &mut JsonReader<'_>) -> Result<(), FormError> {
        expect_kind(reader, ValueKind::Null)?;
        Ok(reader.read_null()?)
    }

    fn write(&self, _value: &(), writer: &mut JsonWriter<'_>) -> Result<(), FormError> {
        Ok(writer.write_null()?)
    }
}

primitive_form!((), "()", UnitRepresentation);
