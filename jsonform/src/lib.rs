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

//! # jsonform
//!
//! A JSON codec and value model together with representations that map Rust types to and from
//! JSON text, driven by the shape of the types themselves.
//!
//! ```
//! use jsonform::Record;
//!
//! #[derive(Record, Default, Debug, PartialEq)]
//! struct Person {
//!     #[form(member)]
//!     name: String,
//!     #[form(member)]
//!     age: Option<i32>,
//! }
//!
//! let tom = Person { name: "Tom".to_string(), age: None };
//! let text = jsonform::form::write_json(&tom).unwrap();
//! assert_eq!(text, r#"{"name":"Tom"}"#);
//! assert_eq!(jsonform::form::read_json::<Person>(&text).unwrap(), tom);
//! ```

#[doc(inline)]
pub use jsonform_model as model;

/// The character level JSON reader and writer.
pub mod json {
    pub use jsonform_json::{
        parse_request_body, parse_value, print_value, print_value_pretty, read_value,
        serialize_response, write_value, JsonReader, JsonWriter, ParseError, ParseErrorKind,
        PrintStrategy, MAX_DEPTH,
    };
}

/// Type driven representations and the record reflection layer.
pub mod form {
    pub use jsonform_form::*;
}

/// Identifiers, entities and persistent singletons.
pub mod store {
    pub use jsonform_store::*;
}

#[cfg(feature = "derive")]
pub use jsonform_form_derive::Record;

pub use jsonform_form::{Form, FormError, ModelError};
pub use jsonform_model::Value;
