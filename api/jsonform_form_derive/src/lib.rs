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

extern crate proc_macro;
extern crate proc_macro2;
#[macro_use]
extern crate quote;
#[macro_use]
extern crate syn;

use jsonform_macro_utilities::errs_to_compile_errors;
use proc_macro::TokenStream;
use syn::punctuated::Pair;
use syn::{DeriveInput, Meta, NestedMeta};

use crate::codegen::derive_record;
use crate::model::RecordModel;

mod codegen;
mod model;
mod modifiers;

fn default_root() -> syn::Path {
    parse_quote!(::jsonform)
}

/// Derive `Form` and `Record` for a struct with named fields. Fields marked with
/// `#[form(member)]` are serialized. Entities (`#[form(entity)]`) additionally implement
/// `Entity` and are compared by their key members; singletons (`#[form(singleton)]`)
/// implement `Singleton` and can only be constructed through `Singletons::get_instance`.
#[proc_macro_derive(Record, attributes(form, form_root))]
pub fn derive_record_form(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);
    let root = extract_replace_root(&mut input.attrs).unwrap_or_else(default_root);
    RecordModel::validate(&input)
        .map(|model| derive_record(&root, &model))
        .unwrap_or_else(errs_to_compile_errors)
        .into()
}

/// Find a `#[form_root(path)]` attribute, remove it from the item and return the path. The
/// generated code refers to the runtime crates through this path instead of `::jsonform`.
/// Malformed attributes are ignored and left in place.
fn extract_replace_root(attrs: &mut Vec<syn::Attribute>) -> Option<syn::Path> {
    let (index, root) = attrs.iter().enumerate().find_map(|(index, attr)| {
        if !attr.path.is_ident("form_root") {
            return None;
        }
        let mut nested = match attr.parse_meta() {
            Ok(Meta::List(list)) => list.nested,
            _ => return None,
        };
        match nested.pop().map(Pair::into_value) {
            Some(NestedMeta::Meta(Meta::Path(root))) if nested.is_empty() => Some((index, root)),
            _ => None,
        }
    })?;
    attrs.remove(index);
    Some(root)
}
