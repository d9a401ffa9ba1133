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

//! Helpers shared by the jsonform derive macros for interpreting attributes.

pub mod attributes;
mod names;

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use std::fmt::{Display, Formatter};
use syn::{Ident, Path};

pub use names::{CaseConvention, CaseConventionConsumer, InvalidCaseConvention};

/// The name of an attribute or of a part of an attribute.
#[derive(Copy, Clone, Debug)]
pub struct Symbol(pub &'static str);

impl ToTokens for Symbol {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let Symbol(inner) = self;
        quote!(#inner).to_tokens(tokens);
    }
}

impl PartialEq<Symbol> for Ident {
    fn eq(&self, symbol: &Symbol) -> bool {
        self == symbol.0
    }
}

impl PartialEq<Symbol> for Path {
    fn eq(&self, symbol: &Symbol) -> bool {
        self.is_ident(symbol.0)
    }
}

impl<'a> PartialEq<Symbol> for &'a Path {
    fn eq(&self, symbol: &Symbol) -> bool {
        self.is_ident(symbol.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Convert a collection of errors into a token stream that will report all of them.
pub fn errs_to_compile_errors(errors: Vec<syn::Error>) -> TokenStream {
    let compile_errors = errors.iter().map(syn::Error::to_compile_error);
    quote!(#(#compile_errors)*)
}
