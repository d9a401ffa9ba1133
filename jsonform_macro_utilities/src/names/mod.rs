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


use std::str::FromStr;

use convert_case::{Case, Casing};
use syn::{Lit, Meta, NestedMeta};
use thiserror::Error;

use crate::attributes::NestedMetaConsumer;
use crate::Symbol;

/// Case conventions that may be applied to the member names of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseConvention {
    Camel,
    Pascal,
    Snake,
    Kebab,
}

#[derive(Debug, Error)]
#[error("{0} is not a valid case convention.")]
pub struct InvalidCaseConvention(pub String);

impl FromStr for CaseConvention {
    type Err = InvalidCaseConvention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camel" => Ok(CaseConvention::Camel),
            "pascal" => Ok(CaseConvention::Pascal),
            "snake" => Ok(CaseConvention::Snake),
            "kebab" => Ok(CaseConvention::Kebab),
            ow => Err(InvalidCaseConvention(ow.to_string())),
        }
    }
}

impl From<CaseConvention> for Case {
    fn from(value: CaseConvention) -> Self {
        match value {
            CaseConvention::Camel => Case::Camel,
            CaseConvention::Pascal => Case::Pascal,
            CaseConvention::Snake => Case::Snake,
            CaseConvention::Kebab => Case::Kebab,
        }
    }
}

impl CaseConvention {
    pub fn apply(&self, name: &str) -> String {
        name.to_case(Case::from(*self))
    }
}

/// Reads a case convention from a part of the form `tag = "convention"`.
pub struct CaseConventionConsumer {
    tag: Symbol,
}

impl CaseConventionConsumer {
    pub fn new(tag: Symbol) -> Self {
        CaseConventionConsumer { tag }
    }
}

impl NestedMetaConsumer<CaseConvention> for CaseConventionConsumer {
    fn try_consume(&self, meta: &NestedMeta) -> Result<Option<CaseConvention>, syn::Error> {
        match meta {
            NestedMeta::Meta(Meta::NameValue(nv)) if nv.path == self.tag => match &nv.lit {
                Lit::Str(s) => s
                    .value()
                    .parse::<CaseConvention>()
                    .map(Some)
                    .map_err(|e| syn::Error::new_spanned(s, e.to_string())),
                ow => Err(syn::Error::new_spanned(ow, "Expected a string literal.")),
            },
            _ => Ok(None),
        }
    }
}
