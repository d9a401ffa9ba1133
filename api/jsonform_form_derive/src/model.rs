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

use crate::modifiers::{container_consumer, field_consumer, ContainerPart, FieldPart, FORM_PATH};
use jsonform_macro_utilities::attributes::consume_attributes;
use jsonform_macro_utilities::CaseConvention;
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, Generics, Ident, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Plain,
    Entity,
    Singleton,
}

/// How a field takes part in the record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldRole {
    pub member: bool,
    pub key: bool,
    pub identifier: bool,
}

pub struct FieldModel<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub role: FieldRole,
    /// Name of the member in the JSON object.
    pub name: String,
    pub rank: i32,
}

pub struct RecordModel<'a> {
    pub name: &'a Ident,
    pub generics: &'a Generics,
    pub kind: RecordKind,
    pub fields: Vec<FieldModel<'a>>,
}

impl<'a> RecordModel<'a> {
    pub fn members(&self) -> impl Iterator<Item = &FieldModel<'a>> + '_ {
        self.fields.iter().filter(|f| f.role.member)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldModel<'a>> + '_ {
        self.fields.iter().filter(|f| f.role.key)
    }

    pub fn identifier(&self) -> Option<&FieldModel<'a>> {
        self.fields.iter().find(|f| f.role.identifier)
    }

    /// Interpret the derive input, collecting every error that is found.
    pub fn validate(input: &'a DeriveInput) -> Result<RecordModel<'a>, Vec<syn::Error>> {
        let mut errors = vec![];
        let named = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => Some(named),
                _ => None,
            },
            _ => None,
        };
        let named = match named {
            Some(named) => named,
            None => {
                return Err(vec![syn::Error::new_spanned(
                    input,
                    "Records must be structs with named fields.",
                )])
            }
        };

        let (parts, errs) = consume_attributes(FORM_PATH, &input.attrs, container_consumer());
        errors.extend(errs);
        let mut kind = RecordKind::Plain;
        let mut convention = None;
        for part in parts {
            match part {
                ContainerPart::Entity | ContainerPart::Singleton if kind != RecordKind::Plain => {
                    errors.push(syn::Error::new_spanned(
                        input,
                        "A record may be an entity or a singleton but not both.",
                    ))
                }
                ContainerPart::Entity => kind = RecordKind::Entity,
                ContainerPart::Singleton => kind = RecordKind::Singleton,
                ContainerPart::Convention(_) if convention.is_some() => errors.push(
                    syn::Error::new_spanned(input, "Duplicate field naming conventions."),
                ),
                ContainerPart::Convention(conv) => convention = Some(conv),
            }
        }

        let mut fields = Vec::with_capacity(named.named.len());
        for (index, field) in named.named.iter().enumerate() {
            match FieldModel::validate(field, index, convention, kind) {
                Ok(model) => fields.push(model),
                Err(errs) => errors.extend(errs),
            }
        }

        let mut seen: HashMap<&str, &FieldModel<'a>> = HashMap::new();
        for field in fields.iter().filter(|f| f.role.member) {
            if seen.insert(field.name.as_str(), field).is_some() {
                errors.push(syn::Error::new_spanned(
                    field.ident,
                    format!("Duplicate member name '{}'.", field.name),
                ));
            }
        }

        let identifiers = fields.iter().filter(|f| f.role.identifier).count();
        if kind == RecordKind::Entity && identifiers != 1 {
            errors.push(syn::Error::new_spanned(
                input,
                "Entities must have exactly one #[form(identifier)] field.",
            ));
        }

        if errors.is_empty() {
            Ok(RecordModel {
                name: &input.ident,
                generics: &input.generics,
                kind,
                fields,
            })
        } else {
            Err(errors)
        }
    }
}

impl<'a> FieldModel<'a> {
    fn validate(
        field: &'a Field,
        index: usize,
        convention: Option<CaseConvention>,
        kind: RecordKind,
    ) -> Result<FieldModel<'a>, Vec<syn::Error>> {
        let ident = match &field.ident {
            Some(ident) => ident,
            None => {
                return Err(vec![syn::Error::new_spanned(
                    field,
                    "Records must have named fields.",
                )])
            }
        };
        let (parts, mut errors) = consume_attributes(FORM_PATH, &field.attrs, field_consumer());
        let mut role = FieldRole::default();
        let mut rank = None;
        let mut name = None;
        for part in parts {
            match part {
                FieldPart::Member => role.member = true,
                FieldPart::Key => {
                    role.member = true;
                    role.key = true;
                }
                FieldPart::Identifier => {
                    role.member = true;
                    role.identifier = true;
                }
                FieldPart::Rank(_) if rank.is_some() => {
                    errors.push(syn::Error::new_spanned(field, "Duplicate rank."))
                }
                FieldPart::Rank(r) => {
                    role.member = true;
                    rank = Some(r);
                }
                FieldPart::Name(_) if name.is_some() => {
                    errors.push(syn::Error::new_spanned(field, "Duplicate member name."))
                }
                FieldPart::Name(n) => {
                    role.member = true;
                    name = Some(n);
                }
            }
        }
        if kind != RecordKind::Entity && (role.key || role.identifier) {
            errors.push(syn::Error::new_spanned(
                field,
                "Only entities may have key or identifier fields.",
            ));
        }
        if role.key && role.identifier {
            errors.push(syn::Error::new_spanned(
                field,
                "The identifier cannot be part of the primary key.",
            ));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let name = name.unwrap_or_else(|| {
            let base = ident.unraw().to_string();
            match convention {
                Some(conv) => conv.apply(&base),
                None => base,
            }
        });
        Ok(FieldModel {
            ident,
            ty: &field.ty,
            role,
            name,
            rank: rank.unwrap_or(index as i32),
        })
    }
}
