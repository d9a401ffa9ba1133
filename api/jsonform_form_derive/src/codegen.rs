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

use crate::model::{RecordKind, RecordModel};
use proc_macro2::{Literal, TokenStream};
use syn::{Generics, TypeParam};

/// Generate the `Form` and `Record` implementations (and `Entity` or `Singleton` where
/// appropriate) for a validated record.
pub fn derive_record(root: &syn::Path, model: &RecordModel<'_>) -> TokenStream {
    let generics = add_bounds(root, model);
    let (impl_gen, type_gen, where_clause) = generics.split_for_impl();
    let name = model.name;

    let form_impl = form_impl(root, model);
    let record_impl = record_impl(root, model);
    let extra_impl = match model.kind {
        RecordKind::Plain => quote!(),
        RecordKind::Entity => entity_impl(root, model),
        RecordKind::Singleton => quote! {
            #[automatically_derived]
            impl #impl_gen #root::store::Singleton for #name #type_gen #where_clause {}
        },
    };

    quote! {
        #[automatically_derived]
        impl #impl_gen #root::form::Form for #name #type_gen #where_clause {
            #form_impl
        }

        #[automatically_derived]
        impl #impl_gen #root::form::Record for #name #type_gen #where_clause {
            #record_impl
        }

        #extra_impl
    }
}

/// Every type parameter must itself have a form and each field must have a default value
/// from which the record is constructed.
fn add_bounds(root: &syn::Path, model: &RecordModel<'_>) -> Generics {
    let mut generics = model.generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }
    for param in generics.type_params_mut() {
        let TypeParam { bounds, .. } = param;
        bounds.push(parse_quote!(#root::form::Form));
    }
    let where_clause = generics.make_where_clause();
    for field in model.fields.iter().filter(|f| !f.role.identifier) {
        let ty = field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::core::default::Default));
    }
    if model.kind == RecordKind::Singleton {
        where_clause
            .predicates
            .push(parse_quote!(Self: ::core::marker::Send + ::core::marker::Sync));
    }
    generics
}

fn raw_type_ctor(kind: RecordKind) -> syn::Ident {
    match kind {
        RecordKind::Plain => format_ident!("record"),
        RecordKind::Entity => format_ident!("entity"),
        RecordKind::Singleton => format_ident!("singleton"),
    }
}

fn form_impl(root: &syn::Path, model: &RecordModel<'_>) -> TokenStream {
    let ctor = raw_type_ctor(model.kind);
    quote! {
        fn descriptor() -> #root::form::TypeDescriptor {
            #root::form::TypeDescriptor::new(
                #root::form::RawType::#ctor(::core::any::type_name::<Self>())
            )
        }

        fn make_representation(
            registry: &#root::form::Registry,
        ) -> ::core::result::Result<
            ::std::sync::Arc<dyn #root::form::Representation<Self>>,
            #root::form::ModelError,
        > {
            #root::store::register_types(registry)?;
            let representation = #root::form::RecordRepresentation::<Self>::build(registry)?;
            ::core::result::Result::Ok(::std::sync::Arc::new(representation))
        }
    }
}

fn record_impl(root: &syn::Path, model: &RecordModel<'_>) -> TokenStream {
    let specs = model.members().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let name = Literal::string(&field.name);
        let rank = Literal::i32_unsuffixed(field.rank);
        quote! {
            #root::form::MemberSpec::new::<#ty>(#name, #rank, |r| &r.#ident, |r| &mut r.#ident)
        }
    });

    let inits = model.fields.iter().map(|field| {
        let ident = field.ident;
        if field.role.identifier {
            quote!(#ident: #root::store::Identifier::create::<Self>()?)
        } else {
            quote!(#ident: ::core::default::Default::default())
        }
    });

    let guard = if model.kind == RecordKind::Singleton {
        quote!(#root::store::ensure_factory::<Self>()?;)
    } else {
        quote!()
    };

    quote! {
        fn members() -> ::std::vec::Vec<#root::form::MemberSpec<Self>> {
            ::std::vec![#(#specs),*]
        }

        fn construct() -> ::core::result::Result<Self, #root::form::ModelError> {
            #guard
            ::core::result::Result::Ok(Self {
                #(#inits),*
            })
        }
    }
}

fn entity_impl(root: &syn::Path, model: &RecordModel<'_>) -> TokenStream {
    let generics = add_bounds(root, model);
    let (impl_gen, type_gen, where_clause) = generics.split_for_impl();
    let name = model.name;

    let key_types = model.keys().map(|field| field.ty);
    let key_fields = model.keys().map(|field| field.ident);
    let identifier = model.identifier().map(|field| field.ident);

    quote! {
        #[automatically_derived]
        impl #impl_gen #root::store::Entity for #name #type_gen #where_clause {
            type Key = (#(#key_types,)*);

            fn identifier(&self) -> #root::store::Identifier {
                self.#identifier
            }

            fn key(&self) -> Self::Key {
                (#(::core::clone::Clone::clone(&self.#key_fields),)*)
            }
        }

        #[automatically_derived]
        impl #impl_gen ::core::cmp::PartialEq for #name #type_gen #where_clause {
            fn eq(&self, other: &Self) -> bool {
                #root::store::Entity::key(self) == #root::store::Entity::key(other)
            }
        }

        #[automatically_derived]
        impl #impl_gen ::core::cmp::Eq for #name #type_gen #where_clause {}

        #[automatically_derived]
        impl #impl_gen ::core::cmp::PartialOrd for #name #type_gen #where_clause {
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::option::Option::Some(::core::cmp::Ord::cmp(self, other))
            }
        }

        #[automatically_derived]
        impl #impl_gen ::core::cmp::Ord for #name #type_gen #where_clause {
            fn cmp(&self, other: &Self) -> ::core::cmp::Ordering {
                ::core::cmp::Ord::cmp(
                    &#root::store::Entity::key(self),
                    &#root::store::Entity::key(other),
                )
            }
        }
    }
}
