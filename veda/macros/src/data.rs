// Copyright 2019 The Druid Authors.
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
//
// Adapted for use in veda.
use crate::CRATE;
use proc_macro2::{Ident, Literal, Span, TokenStream, TokenTree};
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DataEnum, DataStruct, Error, ExprPath, Meta, NestedMeta};

const DATA_ATTR_PATH: &str = "data";
const IGNORE_ATTR_PATH: &str = "ignore";
const SAME_FN_ATTR_PATH: &str = "same_fn";

/// How a field is named in the source: by identifier, or by position in a tuple struct.
#[derive(Debug)]
enum FieldName {
    Named(Ident),
    Unnamed(usize),
}

/// A field of a struct or enum variant, together with its `#[data(...)]` options.
#[derive(Debug)]
struct DataField {
    name: FieldName,
    ignore: bool,
    same_fn: Option<ExprPath>,
}

impl DataField {
    fn parse(field: &syn::Field, index: usize) -> Result<DataField, Error> {
        let name = match field.ident.as_ref() {
            Some(ident) => FieldName::Named(ident.clone()),
            None => FieldName::Unnamed(index),
        };

        let mut ignore = false;
        let mut same_fn = None;

        for attr in field.attrs.iter().filter(|attr| attr.path.is_ident(DATA_ATTR_PATH)) {
            let list = match attr.parse_meta()? {
                Meta::List(list) => list,
                other => {
                    return Err(Error::new(
                        other.span(),
                        "expected attribute list (the form #[data(one, two)])",
                    ))
                }
            };
            for nested in list.nested.iter() {
                match nested {
                    NestedMeta::Meta(Meta::Path(path)) if path.is_ident(IGNORE_ATTR_PATH) => {
                        if ignore {
                            return Err(Error::new(nested.span(), "duplicate attribute"));
                        }
                        ignore = true;
                    }
                    NestedMeta::Meta(Meta::NameValue(meta)) if meta.path.is_ident(SAME_FN_ATTR_PATH) => {
                        if same_fn.is_some() {
                            return Err(Error::new(meta.span(), "duplicate attribute"));
                        }
                        same_fn = Some(parse_lit_into_expr_path(&meta.lit)?);
                    }
                    other => return Err(Error::new(other.span(), "unknown attribute")),
                }
            }
        }

        Ok(DataField { name, ignore, same_fn })
    }

    fn parse_all(fields: &syn::Fields) -> Result<Vec<DataField>, Error> {
        fields
            .iter()
            .enumerate()
            .map(|(i, field)| DataField::parse(field, i))
            .collect()
    }

    /// Tokens naming the comparison function for this field.
    fn same_fn_tokens(&self) -> TokenStream {
        match self.same_fn {
            Some(ref f) => quote!(#f),
            None => quote_spanned!(Span::call_site()=> ::#CRATE::Data::same),
        }
    }

    /// Tokens to access this field (`name` or `0`).
    fn access_tokens(&self) -> TokenTree {
        match self.name {
            FieldName::Named(ref ident) => ident.clone().into(),
            FieldName::Unnamed(i) => Literal::usize_unsuffixed(i).into(),
        }
    }

    /// Binding names used when destructuring enum variants.
    fn bindings(&self) -> (Ident, Ident) {
        let suffix = match self.name {
            FieldName::Named(ref ident) => ident.to_string().trim_start_matches("r#").to_owned(),
            FieldName::Unnamed(i) => i.to_string(),
        };
        (
            Ident::new(&format!("__self_{}", suffix), Span::call_site()),
            Ident::new(&format!("__other_{}", suffix), Span::call_site()),
        )
    }
}

fn parse_lit_into_expr_path(lit: &syn::Lit) -> Result<ExprPath, Error> {
    let string = match lit {
        syn::Lit::Str(lit) => lit,
        other => return Err(Error::new(other.span(), "expected a string literal")),
    };
    let tokens = syn::parse_str(&string.value())?;
    syn::parse2(tokens)
}

pub(crate) fn derive_data_impl(input: syn::DeriveInput) -> Result<TokenStream, Error> {
    match &input.data {
        syn::Data::Struct(s) => derive_struct(&input, s),
        syn::Data::Enum(e) => derive_enum(&input, e),
        syn::Data::Union(u) => Err(Error::new(
            u.union_token.span(),
            "Data implementations cannot be derived from unions",
        )),
    }
}

fn derive_struct(input: &syn::DeriveInput, s: &DataStruct) -> Result<TokenStream, Error> {
    let ident = &input.ident;
    let impl_generics = generics_bounds(&input.generics);
    let (_, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = DataField::parse_all(&s.fields)?;
    let compared: Vec<_> = fields.iter().filter(|f| !f.ignore).collect();

    let body = if compared.is_empty() {
        quote!(true)
    } else {
        let same_fns = compared.iter().map(|f| f.same_fn_tokens());
        let accesses = compared.iter().map(|f| f.access_tokens());
        quote!( #( #same_fns(&self.#accesses, &other.#accesses) )&&* )
    };

    Ok(quote! {
        impl<#impl_generics> ::#CRATE::Data for #ident #ty_generics #where_clause {
            fn same(&self, other: &Self) -> bool {
                #body
            }
        }
    })
}

fn derive_enum(input: &syn::DeriveInput, e: &DataEnum) -> Result<TokenStream, Error> {
    let ident = &input.ident;
    let impl_generics = generics_bounds(&input.generics);
    let (_, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut arms = Vec::new();
    for variant in e.variants.iter() {
        let fields = DataField::parse_all(&variant.fields)?;
        let name = &variant.ident;
        let (lefts, rights): (Vec<_>, Vec<_>) = fields.iter().map(DataField::bindings).unzip();

        let tests: Vec<_> = fields
            .iter()
            .zip(lefts.iter().zip(rights.iter()))
            .filter(|(f, _)| !f.ignore)
            .map(|(f, (l, r))| {
                let same_fn = f.same_fn_tokens();
                quote!( #same_fn(#l, #r) )
            })
            .collect();
        let body = if tests.is_empty() {
            quote!(true)
        } else {
            quote!( #( #tests )&&* )
        };

        let arm = match &variant.fields {
            syn::Fields::Named(_) => {
                let accesses: Vec<_> = fields.iter().map(DataField::access_tokens).collect();
                quote! {
                    (#ident::#name { #( #accesses: #lefts ),* }, #ident::#name { #( #accesses: #rights ),* }) => { #body }
                }
            }
            syn::Fields::Unnamed(_) => quote! {
                (#ident::#name( #( #lefts ),* ), #ident::#name( #( #rights ),* )) => { #body }
            },
            syn::Fields::Unit => quote! {
                (#ident::#name, #ident::#name) => true
            },
        };
        arms.push(arm);
    }

    Ok(quote! {
        impl<#impl_generics> ::#CRATE::Data for #ident #ty_generics #where_clause {
            #[allow(unreachable_patterns, unused_variables)]
            fn same(&self, other: &Self) -> bool {
                match (self, other) {
                    #( #arms, )*
                    _ => false,
                }
            }
        }
    })
}

/// Adds a `Data` bound to every type parameter.
fn generics_bounds(generics: &syn::Generics) -> TokenStream {
    let params = generics.params.iter().map(|gp| match gp {
        syn::GenericParam::Type(ty) => {
            let ident = &ty.ident;
            let bounds = &ty.bounds;
            if bounds.is_empty() {
                quote_spanned!(ty.span()=> #ident: ::#CRATE::Data)
            } else {
                quote_spanned!(ty.span()=> #ident: #bounds + ::#CRATE::Data)
            }
        }
        syn::GenericParam::Lifetime(lf) => quote!(#lf),
        syn::GenericParam::Const(cst) => quote!(#cst),
    });
    quote!( #( #params, )* )
}
