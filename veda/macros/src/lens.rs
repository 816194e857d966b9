//! Field lens derivation. Mostly stolen from druid-derive.
use crate::CRATE;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::spanned::Spanned;

pub(crate) fn derive_lens_impl(input: syn::DeriveInput) -> syn::Result<TokenStream> {
    match &input.data {
        syn::Data::Struct(s) => derive_struct(&input, s),
        syn::Data::Enum(e) => Err(syn::Error::new(
            e.enum_token.span(),
            "Lens implementations cannot be derived from enums",
        )),
        syn::Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "Lens implementations cannot be derived from unions",
        )),
    }
}

fn derive_struct(input: &syn::DeriveInput, s: &syn::DataStruct) -> syn::Result<TokenStream> {
    let ty = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Lens implementations cannot be derived for generic types",
        ));
    }

    let fields = match &s.fields {
        syn::Fields::Named(fields_named) => &fields_named.named,
        syn::Fields::Unnamed(fields_unnamed) => &fields_unnamed.unnamed,
        syn::Fields::Unit => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Lens implementations cannot be derived from unit structs",
            ))
        }
    };

    let mut decls = Vec::new();
    let mut associated_items = Vec::new();

    for (i, f) in fields.iter().enumerate() {
        let name = f
            .ident
            .clone()
            .unwrap_or_else(|| syn::Ident::new(&format!("elem_{}", i), Span::call_site()));
        let lens_ty_name = syn::Ident::new(
            &format!("{}Lens_{}", ty, name.to_string().trim_start_matches("r#")),
            Span::call_site(),
        );
        let fty = &f.ty;
        let access = match &f.ident {
            Some(ident) => quote! { #ident },
            None => {
                let index = syn::Index::from(i);
                quote! { #index }
            }
        };

        decls.push(quote! {
            #[allow(non_camel_case_types)]
            #[derive(Copy, Clone, Debug, Default)]
            #vis struct #lens_ty_name;

            impl ::#CRATE::Lens<#ty, #fty> for #lens_ty_name {
                fn try_get(&self, data: &#ty) -> ::core::result::Result<#fty, ::#CRATE::LensError> {
                    ::core::result::Result::Ok(::core::clone::Clone::clone(&data.#access))
                }

                fn try_set(&self, mut data: #ty, value: #fty) -> ::core::result::Result<#ty, ::#CRATE::LensError> {
                    data.#access = value;
                    ::core::result::Result::Ok(data)
                }
            }
        });

        associated_items.push(quote! {
            #vis const #name: #lens_ty_name = #lens_ty_name;
        });
    }

    Ok(quote! {
        #(#decls)*

        #[allow(non_upper_case_globals)]
        impl #ty {
            #(#associated_items)*
        }
    })
}
