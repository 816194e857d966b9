//! Derive macros for `veda`: `Data` and `Lens`.
extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{ToTokens, TokenStreamExt};

mod data;
mod lens;

//--------------------------------------------------------------------------------------------------
struct CrateName;
const CRATE: CrateName = CrateName;

impl ToTokens for CrateName {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        tokens.append(syn::Ident::new("veda", Span::call_site()))
    }
}

//--------------------------------------------------------------------------------------------------

/// Derives `veda::Data`, comparing fields one by one with `Data::same`.
///
/// Fields can be skipped with `#[data(ignore)]`, or compared with a custom function with
/// `#[data(same_fn = "path::to::fn")]`.
#[proc_macro_derive(Data, attributes(data))]
pub fn derive_data(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    data::derive_data_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Derives one field lens per field of a struct.
///
/// The lenses are exposed as associated constants named after the fields
/// (`elem_0`, `elem_1`, ... for tuple structs).
#[proc_macro_derive(Lens)]
pub fn derive_lens(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    lens::derive_lens_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
