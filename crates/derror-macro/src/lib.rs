// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use darling::FromDeriveInput;
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;
use syn::parse_macro_input;

#[derive(FromDeriveInput)]
#[darling(attributes(derror))]
struct Args {
    leaf_data: Option<syn::Path>,
}

/// Generate a `DError` implementation for a drop-reason enum.
///
/// Every variant name becomes a `&'static str` discriminant, so a probe
/// site can name the reason without calling `format!()`. A
/// single-element tuple variant is treated as a link to a child reason
/// (which must itself implement `DError`) unless it is marked
/// `#[leaf]`:
///
/// ```ignore
/// #[derive(DError)]
/// #[derror(leaf_data = DropReason::data)]
/// enum DropReason {
///     Truncated(HeaderKind),
///     Unsupported { ethertype: u16 },
///     #[leaf]
///     Opaque(u32),
/// }
/// ```
///
/// The optional `leaf_data` function fills in the numeric data words
/// carried alongside the names of the chain.
#[proc_macro_derive(DError, attributes(derror, leaf))]
pub fn derive_derror(
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let derive_input = parse_macro_input!(input);

    let parsed_args = match Args::from_derive_input(&derive_input) {
        Ok(o) => o,
        Err(e) => return e.write_errors().into(),
    };

    let DeriveInput { ident, data, generics, .. } = derive_input;

    let syn::Data::Enum(data) = data else {
        return syn::Error::new_spanned(
            &ident,
            "`DError` can only be derived for enums",
        )
        .to_compile_error()
        .into();
    };

    let mut name_arms: Vec<TokenStream> = vec![];
    let mut child_arms: Vec<TokenStream> = vec![];

    for variant in data.variants {
        let var_name = &variant.ident;
        let var_str = var_name.to_string();

        let known_leaf =
            variant.attrs.iter().any(|v| v.path().is_ident("leaf"));

        let (name_arm, child_arm) = match &variant.fields {
            syn::Fields::Unnamed(fields)
                if !known_leaf && fields.unnamed.len() == 1 =>
            {
                (
                    quote! { Self::#var_name(..) => #var_str, },
                    quote! { Self::#var_name(f) => Some(f), },
                )
            }
            syn::Fields::Unnamed(_) => (
                quote! { Self::#var_name(..) => #var_str, },
                quote! { Self::#var_name(..) => None, },
            ),
            syn::Fields::Named(_) => (
                quote! { Self::#var_name { .. } => #var_str, },
                quote! { Self::#var_name { .. } => None, },
            ),
            syn::Fields::Unit => (
                quote! { Self::#var_name => #var_str, },
                quote! { Self::#var_name => None, },
            ),
        };

        name_arms.push(name_arm);
        child_arms.push(child_arm);
    }

    let leaf_data_impl = match parsed_args.leaf_data {
        Some(data_fn) => quote! {
            fn leaf_data(&self, data: &mut [u64]) {
                #data_fn(self, data);
            }
        },
        None => quote! {},
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics DError for #ident #ty_generics #where_clause {
            fn discriminant(&self) -> &'static str {
                match self {
                    #( #name_arms )*
                }
            }

            fn child(&self) -> Option<&dyn DError> {
                match self {
                    #( #child_arms )*
                }
            }

            #leaf_data_impl
        }
    }
    .into()
}
