//! Attribute parsing utilities for source import.

use proc_macro2::{TokenStream, TokenTree};
use syn::punctuated::Punctuated;
use syn::{Attribute, Meta, Token};

use super::paths::{last_segment, path_to_string};

/// Checks if attributes contain a `#[cfg(...)]` that mentions `test`.
///
/// Matches `#[cfg(test)]` and compound forms such as
/// `#[cfg(all(test, feature = "x"))]`, but not string literals like
/// `#[cfg(feature = "test-utils")]`.
#[must_use]
pub fn has_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("cfg") {
            return false;
        }
        match &attr.meta {
            Meta::List(list) => mentions_test(list.tokens.clone()),
            _ => false,
        }
    })
}

fn mentions_test(tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => ident == "test",
        TokenTree::Group(group) => mentions_test(group.stream()),
        TokenTree::Punct(_) | TokenTree::Literal(_) => false,
    })
}

/// Collects the trait names listed in `#[derive(...)]` attributes.
///
/// Only the last path segment is kept, so `thiserror::Error` becomes `Error`.
#[must_use]
pub fn derive_names(attrs: &[Attribute]) -> Vec<String> {
    let mut names = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }
        let Ok(paths) =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        else {
            continue;
        };
        names.extend(
            paths
                .iter()
                .map(|p| last_segment(&path_to_string(p)).to_string()),
        );
    }
    names
}

/// Collects attribute names other than `derive`, `doc` and `cfg`.
#[must_use]
pub fn attribute_names(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| {
            let path = attr.path();
            !(path.is_ident("derive") || path.is_ident("doc") || path.is_ident("cfg"))
        })
        .map(|attr| path_to_string(attr.path()))
        .collect()
}
