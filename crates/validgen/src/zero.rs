// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Zero-value synthesis: the code representing "no value supplied".
//!
//! Used by the `required` and `default` rules to detect empty fields.
//! Records and opaque named types lean on the `Default` convention, which in
//! Rust is the recursively-zero aggregate. Types exposing an is-empty
//! capability (`fn is_zero(&self) -> bool`) take precedence over structural
//! comparison; see [`crate::rules`].

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Type;

use crate::{
    error::GenError,
    field::{Scalar, Shape, classify, type_string},
    unit::UnitGraph,
};

/// Expression for the zero value of `ty`.
///
/// Fails with [`GenError::UnsupportedZeroType`] for shapes with no empty
/// representation (references, fn pointers, trait objects); such fields
/// simply cannot use `required`/`default`.
pub fn zero_value(graph: &UnitGraph, subject: &str, ty: &Type) -> Result<TokenStream, GenError> {
    match classify(graph, subject, ty)? {
        Shape::Scalar(Scalar::Bool) => Ok(quote! { false }),
        Shape::Scalar(Scalar::Int | Scalar::Uint) => Ok(quote! { 0 }),
        Shape::Scalar(Scalar::Float) => Ok(quote! { 0.0 }),
        Shape::Scalar(Scalar::Char) => Ok(quote! { '\0' }),
        Shape::Scalar(Scalar::Str) => Ok(quote! { String::new() }),
        Shape::Option(_) => Ok(quote! { None }),
        Shape::Sequence(_) => Ok(quote! { Vec::new() }),
        Shape::Map(_) => Ok(quote! { Default::default() }),
        Shape::Array(_) => Ok(quote! { std::array::from_fn(|_| Default::default()) }),
        Shape::Duration => Ok(quote! { std::time::Duration::ZERO }),
        Shape::Record { name, unit, .. } => {
            let name = format_ident!("{}", name);
            if unit == subject {
                Ok(quote! { #name::default() })
            } else {
                let segments = unit.split("::").map(|s| format_ident!("{}", s));
                Ok(quote! { #(#segments)::*::#name::default() })
            }
        }
        Shape::Opaque(_) => Ok(quote! { <#ty as ::core::default::Default>::default() }),
        Shape::Unsupported(_) => Err(GenError::UnsupportedZeroType(type_string(ty))),
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;
    use crate::unit::Unit;

    fn graph() -> UnitGraph {
        let models: syn::File = parse_quote! {
            pub struct Nested {
                pub a: String,
            }
        };
        UnitGraph::new(vec![Unit::from_file("models", &models)])
    }

    #[track_caller]
    fn zero(ty: Type) -> String {
        zero_value(&graph(), "models", &ty).unwrap().to_string()
    }

    #[test]
    fn primitive_zeros() {
        assert_eq!(zero(parse_quote!(bool)), "false");
        assert_eq!(zero(parse_quote!(u32)), "0");
        assert_eq!(zero(parse_quote!(f64)), "0.0");
        assert_eq!(zero(parse_quote!(String)), "String :: new ()");
    }

    #[test]
    fn containers_are_absent() {
        assert_eq!(zero(parse_quote!(Option<i64>)), "None");
        assert_eq!(zero(parse_quote!(Vec<String>)), "Vec :: new ()");
    }

    #[test]
    fn records_use_default() {
        assert_eq!(zero(parse_quote!(Nested)), "Nested :: default ()");
    }

    #[test]
    fn duration_zero() {
        assert_eq!(
            zero(parse_quote!(std::time::Duration)),
            "std :: time :: Duration :: ZERO"
        );
    }

    #[test]
    fn unsupported_shapes_fail() {
        let ty: Type = parse_quote!(fn() -> bool);
        assert!(matches!(
            zero_value(&graph(), "models", &ty),
            Err(GenError::UnsupportedZeroType(_))
        ));
    }
}
