// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Annotation parser for `#[validate(...)]` attributes.
//!
//! Top-level keys are rule names; a nested block under the reserved `each`
//! key is a dive directive, one nesting level per container depth. A field
//! annotated
//!
//! ```rust,ignore
//! #[validate(required, length(min = 2, max = 34), each(non_empty))]
//! arr: Vec<String>,
//! ```
//!
//! parses to an [`AnnotationMap`] whose key order equals the left-to-right
//! order keys first appear in the source — the property that makes generated
//! code deterministic across runs.
//!
//! # Grammar
//!
//! ```text
//! entries := entry ("," entry)* ","?
//! entry   := ident ( "=" value | "(" entries ")" | ε )     bare ident ⇒ true
//! value   := lit | "[" lit ("," lit)* "]"
//! ```
//!
//! Lists nest literals only; a list inside a list is a parse error.

use proc_macro2::Span;
use syn::{
    Attribute, Lit, Meta, Token,
    parse::{Parse, ParseStream},
    token,
};

use crate::omap::OrderedMap;

/// Reserved key marking a dive directive.
pub const EACH_KEY: &str = "each";

/// A parsed annotation value.
#[derive(Debug, Clone)]
pub enum AnnotValue {
    /// Boolean literal, also produced by a bare key.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal; `id:` prefixed strings become identifier references
    /// at the property layer.
    Str(String),
    /// Homogeneous-by-contract list of scalars.
    List(Vec<AnnotValue>),
    /// Nested block, e.g. `length(min = 2)` or `each(url)`.
    Map(AnnotationMap),
}

/// Order-preserving map from annotation key to value.
pub type AnnotationMap = OrderedMap<AnnotValue>;

impl Parse for AnnotValue {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.peek(token::Bracket) {
            let content;
            syn::bracketed!(content in input);
            let mut items = Vec::new();
            while !content.is_empty() {
                if content.peek(token::Bracket) {
                    return Err(content.error("lists cannot nest inside lists"));
                }
                items.push(parse_scalar(&content)?);
                if !content.is_empty() {
                    content.parse::<Token![,]>()?;
                }
            }
            return Ok(Self::List(items));
        }
        parse_scalar(input)
    }
}

fn parse_scalar(input: ParseStream<'_>) -> syn::Result<AnnotValue> {
    let neg = input.parse::<Option<Token![-]>>()?.is_some();
    let lit: Lit = input.parse()?;
    let value = match &lit {
        Lit::Bool(b) => AnnotValue::Bool(b.value),
        Lit::Int(i) => AnnotValue::Int(i.base10_parse::<i64>()?),
        Lit::Float(f) => AnnotValue::Float(f.base10_parse::<f64>()?),
        Lit::Str(s) => AnnotValue::Str(s.value()),
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "expected bool, integer, float or string literal",
            ));
        }
    };
    if neg {
        return match value {
            AnnotValue::Int(i) => Ok(AnnotValue::Int(-i)),
            AnnotValue::Float(f) => Ok(AnnotValue::Float(-f)),
            _ => Err(syn::Error::new_spanned(lit, "`-` applies to numbers only")),
        };
    }
    Ok(value)
}

impl Parse for AnnotationMap {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut map = AnnotationMap::new();
        while !input.is_empty() {
            parse_entry(input, &mut map)?;
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(map)
    }
}

fn parse_entry(input: ParseStream<'_>, map: &mut AnnotationMap) -> syn::Result<()> {
    let ident: syn::Ident = input.parse()?;
    let key = ident.to_string();
    if map.contains_key(&key) {
        return Err(syn::Error::new(
            ident.span(),
            format!("duplicate annotation key {key:?}"),
        ));
    }

    let value = if input.peek(Token![=]) {
        input.parse::<Token![=]>()?;
        input.parse::<AnnotValue>()?
    } else if input.peek(token::Paren) {
        let content;
        syn::parenthesized!(content in input);
        AnnotValue::Map(content.parse()?)
    } else {
        AnnotValue::Bool(true)
    };

    map.insert(key, value);
    Ok(())
}

/// Parse every `#[validate(...)]` attribute on a field into one map.
///
/// Attributes concatenate in source order; `None` when the field carries no
/// validate attribute at all.
pub fn parse_validate_attrs(attrs: &[Attribute]) -> syn::Result<Option<AnnotationMap>> {
    let mut merged: Option<AnnotationMap> = None;
    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }
        let Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new(
                Span::call_site(),
                "expected #[validate(...)] with arguments",
            ));
        };
        let parsed: AnnotationMap = syn::parse2(list.tokens.clone())?;
        let merged = merged.get_or_insert_with(AnnotationMap::new);
        for (key, value) in parsed.iter() {
            if merged.contains_key(key) {
                return Err(syn::Error::new_spanned(
                    attr,
                    format!("duplicate annotation key {key:?}"),
                ));
            }
            merged.insert(key, value.clone());
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: proc_macro2::TokenStream) -> AnnotationMap {
        syn::parse2(tokens).unwrap()
    }

    #[test]
    fn keys_keep_source_order() {
        let map = parse(quote::quote! { required, url = true, oneof = ["a", "b"] });
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["required", "url", "oneof"]);
    }

    #[test]
    fn bare_key_is_true() {
        let map = parse(quote::quote! { required });
        assert!(matches!(map.get("required"), Some(AnnotValue::Bool(true))));
    }

    #[test]
    fn nested_blocks_parse_recursively() {
        let map = parse(quote::quote! { length(min = 2, max = 34), each(each(regex = "^a")) });
        let Some(AnnotValue::Map(length)) = map.get("length") else {
            panic!("length must be a block");
        };
        assert!(matches!(length.get("min"), Some(AnnotValue::Int(2))));
        let Some(AnnotValue::Map(outer)) = map.get("each") else {
            panic!("each must be a block");
        };
        assert!(matches!(outer.get("each"), Some(AnnotValue::Map(_))));
    }

    #[test]
    fn negative_numbers() {
        let map = parse(quote::quote! { default = -5 });
        assert!(matches!(map.get("default"), Some(AnnotValue::Int(-5))));
    }

    #[test]
    fn nested_list_is_rejected() {
        let err = syn::parse2::<AnnotationMap>(quote::quote! { oneof = [[1, 2]] }).unwrap_err();
        assert!(err.to_string().contains("nest"));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let err = syn::parse2::<AnnotationMap>(quote::quote! { url, url = false }).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn attrs_merge_in_source_order() {
        let field: syn::Field = syn::parse_quote! {
            #[validate(required)]
            #[validate(each(non_empty))]
            arr: Vec<String>
        };
        let map = parse_validate_attrs(&field.attrs).unwrap().unwrap();
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["required", "each"]);
    }
}
