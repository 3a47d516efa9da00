// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Property model: the parsed argument bundle for one rule invocation.
//!
//! A raw annotation value classifies into one of three [`Property`] variants:
//! a literal, a resolved identifier reference (strings shaped `id:<ref>`), or
//! a homogeneous list of the former two. Lists carry a unified element type,
//! widened to [`PropType::Any`] the moment two elements stop being mutually
//! assignable.
//!
//! [`Properties`] is constructed fresh for every (field, rule) pair: a bare
//! scalar or list is shorthand for `value = …`; a block contributes `value`,
//! an optional `error` override and rule-specific auxiliary keys (`min`,
//! `max`, …) kept in source order.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use crate::{
    annot::AnnotValue,
    error::GenError,
    omap::OrderedMap,
    unit::{SymbolRef, UnitGraph},
};

/// Prefix marking a string annotation value as a symbolic reference.
const ID_PREFIX: &str = "id:";

/// Static type of a property, used for list element unification.
#[derive(Debug, Clone, PartialEq)]
pub enum PropType {
    /// Boolean.
    Bool,
    /// Any integer kind.
    Int,
    /// Any float kind.
    Float,
    /// String-like (`String`, `&str`).
    Str,
    /// A named, non-primitive type.
    Named(String),
    /// Universal type: elements were not mutually assignable.
    Any,
}

impl PropType {
    /// Classify a syntactic type, used for const symbols.
    #[must_use]
    pub fn of_type(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Reference(r) => Self::of_type(&r.elem),
            syn::Type::Paren(p) => Self::of_type(&p.elem),
            syn::Type::Path(p) => {
                let Some(name) = p.path.segments.last().map(|s| s.ident.to_string()) else {
                    return Self::Any;
                };
                match name.as_str() {
                    "bool" => Self::Bool,
                    "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
                    | "u64" | "u128" | "usize" => Self::Int,
                    "f32" | "f64" => Self::Float,
                    "str" | "String" => Self::Str,
                    _ => Self::Named(name),
                }
            }
            _ => Self::Any,
        }
    }

    /// Unify two element types; unequal types widen to [`PropType::Any`].
    #[must_use]
    pub fn unify(self, other: &Self) -> Self {
        if &self == other { self } else { Self::Any }
    }
}

/// A literal annotation constant.
#[derive(Debug, Clone, PartialEq)]
pub enum LitValue {
    /// `true` / `false`.
    Bool(bool),
    /// Integer constant.
    Int(i64),
    /// Float constant.
    Float(f64),
    /// String constant.
    Str(String),
}

/// Parsed property value: literal, resolved identifier, or list thereof.
#[derive(Debug, Clone)]
pub enum Property {
    /// A constant with its native type.
    Lit(LitValue),
    /// A resolved symbol handle.
    Id(SymbolRef),
    /// Ordered elements plus their unified element type.
    List(Vec<Property>, PropType),
}

impl Property {
    /// Parse a raw annotation value, resolving embedded references.
    pub fn parse(graph: &UnitGraph, subject: &str, value: &AnnotValue) -> Result<Self, GenError> {
        match value {
            AnnotValue::Bool(b) => Ok(Self::Lit(LitValue::Bool(*b))),
            AnnotValue::Int(i) => Ok(Self::Lit(LitValue::Int(*i))),
            AnnotValue::Float(f) => Ok(Self::Lit(LitValue::Float(*f))),
            AnnotValue::Str(s) => match s.strip_prefix(ID_PREFIX) {
                Some(reference) => Ok(Self::Id(graph.resolve(subject, reference)?)),
                None => Ok(Self::Lit(LitValue::Str(s.clone()))),
            },
            AnnotValue::List(items) => {
                let mut props = Vec::with_capacity(items.len());
                let mut ty: Option<PropType> = None;
                for item in items {
                    let prop = Self::parse(graph, subject, item)?;
                    if matches!(prop, Self::List(..)) {
                        return Err(GenError::Parse(syn::Error::new(
                            proc_macro2::Span::call_site(),
                            "lists cannot nest inside lists",
                        )));
                    }
                    let elem_ty = prop.prop_type();
                    ty = Some(match ty {
                        None => elem_ty,
                        Some(ty) => ty.unify(&elem_ty),
                    });
                    props.push(prop);
                }
                Ok(Self::List(props, ty.unwrap_or(PropType::Any)))
            }
            AnnotValue::Map(_) => Err(GenError::Parse(syn::Error::new(
                proc_macro2::Span::call_site(),
                "a nested block is not a valid property value",
            ))),
        }
    }

    /// Static type of this property.
    #[must_use]
    pub fn prop_type(&self) -> PropType {
        match self {
            Self::Lit(LitValue::Bool(_)) => PropType::Bool,
            Self::Lit(LitValue::Int(_)) => PropType::Int,
            Self::Lit(LitValue::Float(_)) => PropType::Float,
            Self::Lit(LitValue::Str(_)) => PropType::Str,
            Self::Id(id) => id.prop_type(),
            Self::List(_, ty) => ty.clone(),
        }
    }

    /// Generated expression for this property.
    ///
    /// Local identifiers emit bare, foreign ones import-qualified; lists emit
    /// array literals.
    #[must_use]
    pub fn to_tokens(&self) -> TokenStream {
        match self {
            Self::Lit(LitValue::Bool(b)) => quote! { #b },
            Self::Lit(LitValue::Int(i)) => {
                let lit = Literal::i64_unsuffixed(*i);
                quote! { #lit }
            }
            Self::Lit(LitValue::Float(f)) => {
                let lit = Literal::f64_unsuffixed(*f);
                quote! { #lit }
            }
            Self::Lit(LitValue::Str(s)) => quote! { #s },
            Self::Id(id) => id_tokens(id),
            Self::List(props, _) => {
                let elems = props.iter().map(Self::to_tokens);
                quote! { [#(#elems),*] }
            }
        }
    }

    /// True for the literal `false`, which disables disableable rules.
    #[must_use]
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Lit(LitValue::Bool(false)))
    }
}

fn id_tokens(id: &SymbolRef) -> TokenStream {
    let ident = format_ident!("{}", id.ident);
    if id.local {
        return quote! { #ident };
    }
    let segments = id.unit_path.split("::").map(|s| format_ident!("{}", s));
    quote! { #(#segments)::*::#ident }
}

/// Parsed argument bundle for one rule invocation on one field.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// The rule's primary argument.
    pub value: Option<Property>,
    /// Override message substituted verbatim for the rule's default.
    pub error: Option<String>,
    /// Auxiliary named sub-arguments, in source order, kept raw so the dive
    /// engine can re-dispatch nested rule blocks.
    pub other: OrderedMap<AnnotValue>,
}

impl Properties {
    /// Parse the annotation value attached to one rule key.
    ///
    /// Blocks consume their `value` and `error` keys; everything else stays
    /// in [`Properties::other`] without disturbing key order.
    pub fn parse(graph: &UnitGraph, subject: &str, raw: &AnnotValue) -> Result<Self, GenError> {
        let AnnotValue::Map(map) = raw else {
            return Ok(Self {
                value: Some(Property::parse(graph, subject, raw)?),
                ..Self::default()
            });
        };

        let mut props = Self::default();
        if let Some(value) = map.get("value") {
            props.value = Some(Property::parse(graph, subject, value)?);
        }
        match map.get("error") {
            None => {}
            Some(AnnotValue::Str(msg)) => props.error = Some(msg.clone()),
            Some(other) => {
                return Err(GenError::Parse(syn::Error::new(
                    proc_macro2::Span::call_site(),
                    format!("error property must be a string, got {other:?}"),
                )));
            }
        }

        let mut other = map.clone();
        other.remove_all(&["value", "error"]);
        props.other = other;
        Ok(props)
    }

    /// Parse an auxiliary key (`min`, `max`, …) into a property on demand.
    pub fn other_property(
        &self,
        graph: &UnitGraph,
        subject: &str,
        key: &str,
    ) -> Result<Option<Property>, GenError> {
        self.other
            .get(key)
            .map(|raw| Property::parse(graph, subject, raw))
            .transpose()
    }

    /// True when the rule was disabled with a literal `false` value.
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.value.as_ref().is_some_and(Property::is_false)
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;
    use crate::{annot::AnnotationMap, unit::Unit};

    fn graph() -> UnitGraph {
        let models: syn::File = parse_quote! {
            use helpers::ALLO;
            pub const ONE: &str = "one";
        };
        let helpers: syn::File = parse_quote! {
            pub const ALLO: i64 = 7;
        };
        UnitGraph::new(vec![
            Unit::from_file("models", &models),
            Unit::from_file("helpers", &helpers),
        ])
    }

    #[test]
    fn scalar_is_value_shorthand() {
        let props = Properties::parse(&graph(), "models", &AnnotValue::Int(3)).unwrap();
        assert!(matches!(
            props.value,
            Some(Property::Lit(LitValue::Int(3)))
        ));
        assert!(props.other.is_empty());
    }

    #[test]
    fn block_splits_value_error_and_other() {
        let map: AnnotationMap =
            syn::parse2(quote::quote! { value = "^a", error = "bad", min = 1 }).unwrap();
        let props = Properties::parse(&graph(), "models", &AnnotValue::Map(map)).unwrap();
        assert!(props.value.is_some());
        assert_eq!(props.error.as_deref(), Some("bad"));
        let keys: Vec<_> = props.other.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["min"]);
    }

    #[test]
    fn id_strings_resolve() {
        let graph = graph();
        let prop =
            Property::parse(&graph, "models", &AnnotValue::Str("id:helpers::ALLO".into()))
                .unwrap();
        let Property::Id(id) = &prop else {
            panic!("expected identifier");
        };
        assert!(!id.local);
        assert_eq!(prop.to_tokens().to_string(), "helpers :: ALLO");
    }

    #[test]
    fn local_id_emits_unqualified() {
        let prop = Property::parse(&graph(), "models", &AnnotValue::Str("id:ONE".into())).unwrap();
        assert_eq!(prop.to_tokens().to_string(), "ONE");
    }

    #[test]
    fn uniform_list_keeps_element_type() {
        let list = AnnotValue::List(vec![
            AnnotValue::Str("id:ONE".into()),
            AnnotValue::Str("two".into()),
        ]);
        let prop = Property::parse(&graph(), "models", &list).unwrap();
        assert_eq!(prop.prop_type(), PropType::Str);
    }

    #[test]
    fn mixed_list_widens_to_any() {
        let list = AnnotValue::List(vec![AnnotValue::Int(1), AnnotValue::Str("x".into())]);
        let prop = Property::parse(&graph(), "models", &list).unwrap();
        assert_eq!(prop.prop_type(), PropType::Any);
    }

    #[test]
    fn literal_false_disables() {
        let props = Properties::parse(&graph(), "models", &AnnotValue::Bool(false)).unwrap();
        assert!(props.disabled());
    }
}
