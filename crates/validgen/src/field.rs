// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Field descriptors and type classification.
//!
//! A [`Field`] is the generator's view of one annotated struct member:
//! identity, error key, declared type and how the access expression is
//! rooted (`self.name`, `this.name`, or a loop binding such as `elem`).
//! Descriptors are created once per field and never mutated; rules derive
//! new descriptors for dereferenced inner types and dive elements.
//!
//! [`classify`] reduces a syntactic type to its [`Shape`], unwrapping named
//! aliases to the underlying shape. Alias chains are assumed acyclic; a depth
//! bound turns malformed cycles into [`GenError::AliasDepthExceeded`] instead
//! of an infinite loop.

use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, quote};
use syn::{GenericArgument, PathArguments, Type};

use crate::{
    error::GenError,
    unit::{Caps, Symbol, UnitGraph},
};

/// Maximum alias-unwrap depth before declaring a cycle.
const MAX_ALIAS_DEPTH: usize = 32;

/// Primitive scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    /// `bool`.
    Bool,
    /// Signed integers.
    Int,
    /// Unsigned integers.
    Uint,
    /// `f32` / `f64`.
    Float,
    /// `char`.
    Char,
    /// `String`.
    Str,
}

/// The closed set of shapes a field's type can take, post alias unwrap.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Primitive scalar.
    Scalar(Scalar),
    /// `Option<T>` wrapper.
    Option(Box<Type>),
    /// Fixed array `[T; N]`.
    Array(Box<Type>),
    /// `Vec<T>`.
    Sequence(Box<Type>),
    /// `HashMap<K, V>` / `BTreeMap<K, V>` (value type kept for dives).
    Map(Box<Type>),
    /// Struct whose definition is available in the unit graph.
    Record {
        /// Type name.
        name: String,
        /// Owning unit path.
        unit: String,
        /// The definition, kept for record dives.
        item: syn::ItemStruct,
    },
    /// `std::time::Duration`, given special treatment by the `default` rule.
    Duration,
    /// Named type without an in-graph definition (external crate type).
    Opaque(String),
    /// Shape with no validation semantics (references, fn pointers, …).
    Unsupported(String),
}

/// Classify a type against the unit graph, unwrapping aliases.
pub fn classify(graph: &UnitGraph, subject: &str, ty: &Type) -> Result<Shape, GenError> {
    classify_depth(graph, subject, ty, 0)
}

fn classify_depth(
    graph: &UnitGraph,
    subject: &str,
    ty: &Type,
    depth: usize,
) -> Result<Shape, GenError> {
    if depth > MAX_ALIAS_DEPTH {
        return Err(GenError::AliasDepthExceeded(type_string(ty)));
    }
    match ty {
        Type::Paren(p) => classify_depth(graph, subject, &p.elem, depth),
        Type::Array(a) => Ok(Shape::Array(a.elem.clone())),
        Type::Path(p) => {
            let Some(last) = p.path.segments.last() else {
                return Ok(Shape::Unsupported(type_string(ty)));
            };
            let name = last.ident.to_string();
            match name.as_str() {
                "bool" => return Ok(Shape::Scalar(Scalar::Bool)),
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" => {
                    return Ok(Shape::Scalar(Scalar::Int));
                }
                "u8" | "u16" | "u32" | "u64" | "u128" | "usize" => {
                    return Ok(Shape::Scalar(Scalar::Uint));
                }
                "f32" | "f64" => return Ok(Shape::Scalar(Scalar::Float)),
                "char" => return Ok(Shape::Scalar(Scalar::Char)),
                "String" => return Ok(Shape::Scalar(Scalar::Str)),
                "Duration" => return Ok(Shape::Duration),
                "Option" => {
                    if let Some(inner) = generic_arg(last, 0) {
                        return Ok(Shape::Option(Box::new(inner)));
                    }
                }
                "Vec" | "VecDeque" => {
                    if let Some(inner) = generic_arg(last, 0) {
                        return Ok(Shape::Sequence(Box::new(inner)));
                    }
                }
                "HashMap" | "BTreeMap" => {
                    if let Some(value) = generic_arg(last, 1) {
                        return Ok(Shape::Map(Box::new(value)));
                    }
                }
                _ => {}
            }

            let unit_path = owning_unit(graph, subject, &p.path);
            let symbol = unit_path
                .as_deref()
                .and_then(|u| graph.unit(u))
                .and_then(|u| u.symbols.get(&name).cloned());
            match symbol {
                Some(Symbol::Struct(item)) => Ok(Shape::Record {
                    name,
                    unit: unit_path.unwrap_or_else(|| subject.to_string()),
                    item,
                }),
                Some(Symbol::Alias(underlying)) => {
                    classify_depth(graph, subject, &underlying, depth + 1)
                }
                _ => Ok(Shape::Opaque(name)),
            }
        }
        _ => Ok(Shape::Unsupported(type_string(ty))),
    }
}

/// Unit owning a named type: bare paths resolve to the subject unit,
/// qualified paths to the unit named by their prefix.
fn owning_unit(graph: &UnitGraph, subject: &str, path: &syn::Path) -> Option<String> {
    if path.segments.len() == 1 {
        return Some(subject.to_string());
    }
    let prefix: Vec<String> = path
        .segments
        .iter()
        .take(path.segments.len() - 1)
        .map(|s| s.ident.to_string())
        .collect();
    let prefix = prefix.join("::");
    graph.unit(&prefix).map(|u| u.path.clone())
}

fn generic_arg(segment: &syn::PathSegment, index: usize) -> Option<Type> {
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty.clone()),
            _ => None,
        })
        .nth(index)
}

/// Capability flags for a named field type, if its unit recorded any.
///
/// Aliases without capabilities of their own fall through to the underlying
/// type, bounded by the same depth guard as [`classify`].
#[must_use]
pub fn caps_of(graph: &UnitGraph, subject: &str, ty: &Type) -> Caps {
    caps_depth(graph, subject, ty, 0)
}

fn caps_depth(graph: &UnitGraph, subject: &str, ty: &Type, depth: usize) -> Caps {
    if depth > MAX_ALIAS_DEPTH {
        return Caps::default();
    }
    let Type::Path(p) = ty else {
        return Caps::default();
    };
    let Some(name) = p.path.segments.last().map(|s| s.ident.to_string()) else {
        return Caps::default();
    };
    let Some(unit) = owning_unit(graph, subject, &p.path).and_then(|u| graph.unit(&u)) else {
        return Caps::default();
    };
    let caps = unit.caps_of(&name);
    if caps.display || caps.is_zero {
        return caps;
    }
    match unit.symbols.get(&name) {
        Some(Symbol::Alias(underlying)) => caps_depth(graph, subject, underlying, depth + 1),
        _ => caps,
    }
}

/// Render a type for diagnostics.
#[must_use]
pub fn type_string(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

/// The generator's internal representation of one annotated data member.
#[derive(Debug, Clone)]
pub struct Field {
    /// Access root: `self` for top-level fields, `this` inside record dives,
    /// `None` for loop bindings like `elem`.
    pub recv: Option<Ident>,
    /// Field name or local binding name.
    pub ident: Ident,
    /// True when the declared type was an `Option` wrapper a rule has
    /// already unwrapped; access expressions then go through a reference.
    pub deref: bool,
    /// Error-key expression, e.g. a label literal or `i.to_string()`.
    pub key: TokenStream,
    /// Declared type, kept syntactically to rebuild nested shapes.
    pub ty: Type,
}

impl Field {
    /// Access expression for this field.
    ///
    /// `deref` requests the pointee for unwrapped fields: `(*elem)` instead
    /// of `elem`. Method calls and length checks pass `false` and lean on
    /// auto-deref.
    #[must_use]
    pub fn access(&self, deref: bool) -> TokenStream {
        let ident = &self.ident;
        let base = match &self.recv {
            Some(recv) => quote! { #recv.#ident },
            None => quote! { #ident },
        };
        if deref && self.deref {
            quote! { (*#base) }
        } else {
            base
        }
    }

    /// Expression yielding the field's `&str` form.
    ///
    /// Strings are used directly; other types go through their `Display`
    /// capability.
    #[must_use]
    pub fn string_form(&self, graph: &UnitGraph, subject: &str) -> Result<TokenStream, GenError> {
        match classify(graph, subject, &self.ty)? {
            Shape::Scalar(Scalar::Str) => {
                let access = self.access(true);
                Ok(quote! { &#access })
            }
            _ => {
                let access = self.access(false);
                Ok(quote! { &#access.to_string() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use quote::format_ident;
    use syn::parse_quote;

    use super::*;
    use crate::unit::Unit;

    fn graph() -> UnitGraph {
        let models: syn::File = parse_quote! {
            pub struct Nested {
                pub a: String,
            }
            pub type Code = String;
            pub type CodeAlias = Code;

            pub struct Stamp(u64);

            impl Stamp {
                pub fn is_zero(&self) -> bool {
                    self.0 == 0
                }
            }

            pub type StampAlias = Stamp;
        };
        UnitGraph::new(vec![Unit::from_file("models", &models)])
    }

    #[test]
    fn primitives_classify_as_scalars() {
        let graph = graph();
        let cases: [(Type, Scalar); 4] = [
            (parse_quote!(bool), Scalar::Bool),
            (parse_quote!(i64), Scalar::Int),
            (parse_quote!(f32), Scalar::Float),
            (parse_quote!(String), Scalar::Str),
        ];
        for (ty, scalar) in cases {
            assert!(
                matches!(classify(&graph, "models", &ty).unwrap(), Shape::Scalar(s) if s == scalar)
            );
        }
    }

    #[test]
    fn wrappers_expose_inner_types() {
        let graph = graph();
        let ty: Type = parse_quote!(Option<Vec<String>>);
        let Shape::Option(inner) = classify(&graph, "models", &ty).unwrap() else {
            panic!("expected option");
        };
        assert!(matches!(
            classify(&graph, "models", &inner).unwrap(),
            Shape::Sequence(_)
        ));
    }

    #[test]
    fn aliases_unwrap_to_underlying_shape() {
        let graph = graph();
        let ty: Type = parse_quote!(CodeAlias);
        assert!(matches!(
            classify(&graph, "models", &ty).unwrap(),
            Shape::Scalar(Scalar::Str)
        ));
    }

    #[test]
    fn alias_cycles_hit_the_depth_bound() {
        let looping: syn::File = parse_quote! {
            pub type Loop = Loop;
        };
        let graph = UnitGraph::new(vec![Unit::from_file("models", &looping)]);
        let ty: Type = parse_quote!(Loop);
        assert!(matches!(
            classify(&graph, "models", &ty),
            Err(GenError::AliasDepthExceeded(_))
        ));
    }

    #[test]
    fn caps_follow_alias_chains() {
        let graph = graph();
        assert!(caps_of(&graph, "models", &parse_quote!(Stamp)).is_zero);
        assert!(caps_of(&graph, "models", &parse_quote!(StampAlias)).is_zero);
    }

    #[test]
    fn known_structs_are_records() {
        let graph = graph();
        let ty: Type = parse_quote!(Nested);
        assert!(matches!(
            classify(&graph, "models", &ty).unwrap(),
            Shape::Record { .. }
        ));
    }

    #[test]
    fn duration_is_special_cased() {
        let graph = graph();
        let ty: Type = parse_quote!(std::time::Duration);
        assert!(matches!(
            classify(&graph, "models", &ty).unwrap(),
            Shape::Duration
        ));
    }

    #[test]
    fn access_roots() {
        let field = Field {
            recv: Some(format_ident!("self")),
            ident: format_ident!("c"),
            deref: false,
            key: quote! { "c" },
            ty: parse_quote!(String),
        };
        assert_eq!(field.access(true).to_string(), "self . c");

        let elem = Field {
            recv: None,
            ident: format_ident!("elem"),
            deref: true,
            key: quote! { i.to_string() },
            ty: parse_quote!(i64),
        };
        assert_eq!(elem.access(false).to_string(), "elem");
        assert_eq!(elem.access(true).to_string(), "(* elem)");
    }
}
