// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Pipeline assembly: from annotated structs to generated validators.
//!
//! For each annotated struct the [`Generator`] builds one fresh [`Context`],
//! walks the fields in declaration order, dispatches every annotation key to
//! its rule in first-appearance order, and assembles the fragments into a
//! `validate` method preceded by hoisted statics. Running the generator
//! twice over the same input yields identical output: all iteration orders
//! here are source orders, and static names are sequence-numbered rather
//! than random.

use convert_case::{Case, Casing};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::{
    annot::{AnnotationMap, EACH_KEY, parse_validate_attrs},
    error::GenError,
    field::Field,
    property::Properties,
    rules::RuleSet,
    unit::{Symbol, SymbolRef, UnitGraph},
};

/// Per-struct generation state handed to every rule.
pub struct Context<'a> {
    /// Loaded compilation units.
    pub graph: &'a UnitGraph,
    /// Path of the unit owning the struct being generated.
    pub subject: &'a str,
    /// The immutable rule catalog.
    pub rules: &'a RuleSet,
    /// Label-attribute override (`--tag`), e.g. `serde`.
    pub tag: Option<&'a str>,
    type_name: String,
    statics: Vec<TokenStream>,
    regex_seq: usize,
}

impl<'a> Context<'a> {
    /// Fresh context for one struct.
    #[must_use]
    pub fn new(
        graph: &'a UnitGraph,
        subject: &'a str,
        rules: &'a RuleSet,
        type_name: impl Into<String>,
        tag: Option<&'a str>,
    ) -> Self {
        Self {
            graph,
            subject,
            rules,
            tag,
            type_name: type_name.into(),
            statics: Vec::new(),
            regex_seq: 0,
        }
    }

    /// Resolve a reference against the subject unit and its imports.
    pub fn resolve(&self, raw: &str) -> Result<SymbolRef, GenError> {
        self.graph.resolve(self.subject, raw)
    }

    /// Hoist a static side-declaration above the generated impl.
    pub fn add_static(&mut self, tokens: TokenStream) {
        self.statics.push(tokens);
    }

    /// Deterministic name for the next hoisted pattern static.
    pub fn next_regex_ident(&mut self) -> Ident {
        let seq = self.regex_seq;
        self.regex_seq += 1;
        format_ident!("REGEX_{}_{}", self.type_name.to_case(Case::Constant), seq)
    }

    fn take_statics(&mut self) -> Vec<TokenStream> {
        std::mem::take(&mut self.statics)
    }
}

/// Error key for a field: its identifier, or the `rename` value of the
/// `--tag`-selected attribute when present.
pub(crate) fn field_label(field: &syn::Field, tag: Option<&str>) -> String {
    if let Some(tag) = tag {
        for attr in &field.attrs {
            if !attr.path().is_ident(tag) {
                continue;
            }
            let mut rename = None;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            });
            if let Some(rename) = rename {
                return rename;
            }
        }
    }
    field
        .ident
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Dispatch every annotation key of one field to its rule, in
/// first-appearance order.
///
/// The reserved `each` key dispatches to the `dive` rule; underscores in
/// rule names map to the registry's hyphenated spelling (`non_empty` →
/// `non-empty`).
pub(crate) fn field_fragments(
    ctx: &mut Context<'_>,
    field: &Field,
    map: &AnnotationMap,
) -> Result<Vec<TokenStream>, GenError> {
    let mut fragments = Vec::new();
    for (key, raw) in map.iter() {
        let name = if key == EACH_KEY {
            "dive".to_string()
        } else {
            key.replace('_', "-")
        };
        let rule = ctx.rules.get(&name)?;
        let props = Properties::parse(ctx.graph, ctx.subject, raw)?;
        let fragment = rule.render(ctx, field, &props)?;
        if !fragment.is_empty() {
            fragments.push(fragment);
        }
    }
    Ok(fragments)
}

/// The annotation-to-code translation pipeline.
pub struct Generator {
    rules: RuleSet,
    tag: Option<String>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Generator with the standard rule catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleSet::standard(),
            tag: None,
        }
    }

    /// Use the named field attribute as the label source in error keys.
    #[must_use]
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Generate validators for every annotated struct of one unit.
    ///
    /// Returns `None` when the unit contains no annotated struct. Fails fast
    /// on the first error; the caller decides whether sibling units still
    /// generate.
    pub fn generate_unit(
        &self,
        graph: &UnitGraph,
        unit_path: &str,
    ) -> Result<Option<TokenStream>, GenError> {
        let unit = graph
            .unit(unit_path)
            .ok_or_else(|| GenError::UnresolvedSymbol(unit_path.to_string()))?;
        let mut out = TokenStream::new();
        let mut any = false;
        for name in &unit.structs {
            let Some(Symbol::Struct(item)) = unit.symbols.get(name) else {
                continue;
            };
            if let Some(tokens) = self.generate_struct(graph, unit_path, item)? {
                out.extend(tokens);
                any = true;
            }
        }
        Ok(any.then_some(out))
    }

    /// Generate the validator impl for a single struct.
    ///
    /// Returns `None` when no field carries a `#[validate]` annotation.
    pub fn generate_struct(
        &self,
        graph: &UnitGraph,
        subject: &str,
        item: &syn::ItemStruct,
    ) -> Result<Option<TokenStream>, GenError> {
        let syn::Fields::Named(fields) = &item.fields else {
            return Ok(None);
        };

        let mut ctx = Context::new(
            graph,
            subject,
            &self.rules,
            item.ident.to_string(),
            self.tag.as_deref(),
        );
        let recv = format_ident!("self");
        let mut fragments = Vec::new();
        let mut annotated = false;
        for field in &fields.named {
            let Some(map) = parse_validate_attrs(&field.attrs)? else {
                continue;
            };
            let Some(ident) = field.ident.clone() else {
                continue;
            };
            annotated = true;
            let label = field_label(field, ctx.tag);
            let descriptor = Field {
                recv: Some(recv.clone()),
                ident,
                deref: false,
                key: quote! { #label },
                ty: field.ty.clone(),
            };
            fragments.extend(field_fragments(&mut ctx, &descriptor, &map)?);
        }
        if !annotated {
            return Ok(None);
        }

        let statics = ctx.take_statics();
        let name = &item.ident;
        Ok(Some(quote! {
            #(#statics)*

            impl #name {
                pub fn validate(&mut self) -> Result<(), validgen_core::Errors> {
                    let mut errs = validgen_core::Errors::new();
                    #(#fragments)*
                    errs.into_result()
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;
    use crate::unit::Unit;

    fn graph(file: syn::File) -> UnitGraph {
        UnitGraph::new(vec![Unit::from_file("models", &file)])
    }

    fn generate(file: syn::File) -> String {
        let graph = graph(file);
        Generator::new()
            .generate_unit(&graph, "models")
            .unwrap()
            .expect("unit should produce output")
            .to_string()
    }

    #[test]
    fn unannotated_struct_generates_nothing() {
        let graph = graph(parse_quote! {
            pub struct Plain {
                pub a: String,
            }
        });
        assert!(
            Generator::new()
                .generate_unit(&graph, "models")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn checks_appear_in_annotation_order() {
        let out = generate(parse_quote! {
            pub struct Data {
                #[validate(required, url, oneof = ["a", "b"])]
                pub c: String,
            }
        });
        let required = out.find(r#"Error :: from ("required")"#).unwrap();
        let url = out.find("must be URL").unwrap();
        let oneof = out.find("must be one of").unwrap();
        assert!(required < url && url < oneof);
    }

    #[test]
    fn optional_field_checks_are_presence_guarded() {
        let out = generate(parse_quote! {
            pub struct Data {
                #[validate(required, custom = "id:validate_b")]
                pub b: Option<i64>,
            }

            fn validate_b(b: &i64) -> Result<(), validgen_core::Error> {
                Ok(())
            }
        });
        assert!(out.contains("self . b . is_none ()"));
        assert!(out.contains("if let Some (b) = self . b . as_mut ()"));
        assert!(out.contains("validate_b (b)"));
    }

    #[test]
    fn disabled_rules_generate_no_fragment() {
        let out = generate(parse_quote! {
            pub struct Data {
                #[validate(required)]
                pub a: String,
                #[validate(url = false, iso_4217 = false, nested = false)]
                pub c: String,
            }
        });
        assert!(!out.contains("must be URL"));
        assert!(!out.contains("ISO4217"));
        assert!(!out.contains(". validate ()"));
    }

    #[test]
    fn dive_on_a_scalar_field_fails() {
        let graph = graph(parse_quote! {
            pub struct Data {
                #[validate(each(url))]
                pub n: i64,
            }
        });
        let err = Generator::new().generate_unit(&graph, "models").unwrap_err();
        assert!(matches!(err, GenError::UnsupportedDiveShape(_)));
    }

    #[test]
    fn duration_default_parses_at_generation_time() {
        let out = generate(parse_quote! {
            pub struct Data {
                #[validate(default = "30s")]
                pub timeout: std::time::Duration,
            }
        });
        assert!(out.contains("std :: time :: Duration :: new (30 , 0)"));
    }

    #[test]
    fn regex_static_is_hoisted_and_deterministic() {
        let input: syn::File = parse_quote! {
            pub struct Data {
                #[validate(regex = "^a.*$")]
                pub a: String,
                #[validate(regex = "^b.*$")]
                pub b: String,
            }
        };
        let out = generate(input.clone());
        assert!(out.contains("static REGEX_DATA_0"));
        assert!(out.contains("static REGEX_DATA_1"));
        assert_eq!(out, generate(input));
    }

    #[test]
    fn dive_nests_one_layer_per_depth() {
        let out = generate(parse_quote! {
            pub struct Data {
                #[validate(each(non_empty, each(regex = "^x")))]
                pub arr: Vec<Vec<String>>,
            }
        });
        assert_eq!(out.matches("iter_mut () . enumerate ()").count(), 2);
        let inner_loop = out.rfind("iter_mut () . enumerate ()").unwrap();
        let regex_check = out.find("is_match").unwrap();
        let non_empty = out.find("must be non empty").unwrap();
        assert!(non_empty < inner_loop);
        assert!(regex_check > inner_loop);
    }

    #[test]
    fn record_dive_inlines_member_rules() {
        let out = generate(parse_quote! {
            pub struct Outer {
                #[validate(dive)]
                pub inner: Inner,
            }

            pub struct Inner {
                #[validate(required)]
                pub test: bool,
            }
        });
        assert!(out.contains("let this = & mut self . inner"));
        assert!(out.contains("this . test == false"));
    }

    #[test]
    fn tag_override_reads_rename() {
        let file: syn::File = parse_quote! {
            pub struct Data {
                #[serde(rename = "userName")]
                #[validate(required)]
                pub name: String,
            }
        };
        let graph = graph(file);
        let out = Generator::new()
            .with_tag(Some("serde".into()))
            .generate_unit(&graph, "models")
            .unwrap()
            .unwrap()
            .to_string();
        assert!(out.contains(r#""userName""#));
    }

    #[test]
    fn unknown_rule_fails() {
        let graph = graph(parse_quote! {
            pub struct Data {
                #[validate(wibble)]
                pub a: String,
            }
        });
        assert!(matches!(
            Generator::new().generate_unit(&graph, "models"),
            Err(GenError::UnknownRule(name)) if name == "wibble"
        ));
    }

    #[test]
    fn generated_output_parses_as_rust() {
        let out = Generator::new()
            .generate_unit(
                &graph(parse_quote! {
                    pub struct Data {
                        #[validate(required, length(min = 2, max = 34), each(url))]
                        pub arr: Vec<String>,
                    }
                }),
                "models",
            )
            .unwrap()
            .unwrap();
        syn::parse2::<syn::File>(out).expect("generated tokens must be a valid file");
    }
}
