// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Compilation units and symbol resolution.
//!
//! A [`Unit`] is the resolver's unit of lookup: a named collection of type
//! and function definitions with a direct import list. The generator treats
//! the loaded [`UnitGraph`] as a pure in-memory lookup service — loading
//! units from disk is the CLI's job.
//!
//! References inside annotations are either bare (`id:validate_b`, resolved
//! in the subject unit) or qualified (`id:helpers::MIN_LEN`, resolved in the
//! unit whose path matches exactly). Resolution also answers whether the
//! symbol is local to the subject unit, which decides how generated
//! references are qualified.

use std::collections::BTreeMap;

use syn::{FnArg, ImplItem, Item, ReturnType, Type, UseTree};

use crate::{error::GenError, property::PropType};

/// Exported symbol of a compilation unit.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// `const NAME: Ty = …` with its classified property type.
    Const(PropType),
    /// Free function or impl-block method.
    Fn(FnSig),
    /// Struct definition, kept syntactically for record dives.
    Struct(syn::ItemStruct),
    /// `type Name = Ty` alias.
    Alias(Type),
}

/// The parts of a function signature code generation cares about.
#[derive(Debug, Clone)]
pub struct FnSig {
    /// True for impl-block methods taking `self`/`&self`/`&mut self`.
    pub has_receiver: bool,
    /// Whether the first non-receiver parameter is a reference;
    /// `None` when the function declares no such parameter.
    pub first_param_ref: Option<bool>,
}

/// Capability flags recorded per type name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Caps {
    /// The type implements `Display` (usable as a string form).
    pub display: bool,
    /// The type exposes `fn is_zero(&self) -> bool`.
    pub is_zero: bool,
}

/// A typed handle produced by resolution.
#[derive(Debug, Clone)]
pub struct SymbolRef {
    /// Path of the owning unit.
    pub unit_path: String,
    /// Identifier inside that unit.
    pub ident: String,
    /// True when the owning unit is the subject unit; local references are
    /// emitted unqualified, foreign ones import-qualified.
    pub local: bool,
    /// The resolved symbol.
    pub symbol: Symbol,
}

impl SymbolRef {
    /// Static type of the referenced value, for list widening.
    #[must_use]
    pub fn prop_type(&self) -> PropType {
        match &self.symbol {
            Symbol::Const(ty) => ty.clone(),
            Symbol::Fn(_) => PropType::Named("fn".into()),
            Symbol::Struct(item) => PropType::Named(item.ident.to_string()),
            Symbol::Alias(_) => PropType::Named(self.ident.clone()),
        }
    }
}

/// One compilation unit: path, direct imports, exported symbols.
#[derive(Debug, Clone, Default)]
pub struct Unit {
    /// Unit path, e.g. `models` or `demo::helpers`.
    pub path: String,
    /// Direct import graph (unit paths named by `use` declarations).
    pub imports: Vec<String>,
    /// Exported symbol table.
    pub symbols: BTreeMap<String, Symbol>,
    /// Struct names in source order, driving deterministic generation.
    pub structs: Vec<String>,
    /// Capability flags per type name.
    pub caps: BTreeMap<String, Caps>,
}

impl Unit {
    /// Build a unit's symbol table from a parsed source file.
    ///
    /// Collects consts, free functions, structs, type aliases and impl-block
    /// methods, and records capabilities from impl blocks: `Display` and
    /// `IsZero` trait impls, plus inherent `fn is_zero(&self) -> bool`
    /// methods. `use` declarations contribute the direct import list.
    #[must_use]
    pub fn from_file(path: impl Into<String>, file: &syn::File) -> Self {
        let mut unit = Self {
            path: path.into(),
            ..Self::default()
        };
        for item in &file.items {
            unit.collect_item(item);
        }
        unit
    }

    fn collect_item(&mut self, item: &Item) {
        match item {
            Item::Const(item) => {
                self.symbols
                    .insert(item.ident.to_string(), Symbol::Const(PropType::of_type(&item.ty)));
            }
            Item::Fn(item) => {
                self.symbols
                    .insert(item.sig.ident.to_string(), Symbol::Fn(fn_sig(&item.sig)));
            }
            Item::Struct(item) => {
                let name = item.ident.to_string();
                self.structs.push(name.clone());
                self.symbols.insert(name, Symbol::Struct(item.clone()));
            }
            Item::Type(item) => {
                self.symbols
                    .insert(item.ident.to_string(), Symbol::Alias((*item.ty).clone()));
            }
            Item::Impl(item) => self.collect_impl(item),
            Item::Use(item) => self.collect_use(&item.tree),
            Item::Mod(item) => {
                if let Some((_, items)) = &item.content {
                    for item in items {
                        self.collect_item(item);
                    }
                }
            }
            _ => {}
        }
    }

    fn collect_impl(&mut self, item: &syn::ItemImpl) {
        let Some(name) = type_name(&item.self_ty) else {
            return;
        };
        if let Some((_, trait_path, _)) = &item.trait_ {
            match trait_path.segments.last() {
                Some(seg) if seg.ident == "Display" => {
                    self.caps.entry(name).or_default().display = true;
                }
                Some(seg) if seg.ident == "IsZero" => {
                    self.caps.entry(name).or_default().is_zero = true;
                }
                _ => {}
            }
            return;
        }
        for member in &item.items {
            let ImplItem::Fn(method) = member else {
                continue;
            };
            if method.sig.ident == "is_zero" && returns_bool(&method.sig.output) {
                self.caps.entry(name.clone()).or_default().is_zero = true;
            }
            self.symbols
                .insert(method.sig.ident.to_string(), Symbol::Fn(fn_sig(&method.sig)));
        }
    }

    fn collect_use(&mut self, tree: &UseTree) {
        if let UseTree::Path(path) = tree {
            let head = path.ident.to_string();
            if !matches!(head.as_str(), "crate" | "self" | "super" | "std" | "core")
                && !self.imports.contains(&head)
            {
                self.imports.push(head);
            }
        }
    }

    /// Capability flags for a named type, if any were recorded.
    #[must_use]
    pub fn caps_of(&self, type_name: &str) -> Caps {
        self.caps.get(type_name).copied().unwrap_or_default()
    }
}

fn fn_sig(sig: &syn::Signature) -> FnSig {
    let mut has_receiver = false;
    let mut first_param_ref = None;
    for input in &sig.inputs {
        match input {
            FnArg::Receiver(_) => has_receiver = true,
            FnArg::Typed(pat) => {
                first_param_ref = Some(matches!(&*pat.ty, Type::Reference(_)));
                break;
            }
        }
    }
    FnSig {
        has_receiver,
        first_param_ref,
    }
}

fn returns_bool(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => matches!(&**ty, Type::Path(p) if p.path.is_ident("bool")),
        ReturnType::Default => false,
    }
}

fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

/// The set of compilation units available to one generation run.
#[derive(Debug, Default)]
pub struct UnitGraph {
    units: Vec<Unit>,
}

impl UnitGraph {
    /// Build a graph from loaded units.
    #[must_use]
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    /// All units, in load order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by exact path.
    #[must_use]
    pub fn unit(&self, path: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.path == path)
    }

    /// Resolve a dotted reference against the subject unit and its direct
    /// imports.
    ///
    /// `raw` is either a bare identifier or `<unit-path>::<identifier>`.
    pub fn resolve(&self, subject: &str, raw: &str) -> Result<SymbolRef, GenError> {
        let (unit_path, ident) = match raw.rfind("::") {
            Some(idx) => (&raw[..idx], &raw[idx + 2..]),
            None => (subject, raw),
        };

        let reachable = unit_path == subject
            || self
                .unit(subject)
                .is_some_and(|u| u.imports.iter().any(|i| i == unit_path));
        if !reachable {
            return Err(GenError::UnresolvedSymbol(raw.to_string()));
        }

        let unit = self
            .unit(unit_path)
            .ok_or_else(|| GenError::UnresolvedSymbol(raw.to_string()))?;
        let symbol = unit
            .symbols
            .get(ident)
            .ok_or_else(|| GenError::UnresolvedSymbol(raw.to_string()))?;

        Ok(SymbolRef {
            unit_path: unit.path.clone(),
            ident: ident.to_string(),
            local: unit.path == subject,
            symbol: symbol.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> UnitGraph {
        let models: syn::File = syn::parse_quote! {
            use helpers::MIN_LEN;

            pub const ONE: &str = "one";

            pub struct Data {
                pub a: String,
            }

            impl Display for Data {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.a)
                }
            }

            fn validate_b(b: i64) -> Result<(), validgen_core::Error> {
                Ok(())
            }
        };
        let helpers: syn::File = syn::parse_quote! {
            pub const MIN_LEN: usize = 2;

            pub struct Stamp(u64);

            impl Stamp {
                pub fn is_zero(&self) -> bool {
                    self.0 == 0
                }
            }

            pub struct Flag(bool);

            impl IsZero for Flag {
                fn is_zero(&self) -> bool {
                    !self.0
                }
            }
        };
        UnitGraph::new(vec![
            Unit::from_file("models", &models),
            Unit::from_file("helpers", &helpers),
        ])
    }

    #[test]
    fn bare_reference_resolves_locally() {
        let graph = graph();
        let sym = graph.resolve("models", "validate_b").unwrap();
        assert!(sym.local);
        assert!(matches!(sym.symbol, Symbol::Fn(_)));
    }

    #[test]
    fn qualified_reference_resolves_through_imports() {
        let graph = graph();
        let sym = graph.resolve("models", "helpers::MIN_LEN").unwrap();
        assert!(!sym.local);
        assert_eq!(sym.unit_path, "helpers");
    }

    #[test]
    fn unknown_identifier_fails() {
        let graph = graph();
        assert!(matches!(
            graph.resolve("models", "missing"),
            Err(GenError::UnresolvedSymbol(_))
        ));
    }

    #[test]
    fn unimported_unit_is_unreachable() {
        let graph = graph();
        assert!(matches!(
            graph.resolve("helpers", "models::ONE"),
            Err(GenError::UnresolvedSymbol(_))
        ));
    }

    #[test]
    fn capabilities_are_recorded() {
        let graph = graph();
        assert!(graph.unit("models").unwrap().caps_of("Data").display);
        assert!(graph.unit("helpers").unwrap().caps_of("Stamp").is_zero);
    }

    #[test]
    fn trait_provided_is_zero_is_recorded() {
        let graph = graph();
        assert!(graph.unit("helpers").unwrap().caps_of("Flag").is_zero);
    }
}
