// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Rule registry and the rule rendering wrapper.
//!
//! A [`Rule`] is a stateless code-generation procedure from (field
//! descriptor, parsed properties) to a fragment of the validator body.
//! [`RuleSet::standard`] builds the catalog once; it is immutable afterwards
//! and passed explicitly through the pipeline so generation runs stay
//! independently testable.
//!
//! Rules flagged [`Rule::skip_nil_ptr`] never see an `Option` wrapper: the
//! wrapper is unwrapped to its inner type and the generated fragment is
//! guarded so the check is skipped entirely when the field is absent.

mod checks;
mod custom;
pub(crate) mod dive;
mod presence;

use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::quote;

use crate::{
    error::GenError,
    field::{Field, Shape, classify},
    generate::Context,
    property::Properties,
};

/// Code-generation procedure of a rule.
pub type RuleFn = fn(&mut Context<'_>, &Field, &Properties) -> Result<TokenStream, GenError>;

/// A named validation behavior.
pub struct Rule {
    /// Unwrap `Option` fields and guard the fragment behind a presence
    /// check before running the body.
    pub skip_nil_ptr: bool,
    run: RuleFn,
}

impl Rule {
    const fn new(skip_nil_ptr: bool, run: RuleFn) -> Self {
        Self { skip_nil_ptr, run }
    }

    /// Render the rule against a field.
    ///
    /// For `skip_nil_ptr` rules on optional fields the descriptor is
    /// rewritten to the dereferenced inner type, so rule bodies never see
    /// the wrapper.
    pub fn render(
        &self,
        ctx: &mut Context<'_>,
        field: &Field,
        props: &Properties,
    ) -> Result<TokenStream, GenError> {
        if self.skip_nil_ptr
            && let Shape::Option(inner) = classify(ctx.graph, ctx.subject, &field.ty)?
        {
            let outer = field.access(false);
            let bind = field.ident.clone();
            let inner_field = Field {
                recv: None,
                ident: bind.clone(),
                deref: true,
                key: field.key.clone(),
                ty: *inner,
            };
            let body = (self.run)(ctx, &inner_field, props)?;
            if body.is_empty() {
                return Ok(body);
            }
            return Ok(quote! {
                if let Some(#bind) = #outer.as_mut() {
                    #body
                }
            });
        }
        (self.run)(ctx, field, props)
    }
}

/// Immutable name → rule catalog.
pub struct RuleSet {
    map: BTreeMap<&'static str, Rule>,
}

impl RuleSet {
    /// The full standard catalog.
    #[must_use]
    pub fn standard() -> Self {
        let mut map = BTreeMap::new();
        map.insert("required", Rule::new(false, presence::required as RuleFn));
        map.insert("default", Rule::new(false, presence::default_value));
        map.insert("url", Rule::new(true, checks::url));
        map.insert("oneof", Rule::new(true, checks::oneof));
        map.insert("regex", Rule::new(true, checks::regex));
        map.insert("length", Rule::new(true, checks::length));
        map.insert("non-empty", Rule::new(true, checks::non_empty));
        map.insert("iso-4217", Rule::new(true, checks::iso4217));
        map.insert("nested", Rule::new(true, custom::nested));
        map.insert("custom", Rule::new(true, custom::custom));
        map.insert("dive", Rule::new(true, dive::dive));
        Self { map }
    }

    /// Look a rule up by its registered name.
    pub fn get(&self, name: &str) -> Result<&Rule, GenError> {
        self.map
            .get(name)
            .ok_or_else(|| GenError::UnknownRule(name.to_string()))
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.map.keys().copied()
    }
}

/// `errs.add(key, …)` statement with the rule's default message, honoring
/// the per-invocation `error` override.
pub(crate) fn add_err(field: &Field, props: &Properties, default: TokenStream) -> TokenStream {
    let key = &field.key;
    let err = match &props.error {
        Some(msg) => quote! { validgen_core::Error::from(#msg) },
        None => default,
    };
    quote! { errs.add(#key, #err); }
}

/// Default message expression for a fixed text.
pub(crate) fn msg(text: &str) -> TokenStream {
    quote! { validgen_core::Error::from(#text) }
}

/// Default message expression formatted with a property value.
pub(crate) fn msg_fmt(format: &str, arg: TokenStream) -> TokenStream {
    quote! { validgen_core::Error::from(format!(#format, #arg)) }
}
