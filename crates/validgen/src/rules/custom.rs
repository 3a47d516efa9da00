// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Delegating rules: `nested` and `custom`.
//!
//! `nested` hands the field to its own generated validator; `custom` calls a
//! user-supplied predicate, as a method when the resolved function has a
//! receiver, otherwise as a free function with the argument's reference-ness
//! matched to the callee's first parameter.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::{
    error::GenError,
    field::Field,
    generate::Context,
    property::{Properties, Property},
    unit::Symbol,
};

/// Invoke the field's own generated validation procedure and record any
/// resulting composite error. Disabled by a literal `false`.
pub(crate) fn nested(
    _ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    if props.disabled() {
        return Ok(TokenStream::new());
    }
    let access = field.access(false);
    let key = &field.key;
    Ok(quote! {
        if let Err(err) = #access.validate() {
            errs.add(#key, err);
        }
    })
}

/// Call a user predicate and propagate its error under the field key.
pub(crate) fn custom(
    _ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    let Some(Property::Id(id)) = &props.value else {
        return Err(GenError::rule("custom", "value must be an identifier"));
    };
    let Symbol::Fn(sig) = &id.symbol else {
        return Err(GenError::rule("custom", "value must be a function identifier"));
    };

    let call = if sig.has_receiver {
        let access = field.access(false);
        let method = format_ident!("{}", id.ident);
        quote! { #access.#method() }
    } else {
        let func = Property::Id(id.clone()).to_tokens();
        let Some(param_is_ref) = sig.first_param_ref else {
            return Err(GenError::rule(
                "custom",
                format!("function {} has no parameters", id.ident),
            ));
        };
        let arg = match (field.deref, param_is_ref) {
            // Binding is already a reference, callee wants one.
            (true, true) => field.access(false),
            // Plain field into a by-reference parameter.
            (false, true) => {
                let access = field.access(true);
                quote! { &#access }
            }
            // Pointee or plain field by value.
            _ => field.access(true),
        };
        quote! { #func(#arg) }
    };

    let key = &field.key;
    Ok(quote! {
        if let Err(err) = #call {
            errs.add(#key, err);
        }
    })
}
