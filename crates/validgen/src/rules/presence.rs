// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! `required` and `default`: the two rules built on zero-value synthesis.
//!
//! Neither rule skips absent optional fields — absence is exactly what they
//! test for. A type exposing `fn is_zero(&self) -> bool` is probed through
//! that capability instead of a structural comparison.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::{add_err, msg};
use crate::{
    error::GenError,
    field::{Field, Scalar, Shape, caps_of, classify},
    generate::Context,
    property::{LitValue, PropType, Properties, Property},
    zero::zero_value,
};

/// Condition testing whether `field` holds its zero value.
pub(crate) fn if_zero(ctx: &Context<'_>, field: &Field) -> Result<TokenStream, GenError> {
    let shape = classify(ctx.graph, ctx.subject, &field.ty)?;
    if matches!(shape, Shape::Option(_)) {
        let access = field.access(false);
        return Ok(quote! { #access.is_none() });
    }
    if caps_of(ctx.graph, ctx.subject, &field.ty).is_zero {
        let access = field.access(false);
        return Ok(quote! { #access.is_zero() });
    }
    let zero = zero_value(ctx.graph, ctx.subject, &field.ty)?;
    let access = field.access(true);
    Ok(quote! { #access == #zero })
}

/// `required`: raise "required" when the field equals its zero value or,
/// for optional fields, is absent. Disabled entirely by a literal `false`.
pub(crate) fn required(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    if props.disabled() {
        return Ok(TokenStream::new());
    }
    let test = if_zero(ctx, field)?;
    let add = add_err(field, props, msg("required"));
    Ok(quote! {
        if #test {
            #add
        }
    })
}

/// `default`: assign a default when the field is at its zero value.
///
/// Optional fields are assigned through `Some`. Duration-typed fields with a
/// string value take the textual parse path: literals parse at generation
/// time into a constant, identifiers parse at runtime with the error
/// recorded under the field key.
pub(crate) fn default_value(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    let Some(value) = &props.value else {
        return Err(GenError::rule("default", "value property is required"));
    };
    let test = if_zero(ctx, field)?;
    let shape = classify(ctx.graph, ctx.subject, &field.ty)?;

    if matches!(shape, Shape::Duration) && value.prop_type() == PropType::Str {
        let assign = duration_assign(field, value)?;
        return Ok(quote! {
            if #test {
                #assign
            }
        });
    }

    let access = field.access(true);
    let assign = match &shape {
        Shape::Option(inner) => {
            let value = converted(ctx, inner, value)?;
            quote! { #access = Some(#value); }
        }
        _ => {
            let value = converted(ctx, &field.ty, value)?;
            quote! { #access = #value; }
        }
    };
    Ok(quote! {
        if #test {
            #assign
        }
    })
}

fn duration_assign(field: &Field, value: &Property) -> Result<TokenStream, GenError> {
    let access = field.access(true);
    match value {
        Property::Lit(LitValue::Str(text)) => {
            let duration =
                humantime::parse_duration(text).map_err(|source| GenError::DurationParse {
                    text: text.clone(),
                    source,
                })?;
            let secs = Literal::u64_unsuffixed(duration.as_secs());
            let nanos = Literal::u32_unsuffixed(duration.subsec_nanos());
            Ok(quote! { #access = std::time::Duration::new(#secs, #nanos); })
        }
        Property::Id(_) => {
            let key = &field.key;
            let tokens = value.to_tokens();
            Ok(quote! {
                match validgen_core::parse_duration(#tokens) {
                    Ok(value) => #access = value,
                    Err(err) => errs.add(#key, err),
                }
            })
        }
        _ => Err(GenError::rule("default", "unexpected value property type")),
    }
}

/// Value expression adjusted to the target type; string constants assigned
/// into `String` fields go through `to_string`.
fn converted(
    ctx: &Context<'_>,
    ty: &syn::Type,
    value: &Property,
) -> Result<TokenStream, GenError> {
    let tokens = value.to_tokens();
    let target = classify(ctx.graph, ctx.subject, ty)?;
    if matches!(target, Shape::Scalar(Scalar::Str)) && value.prop_type() == PropType::Str {
        return Ok(quote! { #tokens.to_string() });
    }
    Ok(tokens)
}
