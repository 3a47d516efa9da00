// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Value checks: `url`, `oneof`, `regex`, `length`, `non-empty`, `iso-4217`.
//!
//! All of them skip absent optional fields. `regex` hoists its compiled
//! pattern into a per-type static so the pattern compiles once, with a
//! deterministic name so regeneration stays byte-identical.

use proc_macro2::TokenStream;
use quote::quote;

use super::{add_err, msg, msg_fmt};
use crate::{
    error::GenError,
    field::Field,
    generate::Context,
    property::{PropType, Properties, Property},
};

/// Raise "must be URL" unless the field's string form parses as a URL.
pub(crate) fn url(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    if props.disabled() {
        return Ok(TokenStream::new());
    }
    let form = field.string_form(ctx.graph, ctx.subject)?;
    let add = add_err(field, props, msg("must be URL"));
    Ok(quote! {
        if validgen_core::url::Url::parse(#form).is_err() {
            #add
        }
    })
}

/// Raise "must be one of …" unless the field's value is a member of the
/// supplied list.
pub(crate) fn oneof(
    _ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    let Some(list_prop @ Property::List(_, elem_ty)) = &props.value else {
        return Err(GenError::rule("oneof", "value must be a list"));
    };
    if *elem_ty == PropType::Any {
        return Err(GenError::rule("oneof", "list elements must share one type"));
    }
    let list = list_prop.to_tokens();
    let probe = match elem_ty {
        PropType::Str => {
            let access = field.access(true);
            quote! { #access.as_str() }
        }
        _ => field.access(true),
    };
    let add = add_err(field, props, msg_fmt("must be one of {:?}", quote! { #list }));
    Ok(quote! {
        if !#list.contains(&#probe) {
            #add
        }
    })
}

/// Compile the pattern once per type+field and raise "must match regex …"
/// unless the field's string form matches.
pub(crate) fn regex(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    let Some(pattern) = &props.value else {
        return Err(GenError::rule("regex", "value property is required"));
    };
    let pattern = pattern.to_tokens();
    let id = ctx.next_regex_ident();
    ctx.add_static(quote! {
        static #id: std::sync::LazyLock<validgen_core::regex::Regex> =
            std::sync::LazyLock::new(|| validgen_core::regex::Regex::new(#pattern).unwrap());
    });
    let form = field.string_form(ctx.graph, ctx.subject)?;
    let add = add_err(
        field,
        props,
        msg_fmt("must match regex {}", quote! { #pattern }),
    );
    Ok(quote! {
        if !#id.is_match(#form) {
            #add
        }
    })
}

/// Exact length when given a scalar value; otherwise `min`/`max` bounds.
pub(crate) fn length(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    let access = field.access(false);
    if let Some(value) = &props.value {
        let value_tokens = value.to_tokens();
        let add = add_err(
            field,
            props,
            msg_fmt("must have length: {}", quote! { #value_tokens }),
        );
        return Ok(quote! {
            if #access.len() != #value_tokens {
                #add
            }
        });
    }

    let minimum = props.other_property(ctx.graph, ctx.subject, "min")?;
    let maximum = props.other_property(ctx.graph, ctx.subject, "max")?;
    if minimum.is_none() && maximum.is_none() {
        return Err(GenError::rule("length", "requires a value or min/max bounds"));
    }

    let mut out = TokenStream::new();
    if let Some(minimum) = minimum {
        let bound = minimum.to_tokens();
        let add = add_err(
            field,
            props,
            msg_fmt("must have length {} min", quote! { #bound }),
        );
        out.extend(quote! {
            if #access.len() < #bound {
                #add
            }
        });
    }
    if let Some(maximum) = maximum {
        let bound = maximum.to_tokens();
        let add = add_err(
            field,
            props,
            msg_fmt("must have length {} max", quote! { #bound }),
        );
        out.extend(quote! {
            if #access.len() > #bound {
                #add
            }
        });
    }
    Ok(out)
}

/// Raise "must be non empty" unless length is positive.
pub(crate) fn non_empty(
    _ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    let access = field.access(false);
    let add = add_err(field, props, msg("must be non empty"));
    Ok(quote! {
        if #access.len() == 0 {
            #add
        }
    })
}

/// Raise "must be ISO4217 currency" unless the field's string form is a
/// known currency code.
pub(crate) fn iso4217(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    if props.disabled() {
        return Ok(TokenStream::new());
    }
    let form = field.string_form(ctx.graph, ctx.subject)?;
    let add = add_err(field, props, msg("must be ISO4217 currency"));
    Ok(quote! {
        if validgen_core::iso_currency::Currency::from_code(#form).is_none() {
            #add
        }
    })
}
