// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Dive engine: recursive rule application across composite types.
//!
//! `dive` (or its annotation marker `each`) extends the rule set over a
//! composite field without per-shape duplication:
//!
//! - record fields inline one fragment per annotated member, scoped through
//!   a `this` rebinding of the enclosing instance;
//! - sequence/array/map fields re-apply every rule named in the dive block
//!   to a synthetic per-element descriptor inside a generated loop, keyed by
//!   element position;
//! - named aliases unwrap to the underlying shape (acyclic by contract,
//!   bounded by the classifier's depth guard).
//!
//! Nesting is unbounded: each `each` level adds one iteration or record
//! delegation layer.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Type;

use crate::{
    annot::parse_validate_attrs,
    error::GenError,
    field::{Field, Shape, classify, type_string},
    generate::{Context, field_fragments, field_label},
    property::Properties,
};

/// Entry point registered as the `dive` rule.
pub(crate) fn dive(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
) -> Result<TokenStream, GenError> {
    match classify(ctx.graph, ctx.subject, &field.ty)? {
        Shape::Record { item, .. } => record_dive(ctx, field, &item),
        Shape::Array(elem) | Shape::Sequence(elem) => {
            element_dive(ctx, field, props, &elem, false)
        }
        Shape::Map(value) => element_dive(ctx, field, props, &value, true),
        _ => Err(GenError::UnsupportedDiveShape(type_string(&field.ty))),
    }
}

/// Inline child validation of a record's annotated members, with access to
/// the enclosing field's instance through `this`.
fn record_dive(
    ctx: &mut Context<'_>,
    field: &Field,
    item: &syn::ItemStruct,
) -> Result<TokenStream, GenError> {
    let this = format_ident!("this");
    let mut fragments = Vec::new();
    let syn::Fields::Named(members) = &item.fields else {
        return Err(GenError::UnsupportedDiveShape(item.ident.to_string()));
    };
    for member in &members.named {
        let Some(map) = parse_validate_attrs(&member.attrs)? else {
            continue;
        };
        let Some(ident) = member.ident.clone() else {
            continue;
        };
        let label = field_label(member, ctx.tag);
        let member_field = Field {
            recv: Some(this.clone()),
            ident,
            deref: false,
            key: quote! { #label },
            ty: member.ty.clone(),
        };
        fragments.extend(field_fragments(ctx, &member_field, &map)?);
    }

    let outer = field.access(true);
    let key = &field.key;
    Ok(quote! {
        if let Err(err) = (|| {
            let this = &mut #outer;
            let mut errs = validgen_core::Errors::new();
            #(#fragments)*
            errs.into_result()
        })() {
            errs.add(#key, err);
        }
    })
}

/// Re-apply the dive block's rules to a synthetic per-element descriptor
/// inside an iteration construct; the error key is the element's position.
fn element_dive(
    ctx: &mut Context<'_>,
    field: &Field,
    props: &Properties,
    elem_ty: &Type,
    keyed: bool,
) -> Result<TokenStream, GenError> {
    let elem_field = Field {
        recv: None,
        ident: format_ident!("elem"),
        deref: true,
        key: if keyed {
            quote! { k.to_string() }
        } else {
            quote! { i.to_string() }
        },
        ty: elem_ty.clone(),
    };
    let fragments = field_fragments(ctx, &elem_field, &props.other)?;

    let access = field.access(false);
    let key = &field.key;
    let header = if keyed {
        quote! { for (k, elem) in #access.iter_mut() }
    } else {
        quote! { for (i, elem) in #access.iter_mut().enumerate() }
    };
    Ok(quote! {
        if let Err(err) = (|| {
            let mut errs = validgen_core::Errors::new();
            #header {
                #(#fragments)*
            }
            errs.into_result()
        })() {
            errs.add(#key, err);
        }
    })
}
