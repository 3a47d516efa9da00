// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! # Pipeline
//!
//! ```text
//! #[validate(...)] attrs ──parse──▶ AnnotationMap (ordered)
//!                                        │
//!                 UnitGraph ──resolve──▶ Properties per rule
//!                                        │
//!                          RuleSet ──render──▶ fragments
//!                                        │
//!                        Generator ──assemble──▶ impl T { fn validate … }
//! ```
//!
//! The entry point is [`Generator`]: build a [`UnitGraph`] from parsed
//! source files, then call [`Generator::generate_unit`] per unit. Output is
//! a [`proc_macro2::TokenStream`] that parses as a Rust file; formatting is
//! the caller's concern.
//!
//! # Determinism
//!
//! Regenerating from unchanged input yields byte-identical output: structs
//! are processed in source order, rules in annotation order, and hoisted
//! statics are named by a per-type sequence counter rather than anything
//! random.

pub mod annot;
pub mod error;
pub mod field;
pub mod generate;
pub mod omap;
pub mod property;
pub mod rules;
pub mod unit;
pub mod zero;

pub use annot::{AnnotValue, AnnotationMap, parse_validate_attrs};
pub use error::GenError;
pub use generate::Generator;
pub use omap::OrderedMap;
pub use rules::{Rule, RuleFn, RuleSet};
pub use unit::{Unit, UnitGraph};
