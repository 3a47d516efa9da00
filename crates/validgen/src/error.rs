// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Generation-time error taxonomy.
//!
//! Every variant is fatal for the type being generated: generation of one
//! struct fails atomically and independently of its siblings. There is no
//! runtime taxonomy beyond `validgen_core::Errors` — generated code never
//! panics for expected validation failures.

use thiserror::Error;

/// Errors surfaced while generating a validator.
#[derive(Debug, Error)]
pub enum GenError {
    /// Malformed annotation syntax inside `#[validate(...)]`.
    #[error("malformed annotation: {0}")]
    Parse(#[from] syn::Error),

    /// A symbolic reference did not resolve against the unit graph.
    #[error("identifier {0:?} not found")]
    UnresolvedSymbol(String),

    /// An annotation named a rule missing from the catalog.
    #[error("unknown rule: {0:?}")]
    UnknownRule(String),

    /// `dive` applied to a field whose shape has no element/member structure.
    #[error("dive: unsupported shape for type `{0}`")]
    UnsupportedDiveShape(String),

    /// No zero value exists for the field's type.
    #[error("no zero value for type `{0}`")]
    UnsupportedZeroType(String),

    /// A literal duration string failed to parse at generation time.
    #[error("invalid duration {text:?}: {source}")]
    DurationParse {
        /// The offending annotation value.
        text: String,
        /// Parser diagnostic.
        source: humantime::DurationError,
    },

    /// Alias chain exceeded the unwrap depth bound.
    ///
    /// Alias chains are assumed acyclic; this bound turns a malformed cycle
    /// into an error instead of an infinite loop.
    #[error("alias chain too deep while unwrapping `{0}`")]
    AliasDepthExceeded(String),

    /// A rule received properties it cannot work with.
    #[error("rule {name:?}: {message}")]
    Rule {
        /// Rule name as written in the annotation.
        name: &'static str,
        /// What was wrong with the supplied properties.
        message: String,
    },
}

impl GenError {
    /// Shorthand for rule-misuse diagnostics.
    pub fn rule(name: &'static str, message: impl Into<String>) -> Self {
        Self::Rule {
            name,
            message: message.into(),
        }
    }
}
