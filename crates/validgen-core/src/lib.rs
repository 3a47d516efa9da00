// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Runtime support for validgen generated code.
//!
//! Generated `validate` methods depend only on this crate. It provides the
//! error-aggregation container they accumulate into, plus re-exports of the
//! third-party crates referenced by generated checks, so downstream projects
//! add a single dependency.
//!
//! # Overview
//!
//! - [`Errors`] — per-field composite error returned by generated validators
//! - [`Error`] — plain message error raised by individual checks
//! - [`regex`], [`url`], [`iso_currency`], [`parse_duration`] — re-exports
//!   used by the `regex`, `url`, `iso-4217` and `default` rules
//!
//! # Usage
//!
//! Generated code follows this pattern:
//!
//! ```rust
//! use validgen_core::{Error, Errors};
//!
//! struct Login {
//!     name: String,
//! }
//!
//! impl Login {
//!     pub fn validate(&mut self) -> Result<(), Errors> {
//!         let mut errs = Errors::new();
//!         if self.name == String::new() {
//!             errs.add("name", Error::from("required"));
//!         }
//!         errs.into_result()
//!     }
//! }
//!
//! let err = Login { name: String::new() }.validate().unwrap_err();
//! assert_eq!(err.to_string(), "name: [required]");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod errors;

pub use errors::{BoxError, Error, Errors};
/// Re-export of [`humantime::parse_duration`] for the `default` rule's
/// runtime duration parse path.
pub use humantime::parse_duration;
/// Re-export of the `iso_currency` crate for the `iso-4217` rule.
pub use iso_currency;
/// Re-export of the `regex` crate for hoisted pattern statics.
pub use regex;
/// Re-export of the `url` crate for the `url` rule.
pub use url;
