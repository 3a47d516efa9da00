// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Error aggregation used by generated validators.
//!
//! A generated `validate` method creates one [`Errors`] value, feeds every
//! failed check into it keyed by the field label, and finishes with
//! [`Errors::into_result`]. Nested validators (the `nested` rule and record
//! dives) return their own [`Errors`], which the caller stores under the
//! enclosing field's key — composite errors nest.
//!
//! The textual form is part of the generator's contract: entries are sorted
//! lexicographically by key, errors within a key keep encounter order, and the
//! whole thing joins with `"; "`. Regenerated output stays diffable because
//! this ordering never depends on insertion order across keys.

use std::{collections::BTreeMap, fmt};

/// Boxed error stored per field key.
///
/// Any `std::error::Error` works: plain [`Error`] messages, user errors
/// returned by `custom` rule functions, or nested [`Errors`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Plain message error raised by generated checks.
///
/// # Example
///
/// ```rust
/// use validgen_core::Error;
///
/// let err = Error::from("must be URL");
/// assert_eq!(err.to_string(), "must be URL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error(Box<str>);

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self(msg.into())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Error {}

/// Composite per-field error returned by generated validators.
///
/// Maps a field key to the sequence of errors recorded for it. Multiple
/// errors per key are preserved in encounter order; keys render sorted.
#[derive(Debug, Default)]
pub struct Errors(BTreeMap<String, Vec<BoxError>>);

impl Errors {
    /// Create an empty aggregation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `err` under `key`.
    ///
    /// Appends to the key's error sequence; earlier errors for the same key
    /// are kept in the order they were added.
    pub fn add(&mut self, key: impl Into<String>, err: impl Into<BoxError>) {
        self.0.entry(key.into()).or_default().push(err.into());
    }

    /// Number of field keys with at least one error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no error was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors recorded for `key`, in encounter order.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[BoxError]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Finish aggregation: `Ok(())` when empty, `Err(self)` otherwise.
    ///
    /// Generated validators end with this call; record dives use it to decide
    /// whether the child block contributes an error to the parent key.
    pub fn into_result(self) -> Result<(), Errors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for Errors {
    /// `key: [err1; err2]` entries sorted by key, joined with `"; "`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, errs)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{key}: [")?;
            for (j, err) in errs.iter().enumerate() {
                if j > 0 {
                    f.write_str("; ")?;
                }
                write!(f, "{err}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_ok() {
        assert!(Errors::new().into_result().is_ok());
    }

    #[test]
    fn keys_sorted_errors_in_encounter_order() {
        let mut errs = Errors::new();
        errs.add("b", Error::from("second key"));
        errs.add("a", Error::from("first"));
        errs.add("a", Error::from("second"));
        assert_eq!(errs.to_string(), "a: [first; second]; b: [second key]");
    }

    #[test]
    fn nested_composite_renders_inline() {
        let mut inner = Errors::new();
        inner.add("0", Error::from("must be non empty"));
        let mut outer = Errors::new();
        outer.add("arr", inner);
        assert_eq!(outer.to_string(), "arr: [0: [must be non empty]]");
    }

    #[test]
    fn foreign_errors_are_accepted() {
        let mut errs = Errors::new();
        errs.add("n", "x".parse::<i32>().unwrap_err());
        assert_eq!(errs.len(), 1);
    }
}
