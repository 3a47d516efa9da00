// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Order-preserving string map.
//!
//! The annotation grammar has no native ordered-map notion, yet generated
//! code must come out in annotation order so regeneration is byte-identical.
//! This map keeps an explicit key vector next to the lookup table: iteration
//! order equals first-insertion order, and removing a key leaves the relative
//! order of the remaining keys untouched.

use std::collections::HashMap;

/// Map from string keys to `T` preserving first-insertion order.
#[derive(Debug, Clone)]
pub struct OrderedMap<T> {
    keys: Vec<String>,
    map: HashMap<String, T>,
}

// Manual impl: the derive would bound `T: Default`, which the value types
// stored here do not implement.
impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedMap<T> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            map: HashMap::new(),
        }
    }

    /// Insert `value` under `key`.
    ///
    /// A fresh key is appended to the iteration order; re-inserting an
    /// existing key replaces the value but keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        let key = key.into();
        let old = self.map.insert(key.clone(), value);
        if old.is_none() {
            self.keys.push(key);
        }
        old
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.map.get(key)
    }

    /// True when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Remove `key`, keeping the remaining keys' relative order.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let old = self.map.remove(key)?;
        self.keys.retain(|k| k != key);
        Some(old)
    }

    /// Remove several keys at once.
    pub fn remove_all(&mut self, keys: &[&str]) {
        for key in keys {
            self.remove(key);
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.keys
            .iter()
            .map(|k| (k.as_str(), &self.map[k.as_str()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &OrderedMap<i32>) -> Vec<&str> {
        map.iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("required", 1);
        map.insert("url", 2);
        map.insert("oneof", 3);
        assert_eq!(keys(&map), ["required", "url", "oneof"]);
    }

    #[test]
    fn removal_keeps_relative_order() {
        let mut map = OrderedMap::new();
        map.insert("value", 1);
        map.insert("min", 2);
        map.insert("error", 3);
        map.insert("max", 4);
        map.remove_all(&["value", "error", "each"]);
        assert_eq!(keys(&map), ["min", "max"]);
    }

    #[test]
    fn default_does_not_require_default_values() {
        enum Marker {
            A,
        }
        let mut map: OrderedMap<Marker> = OrderedMap::default();
        assert!(map.is_empty());
        map.insert("a", Marker::A);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 10), Some(1));
        assert_eq!(keys(&map), ["a", "b"]);
        assert_eq!(map.get("a"), Some(&10));
    }
}
