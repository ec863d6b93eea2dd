// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Ordered, name-deduplicated parameter collection

use crate::value::Value;
use std::collections::BTreeMap;

/// Named statement parameters.
///
/// Insertion order is preserved for iteration and rendering. Re-adding a
/// name overwrites the earlier value in place; the last write wins and
/// the name keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedParameters {
    entries: Vec<(String, Value)>,
}

impl NamedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, overwriting any earlier value under the same name
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Add every entry of another collection, in its order
    pub fn add_all(&mut self, other: &NamedParameters) {
        for (name, value) in &other.entries {
            self.add(name.clone(), value.clone());
        }
    }

    /// Look up a parameter by name
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot the collection as a name-keyed map for submission to a
    /// driver
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.entries.iter().cloned().collect()
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for NamedParameters {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut params = NamedParameters::new();
        for (name, value) in iter {
            params.add(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut params = NamedParameters::new();
        params.add("zulu", 1);
        params.add("alpha", 2);
        params.add("mike", 3);

        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_readd_overwrites_in_place() {
        let mut params = NamedParameters::new();
        params.add("name", "first");
        params.add("limit", 10);
        params.add("name", "second");

        assert_eq!(params.len(), 2);
        assert_eq!(params.value("name"), Some(&Value::from("second")));
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "limit"]);
    }

    #[test]
    fn test_add_all_applies_other_in_order() {
        let mut base = NamedParameters::new();
        base.add("a", 1);
        base.add("b", 2);

        let mut overlay = NamedParameters::new();
        overlay.add("b", 20);
        overlay.add("c", 30);

        base.add_all(&overlay);

        assert_eq!(base.value("a"), Some(&Value::Integer(1)));
        assert_eq!(base.value("b"), Some(&Value::Integer(20)));
        assert_eq!(base.value("c"), Some(&Value::Integer(30)));
        let names: Vec<&str> = base.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
