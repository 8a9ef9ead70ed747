// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Tag values which signal that [access](https://wiki.openstreetmap.org/wiki/Key:access)
/// for a mode is legally or practically granted.
pub const INTENDED_ACCESS: &[&str] = &["yes", "designated", "official", "permissive"];

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way),
/// reduced to its id and free-form tag set.
///
/// All tag lookups are case-sensitive exact string matches on raw tag values,
/// without any normalization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Way {
    pub id: i64,
    pub tags: HashMap<String, String>,
}

impl Way {
    /// Creates a [Way] from an iterator of key-value pairs, mostly useful in tests
    /// and one-off classifications.
    pub fn from_tags<K: Into<String>, V: Into<String>>(
        id: i64,
        tags: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            id,
            tags: tags
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the raw value of a tag, if present.
    pub fn get_tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|v| v.as_str())
    }

    /// Checks if a tag is present, with any value.
    pub fn has_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Checks if a tag is present with exactly the provided value.
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.get_tag(key) == Some(value)
    }

    /// Checks if a tag is present with a value from the provided set.
    pub fn has_tag_in(&self, key: &str, values: &[&str]) -> bool {
        self.get_tag(key).is_some_and(|v| values.contains(&v))
    }

    /// Checks if any of the provided keys carries exactly the provided value.
    pub fn has_any_tag(&self, keys: &[&str], value: &str) -> bool {
        keys.iter().any(|&key| self.has_tag(key, value))
    }
}

/// Checks if a way represents a [ferry](https://wiki.openstreetmap.org/wiki/Tag:route%3Dferry)
/// connection rather than a road.
pub fn is_ferry(way: &Way) -> bool {
    way.has_tag_in("route", &["ferry", "shuttle_train"])
}
