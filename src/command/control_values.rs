// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outgoing device value map.

use std::collections::BTreeMap;

use crate::state::AttributeKey;

/// Device-native values to write, keyed by attribute.
///
/// Values are lowercase tokens (`"hot"`, `"silence"`) and formatted
/// temperatures (`"21.5"`). An empty map is a bare "set", which devices
/// treat as power-on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlValues {
    values: BTreeMap<&'static str, String>,
}

impl ControlValues {
    /// Creates an empty value map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding a single value.
    #[must_use]
    pub fn single(key: AttributeKey, value: impl Into<String>) -> Self {
        let mut values = Self::new();
        values.insert(key, value);
        values
    }

    /// Sets the value of an attribute.
    pub fn insert(&mut self, key: AttributeKey, value: impl Into<String>) {
        self.values.insert(key.field(), value.into());
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.values.get(key.field()).map(String::as_str)
    }

    /// Returns `true` if the attribute is present.
    #[must_use]
    pub fn contains(&self, key: AttributeKey) -> bool {
        self.values.contains_key(key.field())
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_by_device_field() {
        let mut values = ControlValues::new();
        values.insert(AttributeKey::Mode, "cool");
        values.insert(AttributeKey::TargetTemperature, "24");

        assert_eq!(values.len(), 2);
        assert_eq!(
            values.iter().collect::<Vec<_>>(),
            vec![("mode", "cool"), ("stemp", "24")]
        );
    }

    #[test]
    fn single_value() {
        let values = ControlValues::single(AttributeKey::Mode, "off");
        assert_eq!(values.get(AttributeKey::Mode), Some("off"));
        assert!(!values.contains(AttributeKey::FanRate));
    }
}
