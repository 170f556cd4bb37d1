//! Name -> value assignments (the verbose settings representation)

use crate::registry::Registry;
use crate::value::SettingValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of setting values keyed by setting name.
///
/// Serializes as a flat JSON object. An assignment on its own is not
/// validated; run it through [`Registry::resolve`] for that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    values: BTreeMap<String, SettingValue>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(SettingValue::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SettingValue::as_int)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SettingValue::as_str)
    }

    /// Set a value, returning the previous one.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Option<SettingValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<SettingValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Copy every value of `other` over this assignment.
    pub fn merge(&mut self, other: &Assignment) {
        for (name, value) in other.iter() {
            self.values.insert(name.to_string(), value.clone());
        }
    }

    /// Apply the forced values of every dependency, as an editor would
    /// before saving. Dependencies are evaluated once against the
    /// assignment as it was before this call. Returns the number of values
    /// that changed.
    pub fn apply_overrides(&mut self, registry: &Registry) -> usize {
        let mut changed = 0;
        for (name, value) in registry.overrides(self) {
            if self.values.get(&name) != Some(&value) {
                self.values.insert(name, value);
                changed += 1;
            }
        }
        changed
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl<N, V> FromIterator<(N, V)> for Assignment
where
    N: Into<String>,
    V: Into<SettingValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_flat_object() {
        let settings: Assignment = [
            ("moon", SettingValue::from("open")),
            ("trials", SettingValue::Int(2)),
            ("fast_chests", SettingValue::Bool(true)),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"fast_chests":true,"moon":"open","trials":2}"#);
        assert_eq!(Assignment::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_typed_getters() {
        let mut settings = Assignment::new();
        settings.set("trials_random", true);
        settings.set("moon", "fast");
        assert_eq!(settings.get_bool("trials_random"), Some(true));
        assert_eq!(settings.get_str("moon"), Some("fast"));
        assert_eq!(settings.get_int("moon"), None);
        assert_eq!(settings.set("moon", "open"), Some(SettingValue::from("fast")));
    }
}
