//! Ordered choice sets and bit-width derivation

use crate::value::SettingValue;
use serde::Serialize;

/// One entry of a choice set: the stored key and the label shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    key: SettingValue,
    label: String,
}

impl Choice {
    #[inline]
    pub fn key(&self) -> &SettingValue {
        &self.key
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Ordered key -> label mapping.
///
/// Declaration order is the encoding order: the index of a key here is
/// what gets written into the compact bit string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
}

impl ChoiceSet {
    pub const EMPTY: ChoiceSet = ChoiceSet {
        choices: Vec::new(),
    };

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a choice. Re-declaring a key replaces its label in place.
    pub fn with(mut self, key: impl Into<SettingValue>, label: impl Into<String>) -> Self {
        self.insert(key.into(), label.into());
        self
    }

    /// Build a set whose labels are the keys themselves.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for key in keys {
            let key = key.into();
            set.insert(SettingValue::Str(key.clone()), key);
        }
        set
    }

    /// Integer grid `min..=max` stepping by `step`, labelled with the number.
    pub fn range(min: i64, max: i64, step: i64) -> Self {
        let mut set = Self::new();
        if step <= 0 {
            return set;
        }
        let mut next = Some(min);
        while let Some(value) = next.filter(|value| *value <= max) {
            set.insert(SettingValue::Int(value), value.to_string());
            next = value.checked_add(step);
        }
        set
    }

    fn insert(&mut self, key: SettingValue, label: String) {
        match self.choices.iter_mut().find(|choice| choice.key == key) {
            Some(existing) => existing.label = label,
            None => self.choices.push(Choice { key, label }),
        }
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SettingValue> {
        self.choices.iter().map(|choice| &choice.key)
    }

    pub fn contains(&self, key: &SettingValue) -> bool {
        self.index_of(key).is_some()
    }

    /// Zero-based position of `key` in declaration order.
    pub fn index_of(&self, key: &SettingValue) -> Option<usize> {
        self.choices.iter().position(|choice| &choice.key == key)
    }

    pub fn key_at(&self, index: usize) -> Option<&SettingValue> {
        self.choices.get(index).map(|choice| &choice.key)
    }

    pub fn label_of(&self, key: &SettingValue) -> Option<&str> {
        self.choices
            .iter()
            .find(|choice| &choice.key == key)
            .map(|choice| choice.label.as_str())
    }

    /// Find the key whose textual form equals `raw`.
    pub fn find_raw(&self, raw: &str) -> Option<&SettingValue> {
        self.keys().find(|key| match key {
            SettingValue::Str(text) => text == raw,
            other => other.to_string() == raw,
        })
    }

    /// Bits needed to distinguish every choice.
    pub fn bit_width(&self) -> u32 {
        bit_width_for(self.len())
    }
}

/// `ceil(log2(count))`, with zero bits for zero or one choice.
pub fn bit_width_for(count: usize) -> u32 {
    if count <= 1 {
        0
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}
