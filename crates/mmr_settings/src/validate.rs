//! Raw and typed value validation

use crate::choice::ChoiceSet;
use crate::descriptor::{Constraint, SettingDescriptor};
use crate::error::SettingsError;
use crate::value::{SettingValue, ValueType};

const TRUE_TOKENS: [&str; 5] = ["yes", "true", "t", "y", "1"];
const FALSE_TOKENS: [&str; 5] = ["no", "false", "f", "n", "0"];

/// Placeholder entry of color palettes; a concrete custom color has to be
/// spelled out as `Custom (#RRGGBB)`.
pub const CUSTOM_COLOR_PLACEHOLDER: &str = "Custom Color";

/// Case-insensitive boolean literal.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let token = raw.to_ascii_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Six hex digits of a `Custom (#RRGGBB)` value.
pub fn parse_custom_color(raw: &str) -> Option<&str> {
    let hex = raw.strip_prefix("Custom (#")?.strip_suffix(')')?;
    (hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())).then_some(hex)
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit())
}

impl SettingDescriptor {
    /// Parse a raw value into a typed one.
    ///
    /// Item lists are comma separated and come back in table order without
    /// duplicates. Custom colors come back as their six hex digits.
    pub fn validate(&self, raw: &str) -> Result<SettingValue, SettingsError> {
        match self.constraint() {
            Constraint::Boolean => parse_bool(raw)
                .map(SettingValue::Bool)
                .ok_or_else(|| SettingsError::InvalidBoolean {
                    name: self.name().to_string(),
                    value: raw.to_string(),
                }),
            Constraint::Member => self
                .choice_set()
                .find_raw(raw)
                .cloned()
                .ok_or_else(|| self.invalid_choice(raw)),
            Constraint::Grid { min, max, step } => {
                let value = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| self.out_of_range(raw, *min, *max, *step))?;
                self.check_grid(value, *min, *max, *step)?;
                Ok(SettingValue::Int(value))
            }
            Constraint::Bounded { min, max } => {
                let value = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| self.out_of_range(raw, *min, *max, 1))?;
                self.check_grid(value, *min, *max, 1)?;
                Ok(SettingValue::Int(value))
            }
            Constraint::Color => {
                if raw == CUSTOM_COLOR_PLACEHOLDER {
                    return Err(self.invalid_choice(raw));
                }
                if let Some(hex) = parse_custom_color(raw) {
                    return Ok(SettingValue::Str(hex.to_string()));
                }
                if self.choice_set().contains(&SettingValue::Str(raw.to_string())) {
                    return Ok(SettingValue::Str(raw.to_string()));
                }
                Err(self.invalid_choice(raw))
            }
            Constraint::Items => self
                .canonical_items(raw.split(',').map(str::trim).filter(|item| !item.is_empty()))
                .map(SettingValue::List),
            Constraint::Free => match self.value_type() {
                ValueType::Int => raw
                    .trim()
                    .parse::<i64>()
                    .map(SettingValue::Int)
                    .map_err(|_| self.type_mismatch(raw)),
                ValueType::Bool => parse_bool(raw).map(SettingValue::Bool).ok_or_else(|| {
                    SettingsError::InvalidBoolean {
                        name: self.name().to_string(),
                        value: raw.to_string(),
                    }
                }),
                ValueType::List => Ok(SettingValue::List(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect(),
                )),
                ValueType::Str => Ok(SettingValue::Str(raw.to_string())),
            },
        }
    }

    /// Canonicalize a typed value and check it.
    ///
    /// Item lists are put in table order without repeats; every other value
    /// passes through unchanged.
    pub fn normalize(&self, value: &SettingValue) -> Result<SettingValue, SettingsError> {
        let normalized = match (self.constraint(), value) {
            (Constraint::Items, SettingValue::List(items)) => {
                SettingValue::List(self.canonical_items(items.iter().map(String::as_str))?)
            }
            _ => value.clone(),
        };
        self.check(&normalized)?;
        Ok(normalized)
    }

    /// Check an already typed value (settings files, encoder input).
    ///
    /// Item lists must already be canonical, see [`Self::normalize`].
    pub fn check(&self, value: &SettingValue) -> Result<(), SettingsError> {
        if value.value_type() != self.value_type() {
            return Err(self.type_mismatch(&value.to_string()));
        }
        match self.constraint() {
            Constraint::Free => Ok(()),
            // flags carry no choice set
            Constraint::Boolean if self.choices().is_none() => Ok(()),
            Constraint::Boolean | Constraint::Member => {
                if self.choice_set().contains(value) {
                    Ok(())
                } else {
                    Err(self.invalid_choice(&value.to_string()))
                }
            }
            Constraint::Grid { min, max, step } => {
                let number = value.as_int().unwrap_or_default();
                self.check_grid(number, *min, *max, *step)
            }
            Constraint::Bounded { min, max } => {
                let number = value.as_int().unwrap_or_default();
                self.check_grid(number, *min, *max, 1)
            }
            Constraint::Color => {
                let color = value.as_str().unwrap_or_default();
                if color != CUSTOM_COLOR_PLACEHOLDER
                    && (is_hex_color(color) || self.choice_set().contains(value))
                {
                    Ok(())
                } else {
                    Err(self.invalid_choice(color))
                }
            }
            Constraint::Items => {
                let choices = self.choice_set();
                let items = value.as_list().unwrap_or_default();
                let mut previous = None;
                for item in items {
                    let index = choices
                        .index_of(&SettingValue::Str(item.clone()))
                        .ok_or_else(|| self.invalid_choice(item))?;
                    if previous.is_some_and(|previous| index <= previous) {
                        return Err(SettingsError::UnorderedList {
                            name: self.name().to_string(),
                            value: items.join(","),
                        });
                    }
                    previous = Some(index);
                }
                Ok(())
            }
        }
    }

    /// Table order, repeats dropped. Unknown items are rejected.
    fn canonical_items<'a, I>(&self, items: I) -> Result<Vec<String>, SettingsError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let choices = self.choice_set();
        let mut indexes = Vec::new();
        for item in items {
            let index = choices
                .index_of(&SettingValue::Str(item.to_string()))
                .ok_or_else(|| self.invalid_choice(item))?;
            indexes.push(index);
        }
        indexes.sort_unstable();
        indexes.dedup();
        Ok(indexes
            .into_iter()
            .filter_map(|index| choices.key_at(index))
            .map(|key| key.to_string())
            .collect())
    }

    fn choice_set(&self) -> &ChoiceSet {
        static EMPTY: ChoiceSet = ChoiceSet::EMPTY;
        self.choices().unwrap_or(&EMPTY)
    }

    fn check_grid(&self, value: i64, min: i64, max: i64, step: i64) -> Result<(), SettingsError> {
        if value < min || value > max {
            return Err(self.out_of_range(&value.to_string(), min, max, step));
        }
        // widened so `value - min` cannot overflow
        let offset = i128::from(value) - i128::from(min);
        let on_grid = step > 0 && offset % i128::from(step) == 0;
        if !on_grid {
            return Err(self.out_of_range(&value.to_string(), min, max, step));
        }
        Ok(())
    }

    fn invalid_choice(&self, raw: &str) -> SettingsError {
        SettingsError::InvalidChoice {
            name: self.name().to_string(),
            value: raw.to_string(),
        }
    }

    fn out_of_range(&self, raw: &str, min: i64, max: i64, step: i64) -> SettingsError {
        SettingsError::OutOfRange {
            name: self.name().to_string(),
            value: raw.to_string(),
            min,
            max,
            step,
        }
    }

    fn type_mismatch(&self, raw: &str) -> SettingsError {
        SettingsError::TypeMismatch {
            name: self.name().to_string(),
            expected: self.value_type(),
            value: raw.to_string(),
        }
    }
}
