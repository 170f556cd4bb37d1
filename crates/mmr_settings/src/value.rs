//! Typed setting values

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of value a setting holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int,
    Str,
    List,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "boolean",
            ValueType::Int => "integer",
            ValueType::Str => "string",
            ValueType::List => "list",
        };
        f.write_str(name)
    }
}

/// A concrete setting value.
///
/// Serialized untagged, so an assignment reads as plain JSON:
/// `{"moon": "open", "trials": 3, "fast_chests": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl SettingValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            SettingValue::Bool(_) => ValueType::Bool,
            SettingValue::Int(_) => ValueType::Int,
            SettingValue::Str(_) => ValueType::Str,
            SettingValue::List(_) => ValueType::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Textual form used to match raw CLI input against choice keys.
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(value) => write!(f, "{value}"),
            SettingValue::Int(value) => write!(f, "{value}"),
            SettingValue::Str(value) => f.write_str(value),
            SettingValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Str(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Str(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(items: Vec<String>) -> Self {
        SettingValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_json() {
        let values: Vec<SettingValue> =
            serde_json::from_str(r#"[true, 4, "open", ["a", "b"]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SettingValue::Bool(true),
                SettingValue::Int(4),
                SettingValue::from("open"),
                SettingValue::List(vec!["a".into(), "b".into()]),
            ]
        );
        assert_eq!(serde_json::to_string(&SettingValue::Int(15)).unwrap(), "15");
    }

    #[test]
    fn test_display_matches_raw_form() {
        assert_eq!(SettingValue::Bool(false).to_string(), "false");
        assert_eq!(SettingValue::Int(20).to_string(), "20");
        assert_eq!(SettingValue::List(vec!["x".into(), "y".into()]).to_string(), "x,y");
    }
}
