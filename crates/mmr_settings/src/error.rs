use crate::value::ValueType;
use thiserror::Error;

/// Errors raised while looking up, validating, encoding or decoding settings.
///
/// Every variant names the offending setting (and raw value where there is
/// one) so callers can report it and reject the input as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown setting '{name}'")]
    UnknownSetting { name: String },

    #[error("invalid choice '{value}' for setting '{name}'")]
    InvalidChoice { name: String, value: String },

    #[error("setting '{name}' expects a boolean value, got '{value}'")]
    InvalidBoolean { name: String, value: String },

    #[error("value '{value}' for setting '{name}' is outside {min}..={max} (step {step})")]
    OutOfRange {
        name: String,
        value: String,
        min: i64,
        max: i64,
        step: i64,
    },

    #[error("settings bits do not match the schema at setting '{name}': {reason}")]
    SchemaMismatch { name: String, reason: MismatchReason },

    #[error("setting '{name}' holds {expected} values, got '{value}'")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        value: String,
    },

    #[error("items of setting '{name}' must follow table order without repeats, got '{value}'")]
    UnorderedList { name: String, value: String },

    #[error("settings were encoded with schema version {found}, expected {expected}")]
    SchemaVersion { expected: u32, found: u32 },

    #[error("invalid character '{character}' in settings string")]
    InvalidCharacter { character: char },
}

/// Why a bit string could not be decoded against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchReason {
    #[error("needed {needed} more bits but only {available} remain")]
    Truncated { needed: u32, available: usize },

    #[error("index {index} is out of range for {choices} choices")]
    IndexOutOfRange { index: u64, choices: usize },

    #[error("decoded value {value} is outside the allowed range")]
    ValueOutOfRange { value: i64 },
}
