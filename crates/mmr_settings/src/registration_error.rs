use crate::value::ValueType;
use thiserror::Error;

/// Errors that can occur while registering a setting with the registry.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("setting '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("setting '{name}' holds {expected} values but its default is a {actual}")]
    DefaultTypeMismatch {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },

    #[error("default '{default}' of setting '{name}' is not one of its choices")]
    DefaultNotInChoices { name: String, default: String },

    #[error("setting '{name}' needs at least {required} bits but declares {declared}")]
    BitWidthTooSmall {
        name: String,
        required: u32,
        declared: u32,
    },
}
