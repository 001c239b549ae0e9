use thiserror::Error;

use crate::model::ClassId;

/// Failures raised while casting a single value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Invalid value {input:?}: expected {expected}")]
    ValueFormat { input: String, expected: &'static str },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ConvertError {
    pub fn value_format(input: impl Into<String>, expected: &'static str) -> Self {
        ConvertError::ValueFormat {
            input: input.into(),
            expected,
        }
    }

    pub fn is_value_format(&self) -> bool {
        matches!(self, ConvertError::ValueFormat { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Load(#[from] confique::Error),

    #[error("Invalid time zone {0:?}: expected UTC, Z or an offset like +02:00")]
    InvalidZone(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown class: {0}")]
    UnknownClass(ClassId),

    #[error("Unknown attribute {attribute:?} on class {class}")]
    UnknownAttribute { class: ClassId, attribute: String },
}

/// Failures of attribute-level casts on a model class.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CastError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
