//! Converter contract and base type tags.
//!
//! A converter casts one attribute's values between storage and the domain.
//! Concrete column types (integers, datetimes, ...) are supplied by the host;
//! this crate only decorates them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::value::{UserInput, Value};

/// Identifier of a base column type, before decoration.
///
/// Tags read from configuration that name no known type are kept as
/// [`TypeTag::Other`]: they are not an error, they simply never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    DateTime,

    /// Time of day with no date (legacy `time` columns).
    Time,
    Date,
    Integer,
    Float,
    Decimal,
    String,
    Boolean,
    Binary,

    /// Allow-list sentinel: the operator has not said whether bare `time`
    /// columns should be zone aware. Never the tag of a converter.
    NotExplicitlyConfigured,
    Other(std::string::String),
}

impl TypeTag {
    /// The configuration name of this tag.
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::DateTime => "datetime",
            TypeTag::Time => "time",
            TypeTag::Date => "date",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Decimal => "decimal",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Binary => "binary",
            TypeTag::NotExplicitlyConfigured => "not_explicitly_configured",
            TypeTag::Other(name) => name,
        }
    }

    /// Look up a tag by its configuration name.
    ///
    /// Names are trimmed and lowercased, unknown ones included.
    /// `unspecified` is accepted as an alias of `not_explicitly_configured`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "datetime" => TypeTag::DateTime,
            "time" => TypeTag::Time,
            "date" => TypeTag::Date,
            "integer" => TypeTag::Integer,
            "float" => TypeTag::Float,
            "decimal" => TypeTag::Decimal,
            "string" => TypeTag::String,
            "boolean" => TypeTag::Boolean,
            "binary" => TypeTag::Binary,
            "not_explicitly_configured" | "unspecified" => TypeTag::NotExplicitlyConfigured,
            _ => TypeTag::Other(name),
        }
    }
}

impl From<std::string::String> for TypeTag {
    fn from(name: std::string::String) -> Self {
        TypeTag::from_name(&name)
    }
}

impl From<TypeTag> for std::string::String {
    fn from(tag: TypeTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Casts attribute values of one column type.
///
/// Implementations must be pure functions of their input: the same converter
/// is shared by every read and write of the attribute it belongs to.
pub trait Converter: Send + Sync {
    /// Tag of the underlying column type.
    fn type_tag(&self) -> TypeTag;

    /// Cast a raw value read from storage into a domain value.
    fn from_storage(&self, raw: Value) -> Result<Value>;

    /// Cast a value assigned by a user into a domain value.
    ///
    /// Fails with [`crate::ConvertError::ValueFormat`] when the input cannot
    /// be read as this type.
    fn from_user_input(&self, input: UserInput) -> Result<Value>;

    /// Cast a domain value into its storage representation.
    fn to_storage(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }
}

impl fmt::Debug for dyn Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converter({})", self.type_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip_through_tags() {
        for name in [
            "datetime",
            "time",
            "date",
            "integer",
            "float",
            "decimal",
            "string",
            "boolean",
            "binary",
            "not_explicitly_configured",
        ] {
            assert_eq!(TypeTag::from_name(name).as_str(), name);
        }
    }

    #[test]
    fn unspecified_is_an_alias_for_the_sentinel() {
        assert_eq!(
            TypeTag::from_name("unspecified"),
            TypeTag::NotExplicitlyConfigured
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(TypeTag::from_name(" DateTime "), TypeTag::DateTime);
    }

    #[test]
    fn unknown_names_are_kept() {
        let tag = TypeTag::from_name("timestamptz");
        assert_eq!(tag, TypeTag::Other("timestamptz".into()));
        assert_eq!(tag.to_string(), "timestamptz");
    }

    #[test]
    fn unknown_names_are_normalized() {
        let tag = TypeTag::from_name(" Money ");
        assert_eq!(tag, TypeTag::Other("money".into()));
        assert_eq!(tag.as_str(), "money");
        assert_eq!(tag, TypeTag::from_name("money"));
    }

    #[test]
    fn tags_deserialize_from_strings() {
        let tags: Vec<TypeTag> = serde_json::from_str(r#"["datetime", "time", "money"]"#).unwrap();
        assert_eq!(
            tags,
            vec![
                TypeTag::DateTime,
                TypeTag::Time,
                TypeTag::Other("money".into())
            ]
        );
        assert_eq!(
            serde_json::to_string(&TypeTag::NotExplicitlyConfigured).unwrap(),
            "\"not_explicitly_configured\""
        );
    }
}
