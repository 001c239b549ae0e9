#![allow(dead_code)]

use chrono::{DateTime, NaiveDateTime};
use tzattr::{ConvertError, Converter, TypeTag, UserInput, Value};

/// `datetime` column storing UTC text.
pub struct DateTimeColumn;

impl DateTimeColumn {
    fn parse(text: &str) -> Result<Value, ConvertError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Value::DateTime(dt));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .map(|naive| Value::DateTime(naive.and_utc().fixed_offset()))
            .map_err(|_| ConvertError::value_format(text, "a datetime"))
    }
}

impl Converter for DateTimeColumn {
    fn type_tag(&self) -> TypeTag {
        TypeTag::DateTime
    }

    fn from_storage(&self, raw: Value) -> Result<Value, ConvertError> {
        match raw {
            Value::Text(text) => Self::parse(&text),
            other => Ok(other),
        }
    }

    fn from_user_input(&self, input: UserInput) -> Result<Value, ConvertError> {
        match input.into_value() {
            Value::Text(text) => Self::parse(&text),
            v @ (Value::Null | Value::DateTime(_)) => Ok(v),
            other => Err(ConvertError::value_format(other.kind_name(), "a datetime")),
        }
    }
}

/// `integer` column.
pub struct IntegerColumn;

impl Converter for IntegerColumn {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Integer
    }

    fn from_storage(&self, raw: Value) -> Result<Value, ConvertError> {
        Ok(raw)
    }

    fn from_user_input(&self, input: UserInput) -> Result<Value, ConvertError> {
        match input.into_value() {
            Value::Text(text) => text
                .trim()
                .parse()
                .map(Value::Integer)
                .map_err(|_| ConvertError::value_format(text.as_str(), "an integer")),
            other => Ok(other),
        }
    }
}

pub fn columns() -> Vec<(&'static str, Box<dyn Converter>)> {
    vec![
        ("started_at", Box::new(DateTimeColumn) as Box<dyn Converter>),
        ("created_at", Box::new(DateTimeColumn)),
        ("attempts", Box::new(IntegerColumn)),
    ]
}
