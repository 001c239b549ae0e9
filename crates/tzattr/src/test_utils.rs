//! Minimal base converters standing in for host column types in tests.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::converter::{Converter, TypeTag};
use crate::error::{ConvertError, Result};
use crate::value::{UserInput, Value};

/// `datetime` column storing UTC text like `2024-03-01 08:00:00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeCast;

impl DateTimeCast {
    fn parse(text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Value::DateTime(dt));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
            .map(|naive| Value::DateTime(naive.and_utc().fixed_offset()))
            .map_err(|_| ConvertError::value_format(text, "a datetime"))
    }
}

impl Converter for DateTimeCast {
    fn type_tag(&self) -> TypeTag {
        TypeTag::DateTime
    }

    fn from_storage(&self, raw: Value) -> Result<Value> {
        match raw {
            Value::Text(text) => Self::parse(&text),
            v @ (Value::Null | Value::DateTime(_)) => Ok(v),
            other => Err(ConvertError::value_format(other.kind_name(), "a datetime")),
        }
    }

    fn from_user_input(&self, input: UserInput) -> Result<Value> {
        match input.into_value() {
            Value::Text(text) => Self::parse(&text),
            Value::Date(date) => Ok(Value::DateTime(
                date.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
            )),
            v @ (Value::Null | Value::DateTime(_)) => Ok(v),
            other => Err(ConvertError::value_format(other.kind_name(), "a datetime")),
        }
    }

    fn to_storage(&self, value: &Value) -> Result<Value> {
        match value {
            Value::DateTime(dt) => Ok(Value::Text(
                dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            )),
            other => Ok(other.clone()),
        }
    }
}

/// Legacy `time` column: times of day anchored on 2000-01-01 UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCast;

impl TimeCast {
    fn anchor(time: NaiveTime) -> Value {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid anchor date");
        Value::DateTime(date.and_time(time).and_utc().fixed_offset())
    }

    fn parse(text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map(Self::anchor)
            .map_err(|_| ConvertError::value_format(text, "a time of day"))
    }

    fn re_anchor(dt: DateTime<FixedOffset>) -> Value {
        Self::anchor(dt.with_timezone(&Utc).time())
    }
}

impl Converter for TimeCast {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Time
    }

    fn from_storage(&self, raw: Value) -> Result<Value> {
        match raw {
            Value::Text(text) => Self::parse(&text),
            Value::DateTime(dt) => Ok(Self::re_anchor(dt)),
            Value::Null => Ok(Value::Null),
            other => Err(ConvertError::value_format(other.kind_name(), "a time of day")),
        }
    }

    fn from_user_input(&self, input: UserInput) -> Result<Value> {
        self.from_storage(input.into_value())
    }
}

/// `integer` column. Durations cast to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerCast;

impl Converter for IntegerCast {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Integer
    }

    fn from_storage(&self, raw: Value) -> Result<Value> {
        match raw {
            Value::Text(text) => text
                .trim()
                .parse()
                .map(Value::Integer)
                .map_err(|_| ConvertError::value_format(text, "an integer")),
            v @ (Value::Null | Value::Integer(_)) => Ok(v),
            other => Err(ConvertError::value_format(other.kind_name(), "an integer")),
        }
    }

    fn from_user_input(&self, input: UserInput) -> Result<Value> {
        match input.into_value() {
            Value::Duration(d) => Ok(Value::Integer(d.num_seconds())),
            other => self.from_storage(other),
        }
    }
}

/// Converter whose storage layer always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStorage;

impl Converter for FailingStorage {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Binary
    }

    fn from_storage(&self, _raw: Value) -> Result<Value> {
        Err(ConvertError::Storage("disk on fire".to_string()))
    }

    fn from_user_input(&self, input: UserInput) -> Result<Value> {
        Ok(input.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_cast_reads_storage_text_as_utc() {
        let value = DateTimeCast
            .from_storage(Value::Text("2024-03-01 08:00:00".into()))
            .unwrap();
        assert_eq!(
            value.as_datetime().unwrap().to_rfc3339(),
            "2024-03-01T08:00:00+00:00"
        );
    }

    #[test]
    fn time_cast_anchors_on_2000_01_01() {
        let value = TimeCast.from_user_input("10:30".into()).unwrap();
        assert_eq!(
            value.as_datetime().unwrap().to_rfc3339(),
            "2000-01-01T10:30:00+00:00"
        );
    }

    #[test]
    fn integer_cast_rejects_text() {
        assert!(IntegerCast
            .from_user_input("ten".into())
            .unwrap_err()
            .is_value_format());
    }
}
