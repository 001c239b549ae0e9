//! Attribute value types.
//!
//! [`Value`] is what converters hand back: both the raw representation read
//! from storage and the cast domain value. [`UserInput`] is what callers hand
//! in on write. Its variants are decided by the adapter layer before any
//! converter runs, so no converter has to probe a value to find out whether it
//! has a time-zone interpretation.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (SQL `NULL`, unparsable input).
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),

    /// A point in time with the offset it is expressed in.
    DateTime(DateTime<FixedOffset>),

    /// A calendar date with no time of day.
    Date(NaiveDate),

    /// An elapsed amount of time.
    Duration(TimeDelta),

    /// Ordered sequence of values (array columns).
    Seq(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value is a point in time.
    ///
    /// Dates and durations are temporal but have no instant, so they are not
    /// shifted between zones.
    pub fn acts_like_time(&self) -> bool {
        matches!(self, Value::DateTime(_))
    }

    /// Get the point in time if this is a DateTime.
    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get the string if this is Text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the elements if this is a Seq.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Duration(_) => "duration",
            Value::Seq(_) => "sequence",
        }
    }
}

/// Value supplied by a user when assigning an attribute.
///
/// Everything except [`UserInput::Seq`] and [`UserInput::Other`] has a
/// time-zone interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum UserInput {
    Seq(Vec<UserInput>),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Duration(TimeDelta),

    /// Free-form text that may name a point in time, with or without an offset.
    ZonedString(String),

    /// Anything with no time-zone interpretation.
    Other(Value),
}

impl UserInput {
    /// Whether this input belongs to the family of values that can be read in
    /// a time zone.
    pub fn is_zone_coercible(&self) -> bool {
        matches!(
            self,
            UserInput::DateTime(_)
                | UserInput::Date(_)
                | UserInput::Duration(_)
                | UserInput::ZonedString(_)
        )
    }

    /// Classify form input decoded from JSON.
    ///
    /// Strings become [`UserInput::ZonedString`], arrays become sequences and
    /// every other JSON value lands in [`UserInput::Other`]. Objects are kept
    /// as their JSON text.
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => UserInput::Other(Value::Null),
            Json::Bool(b) => UserInput::Other(Value::Bool(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => UserInput::Other(Value::Integer(i)),
                None => UserInput::Other(n.as_f64().map_or(Value::Null, Value::Float)),
            },
            Json::String(s) => UserInput::ZonedString(s),
            Json::Array(items) => UserInput::Seq(items.into_iter().map(Self::from_json).collect()),
            obj @ Json::Object(_) => UserInput::Other(Value::Text(obj.to_string())),
        }
    }

    /// Lossless view of this input as a plain [`Value`].
    ///
    /// Base converters use this to get at the payload without caring about
    /// the zone classification.
    pub fn into_value(self) -> Value {
        match self {
            UserInput::Seq(items) => Value::Seq(items.into_iter().map(Self::into_value).collect()),
            UserInput::DateTime(dt) => Value::DateTime(dt),
            UserInput::Date(d) => Value::Date(d),
            UserInput::Duration(d) => Value::Duration(d),
            UserInput::ZonedString(s) => Value::Text(s),
            UserInput::Other(v) => v,
        }
    }
}

impl From<Value> for UserInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Seq(items) => UserInput::Seq(items.into_iter().map(UserInput::from).collect()),
            Value::DateTime(dt) => UserInput::DateTime(dt),
            Value::Date(d) => UserInput::Date(d),
            Value::Duration(d) => UserInput::Duration(d),
            Value::Text(s) => UserInput::ZonedString(s),
            other => UserInput::Other(other),
        }
    }
}

impl From<&str> for UserInput {
    fn from(s: &str) -> Self {
        UserInput::ZonedString(s.to_string())
    }
}
