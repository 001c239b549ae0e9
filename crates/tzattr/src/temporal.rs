//! # Time-Zone-Aware Converter
//!
//! [`TemporalConverter`] decorates a base converter so that every point in
//! time crossing an attribute boundary is expressed in the canonical zone.
//!
//! ## Read Path
//!
//! `from_storage` lets the inner converter cast the raw value, then shifts the
//! result with [`TemporalConverter::normalize_to_zone`]. Errors from the inner
//! converter propagate unchanged: a storage failure is not ours to interpret.
//!
//! ## Write Path
//!
//! `from_user_input` never fails for temporal input:
//!
//! 1. Sequences are cast element by element, keeping order and nesting.
//! 2. Zone-coercible input is read in the canonical zone. When that gives no
//!    answer (blank text) or fails to parse, the inner converter gets a try.
//!    If it fails too, the attribute becomes [`Value::Null`].
//! 3. Anything else follows the configured [`UntypedInputPolicy`].
//!
//! Everything the decorator does not handle itself is forwarded to the inner
//! converter verbatim.

use serde::{Deserialize, Serialize};

use crate::converter::{Converter, TypeTag};
use crate::error::Result;
use crate::value::{UserInput, Value};
use crate::zone::CanonicalZone;

/// What the decorator does with user input that has no time-zone reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UntypedInputPolicy {
    /// Hand the input to the inner converter, like reads do.
    #[default]
    Delegate,

    /// Discard the input: the attribute becomes [`Value::Null`].
    Drop,
}

/// Converter decorator normalizing points in time to the canonical zone.
#[derive(Debug)]
pub struct TemporalConverter {
    inner: Box<dyn Converter>,
    zone: CanonicalZone,
    untyped_input: UntypedInputPolicy,
}

impl TemporalConverter {
    pub fn new(
        inner: Box<dyn Converter>,
        zone: CanonicalZone,
        untyped_input: UntypedInputPolicy,
    ) -> Self {
        Self {
            inner,
            zone,
            untyped_input,
        }
    }

    /// The decorated converter.
    pub fn inner(&self) -> &dyn Converter {
        self.inner.as_ref()
    }

    pub fn zone(&self) -> CanonicalZone {
        self.zone
    }

    /// Shift points in time into the canonical zone.
    ///
    /// Sequences are normalized element-wise; dates, durations and
    /// non-temporal values pass through unchanged.
    pub fn normalize_to_zone(&self, value: Value) -> Value {
        match value {
            Value::Seq(items) => Value::Seq(
                items
                    .into_iter()
                    .map(|item| self.normalize_to_zone(item))
                    .collect(),
            ),
            value if value.acts_like_time() => value
                .as_datetime()
                .map_or(value, |dt| Value::DateTime(self.zone.to_canonical_zone(dt))),
            other => other,
        }
    }

    fn cast_in_zone(&self, input: UserInput) -> Value {
        match self.zone.coerce(&input) {
            Ok(Some(value)) => value,
            Ok(None) | Err(_) => self.inner.from_user_input(input).unwrap_or(Value::Null),
        }
    }
}

impl Converter for TemporalConverter {
    fn type_tag(&self) -> TypeTag {
        self.inner.type_tag()
    }

    fn from_storage(&self, raw: Value) -> Result<Value> {
        let value = self.inner.from_storage(raw)?;
        Ok(self.normalize_to_zone(value))
    }

    fn from_user_input(&self, input: UserInput) -> Result<Value> {
        match input {
            // An element that fails to cast becomes Null; its siblings are kept.
            UserInput::Seq(items) => Ok(Value::Seq(
                items
                    .into_iter()
                    .map(|item| self.from_user_input(item).unwrap_or(Value::Null))
                    .collect(),
            )),
            coercible if coercible.is_zone_coercible() => Ok(self.cast_in_zone(coercible)),
            other => match self.untyped_input {
                UntypedInputPolicy::Delegate => self.inner.from_user_input(other),
                UntypedInputPolicy::Drop => Ok(Value::Null),
            },
        }
    }

    fn to_storage(&self, value: &Value) -> Result<Value> {
        self.inner.to_storage(value)
    }
}
