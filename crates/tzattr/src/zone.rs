//! # Canonical Zone
//!
//! Every point in time that passes through a time-zone-aware attribute is
//! expressed in one process-wide zone, the canonical zone. This module owns
//! the two primitives the converters need:
//!
//! - [`CanonicalZone::to_canonical_zone`]: re-express an instant in the zone.
//!   The instant itself never changes.
//! - [`CanonicalZone::coerce`]: read user input in the zone. Text carrying an
//!   explicit offset keeps its instant; offset-less text is wall-clock time in
//!   the canonical zone.
//!
//! Zones are fixed UTC offsets. There is no zone database, so daylight saving
//! rules are the caller's concern.
//!
//! ## Accepted Text
//!
//! | Shape | Reading |
//! |-------|---------|
//! | `2024-03-01T10:00:00+02:00`, `...Z` | RFC 3339, instant kept |
//! | `2024-03-01 10:00:00 +02:00`, `... +0200`, `... UTC` | instant kept |
//! | `2024-03-01 10:00[:00[.123]]`, `T` separator too | wall clock in zone |
//! | `2024-03-01` | midnight in zone |
//! | blank | no interpretation |

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

use crate::error::{ConfigError, ConvertError, Result};
use crate::value::{UserInput, Value};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const EXPECTED: &str = "a date or time in a recognizable format";

/// The zone all point-in-time attribute values are normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalZone(FixedOffset);

impl Default for CanonicalZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl CanonicalZone {
    pub fn utc() -> Self {
        CanonicalZone(Utc.fix())
    }

    /// Parse a zone name from configuration: `UTC`, `Z` or `±HH:MM` / `±HHMM` / `±HH`.
    pub fn parse(name: &str) -> std::result::Result<Self, ConfigError> {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::utc());
        }
        parse_offset(trimmed)
            .map(CanonicalZone)
            .ok_or_else(|| ConfigError::InvalidZone(name.to_string()))
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Re-express an instant in this zone.
    ///
    /// Idempotent: a value already in the zone comes back unchanged.
    pub fn to_canonical_zone(&self, instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.0)
    }

    /// Midnight at the start of `date`, wall clock in this zone.
    pub fn midnight(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>> {
        self.localize(date.and_time(NaiveTime::MIN))
    }

    /// Read a zone-coercible input as a point in time in this zone.
    ///
    /// Returns `Ok(None)` when the input has no zoned interpretation (blank
    /// text, or input that is not zone-coercible at all). Durations are never
    /// points in time and fail with [`ConvertError::ValueFormat`].
    pub fn coerce(&self, input: &UserInput) -> Result<Option<Value>> {
        match input {
            UserInput::DateTime(dt) => Ok(Some(Value::DateTime(self.to_canonical_zone(*dt)))),
            UserInput::Date(date) => self.midnight(*date).map(|dt| Some(Value::DateTime(dt))),
            UserInput::Duration(d) => Err(ConvertError::value_format(
                d.to_string(),
                "a point in time, not a duration",
            )),
            UserInput::ZonedString(text) => Ok(self.parse_in_zone(text)?.map(Value::DateTime)),
            UserInput::Seq(_) | UserInput::Other(_) => Ok(None),
        }
    }

    /// Parse text as a point in time expressed in this zone.
    pub fn parse_in_zone(&self, text: &str) -> Result<Option<DateTime<FixedOffset>>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Some(self.to_canonical_zone(dt)));
        }

        let with_utc_suffix = text
            .strip_suffix(" UTC")
            .map(|rest| format!("{} +00:00", rest.trim_end()));
        let offset_text = with_utc_suffix.as_deref().unwrap_or(text);
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(offset_text, format) {
                return Ok(Some(self.to_canonical_zone(dt)));
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return self.localize(naive).map(Some);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return self.midnight(date).map(Some);
        }

        Err(ConvertError::value_format(text, EXPECTED))
    }

    fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
        naive
            .and_local_timezone(self.0)
            .single()
            .ok_or_else(|| ConvertError::value_format(naive.to_string(), EXPECTED))
    }
}

impl fmt::Display for CanonicalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.local_minus_utc() == 0 {
            write!(f, "UTC")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let sign = match text.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &text[1..];
    if !rest.is_ascii() {
        return None;
    }
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
