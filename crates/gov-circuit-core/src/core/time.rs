// gov-circuit-core/src/core/time.rs
// ============================================================================
// Module: Circuit Time Model
// Description: UTC timestamp representation with microsecond precision.
// Purpose: Provide the ISO-8601 timestamp required on every artifact.
// Dependencies: time, serde
// ============================================================================

//! ## Overview
//! The circuit never reads wall-clock time on its own; every stage entry
//! point accepts a [`Timestamp`] supplied by the caller, keeping replay
//! deterministic. `Timestamp` serializes as an RFC-3339
//! string truncated to microsecond precision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as DeError;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// UTC timestamp with microsecond precision.
///
/// # Invariants
/// - Always expressed in UTC; callers are responsible for conversion.
/// - Serializes as RFC-3339 with exactly six fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Wraps an [`OffsetDateTime`], normalizing it to UTC.
    #[must_use]
    pub fn new(at: OffsetDateTime) -> Self {
        Self(at.to_offset(time::UtcOffset::UTC))
    }

    /// Returns the wrapped [`OffsetDateTime`].
    #[must_use]
    pub const fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }

    /// Parses a timestamp from an RFC-3339 string.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is not valid RFC-3339.
    pub fn parse(value: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(value, &Rfc3339).map(Self::new)
    }

    /// Returns true when `self` is strictly after `other`.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_microseconds(self.0).map_err(|_| fmt::Error)?)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted =
            format_microseconds(self.0).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(DeError::custom)
    }
}

/// Formats an [`OffsetDateTime`] as RFC-3339 with microsecond precision.
fn format_microseconds(at: OffsetDateTime) -> Result<String, time::error::Format> {
    let at = at.to_offset(time::UtcOffset::UTC);
    let micros = at.microsecond();
    let base = at.format(&Rfc3339)?;
    // `Rfc3339` formats nanosecond-level values using whatever precision the
    // value carries; force microsecond precision explicitly so byte-identical
    // circuits always emit the same width.
    let without_fraction = base.split('.').next().unwrap_or(&base);
    let without_fraction = without_fraction.trim_end_matches('Z');
    Ok(format!("{without_fraction}.{micros:06}Z"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use time::macros::datetime;

    use super::Timestamp;

    #[test]
    fn formats_with_microsecond_precision() {
        let at = Timestamp::new(datetime!(2026-07-28 12:00:00.123456 UTC));
        assert_eq!(at.to_string(), "2026-07-28T12:00:00.123456Z");
    }

    #[test]
    fn round_trips_through_parse() {
        let at = Timestamp::new(datetime!(2026-01-01 00:00:00.0 UTC));
        let parsed = Timestamp::parse(&at.to_string()).unwrap();
        assert_eq!(at, parsed);
    }

    #[test]
    fn orders_chronologically() {
        let earlier = Timestamp::new(datetime!(2026-01-01 00:00:00 UTC));
        let later = Timestamp::new(datetime!(2026-01-02 00:00:00 UTC));
        assert!(later.is_after(&earlier));
        assert!(!earlier.is_after(&later));
    }
}
