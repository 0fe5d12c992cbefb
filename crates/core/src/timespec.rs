use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::instant::VirtualInstant;
use crate::values::EpochSeconds;

/// The accepted ways of naming an absolute instant when freezing a clock
///
/// - `Iso8601`: textual representation, with or without an explicit zone
///   offset (`"2024-01-15T12:00:00+00:00"`, `"2024-01-15T12:00:00"`,
///   `"2024-01-15"`)
/// - `Epoch`: seconds since the Unix epoch, implicitly UTC
/// - `Instant`: an already-constructed instant, zoned or floating
///
/// `From` conversions let callers pass any of these forms directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimeSpec {
    Iso8601(String),
    Epoch(EpochSeconds),
    Instant(VirtualInstant),
}

impl From<&str> for TimeSpec {
    fn from(text: &str) -> Self {
        Self::Iso8601(text.to_owned())
    }
}

impl From<String> for TimeSpec {
    fn from(text: String) -> Self {
        Self::Iso8601(text)
    }
}

impl From<f64> for TimeSpec {
    fn from(secs: f64) -> Self {
        Self::Epoch(secs)
    }
}

impl From<VirtualInstant> for TimeSpec {
    fn from(instant: VirtualInstant) -> Self {
        Self::Instant(instant)
    }
}

impl From<DateTime<Utc>> for TimeSpec {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt.into())
    }
}

impl From<DateTime<FixedOffset>> for TimeSpec {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Instant(dt.into())
    }
}

impl From<NaiveDateTime> for TimeSpec {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Instant(naive.into())
    }
}
