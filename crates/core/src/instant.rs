use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{EpochSeconds, ZoneOffset};

/// An absolute point in time that may or may not carry a zone offset
///
/// Virtual time deals in two kinds of instants:
/// - `Zoned`: date + time + a fixed UTC offset. Comparable and convertible
///   across zones.
/// - `Floating`: date + time with no zone information. A floating instant is
///   returned exactly as stored; when an epoch value is required it is
///   interpreted in the system local zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VirtualInstant {
    /// Instant with an attached fixed offset from UTC
    Zoned(DateTime<FixedOffset>),
    /// Instant without zone information
    Floating(NaiveDateTime),
}

impl VirtualInstant {
    /// Get this instant as fractional seconds since the Unix epoch
    ///
    /// Floating instants are read in the system local zone. Wall times
    /// skipped by a DST gap have no local reading and are taken as UTC;
    /// wall times repeated by a DST fold take the earlier reading.
    pub fn epoch_seconds(&self) -> EpochSeconds {
        let micros = match self {
            Self::Zoned(dt) => dt.timestamp_micros(),
            Self::Floating(naive) => match Local.from_local_datetime(naive) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp_micros(),
                LocalResult::None => Utc.from_utc_datetime(naive).timestamp_micros(),
            },
        };
        micros as EpochSeconds / 1e6
    }

    /// Convert to the given zone
    ///
    /// Only zoned instants convert; a floating instant has no zone to convert
    /// from and is returned unchanged.
    pub fn in_zone(&self, zone: ZoneOffset) -> Self {
        match self {
            Self::Zoned(dt) => Self::Zoned(dt.with_timezone(&zone)),
            Self::Floating(naive) => Self::Floating(*naive),
        }
    }

    /// Shift this instant by a fractional number of seconds
    ///
    /// Carried at microsecond resolution. Shifts past the representable
    /// date range saturate at the range boundary.
    pub fn shifted_by(&self, seconds: f64) -> Self {
        let delta = Duration::microseconds((seconds * 1e6).round() as i64);
        match self {
            Self::Zoned(dt) => Self::Zoned(dt.checked_add_signed(delta).unwrap_or_else(|| {
                let bound = if seconds >= 0.0 {
                    DateTime::<Utc>::MAX_UTC
                } else {
                    DateTime::<Utc>::MIN_UTC
                };
                bound.with_timezone(dt.offset())
            })),
            Self::Floating(naive) => {
                Self::Floating(naive.checked_add_signed(delta).unwrap_or(if seconds >= 0.0 {
                    NaiveDateTime::MAX
                } else {
                    NaiveDateTime::MIN
                }))
            }
        }
    }

    /// Build the instant `secs` after the Unix epoch
    ///
    /// Zoned in `zone` when one is given, otherwise floating in the system
    /// local zone. Values outside the representable range saturate.
    pub fn from_epoch(secs: EpochSeconds, zone: Option<ZoneOffset>) -> Self {
        let utc = epoch_to_utc(secs);
        match zone {
            Some(zone) => Self::Zoned(utc.with_timezone(&zone)),
            None => Self::Floating(utc.with_timezone(&Local).naive_local()),
        }
    }

    /// The attached zone offset, if any
    pub fn zone(&self) -> Option<ZoneOffset> {
        match self {
            Self::Zoned(dt) => Some(*dt.offset()),
            Self::Floating(_) => None,
        }
    }
}

fn epoch_to_utc(secs: EpochSeconds) -> DateTime<Utc> {
    let micros = (secs * 1e6).round();
    if micros >= i64::MAX as f64 {
        return DateTime::<Utc>::MAX_UTC;
    }
    if micros <= i64::MIN as f64 {
        return DateTime::<Utc>::MIN_UTC;
    }
    DateTime::from_timestamp_micros(micros as i64).unwrap_or(if secs >= 0.0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

impl fmt::Display for VirtualInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zoned(dt) => fmt::Display::fmt(dt, f),
            Self::Floating(naive) => fmt::Display::fmt(naive, f),
        }
    }
}

impl From<DateTime<Utc>> for VirtualInstant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Zoned(dt.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for VirtualInstant {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Zoned(dt)
    }
}

impl From<NaiveDateTime> for VirtualInstant {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Floating(naive)
    }
}
