use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use kronos_core::{TimeSpec, VirtualInstant};
use kronos_ports::{ClockError, ClockResult};

/// Normalize a freeze input to an absolute instant
///
/// Runs before any engine state is touched, so a bad input mutates nothing.
pub(crate) fn resolve(spec: TimeSpec) -> ClockResult<VirtualInstant> {
    match spec {
        TimeSpec::Instant(instant) => Ok(instant),
        TimeSpec::Epoch(secs) => epoch_instant(secs),
        TimeSpec::Iso8601(text) => parse_iso8601(&text),
    }
}

/// A numeric epoch value is an absolute UTC instant
fn epoch_instant(secs: f64) -> ClockResult<VirtualInstant> {
    let micros = (secs * 1e6).round();
    if !micros.is_finite() || micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return Err(ClockError::EpochOutOfRange(secs));
    }
    DateTime::from_timestamp_micros(micros as i64)
        .map(|dt| VirtualInstant::Zoned(dt.fixed_offset()))
        .ok_or(ClockError::EpochOutOfRange(secs))
}

/// Accepted textual forms: RFC 3339 with an offset, `YYYY-MM-DDTHH:MM:SS[.frac]`
/// without one, and a bare `YYYY-MM-DD` date taken at midnight
fn parse_iso8601(text: &str) -> ClockResult<VirtualInstant> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(VirtualInstant::Zoned(dt));
    }
    if let Ok(naive) = text.parse::<NaiveDateTime>() {
        return Ok(VirtualInstant::Floating(naive));
    }
    if let Ok(date) = text.parse::<NaiveDate>() {
        return Ok(VirtualInstant::Floating(date.and_time(NaiveTime::MIN)));
    }
    Err(ClockError::InvalidTimestamp {
        input: text.to_owned(),
    })
}
