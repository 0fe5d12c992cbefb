use chrono::{DateTime, FixedOffset, Utc};

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Numeric timestamp counted in seconds from the Unix epoch, fractional
pub type EpochSeconds = f64;

/// Fixed offset from UTC used as the zone argument for datetime reads
pub type ZoneOffset = FixedOffset;
