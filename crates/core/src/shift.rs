use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg};

/// A duration expressed as four independent fractional components
///
/// Every component defaults to zero, so callers fill in only what they need:
///
/// ```
/// use kronos_core::TimeShift;
///
/// let shift = TimeShift { hours: 1.0, minutes: 30.0, ..TimeShift::default() };
/// assert_eq!(shift.total_seconds(), 5400.0);
/// ```
///
/// Negative components are valid and move time backward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeShift {
    pub seconds: f64,
    pub minutes: f64,
    pub hours: f64,
    pub days: f64,
}

impl TimeShift {
    /// Shift of whole or fractional seconds
    pub fn seconds(seconds: f64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// Shift of whole or fractional minutes
    pub fn minutes(minutes: f64) -> Self {
        Self {
            minutes,
            ..Self::default()
        }
    }

    /// Shift of whole or fractional hours
    pub fn hours(hours: f64) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    /// Shift of whole or fractional days
    pub fn days(days: f64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    /// The effective delta in seconds: `seconds + minutes*60 + hours*3600 + days*86400`
    pub fn total_seconds(&self) -> f64 {
        self.seconds + self.minutes * 60.0 + self.hours * 3600.0 + self.days * 86400.0
    }
}

impl Neg for TimeShift {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            seconds: -self.seconds,
            minutes: -self.minutes,
            hours: -self.hours,
            days: -self.days,
        }
    }
}

impl Add for TimeShift {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            seconds: self.seconds + rhs.seconds,
            minutes: self.minutes + rhs.minutes,
            hours: self.hours + rhs.hours,
            days: self.days + rhs.days,
        }
    }
}

/// A bare number of seconds
impl From<f64> for TimeShift {
    fn from(seconds: f64) -> Self {
        Self::seconds(seconds)
    }
}

impl From<Duration> for TimeShift {
    fn from(duration: Duration) -> Self {
        let seconds = duration
            .num_microseconds()
            .map(|us| us as f64 / 1e6)
            .unwrap_or_else(|| duration.num_milliseconds() as f64 / 1e3);
        Self::seconds(seconds)
    }
}
