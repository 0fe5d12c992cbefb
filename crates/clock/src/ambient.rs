//! Ambient time entry points
//!
//! The opt-in redirection surface. Code that calls these functions instead
//! of reading the system clock directly observes virtual time whenever a
//! [`MockClock`](crate::MockClock) is installed, and real time otherwise.

use kronos_core::{EpochSeconds, Timestamp, VirtualInstant};
use kronos_ports::TimeSource;

use crate::intercept;
use crate::system::SystemTimeSource;

/// Current wall-clock time
///
/// Floating in the local zone when reading real time; the clock's virtual
/// instant while one is installed.
pub fn now() -> VirtualInstant {
    match intercept::installed_clock() {
        Some(clock) => clock.now(),
        None => SystemTimeSource::new().now(),
    }
}

/// Current UTC time
pub fn utc_now() -> Timestamp {
    match intercept::installed_clock() {
        Some(clock) => clock.utc_now(),
        None => SystemTimeSource::new().utc_now(),
    }
}

/// Current epoch timestamp in fractional seconds
pub fn epoch() -> EpochSeconds {
    match intercept::installed_clock() {
        Some(clock) => clock.epoch(),
        None => SystemTimeSource::new().epoch(),
    }
}

/// Monotonic timestamp in fractional seconds
///
/// While a clock is installed this tracks elapsed virtual time on top of a
/// real-time anchor, so explicit `advance`/`rewind` calls are visible to
/// duration measurements. A rewind larger than the real elapsed interval
/// can move this value backward.
pub fn monotonic() -> f64 {
    match intercept::installed_clock() {
        Some(clock) => clock.monotonic(),
        None => SystemTimeSource::new().monotonic(),
    }
}
