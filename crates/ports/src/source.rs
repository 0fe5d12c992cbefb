use kronos_core::{EpochSeconds, Timestamp, VirtualInstant};

/// Port for ambient time queries
///
/// This allows code to consume different time sources:
/// - Real system time for production
/// - Virtual time for deterministic tests
///
/// Consumers take a `&dyn TimeSource` instead of reading the system clock
/// directly, so the source can be swapped without code changes.
pub trait TimeSource: Send + Sync {
    /// Current wall-clock time, floating in the local zone when real
    fn now(&self) -> VirtualInstant;

    /// Current time in UTC
    fn utc_now(&self) -> Timestamp;

    /// Current epoch timestamp in fractional seconds
    fn epoch(&self) -> EpochSeconds;

    /// Monotonic timestamp in fractional seconds, for measuring elapsed time
    fn monotonic(&self) -> f64;

    /// Get the source's name/identifier for debugging
    fn name(&self) -> &str {
        "TimeSource"
    }
}
