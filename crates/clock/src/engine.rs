use chrono::{Offset, TimeZone, Utc};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kronos_core::{EpochSeconds, TimeShift, TimeSpec, Timestamp, VirtualInstant, ZoneOffset};
use kronos_ports::{ClockResult, TimeSource};

use crate::intercept::Interceptor;
use crate::parse;

/// Virtual-time state, guarded by the engine's mutex
///
/// Exactly one of `frozen` / `offset` determines the current virtual
/// instant: freezing overwrites offset mode, and the offset only applies
/// while unfrozen. `active` is true iff the ambient entry points currently
/// route to this engine.
#[derive(Debug, Default)]
struct ClockState {
    frozen: Option<VirtualInstant>,
    offset: f64,
    active: bool,
}

#[derive(Debug)]
struct ClockCore {
    state: Mutex<ClockState>,
    patcher: Interceptor,
}

/// Controls time for testing by substituting the ambient time sources
///
/// Created empty: unfrozen, zero offset, inactive. The first [`freeze`]
/// installs the engine as the process's ambient time source; [`reset`]
/// restores the originals. A `MockClock` is a cheap handle over shared
/// state, so it can be cloned across threads; every operation is serialized
/// by one internal lock.
///
/// Only one engine may be the active substituter per process. Kronos does
/// not detect two engines both claiming activation; keeping a single active
/// engine is a usage constraint.
///
/// [`freeze`]: MockClock::freeze
/// [`reset`]: MockClock::reset
#[derive(Debug, Clone)]
pub struct MockClock {
    core: Arc<ClockCore>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            core: Arc::new(ClockCore {
                state: Mutex::new(ClockState::default()),
                patcher: Interceptor::new(),
            }),
        }
    }

    // A panicking writer cannot leave the state torn, so a poisoned lock is
    // re-entered rather than propagated; reset-on-unwind depends on this.
    fn state(&self) -> MutexGuard<'_, ClockState> {
        self.core.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Freeze time at a specific instant
    ///
    /// Accepts ISO-8601 text, epoch seconds, or a pre-built instant (see
    /// [`TimeSpec`]). Installs the ambient redirect on first call; calling
    /// again while active only updates the stored instant. A parse failure
    /// is returned before any state changes.
    pub fn freeze(&self, spec: impl Into<TimeSpec>) -> ClockResult<&Self> {
        let instant = parse::resolve(spec.into())?;
        let mut state = self.state();
        debug!("freezing virtual time at {instant}");
        state.frozen = Some(instant);
        if !state.active {
            self.core.patcher.install(self.clone());
            state.active = true;
        }
        Ok(self)
    }

    /// Move time forward by the given shift
    ///
    /// Adds to the frozen instant when frozen, to the real-time offset
    /// otherwise. Negative components move time backward.
    pub fn advance(&self, shift: impl Into<TimeShift>) -> &Self {
        let delta = shift.into().total_seconds();
        let mut state = self.state();
        match state.frozen {
            Some(instant) => state.frozen = Some(instant.shifted_by(delta)),
            None => state.offset += delta,
        }
        self
    }

    /// Move time backward by the given shift
    pub fn rewind(&self, shift: impl Into<TimeShift>) -> &Self {
        let shift: TimeShift = shift.into();
        self.advance(-shift)
    }

    /// Restore real system time
    ///
    /// Clears the frozen instant and the offset, and tears down the ambient
    /// redirect if this engine installed it. Safe to call repeatedly.
    pub fn reset(&self) -> &Self {
        let mut state = self.state();
        state.frozen = None;
        state.offset = 0.0;
        if state.active {
            self.core.patcher.restore();
            state.active = false;
            debug!("virtual time cleared, real time restored");
        }
        self
    }

    /// Current virtual time as epoch seconds
    ///
    /// The exact timestamp of the frozen instant when frozen, otherwise
    /// real time plus the accumulated offset. The real reading comes from
    /// the retained original implementation, never the ambient redirect.
    pub fn get_time(&self) -> EpochSeconds {
        let state = self.state();
        self.epoch_locked(&state)
    }

    // Current virtual epoch for an already-held state guard; keeps
    // operations that hold the lock from re-acquiring it.
    fn epoch_locked(&self, state: &ClockState) -> EpochSeconds {
        match &state.frozen {
            Some(instant) => instant.epoch_seconds(),
            None => self.core.patcher.real_epoch_time() + state.offset,
        }
    }

    /// Current virtual time as a structured instant
    ///
    /// A zoned frozen instant converts to the requested zone. A floating
    /// frozen instant is returned as stored, regardless of any requested
    /// zone. Unfrozen, the instant is built from [`get_time`] in the
    /// requested zone, or floating in the local zone when none is given.
    ///
    /// [`get_time`]: MockClock::get_time
    pub fn get_datetime(&self, zone: Option<ZoneOffset>) -> VirtualInstant {
        let state = self.state();
        match (&state.frozen, zone) {
            (Some(instant @ VirtualInstant::Zoned(_)), Some(zone)) => instant.in_zone(zone),
            (Some(instant), _) => *instant,
            (None, zone) => VirtualInstant::from_epoch(self.epoch_locked(&state), zone),
        }
    }

    /// Whether this engine currently owns the ambient entry points
    pub fn is_active(&self) -> bool {
        self.state().active
    }

    /// Whether time is currently frozen
    pub fn is_frozen(&self) -> bool {
        self.state().frozen.is_some()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine is itself the virtual time source
impl TimeSource for MockClock {
    fn now(&self) -> VirtualInstant {
        self.get_datetime(None)
    }

    fn utc_now(&self) -> Timestamp {
        match self.get_datetime(Some(Utc.fix())) {
            VirtualInstant::Zoned(dt) => dt.with_timezone(&Utc),
            // A floating frozen instant passes through verbatim as UTC
            VirtualInstant::Floating(naive) => Utc.from_utc_datetime(&naive),
        }
    }

    fn epoch(&self) -> EpochSeconds {
        self.get_time()
    }

    fn monotonic(&self) -> f64 {
        self.core.patcher.virtual_monotonic(self.get_time())
    }

    fn name(&self) -> &str {
        "MockClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::test_support::ambient_lock;
    use chrono::{FixedOffset, Timelike};

    const NOON_UTC: &str = "2024-01-15T12:00:00+00:00";
    const NOON_EPOCH: f64 = 1_705_320_000.0;

    #[test]
    fn test_freeze_pins_get_time() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze(NOON_EPOCH).expect("valid epoch");
        assert_eq!(clock.get_time(), NOON_EPOCH);
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(clock.get_time(), NOON_EPOCH);

        clock.reset();
    }

    #[test]
    fn test_freeze_parse_failure_mutates_nothing() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        assert!(clock.freeze("garbage").is_err());
        assert!(!clock.is_active());
        assert!(!clock.is_frozen());
    }

    #[test]
    fn test_freeze_while_active_only_updates_instant() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze(NOON_UTC).expect("valid timestamp");
        clock.freeze(NOON_EPOCH + 60.0).expect("valid epoch");
        assert!(clock.is_active());
        assert_eq!(clock.get_time(), NOON_EPOCH + 60.0);

        clock.reset();
    }

    #[test]
    fn test_advance_is_additive() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze(NOON_UTC).expect("valid timestamp");
        clock.advance(TimeShift::hours(1.0)).advance(30.0);
        assert_eq!(clock.get_time(), NOON_EPOCH + 3630.0);

        clock.reset();
    }

    #[test]
    fn test_advance_rewind_round_trip() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze(NOON_UTC).expect("valid timestamp");
        clock
            .advance(TimeShift::days(2.5))
            .rewind(TimeShift::days(2.5));
        assert!((clock.get_time() - NOON_EPOCH).abs() < 0.001);

        clock.reset();
    }

    #[test]
    fn test_chaining_returns_same_engine() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        let result = clock
            .freeze(NOON_UTC)
            .expect("valid timestamp")
            .advance(TimeShift::hours(1.0))
            .advance(TimeShift::minutes(30.0));
        assert!(std::ptr::eq(result, &clock));
        assert_eq!(clock.get_time(), NOON_EPOCH + 5400.0);

        clock.reset();
    }

    #[test]
    fn test_offset_mode_tracks_real_time() {
        let clock = MockClock::new();

        // No freeze: the shift accumulates as an offset on real time
        clock.advance(TimeShift::hours(1.0));
        let real = crate::system::SystemTimeSource::new().epoch();
        let virt = clock.get_time();
        assert!((virt - real - 3600.0).abs() < 1.0);
        assert!(!clock.is_active());

        clock.reset();
    }

    #[test]
    fn test_rewind_in_offset_mode() {
        let clock = MockClock::new();

        clock.rewind(TimeShift::minutes(10.0));
        let real = crate::system::SystemTimeSource::new().epoch();
        assert!((clock.get_time() - real + 600.0).abs() < 1.0);

        clock.reset();
    }

    #[test]
    fn test_reset_is_idempotent() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze(NOON_UTC).expect("valid timestamp");
        clock.reset().reset();
        assert!(!clock.is_active());
        assert!(!clock.is_frozen());
        assert!(crate::intercept::installed_clock().is_none());
    }

    #[test]
    fn test_get_datetime_converts_zoned_instant() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze(NOON_UTC).expect("valid timestamp");
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        match clock.get_datetime(Some(est)) {
            VirtualInstant::Zoned(dt) => {
                assert_eq!(dt.hour(), 7);
                assert_eq!(*dt.offset(), est);
            }
            VirtualInstant::Floating(_) => panic!("zoned freeze must stay zoned"),
        }

        clock.reset();
    }

    #[test]
    fn test_floating_instant_ignores_requested_zone() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze("2024-01-15T12:00:00").expect("valid timestamp");
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let read = clock.get_datetime(Some(est));
        assert_eq!(read.zone(), None);
        assert_eq!(read, clock.get_datetime(None));

        clock.reset();
    }

    #[test]
    fn test_utc_now_takes_floating_instant_verbatim() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze("2024-01-15T12:00:00").expect("valid timestamp");
        let utc = clock.utc_now();
        assert_eq!(utc.hour(), 12);
        assert_eq!(utc.timestamp(), NOON_EPOCH as i64);

        clock.reset();
    }

    #[test]
    fn test_real_epoch_is_not_redirected() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock
            .freeze("2020-01-01T00:00:00+00:00")
            .expect("valid timestamp");

        // The clock reads 2020, the retained original keeps reading today
        let real = crate::system::SystemTimeSource::new().epoch();
        let retained = clock.core.patcher.real_epoch_time();
        assert!((retained - real).abs() < 5.0);
        assert!(retained > clock.get_time() + 1.0e8);

        clock.reset();
    }

    #[test]
    fn test_monotonic_sees_explicit_advance() {
        let _guard = ambient_lock();
        let clock = MockClock::new();

        clock.freeze(NOON_UTC).expect("valid timestamp");
        let mono1 = clock.monotonic();
        clock.advance(TimeShift::seconds(5.0));
        let mono2 = clock.monotonic();
        assert!(mono2 > mono1);
        // Real elapsed time is measured twice with different OS clocks, so
        // allow a little jitter around the 5s virtual jump
        assert!(mono2 - mono1 >= 4.9);

        clock.reset();
    }
}
