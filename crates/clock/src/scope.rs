use kronos_core::TimeSpec;
use kronos_ports::ClockResult;

use crate::engine::MockClock;

/// Run `body` under a clock frozen at `spec`, then restore real time
///
/// Builds a fresh engine, freezes it, and hands it to `body`. Restoration
/// runs on every exit path: normal return, an error carried in `body`'s
/// return value, or a panic unwinding out of it. A parse failure in `spec`
/// is returned before `body` runs.
///
/// ```
/// use kronos_clock::{TimeShift, ambient, with_frozen_time};
///
/// let reading = with_frozen_time("2024-01-15T12:00:00+00:00", |clock| {
///     clock.advance(TimeShift::hours(1.0));
///     ambient::epoch()
/// })
/// .unwrap();
///
/// assert_eq!(reading, 1_705_323_600.0);
/// // The scope has ended; ambient reads are real again
/// assert!(ambient::epoch() > 1_705_323_600.0);
/// ```
pub fn with_frozen_time<T>(
    spec: impl Into<TimeSpec>,
    body: impl FnOnce(&MockClock) -> T,
) -> ClockResult<T> {
    let clock = MockClock::new();
    clock.freeze(spec)?;
    let _restore = ResetOnDrop { clock: &clock };
    Ok(body(&clock))
}

/// Calls `reset` when dropped, which also runs during panic unwind
struct ResetOnDrop<'a> {
    clock: &'a MockClock,
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient;
    use crate::intercept::test_support::ambient_lock;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn test_scope_freezes_and_restores() {
        let _guard = ambient_lock();

        let value = with_frozen_time(1_705_320_000.0, |clock| {
            assert!((ambient::epoch() - 1_705_320_000.0).abs() < 0.001);
            clock.advance(crate::TimeShift::hours(1.0));
            ambient::epoch()
        })
        .expect("valid epoch");

        assert_eq!(value, 1_705_323_600.0);
        assert!(crate::intercept::installed_clock().is_none());
        assert!(ambient::epoch() > 1_705_323_600.0);
    }

    #[test]
    fn test_scope_restores_after_panic() {
        let _guard = ambient_lock();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _ = with_frozen_time("2024-01-15T12:00:00+00:00", |_clock| {
                panic!("scope body failed");
            });
        }));

        assert!(outcome.is_err());
        assert!(crate::intercept::installed_clock().is_none());
        assert!(ambient::epoch() > 1_705_320_000.0);
    }

    #[test]
    fn test_scope_parse_failure_never_runs_body() {
        let _guard = ambient_lock();

        let mut ran = false;
        let result = with_frozen_time("garbage", |_clock| {
            ran = true;
        });

        assert!(result.is_err());
        assert!(!ran);
        assert!(crate::intercept::installed_clock().is_none());
    }
}
