use log::debug;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;

use kronos_core::EpochSeconds;
use kronos_ports::TimeSource;

use crate::engine::MockClock;
use crate::system::SystemTimeSource;

/// Process-global slot naming the clock that currently owns the ambient
/// entry points. Empty means every ambient read goes to the real sources.
static AMBIENT_SLOT: RwLock<Option<MockClock>> = RwLock::new(None);

/// Clone the installed clock handle out of the slot
///
/// The slot guard is released before the caller queries the clock, so the
/// slot lock and the engine's state lock never nest.
pub(crate) fn installed_clock() -> Option<MockClock> {
    AMBIENT_SLOT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// The original implementations retained while a clock is installed
#[derive(Debug)]
struct Originals {
    real: SystemTimeSource,
    /// Real monotonic reading captured at installation
    monotonic_anchor: Instant,
}

/// Installs a clock as the process's ambient time source and restores the
/// originals later
///
/// One interceptor exists per engine. Install and restore are idempotent;
/// the retained originals double as the patched flag.
#[derive(Debug)]
pub(crate) struct Interceptor {
    saved: Mutex<Option<Originals>>,
}

impl Interceptor {
    pub(crate) fn new() -> Self {
        Self {
            saved: Mutex::new(None),
        }
    }

    fn saved(&self) -> MutexGuard<'_, Option<Originals>> {
        self.saved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route the ambient entry points to `clock`. No-op if already patched.
    pub(crate) fn install(&self, clock: MockClock) {
        let mut saved = self.saved();
        if saved.is_some() {
            return;
        }
        *saved = Some(Originals {
            real: SystemTimeSource::new(),
            monotonic_anchor: Instant::now(),
        });
        *AMBIENT_SLOT.write().unwrap_or_else(PoisonError::into_inner) = Some(clock);
        debug!("ambient time entry points redirected to virtual clock");
    }

    /// Re-install the original sources. No-op if not patched.
    pub(crate) fn restore(&self) {
        let mut saved = self.saved();
        if saved.is_none() {
            return;
        }
        *AMBIENT_SLOT.write().unwrap_or_else(PoisonError::into_inner) = None;
        *saved = None;
        debug!("ambient time entry points restored to system sources");
    }

    /// Real epoch time from the retained original implementation
    ///
    /// Never routed through the ambient redirect, so the engine's offset
    /// mode cannot recurse into its own substitute. Before installation the
    /// same value comes from a direct system read.
    pub(crate) fn real_epoch_time(&self) -> EpochSeconds {
        match self.saved().as_ref() {
            Some(originals) => originals.real.epoch(),
            None => SystemTimeSource::new().epoch(),
        }
    }

    /// Synthetic monotonic reading for a clock whose virtual epoch is
    /// `virtual_epoch`:
    ///
    /// `virtual_epoch - real_epoch + (real_monotonic_now - monotonic_anchor)`
    ///
    /// Tracks elapsed virtual time while still ticking between calls with
    /// real elapsed time. Not guaranteed non-decreasing across a rewind
    /// larger than the real elapsed interval; that boundary case is left
    /// visible rather than clamped.
    pub(crate) fn virtual_monotonic(&self, virtual_epoch: EpochSeconds) -> f64 {
        match self.saved().as_ref() {
            Some(originals) => {
                let elapsed = originals.monotonic_anchor.elapsed().as_secs_f64();
                virtual_epoch - originals.real.epoch() + elapsed
            }
            None => SystemTimeSource::new().monotonic(),
        }
    }
}
