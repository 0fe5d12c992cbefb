use chrono::{Local, Utc};
use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use kronos_core::{EpochSeconds, Timestamp, VirtualInstant};
use kronos_ports::TimeSource;

/// Real system time source
///
/// Reads the operating system's clocks directly. Use this in production
/// where you want real-time behavior; it is also what the interception
/// layer retains as the original implementation while a clock is installed.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

// Monotonic readings are reported as seconds since a process-wide origin
// captured on first use, so values from different callers are comparable.
static MONOTONIC_ORIGIN: OnceLock<Instant> = OnceLock::new();

fn monotonic_origin() -> Instant {
    *MONOTONIC_ORIGIN.get_or_init(Instant::now)
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> VirtualInstant {
        VirtualInstant::Floating(Local::now().naive_local())
    }

    fn utc_now(&self) -> Timestamp {
        Utc::now()
    }

    fn epoch(&self) -> EpochSeconds {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_secs_f64(),
            // System clock set before 1970
            Err(err) => -err.duration().as_secs_f64(),
        }
    }

    fn monotonic(&self) -> f64 {
        monotonic_origin().elapsed().as_secs_f64()
    }

    fn name(&self) -> &str {
        "SystemTimeSource"
    }
}
