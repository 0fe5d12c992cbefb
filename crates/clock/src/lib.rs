//! Kronos Clock Infrastructure
//!
//! Virtualizes the passage of time inside one process so that
//! time-dependent logic can be tested deterministically.
//!
//! ## Flow
//!
//! ```text
//! MockClock (virtual-time state: frozen instant or offset)
//!     │
//!     ├── freeze/advance/rewind/reset ── caller mutations
//!     │
//!     └── Interceptor ── ambient slot (process-global, opt-in)
//!             │
//!             └── ambient::{now, utc_now, epoch, monotonic}
//!                     redirected to the clock while installed,
//!                     real system reads otherwise
//! ```
//!
//! ## Usage
//!
//! ```
//! use kronos_clock::{MockClock, TimeShift, ambient};
//!
//! let clock = MockClock::new();
//! clock.freeze("2024-01-15T12:00:00+00:00").unwrap();
//!
//! // Every ambient read now reports the virtual instant
//! assert_eq!(ambient::epoch(), 1_705_320_000.0);
//!
//! clock.advance(TimeShift { hours: 1.0, minutes: 30.0, ..TimeShift::default() });
//! assert_eq!(ambient::epoch(), 1_705_325_400.0);
//!
//! clock.reset();
//! ```
//!
//! Only one clock may be installed per process at a time; Kronos does not
//! coordinate between independently constructed clocks. For bounded use with
//! guaranteed teardown, prefer [`with_frozen_time`].

pub mod ambient;
mod engine;
mod intercept;
mod parse;
mod scope;
mod system;

pub use engine::MockClock;
pub use scope::with_frozen_time;
pub use system::SystemTimeSource;

// Re-export the domain types and the TimeSource port for convenience
pub use kronos_core::{EpochSeconds, TimeShift, TimeSpec, Timestamp, VirtualInstant, ZoneOffset};
pub use kronos_ports::{ClockError, ClockResult, TimeSource};
