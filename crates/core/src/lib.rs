//! Kronos Core Domain
//!
//! Pure value types for the Kronos virtual time system.
//! This crate contains no I/O and no locking; everything here is plain data.

pub mod instant;
pub mod shift;
pub mod timespec;
pub mod values;

// Re-export commonly used types at crate root
pub use instant::VirtualInstant;
pub use shift::TimeShift;
pub use timespec::TimeSpec;
pub use values::{EpochSeconds, Timestamp, ZoneOffset};
