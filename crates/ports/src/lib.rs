//! Kronos Ports
//!
//! Port definitions (traits) for the Kronos virtual time system.
//! These define the boundary between code that consumes time and the
//! source that produces it.

mod error;
mod source;

pub use error::{ClockError, ClockResult};
pub use source::TimeSource;
