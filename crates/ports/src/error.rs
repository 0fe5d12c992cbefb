use thiserror::Error;

/// Errors from clock operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("Not a valid ISO-8601 timestamp: {input}")]
    InvalidTimestamp { input: String },

    #[error("Epoch value outside the representable range: {0}")]
    EpochOutOfRange(f64),
}

pub type ClockResult<T> = std::result::Result<T, ClockError>;
