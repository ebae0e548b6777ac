//! Validation errors raised before any simulation work starts.
use thiserror::Error;

/// Errors surfaced by the forecasting engine.
///
/// Arithmetic edge cases (health or gold underflow) are never reported here;
/// they clamp to zero inside the simulation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForecastError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("malformed entropy {value:?}: {reason}")]
    MalformedEntropy { value: String, reason: &'static str },
    #[error("entropy is not yet available (zero seed)")]
    EntropyUnavailable,
    #[error("level {supplied} does not match level {derived} derived from {xp} xp")]
    LevelMismatch { supplied: u16, derived: u16, xp: u32 },
    #[error("unknown item {0:?}")]
    UnknownItem(String),
    #[error("{field} must be between {min} and {max} (got {value})")]
    InvalidConfig {
        field: &'static str,
        min: usize,
        max: usize,
        value: usize,
    },
}

impl ForecastError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
