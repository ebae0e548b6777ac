//! Numeric conversion helpers centralizing checked and saturating casts.

use num_traits::{Bounded, NumCast, cast::cast};

use crate::error::ForecastError;

/// Convert a signed input value into an unsigned engine type, rejecting
/// negatives and values that do not fit.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidInput`] naming `field` when the value is
/// negative or exceeds the target range.
pub fn non_negative<T>(field: &'static str, value: i64) -> Result<T, ForecastError>
where
    T: NumCast + Bounded + std::fmt::Display,
{
    if value < 0 {
        return Err(ForecastError::invalid(
            field,
            format!("must not be negative (got {value})"),
        ));
    }
    cast::<i64, T>(value).ok_or_else(|| {
        ForecastError::invalid(
            field,
            format!("{value} exceeds the maximum of {}", T::max_value()),
        )
    })
}

/// Narrow a u32 to u16, saturating at `u16::MAX`.
#[must_use]
pub fn saturating_u16(value: u32) -> u16 {
    cast::<u32, u16>(value).unwrap_or(u16::MAX)
}

/// Narrow a u64 to u32, saturating at `u32::MAX`.
#[must_use]
pub fn saturating_u32(value: u64) -> u32 {
    cast::<u64, u32>(value).unwrap_or(u32::MAX)
}
