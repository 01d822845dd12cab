//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need it.

use thiserror::Error;

/// Errors produced by `cm-core` constructors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid range: min {min} is greater than max {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("value {value} for {what} must be finite and non-negative")]
    Negative { what: &'static str, value: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `cm-core`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Ensure `min <= max` and both are finite.
pub fn check_range(min: f64, max: f64) -> CoreResult<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(CoreError::InvertedRange { min, max });
    }
    Ok(())
}

/// Ensure `value` is finite and `>= 0`.
pub fn check_non_negative(what: &'static str, value: f64) -> CoreResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Negative { what, value });
    }
    Ok(())
}
