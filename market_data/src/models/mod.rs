//! Canonical data model shared by providers, the cache, and the profile
//! pipeline.

pub mod bar;
pub mod granularity;
pub mod period;
pub mod request;

use thiserror::Error;

/// Error produced when parsing a granularity or lookback-period token fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input was empty.
    #[error("empty input")]
    Empty,

    /// The leading amount was missing, zero, or not a number.
    #[error("amount must be a positive integer: {0}")]
    Amount(String),

    /// The trailing unit token was not recognized.
    #[error("unknown unit: {0}")]
    Unit(String),
}
