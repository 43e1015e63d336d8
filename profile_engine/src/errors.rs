//! Error types for the profile pipeline.

use thiserror::Error;

/// Errors from profile computation.
///
/// These indicate malformed input and propagate to the caller; nothing here
/// is retried automatically.
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    /// `price_max` was below `price_min` when building a partition.
    #[error("invalid price range: max {max} < min {min}")]
    InvalidRange {
        /// Lower end of the requested range.
        min: f64,
        /// Upper end of the requested range.
        max: f64,
    },

    /// A partition was requested with zero bins.
    #[error("bin count must be at least 1")]
    InvalidBinCount,

    /// Aggregation was invoked on a session with no bars.
    #[error("cannot aggregate an empty session")]
    EmptySession,

    /// A bar with `low > high` reached the volume distributor.
    #[error("invalid bar: low {low} > high {high}")]
    InvalidBar {
        /// The bar's low price.
        low: f64,
        /// The bar's high price.
        high: f64,
    },
}
