use std::path::PathBuf;

use thiserror::Error;

/// Errors from the on-disk bar cache.
///
/// A missing or expired entry is not an error; [`BarCache::get`] reports
/// those as `Ok(None)`. These variants cover genuine storage faults, which
/// must reach the caller instead of masquerading as cache misses.
///
/// [`BarCache::get`]: crate::cache::BarCache::get
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache medium could not be read or prepared.
    #[error("cache I/O error at {path}")]
    Io {
        /// Entry or directory path involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The atomic rename committing a new entry failed.
    #[error("failed to commit cache entry at {path}")]
    Persist {
        /// Final entry path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The columnar payload could not be encoded or decoded.
    #[error("cache frame error")]
    Frame(#[from] polars::prelude::PolarsError),

    /// The entry decoded but violated the bar schema (missing column, null
    /// cell, negative volume, out-of-range timestamp).
    #[error("corrupt cache entry at {path}: {reason}")]
    Corrupt {
        /// Entry path.
        path: PathBuf,
        /// What was wrong with the payload.
        reason: String,
    },
}
