//! Freshness-bounded on-disk cache for fetched bar sequences.
//!
//! Layout: one Feather file per `(instrument, period, granularity)` key,
//! named `{stem}.feather` under the cache directory. The file modification
//! time is the staleness signal; entries at or past the TTL are reported as
//! absent so the caller refetches and overwrites. A newer entry supersedes
//! the old one wholesale; entries are never merged.
//!
//! Concurrency: writes go through a temp file plus rename (see
//! [`store`]), so readers never observe a partially written entry and
//! `get`/`put` races on the same key resolve to last-writer-wins. There is
//! no locking beyond that; fetch coalescing lives in
//! [`crate::fetch::CachedFetcher`].

pub mod clock;
pub mod errors;
mod store;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use shared_utils::config::CacheConfig;
use tracing::debug;

pub use clock::{Clock, SystemClock};
pub use errors::CacheError;

use crate::models::{bar::Bar, request::FetchRequest};

/// Default entry lifetime: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// On-disk bar cache keyed by [`FetchRequest`].
pub struct BarCache {
    dir: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl BarCache {
    /// Cache rooted at `dir` with the default TTL and the system clock.
    ///
    /// Creates the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Self::with_clock(dir, DEFAULT_TTL, Arc::new(SystemClock))
    }

    /// Cache with an explicit TTL.
    pub fn with_ttl(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self, CacheError> {
        Self::with_clock(dir, ttl, Arc::new(SystemClock))
    }

    /// Cache with an explicit TTL and time source. Tests use this to pin the
    /// observation instant.
    pub fn with_clock(
        dir: impl Into<PathBuf>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, ttl, clock })
    }

    /// Cache configured from the `[cache]` section of the application
    /// config, honoring the `SVP_CACHE_DIR` environment override.
    pub fn from_config(cfg: &CacheConfig) -> Result<Self, CacheError> {
        Self::with_ttl(cfg.resolve_dir(), Duration::from_secs(cfg.ttl_secs))
    }

    /// Path of the entry file for `request`.
    pub fn entry_path(&self, request: &FetchRequest) -> PathBuf {
        self.dir.join(format!("{}.feather", request.cache_stem()))
    }

    /// Looks up a fresh entry for `request`.
    ///
    /// Returns `Ok(None)` when the entry is missing or stale — the caller
    /// should fetch upstream and [`put`](Self::put) the result. Storage
    /// faults (unreadable file, corrupt payload) propagate as errors; they
    /// are never downgraded to a miss.
    pub fn get(&self, request: &FetchRequest) -> Result<Option<Vec<Bar>>, CacheError> {
        let path = self.entry_path(request);
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %request, "cache miss");
                return Ok(None);
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        let stored_at: DateTime<Utc> = meta
            .modified()
            .map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })?
            .into();
        if self.is_stale(stored_at) {
            debug!(key = %request, %stored_at, "cache entry stale");
            return Ok(None);
        }
        let bars = store::read(&path)?;
        debug!(key = %request, bars = bars.len(), "cache hit");
        Ok(Some(bars))
    }

    /// Stores `bars` for `request`, atomically replacing any existing entry.
    pub fn put(&self, request: &FetchRequest, bars: &[Bar]) -> Result<(), CacheError> {
        let path = self.entry_path(request);
        store::write_atomic(&self.dir, &path, bars)?;
        debug!(key = %request, bars = bars.len(), "cache entry written");
        Ok(())
    }

    /// Directory this cache persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_stale(&self, stored_at: DateTime<Utc>) -> bool {
        let age = self.clock.now().signed_duration_since(stored_at);
        match age.to_std() {
            Ok(age) => age >= self.ttl,
            // Entry mtime ahead of the observation clock: treat as fresh.
            Err(_) => false,
        }
    }
}
