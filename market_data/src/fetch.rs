//! Cache-first bar retrieval with single-flight miss coalescing.
//!
//! [`CachedFetcher`] sits between callers and a [`DataProvider`]: a fresh
//! cache entry is returned immediately; on a miss, concurrent callers for
//! the same key serialize on a per-key gate so exactly one of them fetches
//! upstream and populates the cache, and the rest re-read the populated
//! entry. Without this, N simultaneous callers would each hit the provider
//! (a fetch storm) even though the cache dedupes the stored result.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{BarCache, CacheError};
use crate::models::{
    bar::{Bar, BarSeries},
    request::FetchRequest,
};
use crate::providers::{DataProvider, ProviderError};

/// Errors surfaced by [`CachedFetcher::bars`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The cache medium failed. This is a storage fault, not a miss, and is
    /// not retried here.
    #[error("cache failure")]
    Cache(#[from] CacheError),

    /// The upstream provider failed; the caller may retry.
    #[error("upstream fetch failed")]
    Upstream(#[from] ProviderError),
}

/// Cache-backed bar fetcher over any [`DataProvider`].
pub struct CachedFetcher<P> {
    provider: P,
    cache: BarCache,
    in_flight: Mutex<HashMap<FetchRequest, Arc<Mutex<()>>>>,
}

impl<P: DataProvider + Send + Sync> CachedFetcher<P> {
    /// Wraps `provider` with `cache`.
    pub fn new(provider: P, cache: BarCache) -> Self {
        Self {
            provider,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying cache, for direct inspection or pre-population.
    pub fn cache(&self) -> &BarCache {
        &self.cache
    }

    /// Returns the bars for `request`, from cache when fresh, fetching and
    /// populating the cache otherwise.
    pub async fn bars(&self, request: &FetchRequest) -> Result<Vec<Bar>, FetchError> {
        if let Some(bars) = self.cache.get(request)? {
            return Ok(bars);
        }

        let gate = {
            let mut map = self.in_flight.lock().await;
            Arc::clone(map.entry(request.clone()).or_default())
        };
        let _guard = gate.lock().await;

        // Either we are first through the gate, or the winner populated the
        // cache while we waited.
        if let Some(bars) = self.cache.get(request)? {
            debug!(key = %request, "coalesced onto completed fetch");
            return Ok(bars);
        }

        debug!(key = %request, "cache miss, fetching upstream");
        let bars = self.provider.fetch_bars(request).await?;
        self.cache.put(request, &bars)?;

        // Drop the gate entry so a future miss for this key starts clean.
        // Waiters already holding the Arc still resolve through the re-check
        // above.
        self.in_flight.lock().await.remove(request);

        Ok(bars)
    }

    /// Like [`bars`](Self::bars), wrapped into a self-describing
    /// [`BarSeries`] for consumers that carry the data further.
    pub async fn series(&self, request: &FetchRequest) -> Result<BarSeries, FetchError> {
        let bars = self.bars(request).await?;
        Ok(BarSeries {
            symbol: request.instrument.clone(),
            granularity: request.granularity,
            bars,
        })
    }
}
