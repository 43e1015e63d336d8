use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_data::cache::{BarCache, Clock};
use market_data::fetch::CachedFetcher;
use market_data::models::{bar::Bar, request::FetchRequest};
use market_data::providers::{DataProvider, ProviderError};

struct CountingProvider {
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingProvider {
    fn new(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
        }
    }
}

#[async_trait]
impl DataProvider for CountingProvider {
    async fn fetch_bars(&self, _request: &FetchRequest) -> Result<Vec<Bar>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(vec![Bar {
            timestamp: Utc::now(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
            volume: 1000,
        }])
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn request() -> FetchRequest {
    FetchRequest::new("^GDAXI", "1d".parse().unwrap(), "5m".parse().unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_misses_coalesce_to_one_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let cache = BarCache::new(dir.path()).unwrap();
    let provider = Arc::new(CountingProvider::new(Duration::from_millis(50)));
    let fetcher = Arc::new(CachedFetcher::new(Arc::clone(&provider), cache));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let fetcher = Arc::clone(&fetcher);
            let req = request();
            tokio::spawn(async move { fetcher.bars(&req).await.unwrap() })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    // All callers see identical bars, and the provider ran exactly once.
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert!(fetcher.cache().get(&request()).unwrap().is_some());
}

#[tokio::test]
async fn fresh_entry_skips_provider() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(CountingProvider::new(Duration::ZERO));
    let cache = BarCache::new(dir.path()).unwrap();
    let req = request();

    cache
        .put(
            &req,
            &[Bar {
                timestamp: Utc::now(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 7,
            }],
        )
        .unwrap();

    let fetcher = CachedFetcher::new(Arc::clone(&provider), cache);
    let series = fetcher.series(&req).await.unwrap();
    assert_eq!(series.symbol, "^GDAXI");
    assert_eq!(series.bars[0].volume, 7);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stale_entry_triggers_refetch() {
    let dir = tempfile::tempdir().unwrap();
    // Observation clock pinned two hours ahead: whatever is stored is stale.
    let clock = Arc::new(FixedClock(Utc::now() + chrono::Duration::hours(2)));
    let cache = BarCache::with_clock(dir.path(), Duration::from_secs(3600), clock).unwrap();
    let req = request();
    cache
        .put(
            &req,
            &[Bar {
                timestamp: Utc::now(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 7,
            }],
        )
        .unwrap();

    let provider = Arc::new(CountingProvider::new(Duration::ZERO));
    let fetcher = CachedFetcher::new(Arc::clone(&provider), cache);
    let bars = fetcher.bars(&req).await.unwrap();
    // The stale seed (volume 7) was replaced by a provider fetch (volume 1000).
    assert_eq!(bars[0].volume, 1000);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}
