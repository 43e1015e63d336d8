//! Provider abstraction for market data sources.
//!
//! [`DataProvider`] is the unified interface for fetching time-series bar
//! data from any vendor. Concrete implementations live with the application
//! that selects a vendor; the engine only ever sees the trait. The design
//! supports dynamic dispatch (`dyn DataProvider`) for runtime selection.

pub mod errors;

use async_trait::async_trait;

pub use errors::ProviderError;

use crate::models::{bar::Bar, request::FetchRequest};

/// A source of historical OHLCV bars.
#[async_trait]
pub trait DataProvider {
    /// Fetches the bars described by `request`, ascending by timestamp.
    async fn fetch_bars(&self, request: &FetchRequest) -> Result<Vec<Bar>, ProviderError>;
}

#[async_trait]
impl<T: DataProvider + Send + Sync + ?Sized> DataProvider for std::sync::Arc<T> {
    async fn fetch_bars(&self, request: &FetchRequest) -> Result<Vec<Bar>, ProviderError> {
        (**self).fetch_bars(request).await
    }
}

/// Replaces zero volumes with a proxy synthesized from intrabar volatility.
///
/// Some venues (index data in particular) report no volume. The proxy scales
/// with the bar's relative range plus its absolute body size, so livelier
/// bars read as heavier. This is provider-side preprocessing: run it before
/// bars enter segmentation, never inside the profile pipeline, which assumes
/// volume is already meaningful.
pub fn repair_zero_volume(bars: &mut [Bar]) {
    for bar in bars.iter_mut() {
        if bar.volume == 0 && bar.close != 0.0 {
            let range_part = (bar.high - bar.low) / bar.close * 10_000_000.0;
            let body_part = (bar.close - bar.open).abs() * 50_000.0;
            bar.volume = (range_part + body_part).max(0.0) as u64;
        }
    }
}
