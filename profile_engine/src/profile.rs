//! Session profile aggregation and the per-day driver.

use indexmap::IndexMap;
use market_data::models::bar::Bar;
use serde::Serialize;
use shared_utils::config::ProfileConfig;
use tracing::warn;

use crate::distribute::distribute;
use crate::errors::ProfileError;
use crate::partition::Partition;
use crate::segment::{SessionFilter, segment_by_day};

/// Default number of price bins per session.
pub const DEFAULT_BIN_COUNT: usize = 30;

/// Volume-by-price distribution for one trading session.
///
/// Immutable once built. `price_levels` and `volumes` are index-aligned,
/// ascending by price. `total_volume` equals the sum of `volumes` up to
/// float rounding from the proportional split, unless a conservation
/// anomaly was logged during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProfile {
    /// Identifier of the session: a calendar date or a caller-chosen label.
    pub session_key: String,
    /// Bin center prices.
    pub price_levels: Vec<f64>,
    /// Accumulated volume per bin.
    pub volumes: Vec<f64>,
    /// Price level of the bin with the highest accumulated volume. Ties
    /// resolve to the lowest-priced bin.
    pub poc_price: f64,
    /// Sum of the session's bar volumes.
    pub total_volume: u64,
}

/// Computes session volume profiles at a fixed bin count.
#[derive(Debug, Clone, Copy)]
pub struct VolumeProfiler {
    bin_count: usize,
}

impl Default for VolumeProfiler {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_COUNT)
    }
}

impl VolumeProfiler {
    /// Profiler using `bin_count` price bins per session.
    pub fn new(bin_count: usize) -> Self {
        Self { bin_count }
    }

    /// Profiler configured from the `[profile]` section of the application
    /// config.
    pub fn from_config(cfg: &ProfileConfig) -> Self {
        Self::new(cfg.bins)
    }

    /// Aggregates one session's bars into a [`SessionProfile`].
    ///
    /// The partition spans `[min(low), max(high)]` of the session. Every
    /// bar's volume is distributed across its touched bins and accumulated;
    /// a bar whose volume cannot be placed is logged at warning level and
    /// skipped, leaving `total_volume` larger than the accumulated sum.
    ///
    /// # Errors
    /// [`ProfileError::EmptySession`] on zero bars; partition and bar
    /// validation failures propagate unchanged.
    pub fn aggregate(
        &self,
        session_key: impl Into<String>,
        bars: &[Bar],
    ) -> Result<SessionProfile, ProfileError> {
        if bars.is_empty() {
            return Err(ProfileError::EmptySession);
        }
        let session_key = session_key.into();

        let price_min = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let price_max = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let partition = Partition::build(price_min, price_max, self.bin_count)?;

        let mut volumes = vec![0.0; partition.bin_count()];
        for bar in bars {
            let contributions = distribute(bar, &partition)?;
            if contributions.is_empty() && bar.volume > 0 {
                // Conservation anomaly: this bar's volume is absent from the
                // profile. Non-fatal by design.
                warn!(
                    session = %session_key,
                    volume = bar.volume,
                    "bar volume dropped: no bins touched"
                );
                continue;
            }
            for (index, share) in contributions {
                volumes[index] += share;
            }
        }

        let total_volume = bars.iter().map(|b| b.volume).sum();

        // Only a strictly greater accumulator moves the POC, so the
        // lowest-priced bin wins ties.
        let mut poc_index = 0;
        for (i, v) in volumes.iter().enumerate().skip(1) {
            if *v > volumes[poc_index] {
                poc_index = i;
            }
        }

        Ok(SessionProfile {
            session_key,
            poc_price: partition.bin(poc_index).center(),
            price_levels: partition.centers(),
            volumes,
            total_volume,
        })
    }

    /// Segments `bars` by calendar date and aggregates one profile per day.
    ///
    /// Keys are ISO dates (`YYYY-MM-DD`) in ascending order. Dates emptied
    /// by `filter` are omitted rather than producing empty sessions.
    pub fn daily_profiles(
        &self,
        bars: &[Bar],
        filter: Option<&SessionFilter>,
    ) -> Result<IndexMap<String, SessionProfile>, ProfileError> {
        let mut profiles = IndexMap::new();
        for (date, session_bars) in segment_by_day(bars, filter) {
            let key = date.to_string();
            let profile = self.aggregate(key.clone(), &session_bars)?;
            profiles.insert(key, profile);
        }
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;

    fn bar(low: f64, high: f64, volume: u64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
            open: low,
            high,
            low,
            close: high,
            volume,
        }
    }

    #[test]
    fn two_bar_scenario_matches_expected_profile() {
        // bars = [{100..102, 1000}, {101..103, 2000}], 2 bins:
        // edges [100, 101.5, 103]; each bar touches both bins.
        let profiler = VolumeProfiler::new(2);
        let profile = profiler
            .aggregate("s", &[bar(100.0, 102.0, 1000), bar(101.0, 103.0, 2000)])
            .unwrap();

        assert_eq!(profile.volumes, vec![1500.0, 1500.0]);
        assert_eq!(profile.total_volume, 3000);
        assert_eq!(profile.price_levels, vec![100.75, 102.25]);
        // Tie between the bins: the lower-priced one wins.
        assert_eq!(profile.poc_price, 100.75);
    }

    #[test]
    fn poc_is_center_of_heaviest_bin() {
        let profiler = VolumeProfiler::new(3);
        // All volume concentrated in the top third of the range.
        let profile = profiler
            .aggregate("s", &[bar(100.0, 103.0, 0), bar(102.5, 102.9, 9000)])
            .unwrap();
        let heaviest = profile
            .volumes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(heaviest, 2);
        assert_eq!(profile.poc_price, profile.price_levels[2]);
    }

    #[test]
    fn degenerate_session_collapses_to_single_price() {
        let profiler = VolumeProfiler::new(30);
        let profile = profiler.aggregate("s", &[bar(50.0, 50.0, 700)]).unwrap();
        assert!(profile.price_levels.iter().all(|p| *p == 50.0));
        assert_eq!(profile.poc_price, 50.0);
        let placed: f64 = profile.volumes.iter().sum();
        assert_eq!(placed, 700.0);
    }

    #[test]
    fn empty_session_is_rejected() {
        let profiler = VolumeProfiler::default();
        assert_eq!(
            profiler.aggregate("s", &[]),
            Err(ProfileError::EmptySession)
        );
    }

    #[test]
    fn session_key_is_preserved() {
        let profiler = VolumeProfiler::new(4);
        let profile = profiler.aggregate("2025-03-14", &[bar(1.0, 2.0, 5)]).unwrap();
        assert_eq!(profile.session_key, "2025-03-14");
    }

    #[test]
    fn daily_profiles_keyed_by_iso_date() {
        let mut bars = Vec::new();
        for day in [13, 14] {
            for hour in [9, 12, 15] {
                bars.push(Bar {
                    timestamp: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
                    open: 100.0,
                    high: 102.0,
                    low: 99.0,
                    close: 101.0,
                    volume: 1000,
                });
            }
        }
        let profiles = VolumeProfiler::new(10).daily_profiles(&bars, None).unwrap();
        let keys: Vec<_> = profiles.keys().cloned().collect();
        assert_eq!(keys, vec!["2025-03-13", "2025-03-14"]);
        for profile in profiles.values() {
            assert_eq!(profile.total_volume, 3000);
        }
    }

    proptest! {
        #[test]
        fn accumulated_volume_equals_total(
            specs in proptest::collection::vec(
                (1.0f64..500.0, 0.0f64..50.0, 0u64..100_000),
                1..40,
            ),
            bins in 1usize..80,
        ) {
            let bars: Vec<Bar> = specs
                .iter()
                .map(|(low, span, volume)| bar(*low, low + span, *volume))
                .collect();
            let profile = VolumeProfiler::new(bins).aggregate("prop", &bars).unwrap();

            let placed: f64 = profile.volumes.iter().sum();
            let total = profile.total_volume as f64;
            prop_assert!((placed - total).abs() <= total.max(1.0) * 1e-9);
        }
    }
}
