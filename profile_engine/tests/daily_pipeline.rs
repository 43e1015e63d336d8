//! End-to-end pipeline: cached bar sequence -> session segmentation ->
//! per-day volume profiles.

use chrono::{TimeZone, Utc};
use market_data::cache::BarCache;
use market_data::models::{bar::Bar, request::FetchRequest};
use profile_engine::profile::VolumeProfiler;
use profile_engine::segment::{SessionFilter, segment_by_day};

fn intraday_bars() -> Vec<Bar> {
    let mut bars = Vec::new();
    for day in [10, 11, 12] {
        for hour in 7..20 {
            let base = 18000.0 + (day - 10) as f64 * 50.0;
            bars.push(Bar {
                timestamp: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
                open: base,
                high: base + 20.0 + hour as f64,
                low: base - 15.0,
                close: base + 10.0,
                volume: 1_000 + hour as u64 * 100,
            });
        }
    }
    bars
}

#[test]
fn cached_bars_flow_through_to_daily_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let cache = BarCache::new(dir.path()).unwrap();
    let req = FetchRequest::new("^GDAXI", "5d".parse().unwrap(), "1h".parse().unwrap());

    cache.put(&req, &intraday_bars()).unwrap();
    let bars = cache.get(&req).unwrap().expect("freshly written entry");

    let profiles = VolumeProfiler::new(30).daily_profiles(&bars, None).unwrap();
    assert_eq!(
        profiles.keys().collect::<Vec<_>>(),
        vec!["2025-03-10", "2025-03-11", "2025-03-12"]
    );

    for profile in profiles.values() {
        // Conservation holds per session.
        let placed: f64 = profile.volumes.iter().sum();
        let total = profile.total_volume as f64;
        assert!((placed - total).abs() < 1e-6 * total.max(1.0));
        // POC is the center of the heaviest bin, lowest index on ties.
        let heaviest = profile
            .volumes
            .iter()
            .enumerate()
            .rev()
            .fold((0usize, f64::NEG_INFINITY), |best, (i, v)| {
                if *v >= best.1 { (i, *v) } else { best }
            });
        assert_eq!(profile.poc_price, profile.price_levels[heaviest.0]);
    }
}

#[test]
fn session_window_restricts_each_day() {
    let bars = intraday_bars();
    let window = SessionFilter::european();
    let profiles = VolumeProfiler::new(20)
        .daily_profiles(&bars, Some(&window))
        .unwrap();

    assert_eq!(profiles.len(), 3);
    // Each day had 13 hourly bars (07:00-19:00); the 08:00-17:30 window
    // keeps 10 of them (08:00 through 17:00).
    let expected_total: u64 = (8..=17).map(|h| 1_000 + h * 100).sum();
    for profile in profiles.values() {
        assert_eq!(profile.total_volume, expected_total);
    }
}

#[test]
fn segmentation_is_lossless_over_the_filtered_input() {
    let bars = intraday_bars();
    let window = SessionFilter::european();

    let filtered: Vec<Bar> = bars
        .iter()
        .filter(|b| window.contains(b.timestamp.time()))
        .copied()
        .collect();
    let rebuilt: Vec<Bar> = segment_by_day(&bars, Some(&window))
        .values()
        .flatten()
        .copied()
        .collect();
    assert_eq!(rebuilt, filtered);
}
