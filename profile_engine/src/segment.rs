//! Calendar-date session segmentation with optional time-of-day filtering.

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use market_data::models::bar::Bar;
use shared_utils::config::SessionWindowConfig;

/// Inclusive time-of-day window applied to each date before bucketing.
///
/// Times are wall-clock values in the bar series' native time zone; the
/// segmenter performs no zone conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionFilter {
    start: NaiveTime,
    end: NaiveTime,
}

impl SessionFilter {
    /// Window spanning `[start, end]`, both ends inclusive.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// European cash session, 08:00-17:30 venue-local wall clock.
    pub fn european() -> Self {
        Self::new(hms(8, 0), hms(17, 30))
    }

    /// US overlap session as seen from the European venue clock,
    /// 15:30-22:00.
    pub fn us() -> Self {
        Self::new(hms(15, 30), hms(22, 0))
    }

    /// Parses a window from the `[profile.session]` config section
    /// (`HH:MM` strings).
    pub fn from_config(cfg: &SessionWindowConfig) -> Result<Self, chrono::ParseError> {
        let start = NaiveTime::parse_from_str(&cfg.start, "%H:%M")?;
        let end = NaiveTime::parse_from_str(&cfg.end, "%H:%M")?;
        Ok(Self::new(start, end))
    }

    /// True when `time` falls inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

fn hms(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Buckets `bars` by the calendar date of their timestamp.
///
/// When `filter` is given, bars outside the window are dropped first and
/// dates left with no bars are omitted from the result. Bars keep their
/// input order within each session, and session keys appear in input order —
/// ascending, since the input sequence is assumed time-ascending (it is not
/// re-sorted here).
pub fn segment_by_day(
    bars: &[Bar],
    filter: Option<&SessionFilter>,
) -> IndexMap<NaiveDate, Vec<Bar>> {
    let mut sessions: IndexMap<NaiveDate, Vec<Bar>> = IndexMap::new();
    for bar in bars {
        if let Some(window) = filter {
            if !window.contains(bar.timestamp.time()) {
                continue;
            }
        }
        sessions
            .entry(bar.timestamp.date_naive())
            .or_default()
            .push(*bar);
    }
    sessions
}
