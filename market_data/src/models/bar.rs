//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! This struct is the standard output of every
//! [`DataProvider`](crate::providers::DataProvider) implementation and the
//! unit the profile pipeline consumes. Bars are immutable once constructed;
//! downstream code borrows them for the duration of a computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::granularity::Granularity;

/// A single OHLCV bar for a given timestamp.
///
/// Price relationships (`low <= open,close <= high`) are assumed from the
/// provider and not re-validated here; `low <= high` is enforced where a bar
/// enters volume distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The timestamp for this bar, in the series' native time zone.
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval. Non-negative by construction;
    /// zero is legal and left for provider-side repair.
    pub volume: u64,
}

/// A complete set of time-series data for a single instrument.
///
/// Groups a vector of [`Bar`]s with their instrument symbol and
/// [`Granularity`], making the data set self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "^GDAXI", "AAPL").
    pub symbol: String,
    /// The time interval of each bar in the series.
    pub granularity: Granularity,
    /// The collection of OHLCV bars, ascending by timestamp.
    pub bars: Vec<Bar>,
}
