//! Universal parameters for requesting time-series bar data.
//!
//! A [`FetchRequest`] is vendor-agnostic: providers interpret it against
//! their own API, and the cache uses it verbatim as the entry identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{granularity::Granularity, period::LookbackPeriod};

/// Identity of one bar fetch: which instrument, how much history, at what
/// bar interval.
///
/// Doubles as the cache key; two requests with equal fields resolve to the
/// same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Instrument symbol (e.g., "^GDAXI").
    pub instrument: String,
    /// Trailing history window to request.
    pub period: LookbackPeriod,
    /// Bar interval.
    pub granularity: Granularity,
}

impl FetchRequest {
    /// Creates a new fetch request.
    pub fn new(
        instrument: impl Into<String>,
        period: LookbackPeriod,
        granularity: Granularity,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            period,
            granularity,
        }
    }

    /// File stem identifying this request inside the cache directory,
    /// e.g. `"^GDAXI_5d_1h"`.
    pub fn cache_stem(&self) -> String {
        format!("{}_{}_{}", self.instrument, self.period, self.granularity)
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.instrument, self.period, self.granularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_stem_is_stable() {
        let req = FetchRequest::new(
            "^GDAXI",
            "5d".parse().unwrap(),
            "1h".parse().unwrap(),
        );
        assert_eq!(req.cache_stem(), "^GDAXI_5d_1h");
    }

    #[test]
    fn equal_fields_hash_to_same_key() {
        use std::collections::HashMap;
        let a = FetchRequest::new("DAX", "1mo".parse().unwrap(), "1d".parse().unwrap());
        let b = a.clone();
        let mut map = HashMap::new();
        map.insert(a, 1);
        assert!(map.contains_key(&b));
    }
}
