//! Injectable time source for cache staleness decisions.
//!
//! Freshness checks compare an entry's stored-at timestamp against
//! [`Clock::now`] rather than the wall clock directly, so tests can pin the
//! observation instant and exercise the TTL boundary deterministically.

use chrono::{DateTime, Utc};

/// Source of "now" for staleness checks.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time; the production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
