//! Lookback periods for bounded historical fetches.
//!
//! A [`LookbackPeriod`] expresses "how much history" a fetch request covers
//! (`5d`, `1mo`, `1y`), using the same token vocabulary the upstream data
//! source expects. It is part of the cache key identity, so `Display` must
//! stay stable.

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::{ParseError, granularity::split_token};

/// Lookback period unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodUnit {
    /// Trailing calendar days.
    Day,
    /// Trailing calendar months.
    Month,
    /// Trailing calendar years.
    Year,
}

/// A lookback window = amount × unit (e.g., 5-Day, 1-Month, 1-Year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookbackPeriod {
    /// Magnitude component; never zero.
    pub amount: NonZeroU32,
    /// Unit component.
    pub unit: PeriodUnit,
}

impl LookbackPeriod {
    /// Creates a new lookback period.
    pub const fn new(amount: NonZeroU32, unit: PeriodUnit) -> Self {
        Self { amount, unit }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            PeriodUnit::Day => "d",
            PeriodUnit::Month => "mo",
            PeriodUnit::Year => "y",
        };
        write!(f, "{}{}", self.amount.get(), u)
    }
}

impl FromStr for LookbackPeriod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, unit) = split_token(s)?;
        let unit = match unit {
            "d" | "D" => PeriodUnit::Day,
            "mo" => PeriodUnit::Month,
            "y" => PeriodUnit::Year,
            other => return Err(ParseError::Unit(other.to_string())),
        };
        Ok(Self::new(amount, unit))
    }
}
