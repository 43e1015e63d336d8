//! Granularity utilities for expressing uniform bar intervals.
//!
//! A [`Granularity`] pairs a non-zero amount with a [`GranularityUnit`],
//! giving a typed alternative to ad-hoc strings like `"5m"` when building
//! fetch requests or cache keys. `Display` and `FromStr` round-trip the
//! short token form (`5m`, `1h`, `1d`).

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::ParseError;

/// Bar interval unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GranularityUnit {
    /// One-minute buckets.
    Minute,
    /// One-hour buckets.
    Hour,
    /// Calendar-day buckets.
    Day,
}

/// A bar interval = amount × unit (e.g., 5-Minute, 1-Hour, 1-Day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Granularity {
    /// Magnitude component; never zero.
    pub amount: NonZeroU32,
    /// Unit component.
    pub unit: GranularityUnit,
}

impl Granularity {
    /// Creates a new granularity.
    pub const fn new(amount: NonZeroU32, unit: GranularityUnit) -> Self {
        Self { amount, unit }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            GranularityUnit::Minute => "m",
            GranularityUnit::Hour => "h",
            GranularityUnit::Day => "d",
        };
        write!(f, "{}{}", self.amount.get(), u)
    }
}

impl FromStr for Granularity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, unit) = split_token(s)?;
        let unit = match unit {
            "m" => GranularityUnit::Minute,
            "h" => GranularityUnit::Hour,
            "d" | "D" => GranularityUnit::Day,
            other => return Err(ParseError::Unit(other.to_string())),
        };
        Ok(Self::new(amount, unit))
    }
}

/// Splits a token like `"15m"` into its amount and unit parts.
pub(crate) fn split_token(s: &str) -> Result<(NonZeroU32, &str), ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    let unit_start = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| ParseError::Unit(String::new()))?;
    let (digits, unit) = s.split_at(unit_start);
    let amount = digits
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| ParseError::Amount(digits.to_string()))?;
    Ok((amount, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_hour_day() {
        assert_eq!(
            "5m".parse::<Granularity>().unwrap(),
            Granularity::new(NonZeroU32::new(5).unwrap(), GranularityUnit::Minute)
        );
        assert_eq!(
            "1h".parse::<Granularity>().unwrap().unit,
            GranularityUnit::Hour
        );
        assert_eq!(
            "1D".parse::<Granularity>().unwrap().unit,
            GranularityUnit::Day
        );
    }

    #[test]
    fn display_roundtrips() {
        for token in ["1m", "15m", "1h", "1d"] {
            let g: Granularity = token.parse().unwrap();
            assert_eq!(g.to_string(), token);
            assert_eq!(g.to_string().parse::<Granularity>().unwrap(), g);
        }
    }

    #[test]
    fn rejects_bad_tokens() {
        assert_eq!("".parse::<Granularity>(), Err(ParseError::Empty));
        assert_eq!(
            "0m".parse::<Granularity>(),
            Err(ParseError::Amount("0".to_string()))
        );
        assert_eq!(
            "5x".parse::<Granularity>(),
            Err(ParseError::Unit("x".to_string()))
        );
        assert!(matches!(
            "15".parse::<Granularity>(),
            Err(ParseError::Unit(_))
        ));
    }
}
