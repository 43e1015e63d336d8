//! Allocation of one bar's volume across the partition bins it touches.
//!
//! The split is deliberately uniform: a bar contributes
//! `volume / touched_count` to every bin between the one containing its low
//! and the one containing its high, regardless of how much of the bar's
//! range overlaps each bin. Overlap-proportional weighting would change
//! profile shape materially for wide-range bars, so any move away from the
//! uniform split is a semantic change, not a refinement.

use market_data::models::bar::Bar;

use crate::errors::ProfileError;
use crate::partition::Partition;

/// Computes the per-bin volume contributions of a single bar.
///
/// Entries are `(bin index, contribution)` in ascending index order. Both
/// boundary indices are clamped into `[0, bin_count - 1]` to absorb float
/// edge effects at the partition boundary; an index pair left inverted after
/// clamping collapses onto the bin holding the bar's low. An empty result
/// means the bar's volume could not be placed at all; the aggregator
/// surfaces that as a conservation diagnostic rather than a fault.
///
/// # Errors
/// [`ProfileError::InvalidBar`] when `bar.low > bar.high`.
pub fn distribute(bar: &Bar, partition: &Partition) -> Result<Vec<(usize, f64)>, ProfileError> {
    if bar.low > bar.high {
        return Err(ProfileError::InvalidBar {
            low: bar.low,
            high: bar.high,
        });
    }

    let edges = partition.edges();
    let last = partition.bin_count() as i64 - 1;

    // Bins span [edges[i], edges[i+1]), so the bin containing a price is
    // the right-insertion point of that price minus one. A high sitting
    // exactly on an interior edge belongs to the bin above it.
    let start = edges.partition_point(|e| *e <= bar.low) as i64 - 1;
    let end = edges.partition_point(|e| *e <= bar.high) as i64 - 1;

    let start = start.clamp(0, last);
    let end = end.clamp(0, last).max(start);

    let touched = (end - start + 1) as usize;
    if touched == 0 {
        return Ok(Vec::new());
    }
    let share = bar.volume as f64 / touched as f64;
    Ok((start as usize..=end as usize).map(|i| (i, share)).collect())
}
