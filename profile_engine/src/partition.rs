//! Price-range partitioning into contiguous, evenly sized bins.

use crate::errors::ProfileError;

/// One discretized price interval in a [`Partition`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBin {
    /// Position within the partition, `0..bin_count`.
    pub index: usize,
    /// Inclusive lower bound.
    pub lower: f64,
    /// Upper bound. Exclusive, except for the final bin, which is closed so
    /// the partition covers the session high.
    pub upper: f64,
}

impl PriceBin {
    /// Midpoint of the bin, used as its representative price level.
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// An ordered set of contiguous bins exactly covering
/// `[price_min, price_max]`.
///
/// Stored as `bin_count + 1` ascending edges; bin `i` spans
/// `[edges[i], edges[i+1])`. Interior bounds are shared, so there are no
/// gaps or overlaps by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    edges: Vec<f64>,
}

impl Partition {
    /// Builds `bin_count` evenly sized bins across `[price_min, price_max]`.
    ///
    /// A degenerate range (`price_min == price_max`, e.g. a single-bar
    /// session with no spread) still yields `bin_count` zero-width bins
    /// centered on the single price.
    ///
    /// # Errors
    /// [`ProfileError::InvalidRange`] when `price_max < price_min`;
    /// [`ProfileError::InvalidBinCount`] when `bin_count == 0`.
    pub fn build(price_min: f64, price_max: f64, bin_count: usize) -> Result<Self, ProfileError> {
        if bin_count == 0 {
            return Err(ProfileError::InvalidBinCount);
        }
        if price_max < price_min {
            return Err(ProfileError::InvalidRange {
                min: price_min,
                max: price_max,
            });
        }

        let step = (price_max - price_min) / bin_count as f64;
        let mut edges = Vec::with_capacity(bin_count + 1);
        for i in 0..bin_count {
            edges.push(price_min + step * i as f64);
        }
        // The last edge is pinned to price_max so coverage is exact
        // regardless of float drift in the step multiplication.
        edges.push(price_max);

        Ok(Self { edges })
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// The `bin_count + 1` ascending edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// The bin at `index`.
    ///
    /// # Panics
    /// Panics if `index >= bin_count`.
    pub fn bin(&self, index: usize) -> PriceBin {
        PriceBin {
            index,
            lower: self.edges[index],
            upper: self.edges[index + 1],
        }
    }

    /// Iterator over all bins in ascending price order.
    pub fn bins(&self) -> impl Iterator<Item = PriceBin> + '_ {
        (0..self.bin_count()).map(|i| self.bin(i))
    }

    /// Bin center prices in ascending order.
    pub fn centers(&self) -> Vec<f64> {
        self.bins().map(|b| b.center()).collect()
    }
}
