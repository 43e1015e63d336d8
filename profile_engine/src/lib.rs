//! Session volume profile computation over OHLCV bars.
//!
//! The pipeline is pure and stateless per call: partition a session's price
//! range into contiguous bins, spread each bar's volume evenly across the
//! bins its low-high range touches, accumulate per bin, and read off the
//! point of control. Sessions are carved out of a bar sequence by calendar
//! date, optionally restricted to a time-of-day window. Nothing here blocks
//! or shares mutable state, so sessions can be profiled in parallel.

#![deny(missing_docs)]

pub mod distribute;
pub mod errors;
pub mod partition;
pub mod profile;
pub mod segment;
