//! Bar data model, provider abstraction, and the freshness-bounded on-disk
//! bar cache.
//!
//! This crate owns everything that happens before profile computation: the
//! canonical [`Bar`](models::bar::Bar) type, the vendor-agnostic
//! [`DataProvider`](providers::DataProvider) trait, a columnar
//! [`BarCache`](cache::BarCache) keyed by `(instrument, period, granularity)`,
//! and a [`CachedFetcher`](fetch::CachedFetcher) that coalesces concurrent
//! misses onto a single upstream fetch.

pub mod cache;
pub mod fetch;
pub mod models;
pub mod providers;
