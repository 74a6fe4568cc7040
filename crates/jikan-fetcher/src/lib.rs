//! Seasonal anime dataset fetcher over the Jikan API v4.
//!
//! Walks the seasonal listings for a set of (year, season) partitions,
//! fetches per-anime character rosters and reviews, flattens everything
//! into tabular rows, and hands them to the export and storage sinks.

pub mod api;
pub mod collector;
pub mod details;
pub mod normalize;
pub mod pagination;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{JikanApi, JikanClient, RateLimiter};
pub use collector::{SeasonSet, SeasonalCollector};
pub use details::{fetch_details, DetailSet};
