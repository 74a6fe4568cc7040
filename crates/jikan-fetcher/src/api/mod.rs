//! Jikan API v4 client implementation.
//!
//! This module provides a rate-limited client for the Jikan API
//! (MyAnimeList unofficial API) behind a narrow trait so the pipeline
//! can be exercised without a network.

pub mod client;
pub mod rate_limiter;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;
use types::UpstreamError;

pub use client::JikanClient;
pub use rate_limiter::RateLimiter;
pub use types::{DataEnvelope, UpstreamCause};

/// The three upstream resources the pipeline consumes.
///
/// Items come back loosely typed; shape handling is the normalizer's
/// job, not the client's.
#[async_trait]
pub trait JikanApi {
    /// One page of the seasonal listing for (year, season)
    async fn season_page(
        &mut self,
        year: i32,
        season: &str,
        page: u32,
    ) -> Result<Vec<Value>, UpstreamError>;

    /// Character roster for one anime
    async fn characters(&mut self, anime_id: i64) -> Result<Vec<Value>, UpstreamError>;

    /// User reviews for one anime
    async fn reviews(&mut self, anime_id: i64) -> Result<Vec<Value>, UpstreamError>;
}
