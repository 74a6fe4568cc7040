//! Jikan API client with rate limiting.
//!
//! One logical request at a time; a minimum inter-request delay is
//! enforced before every call. There is no automatic retry here: retry
//! policy belongs to the caller, and for this pipeline "retry" means
//! re-running the whole process.

use super::rate_limiter::RateLimiter;
use super::types::{DataEnvelope, UpstreamError};
use super::JikanApi;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Jikan API v4 client
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: String,
    /// Rate limiter
    rate_limiter: RateLimiter,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(base_url: String, min_interval: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("anime-dataset-fetcher/0.1.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            rate_limiter: RateLimiter::new(min_interval),
        })
    }

    /// Make one rate-limited GET request and unwrap the data envelope
    async fn get(&mut self, endpoint: &str) -> Result<Vec<Value>, UpstreamError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Making API request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::status(endpoint, status));
        }

        let envelope: DataEnvelope = response
            .json()
            .await
            .map_err(|e| UpstreamError::decode(endpoint, e))?;

        debug!(url = %url, items = envelope.data.len(), "Request successful");
        Ok(envelope.data)
    }
}

#[async_trait]
impl JikanApi for JikanClient {
    async fn season_page(
        &mut self,
        year: i32,
        season: &str,
        page: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.get(&format!("/seasons/{}/{}?page={}", year, season, page))
            .await
    }

    async fn characters(&mut self, anime_id: i64) -> Result<Vec<Value>, UpstreamError> {
        self.get(&format!("/anime/{}/characters", anime_id)).await
    }

    async fn reviews(&mut self, anime_id: i64) -> Result<Vec<Value>, UpstreamError> {
        self.get(&format!("/anime/{}/reviews", anime_id)).await
    }
}
