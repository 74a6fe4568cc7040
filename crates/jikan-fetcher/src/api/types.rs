//! Jikan API v4 response envelope and upstream error kinds.
//!
//! Sub-resource payloads nest arbitrarily and may omit keys per item,
//! so individual items stay loosely typed (`serde_json::Value`) and
//! only the outer `data` envelope is given a shape.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Envelope wrapping every Jikan list response: `{"data": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope {
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Failure of a single upstream call
#[derive(Debug, Error)]
#[error("request to {endpoint} failed")]
pub struct UpstreamError {
    /// Endpoint path that failed
    pub endpoint: String,
    #[source]
    pub cause: UpstreamCause,
}

/// What went wrong on the wire
#[derive(Debug, Error)]
pub enum UpstreamCause {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("HTTP status {0}")]
    Status(StatusCode),

    #[error("malformed payload: {0}")]
    Decode(reqwest::Error),
}

impl UpstreamError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cause: UpstreamCause::Transport(source),
        }
    }

    pub(crate) fn status(endpoint: &str, status: StatusCode) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cause: UpstreamCause::Status(status),
        }
    }

    pub(crate) fn decode(endpoint: &str, source: reqwest::Error) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cause: UpstreamCause::Decode(source),
        }
    }
}
