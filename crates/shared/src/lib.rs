//! Shared library for the anime dataset fetcher.
//!
//! This crate provides common functionality used by the fetcher binary:
//! - Configuration management
//! - Flat row models
//! - Flat-file exports (JSON snapshot + CSV tables)
//! - PostgreSQL storage with duplicate suppression
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::{Config, DatabaseConfig, FetcherConfig};
pub use db::StorageError;
pub use logging::LogConfig;
pub use models::*;
pub use store::{AnimeStore, UpsertStats};

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
