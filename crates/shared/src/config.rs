//! Configuration management for the anime dataset fetcher.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings. Database credentials live here
//! too; they are deliberately not validated until connection time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// PostgreSQL connection settings
    pub database: DatabaseConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Jikan fetcher settings
    pub fetcher: FetcherConfig,

    /// Export file settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// PostgreSQL connection configuration
///
/// Missing values surface as a connection error at sink time,
/// mirroring how the credentials are consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Enable the database sink (file exports always run)
    pub enabled: bool,

    /// Database name
    pub name: String,

    /// Database user
    pub user: String,

    /// Database password
    pub password: String,

    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Target table for anime rows
    pub anime_table: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Jikan fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// Minimum delay between consecutive API requests, in milliseconds
    pub request_delay_ms: u64,

    /// Years to fetch
    pub years: Vec<i32>,

    /// Season labels to fetch (winter, spring, summer, fall)
    pub seasons: Vec<String>,

    /// Anime field projection: "current" or "legacy"
    pub projection: String,
}

/// Export file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export directory (relative to data directory or absolute)
    pub export_dir: String,

    /// Raw anime JSON snapshot file name
    pub anime_json: String,

    /// Flattened anime CSV file name
    pub anime_csv: String,

    /// Review CSV file name
    pub review_csv: String,

    /// Character CSV file name
    pub character_csv: String,

    /// Voice actor CSV file name
    pub voice_actor_csv: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            export_dir: "exports".to_string(),
            anime_json: "anime_data.json".to_string(),
            anime_csv: "anime_data.csv".to_string(),
            review_csv: "review_data.csv".to_string(),
            character_csv: "character_information.csv".to_string(),
            voice_actor_csv: "voice_actor_information.csv".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            database: DatabaseConfig {
                enabled: true,
                name: String::new(),
                user: String::new(),
                password: String::new(),
                host: "localhost".to_string(),
                port: 5432,
                anime_table: "anime_data".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            fetcher: FetcherConfig {
                base_url: "https://api.jikan.moe/v4".to_string(),
                request_delay_ms: 800,
                years: vec![2024],
                seasons: vec!["summer".to_string()],
                projection: "current".to_string(),
            },
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the absolute path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }

    /// Get the absolute path for the export directory
    pub fn export_dir(&self) -> PathBuf {
        let export_path = Path::new(&self.export.export_dir);
        if export_path.is_absolute() {
            export_path.to_path_buf()
        } else {
            self.data_dir().join(export_path)
        }
    }
}
