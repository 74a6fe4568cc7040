//! PostgreSQL connection factory.
//!
//! Credentials are taken from [`DatabaseConfig`] as-is; nothing is
//! validated up front, so a missing value surfaces here as a
//! connection error.

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use thiserror::Error;
use tracing::{debug, info};

/// Storage error kinds surfaced by the sink
#[derive(Debug, Error)]
pub enum StorageError {
    /// Cannot establish a database session
    #[error("failed to connect to database {name:?} at {host}:{port}")]
    Connection {
        name: String,
        host: String,
        port: u16,
        #[source]
        source: sqlx::Error,
    },

    /// Insert or commit failure; the in-progress transaction is rolled back
    #[error("failed to write batch to table {table}")]
    Write {
        table: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Open a connection to the configured database.
///
/// The connection is owned by the caller and scoped to one sink call;
/// dropping it releases the session on every exit path.
pub async fn connect(config: &DatabaseConfig) -> Result<PgConnection, StorageError> {
    debug!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "Connecting to database"
    );

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name);

    let conn = PgConnection::connect_with(&options)
        .await
        .map_err(|source| StorageError::Connection {
            name: config.name.clone(),
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

    info!(database = %config.name, "Database connection established");
    Ok(conn)
}
