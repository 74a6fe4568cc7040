//! Durable-storage half of the sink: idempotent anime table writes.
//!
//! Each call opens its own connection, does its work, and drops the
//! connection. Inserts are guarded by a point lookup on the natural key,
//! so re-running a batch never duplicates rows; pre-existing rows are
//! never overwritten. The whole batch commits as one transaction.

use crate::config::DatabaseConfig;
use crate::db::{self, StorageError};
use crate::models::AnimeRow;
use sqlx::{Connection, Row};
use tracing::{debug, info, warn};

/// Outcome of one upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertStats {
    /// Rows inserted in this batch
    pub inserted: usize,
    /// Rows skipped because the primary key already existed
    pub skipped_existing: usize,
    /// Rows skipped because they carried no primary key
    pub skipped_null_key: usize,
}

/// Anime table store over a configured database
pub struct AnimeStore {
    config: DatabaseConfig,
}

/// Build the idempotent table-creation statement
fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            anime_id BIGINT PRIMARY KEY,
            title VARCHAR(255),
            title_english VARCHAR(255),
            synopsis TEXT,
            genres VARCHAR(255),
            status VARCHAR(50),
            score DOUBLE PRECISION,
            scored_by BIGINT,
            type VARCHAR(50),
            source VARCHAR(50),
            episodes BIGINT,
            popularity BIGINT,
            members BIGINT,
            rank BIGINT,
            favorites BIGINT,
            season VARCHAR(50),
            year BIGINT
        )"
    )
}

/// Build the supporting index statement for primary-key lookups
fn create_index_sql(table: &str) -> String {
    format!("CREATE INDEX IF NOT EXISTS idx_{table}_anime_id ON {table}(anime_id)")
}

/// Build the parameterized insert statement
fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} (
            anime_id, title, title_english, synopsis, genres, status,
            score, scored_by, type, source, episodes,
            popularity, members, rank, favorites, season, year
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"
    )
}

/// Build the point-lookup existence check
fn exists_sql(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {table} WHERE anime_id = $1")
}

impl AnimeStore {
    /// Create a store over the given database configuration
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Create the anime table and its lookup index if absent
    pub async fn create_table(&self, table: &str) -> Result<(), StorageError> {
        let mut conn = db::connect(&self.config).await?;

        let result: Result<(), sqlx::Error> = async {
            sqlx::query(&create_table_sql(table)).execute(&mut conn).await?;
            sqlx::query(&create_index_sql(table)).execute(&mut conn).await?;
            Ok(())
        }
        .await;

        // Connection drops on both paths
        result.map_err(|source| StorageError::Write {
            table: table.to_string(),
            source,
        })?;

        info!(table = table, "Table ready");
        Ok(())
    }

    /// Insert rows whose primary key is not already present.
    ///
    /// All inserts commit as a single transaction after the full batch;
    /// a write failure rolls the transaction back and nothing persists.
    pub async fn upsert(&self, table: &str, rows: &[AnimeRow]) -> Result<UpsertStats, StorageError> {
        let mut conn = db::connect(&self.config).await?;

        let result = Self::upsert_in_tx(&mut conn, table, rows).await;

        match result {
            Ok(stats) => {
                info!(
                    table = table,
                    inserted = stats.inserted,
                    skipped_existing = stats.skipped_existing,
                    skipped_null_key = stats.skipped_null_key,
                    "Upsert batch committed"
                );
                Ok(stats)
            }
            Err(source) => Err(StorageError::Write {
                table: table.to_string(),
                source,
            }),
        }
    }

    async fn upsert_in_tx(
        conn: &mut sqlx::PgConnection,
        table: &str,
        rows: &[AnimeRow],
    ) -> Result<UpsertStats, sqlx::Error> {
        let exists_stmt = exists_sql(table);
        let insert_stmt = insert_sql(table);

        let mut tx = conn.begin().await?;
        let mut stats = UpsertStats::default();

        for row in rows {
            let Some(anime_id) = row.anime_id else {
                warn!(title = ?row.title, "Skipping row without anime_id");
                stats.skipped_null_key += 1;
                continue;
            };

            let existing: i64 = sqlx::query(&exists_stmt)
                .bind(anime_id)
                .fetch_one(&mut *tx)
                .await?
                .get(0);

            if existing > 0 {
                debug!(anime_id = anime_id, "Row already present, skipping");
                stats.skipped_existing += 1;
                continue;
            }

            sqlx::query(&insert_stmt)
                .bind(anime_id)
                .bind(row.title.as_deref())
                .bind(row.title_english.as_deref())
                .bind(row.synopsis.as_deref())
                .bind(row.genres.as_deref())
                .bind(row.status.as_deref())
                .bind(row.score)
                .bind(row.scored_by)
                .bind(row.media_type.as_deref())
                .bind(row.source.as_deref())
                .bind(row.episodes)
                .bind(row.popularity)
                .bind(row.members)
                .bind(row.rank)
                .bind(row.favorites)
                .bind(row.season.as_deref())
                .bind(row.year)
                .execute(&mut *tx)
                .await?;

            stats.inserted += 1;
        }

        // Commit once after the whole batch; on any earlier error the
        // transaction rolls back when dropped.
        tx.commit().await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_sql_declares_primary_key() {
        let sql = create_table_sql("anime_data");
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS anime_data"));
        assert!(sql.contains("anime_id BIGINT PRIMARY KEY"));
    }

    #[test]
    fn test_index_sql_is_idempotent() {
        let sql = create_index_sql("anime_data");
        assert!(sql.contains("CREATE INDEX IF NOT EXISTS"));
        assert!(sql.contains("anime_data(anime_id)"));
    }

    #[test]
    fn test_insert_sql_binds_all_columns() {
        let sql = insert_sql("anime_data");
        // 17 columns, 17 placeholders
        assert!(sql.contains("$17"));
        assert!(!sql.contains("$18"));
        for col in [
            "anime_id", "title", "synopsis", "genres", "score", "rank", "season", "year",
        ] {
            assert!(sql.contains(col), "missing column {col}");
        }
    }

    #[test]
    fn test_exists_sql_is_point_lookup() {
        let sql = exists_sql("anime_data");
        assert_eq!(sql, "SELECT COUNT(*) FROM anime_data WHERE anime_id = $1");
    }

    /// Requires a reachable PostgreSQL instance; run with `cargo test -- --ignored`
    /// and ANIME_DB_NAME / ANIME_DB_USER / ANIME_DB_PASSWORD / ANIME_DB_HOST set.
    #[tokio::test]
    #[ignore]
    async fn test_upsert_is_idempotent_against_live_db() {
        let config = DatabaseConfig {
            enabled: true,
            name: std::env::var("ANIME_DB_NAME").unwrap_or_default(),
            user: std::env::var("ANIME_DB_USER").unwrap_or_default(),
            password: std::env::var("ANIME_DB_PASSWORD").unwrap_or_default(),
            host: std::env::var("ANIME_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: 5432,
            anime_table: "anime_upsert_test".to_string(),
        };

        let store = AnimeStore::new(config);
        store.create_table("anime_upsert_test").await.unwrap();

        let rows = vec![AnimeRow {
            anime_id: Some(1),
            title: Some("Test".to_string()),
            ..Default::default()
        }];

        let first = store.upsert("anime_upsert_test", &rows).await.unwrap();
        let second = store.upsert("anime_upsert_test", &rows).await.unwrap();

        assert_eq!(first.inserted + first.skipped_existing, 1);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped_existing, 1);
    }
}
