//! Seasonal collection across the years × seasons cartesian product.
//!
//! Each (year, season) partition is fetched independently; a partition
//! that yields nothing contributes nothing. Flattening and the numeric
//! sentinel scrub run once over the combined set, after all partitions.

use crate::api::JikanApi;
use crate::normalize::flatten_anime;
use crate::pagination::fetch_season;
use serde_json::Value;
use shared::models::{AnimeProjection, AnimeRow};
use tracing::info;

/// Combined output of one collection run
#[derive(Debug, Default)]
pub struct SeasonSet {
    /// Raw items in fetch order, kept for the JSON snapshot
    pub raw: Vec<Value>,
    /// Flattened and scrubbed rows, parallel to `raw`
    pub rows: Vec<AnimeRow>,
    /// Partitions walked
    pub partitions: usize,
    /// Partitions that ended on a failed page
    pub truncated_partitions: usize,
}

impl SeasonSet {
    /// Anime ids present in the collected rows, in row order
    pub fn anime_ids(&self) -> Vec<i64> {
        self.rows.iter().filter_map(|row| row.anime_id).collect()
    }
}

/// Collects seasonal listings for every (year, season) pair
pub struct SeasonalCollector {
    years: Vec<i32>,
    seasons: Vec<String>,
    projection: AnimeProjection,
}

/// One numeric field through the sentinel pipeline: fill absent with 0,
/// cast to integer, then restore 0 to null.
///
/// A genuine upstream 0 is indistinguishable from absent here; that
/// lossy behavior is intentional and relied upon downstream.
fn scrub_i64(value: Option<i64>) -> Option<i64> {
    let filled = value.unwrap_or(0);
    if filled == 0 {
        None
    } else {
        Some(filled)
    }
}

/// Same sentinel rule for the float score column
fn scrub_f64(value: Option<f64>) -> Option<f64> {
    let filled = value.unwrap_or(0.0);
    if filled == 0.0 {
        None
    } else {
        Some(filled)
    }
}

/// Run the fill-cast-restore pass over the designated numeric columns
/// of the full combined table
pub fn scrub_numeric_sentinels(rows: &mut [AnimeRow]) {
    for row in rows {
        row.anime_id = scrub_i64(row.anime_id);
        row.scored_by = scrub_i64(row.scored_by);
        row.episodes = scrub_i64(row.episodes);
        row.popularity = scrub_i64(row.popularity);
        row.members = scrub_i64(row.members);
        row.rank = scrub_i64(row.rank);
        row.favorites = scrub_i64(row.favorites);
        row.year = scrub_i64(row.year);
        row.score = scrub_f64(row.score);
    }
}

impl SeasonalCollector {
    /// Create a collector over the requested years and season labels
    pub fn new(years: Vec<i32>, seasons: Vec<String>, projection: AnimeProjection) -> Self {
        Self {
            years,
            seasons,
            projection,
        }
    }

    /// Fetch every partition, then flatten and scrub the combined set.
    ///
    /// Years iterate outer, seasons inner; the order matters only for
    /// log readability.
    pub async fn collect(&self, api: &mut impl JikanApi) -> SeasonSet {
        let mut set = SeasonSet::default();

        for &year in &self.years {
            for season in &self.seasons {
                info!(year = year, season = %season, "Fetching partition");

                let partition = fetch_season(api, year, season).await;
                set.partitions += 1;
                if partition.truncated {
                    set.truncated_partitions += 1;
                }

                if partition.items.is_empty() {
                    info!(year = year, season = %season, "Partition yielded no anime");
                    continue;
                }

                set.raw.extend(partition.items);
            }
        }

        set.rows = set
            .raw
            .iter()
            .map(|item| flatten_anime(item, self.projection))
            .collect();
        scrub_numeric_sentinels(&mut set.rows);

        info!(
            partitions = set.partitions,
            truncated = set.truncated_partitions,
            total_anime = set.rows.len(),
            "All season data fetched"
        );

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedApi;
    use serde_json::json;

    #[test]
    fn test_scrub_absent_rank_stays_null() {
        let mut rows = vec![AnimeRow {
            anime_id: Some(1),
            rank: None,
            ..Default::default()
        }];
        scrub_numeric_sentinels(&mut rows);
        assert_eq!(rows[0].rank, None);
    }

    #[test]
    fn test_scrub_genuine_zero_rank_becomes_null() {
        // A real rank of 0 is indistinguishable from absent; the zero
        // sentinel swallows it by design.
        let mut rows = vec![AnimeRow {
            anime_id: Some(1),
            rank: Some(0),
            score: Some(0.0),
            ..Default::default()
        }];
        scrub_numeric_sentinels(&mut rows);
        assert_eq!(rows[0].rank, None);
        assert_eq!(rows[0].score, None);
    }

    #[test]
    fn test_scrub_keeps_nonzero_values() {
        let mut rows = vec![AnimeRow {
            anime_id: Some(1),
            rank: Some(42),
            score: Some(7.1),
            members: Some(100),
            ..Default::default()
        }];
        scrub_numeric_sentinels(&mut rows);
        assert_eq!(rows[0].rank, Some(42));
        assert_eq!(rows[0].score, Some(7.1));
        assert_eq!(rows[0].members, Some(100));
    }

    #[tokio::test]
    async fn test_collect_concatenates_partitions() {
        let mut api = ScriptedApi::default();
        api.add_season_page(2023, "winter", vec![json!({"mal_id": 1, "title": "A"})]);
        api.add_season_page(2023, "summer", vec![json!({"mal_id": 2, "title": "B"})]);
        api.add_season_page(2024, "winter", vec![json!({"mal_id": 3, "title": "C"})]);
        // 2024 summer left unscripted: empty partition

        let collector = SeasonalCollector::new(
            vec![2023, 2024],
            vec!["winter".to_string(), "summer".to_string()],
            AnimeProjection::Current,
        );
        let set = collector.collect(&mut api).await;

        assert_eq!(set.partitions, 4);
        assert_eq!(set.rows.len(), 3);
        assert_eq!(set.anime_ids(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_partition_does_not_abort_collection() {
        let mut api = ScriptedApi::default();
        api.fail_season_page(2024, "winter");
        api.add_season_page(2024, "summer", vec![json!({"mal_id": 9, "title": "Kept"})]);

        let collector = SeasonalCollector::new(
            vec![2024],
            vec!["winter".to_string(), "summer".to_string()],
            AnimeProjection::Current,
        );
        let set = collector.collect(&mut api).await;

        assert_eq!(set.truncated_partitions, 1);
        assert_eq!(set.anime_ids(), vec![9]);
    }

    #[tokio::test]
    async fn test_collect_runs_sentinel_scrub() {
        let mut api = ScriptedApi::default();
        api.add_season_page(
            2024,
            "summer",
            vec![json!({"mal_id": 5, "title": "Zeroed", "rank": 0, "members": 10})],
        );

        let collector = SeasonalCollector::new(
            vec![2024],
            vec!["summer".to_string()],
            AnimeProjection::Current,
        );
        let set = collector.collect(&mut api).await;

        assert_eq!(set.rows[0].rank, None);
        assert_eq!(set.rows[0].members, Some(10));
    }

    #[tokio::test]
    async fn test_two_pages_then_empty_page_scenario() {
        let mut api = ScriptedApi::default();
        api.add_season_page(2024, "summer", vec![json!({"mal_id": 1, "title": "One"})]);
        api.add_season_page(2024, "summer", vec![json!({"mal_id": 2, "title": "Two"})]);
        api.add_season_page(2024, "summer", vec![]);

        let collector = SeasonalCollector::new(
            vec![2024],
            vec!["summer".to_string()],
            AnimeProjection::Current,
        );
        let set = collector.collect(&mut api).await;

        assert_eq!(set.rows.len(), 2);
        assert_eq!(set.anime_ids(), vec![1, 2]);
        assert_eq!(set.raw.len(), 2);
    }
}
