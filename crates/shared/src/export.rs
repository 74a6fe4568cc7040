//! Flat-file half of the sink: JSON snapshot and CSV tables.
//!
//! Exports overwrite their target path unconditionally with the full
//! current-run record set; deduplication applies only to durable
//! storage, never to these snapshots.

use crate::models::{AnimeProjection, AnimeRow, CharacterRow, ReviewRow, VoiceActorRow};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{info, warn};

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_i64(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_bool(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the raw anime items as one JSON document: `{"data": [...]}`
pub fn write_json_snapshot(path: impl AsRef<Path>, raw_items: &[Value]) -> Result<()> {
    let path = path.as_ref();

    let document = json!({ "data": raw_items });
    let content =
        serde_json::to_string_pretty(&document).context("Failed to serialize JSON snapshot")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write JSON snapshot: {}", path.display()))?;

    info!(path = %path.display(), items = raw_items.len(), "JSON snapshot written");
    Ok(())
}

/// Write the flattened anime table as CSV, with the column set of the
/// active projection
pub fn write_anime_csv(
    path: impl AsRef<Path>,
    rows: &[AnimeRow],
    projection: AnimeProjection,
) -> Result<()> {
    let path = path.as_ref();

    if rows.is_empty() {
        warn!(path = %path.display(), "No anime rows to export");
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record(projection.columns())?;

    for row in rows {
        let mut record = vec![
            opt_i64(row.anime_id),
            opt_str(&row.title),
            opt_str(&row.title_english),
        ];
        if projection.includes_synopsis() {
            record.push(opt_str(&row.synopsis));
        }
        record.extend([
            opt_str(&row.genres),
            opt_str(&row.status),
            opt_f64(row.score),
            opt_i64(row.scored_by),
            opt_str(&row.media_type),
            opt_str(&row.source),
            opt_i64(row.episodes),
            opt_i64(row.popularity),
            opt_i64(row.members),
            opt_i64(row.rank),
            opt_i64(row.favorites),
            opt_str(&row.season),
            opt_i64(row.year),
        ]);
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Anime CSV written");
    Ok(())
}

/// Write the character table as CSV
pub fn write_character_csv(path: impl AsRef<Path>, rows: &[CharacterRow]) -> Result<()> {
    let path = path.as_ref();

    if rows.is_empty() {
        warn!(path = %path.display(), "No character rows to export");
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record(["anime_id", "character_id", "name", "role", "favorites"])?;

    for row in rows {
        writer.write_record(&[
            row.anime_id.to_string(),
            opt_i64(row.character_id),
            opt_str(&row.name),
            opt_str(&row.role),
            opt_i64(row.favorites),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Character CSV written");
    Ok(())
}

/// Write the voice actor table as CSV
pub fn write_voice_actor_csv(path: impl AsRef<Path>, rows: &[VoiceActorRow]) -> Result<()> {
    let path = path.as_ref();

    if rows.is_empty() {
        warn!(path = %path.display(), "No voice actor rows to export");
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record([
        "character_id",
        "voice_actor_id",
        "voice_actor_name",
        "voice_actor_language",
    ])?;

    for row in rows {
        writer.write_record(&[
            opt_i64(row.character_id),
            row.voice_actor_id.to_string(),
            row.voice_actor_name.clone(),
            row.voice_actor_language.clone(),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Voice actor CSV written");
    Ok(())
}

/// Write the review table as CSV
pub fn write_review_csv(path: impl AsRef<Path>, rows: &[ReviewRow]) -> Result<()> {
    let path = path.as_ref();

    if rows.is_empty() {
        warn!(path = %path.display(), "No review rows to export");
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record([
        "anime_id",
        "review_id",
        "score",
        "is_spoiler",
        "is_preliminary",
        "episodes_watched",
        "tags",
        "review_text",
    ])?;

    for row in rows {
        writer.write_record(&[
            row.anime_id.to_string(),
            opt_i64(row.review_id),
            opt_i64(row.score),
            opt_bool(row.is_spoiler),
            opt_bool(row.is_preliminary),
            opt_i64(row.episodes_watched),
            opt_str(&row.tags),
            opt_str(&row.review_text),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Review CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_snapshot_wraps_items_in_data_key() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("anime_data.json");

        let items = vec![json!({"mal_id": 1, "title": "A"})];
        write_json_snapshot(&path, &items)?;

        let content = std::fs::read_to_string(&path)?;
        let parsed: Value = serde_json::from_str(&content)?;
        assert_eq!(parsed["data"][0]["mal_id"], 1);
        Ok(())
    }

    #[test]
    fn test_anime_csv_current_projection() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("anime_data.csv");

        let rows = vec![AnimeRow {
            anime_id: Some(42),
            title: Some("Example".to_string()),
            synopsis: Some("A story".to_string()),
            genres: Some("Action, Comedy".to_string()),
            score: Some(7.5),
            ..Default::default()
        }];

        write_anime_csv(&path, &rows, AnimeProjection::Current)?;

        let content = std::fs::read_to_string(&path)?;
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("anime_id,title,title_english,synopsis"));
        let data = lines.next().unwrap();
        assert!(data.contains("42"));
        assert!(data.contains("\"Action, Comedy\""));
        Ok(())
    }

    #[test]
    fn test_anime_csv_legacy_projection_omits_synopsis() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("anime_data.csv");

        let rows = vec![AnimeRow {
            anime_id: Some(42),
            synopsis: Some("dropped".to_string()),
            ..Default::default()
        }];

        write_anime_csv(&path, &rows, AnimeProjection::Legacy)?;

        let content = std::fs::read_to_string(&path)?;
        let header = content.lines().next().unwrap();
        assert!(!header.contains("synopsis"));
        assert!(!content.contains("dropped"));
        Ok(())
    }

    #[test]
    fn test_empty_rows_skip_file_creation() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("review_data.csv");

        write_review_csv(&path, &[])?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_export_overwrites_previous_snapshot() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("anime_data.json");

        write_json_snapshot(&path, &[json!({"mal_id": 1})])?;
        write_json_snapshot(&path, &[json!({"mal_id": 2})])?;

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        let data = parsed["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["mal_id"], 2);
        Ok(())
    }
}
